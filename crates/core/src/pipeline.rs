//! 파이프라인 trait -- 모듈 확장 포인트 정의

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::LogsyncError;
use crate::types::Event;

/// 이벤트 배치를 가져오는 trait
///
/// 실행 한 번에 배치 하나를 조회합니다. 페이지네이션이나 스트리밍은 없습니다.
pub trait EventSource: Send + Sync {
    /// 조회 조건 타입
    type Query: Send + Sync;

    /// 소스 이름
    fn name(&self) -> &str;

    /// 조회 조건에 맞는 이벤트를 가져옵니다.
    fn fetch(
        &self,
        query: &Self::Query,
    ) -> impl Future<Output = Result<Vec<Event>, LogsyncError>> + Send;
}

/// 렌더링된 보안 이벤트 레코드를 전달하는 trait
///
/// `severity`는 syslog severity(0-7)이며, `stamp`는 envelope에 기록될 시각입니다.
pub trait RecordSink: Send + Sync {
    /// 싱크 이름
    fn name(&self) -> &str;

    /// 레코드 하나를 전달합니다.
    fn deliver(
        &self,
        stamp: DateTime<Utc>,
        severity: u8,
        record: &str,
    ) -> impl Future<Output = Result<(), LogsyncError>> + Send;
}
