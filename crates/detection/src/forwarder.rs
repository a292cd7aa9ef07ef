//! 배치 전달기 -- 이벤트 → 탐지 → CEF → 레코드 싱크
//!
//! # 처리 흐름
//!
//! ```text
//! [Event] ──▶ DetectionSet.matching() ──▶ Detection.render()
//!                                              │
//!                                              ▼
//!                                    RecordSink.deliver()
//!                                              │
//!                                 실패: warn 로그 + failed 증가, 계속 진행
//! ```
//!
//! 이벤트와 탐지는 순서대로 처리되며, 한 번에 하나의 전달만 기다립니다.

use std::fmt;

use chrono::{DateTime, Utc};
use logsync_core::error::LogsyncError;
use logsync_core::metrics as m;
use logsync_core::pipeline::RecordSink;
use logsync_core::types::Event;
use serde::Serialize;
use tracing::{info, warn};

use crate::set::DetectionSet;

/// 배치 처리 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 처리한 이벤트 수
    pub events: usize,
    /// 탐지 매칭 수 (이벤트 × 탐지)
    pub matched: usize,
    /// 전달에 성공한 레코드 수
    pub reported: usize,
    /// 전달에 실패한 레코드 수
    pub failed: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "events={} matched={} reported={} failed={}",
            self.events, self.matched, self.reported, self.failed
        )
    }
}

/// 배치 전달기
pub struct Forwarder<K: RecordSink> {
    detections: DetectionSet,
    sink: K,
}

impl<K: RecordSink> Forwarder<K> {
    pub fn new(detections: DetectionSet, sink: K) -> Self {
        Self { detections, sink }
    }

    pub fn detections(&self) -> &DetectionSet {
        &self.detections
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// 싱크를 돌려받습니다 (연결 종료 등 정리용).
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// 이벤트 배치를 처리합니다.
    ///
    /// 개별 전달 실패는 배치를 중단하지 않습니다.
    pub async fn process(&self, events: &[Event]) -> BatchReport {
        let mut report = BatchReport {
            events: events.len(),
            ..Default::default()
        };

        for event in events {
            for detection in self.detections.matching(event) {
                report.matched += 1;
                metrics::counter!(m::DETECTIONS_MATCHED_TOTAL, m::LABEL_CLASS_ID => detection.class_id.clone())
                    .increment(1);

                let record = detection.render(event);
                info!(
                    time = event.time,
                    class_id = %detection.class_id,
                    sink = self.sink.name(),
                    "[{}] {}",
                    event.time,
                    record
                );

                match self
                    .sink
                    .deliver(event.occurred_at(), detection.loglevel, &record)
                    .await
                {
                    Ok(()) => {
                        report.reported += 1;
                        metrics::counter!(m::RECORDS_REPORTED_TOTAL, m::LABEL_CLASS_ID => detection.class_id.clone())
                            .increment(1);
                    }
                    Err(e) => {
                        report.failed += 1;
                        metrics::counter!(m::REPORT_FAILURES_TOTAL, m::LABEL_CLASS_ID => detection.class_id.clone())
                            .increment(1);
                        warn!(
                            time = event.time,
                            class_id = %detection.class_id,
                            error = %e,
                            "[{}] {}",
                            event.time,
                            e
                        );
                    }
                }
            }
        }

        report
    }
}

/// 레코드를 보내지 않고 받아들이는 싱크 (dry run)
///
/// 모든 레코드는 전달 성공으로 집계됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSink;

impl RecordSink for DryRunSink {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn deliver(
        &self,
        _stamp: DateTime<Utc>,
        _severity: u8,
        _record: &str,
    ) -> Result<(), LogsyncError> {
        Ok(())
    }
}
