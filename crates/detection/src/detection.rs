//! 탐지 -- 리포터 AND 조합과 CEF 레코드 생성

use logsync_cef_syslog::CefRecord;
use logsync_cef_syslog::cef::{
    EXT_RECEIPT_TIME, EXT_SOURCE_ADDRESS, EXT_SOURCE_USER_ID, EXT_SOURCE_USER_NAME,
};
use logsync_core::config::DetectionConfig;
use logsync_core::types::Event;

use crate::reporter::Reporter;

/// 사용자 이름 상세 속성 키
const DETAIL_USERNAME: &str = "username";

/// 사용자 이름을 알 수 없을 때 기록하는 값
const UNKNOWN_USER: &str = "unknown";

/// 컴파일된 탐지 규칙
///
/// 리포터는 생성 시 한 번만 컴파일되며, 평가 중에는 읽기 전용입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// CEF signature ID
    pub class_id: String,
    pub name: String,
    /// CEF severity (0-10)
    pub severity: u8,
    /// syslog severity (0-7)
    pub loglevel: u8,
    reporters: Vec<Reporter>,
}

impl Detection {
    /// 설정에서 탐지를 컴파일합니다.
    pub fn compile(config: &DetectionConfig) -> Self {
        Self {
            class_id: config.class_id.clone(),
            name: config.name.clone(),
            severity: config.severity,
            loglevel: config.loglevel,
            reporters: config.reporters.iter().map(Reporter::compile).collect(),
        }
    }

    /// 이미 컴파일된 리포터로 탐지를 만듭니다.
    pub fn new(
        class_id: impl Into<String>,
        name: impl Into<String>,
        severity: u8,
        loglevel: u8,
        reporters: Vec<Reporter>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            name: name.into(),
            severity,
            loglevel,
            reporters,
        }
    }

    pub fn reporters(&self) -> &[Reporter] {
        &self.reporters
    }

    /// 모든 리포터가 매칭되면 참입니다. 리포터가 없으면 거짓입니다.
    pub fn matches(&self, event: &Event) -> bool {
        if self.reporters.is_empty() {
            return false;
        }
        self.reporters.iter().all(|r| r.matches(event))
    }

    /// 이벤트 속성으로 확장 필드를 채운 CEF 레코드를 만듭니다.
    pub fn record(&self, event: &Event) -> CefRecord {
        let mut record = CefRecord::new(&self.class_id, &self.name, self.severity);
        let ext = &mut record.extensions;
        ext.insert(
            EXT_SOURCE_USER_NAME,
            event.detail_or(DETAIL_USERNAME, UNKNOWN_USER),
        );
        ext.insert(EXT_RECEIPT_TIME, event.time.to_string());
        if let Some(user_id) = &event.user_id {
            ext.insert(EXT_SOURCE_USER_ID, user_id.as_str());
        }
        if let Some(ip) = &event.ip_address {
            ext.insert(EXT_SOURCE_ADDRESS, ip.as_str());
        }
        record
    }

    /// 이벤트에 대한 CEF 문자열을 렌더링합니다. 실패하지 않습니다.
    pub fn render(&self, event: &Event) -> String {
        self.record(event).to_string()
    }
}
