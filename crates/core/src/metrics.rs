//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 호출은 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logsync_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logsync_core::metrics::RECORDS_REPORTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 탐지 클래스 ID 레이블 키
pub const LABEL_CLASS_ID: &str = "class_id";

/// 네트워크 레이블 키 (tcp, udp)
pub const LABEL_NETWORK: &str = "network";

// ─── 파이프라인 메트릭 ──────────────────────────────────────────────

/// 이벤트 API에서 가져온 이벤트 수 (counter)
pub const EVENTS_RETRIEVED_TOTAL: &str = "logsync_events_retrieved_total";

/// 탐지 규칙 매칭 수 (counter, label: class_id)
pub const DETECTIONS_MATCHED_TOTAL: &str = "logsync_detections_matched_total";

/// 전달에 성공한 레코드 수 (counter, label: class_id)
pub const RECORDS_REPORTED_TOTAL: &str = "logsync_records_reported_total";

/// 전달에 실패한 레코드 수 (counter, label: class_id)
pub const REPORT_FAILURES_TOTAL: &str = "logsync_report_failures_total";

// ─── 전송 메트릭 ────────────────────────────────────────────────────

/// syslog 재연결 시도 수 (counter, label: network)
pub const TRANSPORT_RECONNECTS_TOTAL: &str = "logsync_transport_reconnects_total";

/// 액세스 토큰 발급 요청 수 (counter)
pub const TOKEN_REFRESHES_TOTAL: &str = "logsync_token_refreshes_total";

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        EVENTS_RETRIEVED_TOTAL,
        "Total number of events retrieved from the event API"
    );
    describe_counter!(
        DETECTIONS_MATCHED_TOTAL,
        "Total number of detection matches"
    );
    describe_counter!(
        RECORDS_REPORTED_TOTAL,
        "Total number of CEF records delivered to the collector"
    );
    describe_counter!(
        REPORT_FAILURES_TOTAL,
        "Total number of CEF records that could not be delivered"
    );
    describe_counter!(
        TRANSPORT_RECONNECTS_TOTAL,
        "Total number of syslog reconnect attempts"
    );
    describe_counter!(
        TOKEN_REFRESHES_TOTAL,
        "Total number of OAuth2 access token requests"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        EVENTS_RETRIEVED_TOTAL,
        DETECTIONS_MATCHED_TOTAL,
        RECORDS_REPORTED_TOTAL,
        REPORT_FAILURES_TOTAL,
        TRANSPORT_RECONNECTS_TOTAL,
        TOKEN_REFRESHES_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_logsync_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("logsync_"),
                "Metric '{}' does not start with 'logsync_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in ALL_METRIC_NAMES {
            assert!(name.ends_with("_total"), "counter '{}' lacks _total", name);
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_CLASS_ID, LABEL_NETWORK] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
