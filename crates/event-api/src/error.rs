//! 이벤트 API 에러 타입
//!
//! `From<EventApiError> for LogsyncError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logsync_core::error::{ConfigError, LogsyncError, SourceError};

/// 이벤트 API 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EventApiError {
    /// 잘못된 URL 설정
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// 문제가 된 URL
        url: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// HTTP 클라이언트 생성 실패
    #[error("http client error: {0}")]
    Client(String),

    /// 토큰 발급 실패
    #[error("token request failed: {0}")]
    Token(String),

    /// 이벤트 요청 전송 실패
    #[error("event request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 200이 아닌 응답
    #[error("unexpected status code from api - expected code 200; got code {0}")]
    UnexpectedStatus(u16),

    /// 응답 본문 디코딩 실패
    #[error("failed to decode events: {0}")]
    Decode(String),
}

impl From<EventApiError> for LogsyncError {
    fn from(err: EventApiError) -> Self {
        match err {
            EventApiError::InvalidUrl { url, reason } => {
                LogsyncError::Config(ConfigError::InvalidValue { field: url, reason })
            }
            EventApiError::Client(msg) => LogsyncError::Source(SourceError::Request(msg)),
            EventApiError::Token(msg) => LogsyncError::Source(SourceError::Token(msg)),
            EventApiError::Request(e) => LogsyncError::Source(SourceError::Request(e.to_string())),
            EventApiError::UnexpectedStatus(code) => {
                LogsyncError::Source(SourceError::UnexpectedStatus(code))
            }
            EventApiError::Decode(msg) => LogsyncError::Source(SourceError::Decode(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_code() {
        let converted: LogsyncError = EventApiError::UnexpectedStatus(503).into();
        assert!(matches!(
            converted,
            LogsyncError::Source(SourceError::UnexpectedStatus(503))
        ));
        assert!(converted.to_string().contains("got code 503"));
    }

    #[test]
    fn token_error_maps_to_source_token() {
        let converted: LogsyncError = EventApiError::Token("401 Unauthorized".to_owned()).into();
        assert!(matches!(converted, LogsyncError::Source(SourceError::Token(_))));
    }

    #[test]
    fn invalid_url_maps_to_config_error() {
        let converted: LogsyncError = EventApiError::InvalidUrl {
            url: "::".to_owned(),
            reason: "relative URL without a base".to_owned(),
        }
        .into();
        assert!(matches!(converted, LogsyncError::Config(_)));
    }
}
