//! CEF/syslog 전송 에러 타입
//!
//! `From<CefSyslogError> for LogsyncError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logsync_core::error::{LogsyncError, TransportError};

/// syslog 전송 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum CefSyslogError {
    /// priority/facility/severity 범위 초과
    #[error("invalid priority: {0}")]
    InvalidPriority(u8),

    /// 지원하지 않는 네트워크 종류
    #[error("unsupported network '{0}': expected tcp or udp")]
    UnsupportedNetwork(String),

    /// 수집기 연결 실패
    #[error("dial {network} {addr}: {source}")]
    Dial {
        /// 네트워크 종류
        network: String,
        /// 원격 주소
        addr: String,
        /// 원인
        #[source]
        source: std::io::Error,
    },

    /// 재연결 후 쓰기 실패
    #[error("write to {addr}: {source}")]
    Write {
        /// 원격 주소
        addr: String,
        /// 원인
        #[source]
        source: std::io::Error,
    },
}

impl From<CefSyslogError> for LogsyncError {
    fn from(err: CefSyslogError) -> Self {
        let transport = match err {
            CefSyslogError::InvalidPriority(_) | CefSyslogError::UnsupportedNetwork(_) => {
                TransportError::InvalidSession(err.to_string())
            }
            CefSyslogError::Dial {
                network,
                addr,
                source,
            } => TransportError::Dial {
                network,
                addr,
                reason: source.to_string(),
            },
            CefSyslogError::Write { .. } => TransportError::Write(err.to_string()),
        };
        LogsyncError::Transport(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_error_converts_to_transport_dial() {
        let err = CefSyslogError::Dial {
            network: "tcp".to_owned(),
            addr: "127.0.0.1:514".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        let converted: LogsyncError = err.into();
        assert!(matches!(
            converted,
            LogsyncError::Transport(TransportError::Dial { ref network, .. }) if network == "tcp"
        ));
    }

    #[test]
    fn invalid_priority_converts_to_invalid_session() {
        let converted: LogsyncError = CefSyslogError::InvalidPriority(200).into();
        assert!(converted.to_string().contains("invalid priority: 200"));
    }

    #[test]
    fn write_error_message_contains_address() {
        let err = CefSyslogError::Write {
            addr: "siem:514".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        };
        assert!(err.to_string().starts_with("write to siem:514"));
    }
}
