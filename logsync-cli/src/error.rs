//! CLI-specific error types and exit code mapping

use logsync_cef_syslog::CefSyslogError;
use logsync_core::error::LogsyncError;
use logsync_detection::DetectionError;
use logsync_event_api::EventApiError;

/// CLI-specific error type.
///
/// Domain errors are sorted into variants by the stage that failed so that
/// `exit_code()` can tell configuration, event API and transport failures apart.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Token or event retrieval failed.
    #[error("event api error: {0}")]
    Api(String),

    /// The syslog collector could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// Tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (log file, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 0    | Success                      |
    /// | 1    | General / command error      |
    /// | 2    | Configuration error          |
    /// | 3    | Event API error              |
    /// | 4    | Transport error              |
    /// | 10   | IO error                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Api(_) => 3,
            Self::Transport(_) => 4,
            Self::Io(_) => 10,
            Self::Command(_) | Self::Logging(_) | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<LogsyncError> for CliError {
    fn from(e: LogsyncError) -> Self {
        match e {
            LogsyncError::Config(inner) => Self::Config(inner.to_string()),
            LogsyncError::Detection(msg) => Self::Config(msg),
            LogsyncError::Source(inner) => Self::Api(inner.to_string()),
            LogsyncError::Transport(inner) => Self::Transport(inner.to_string()),
            LogsyncError::Io(inner) => Self::Io(inner),
        }
    }
}

impl From<EventApiError> for CliError {
    fn from(e: EventApiError) -> Self {
        LogsyncError::from(e).into()
    }
}

impl From<CefSyslogError> for CliError {
    fn from(e: CefSyslogError) -> Self {
        LogsyncError::from(e).into()
    }
}

impl From<DetectionError> for CliError {
    fn from(e: DetectionError) -> Self {
        LogsyncError::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use logsync_core::error::{ConfigError, SourceError, TransportError};

    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err: CliError = LogsyncError::Config(ConfigError::FileNotFound {
            path: "logsync.json".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
        assert!(err.to_string().contains("logsync.json"));
    }

    #[test]
    fn test_exit_code_invalid_detection() {
        let err: CliError = DetectionError::InvalidRule {
            class_id: "100".to_owned(),
            reason: "no reporters".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_event_api_error() {
        let err: CliError = LogsyncError::Source(SourceError::UnexpectedStatus(500)).into();
        assert_eq!(err.exit_code(), 3, "api error should return exit code 3");

        let err: CliError = EventApiError::Token("401".to_owned()).into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_transport_error() {
        let err: CliError = LogsyncError::Transport(TransportError::Write("broken pipe".to_owned()))
            .into();
        assert_eq!(err.exit_code(), 4, "transport error should return exit code 4");

        let err: CliError = CefSyslogError::UnsupportedNetwork("unix".to_owned()).into();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        assert_eq!(CliError::JsonSerialize(json_err).exit_code(), 1);
    }
}
