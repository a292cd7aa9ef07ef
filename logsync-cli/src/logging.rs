//! Logging initialization.
//!
//! Configures `tracing-subscriber` from the `log` section of `LogsyncConfig`.
//! Stdout gets JSON or pretty output; when `logfile` is set, a plain-text copy
//! of every line is appended to that file as well.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use logsync_core::config::LogConfig;

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called at most once per process. `RUST_LOG` takes precedence over
/// `level_override`, which takes precedence over `config.level`.
pub fn init_logging(
    config: &LogConfig,
    level_override: Option<&str>,
    logfile: Option<&Path>,
) -> Result<(), CliError> {
    let env_filter = build_filter(level_override.unwrap_or(&config.level))?;
    let file = logfile.map(open_logfile).transpose()?;

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .with(file_layer(file))
            .try_init(),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .with(file_layer(file))
            .try_init(),
        other => {
            return Err(CliError::Config(format!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            )));
        }
    };

    result.map_err(|e| CliError::Logging(e.to_string()))
}

fn build_filter(level: &str) -> Result<EnvFilter, CliError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| CliError::Config(format!("invalid log level '{level}': {e}"))),
    }
}

fn file_layer<S>(file: Option<File>) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|f| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(f))
    })
}

/// Open `path` for appending, creating it with owner-only permissions.
pub fn open_logfile(path: &Path) -> Result<File, CliError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    Ok(options.open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_logfile_creates_and_appends() {
        use std::io::Write;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logsync.log");

        let mut first = open_logfile(&path).expect("create");
        writeln!(first, "one").expect("write");
        drop(first);
        let mut second = open_logfile(&path).expect("reopen");
        writeln!(second, "two").expect("write");
        drop(second);

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content, "one\ntwo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_open_logfile_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("private.log");
        open_logfile(&path).expect("create");

        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o077, 0, "group/other bits must be clear");
    }

    #[test]
    fn test_open_logfile_missing_dir_is_io_error() {
        let err = open_logfile(Path::new("/nonexistent-dir/logsync.log")).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LogConfig {
            level: "info".to_owned(),
            format: "xml".to_owned(),
        };
        let err = init_logging(&config, None, None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
