//! Command handlers -- one module per subcommand

pub mod check;
pub mod run;

use std::path::{Path, PathBuf};

use logsync_core::config::{DEFAULT_CONFIG_FILE, LogsyncConfig};
use tracing::debug;

use crate::error::CliError;

/// Config file candidates in search order: explicit path, working directory,
/// directory of the running executable.
pub fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(DEFAULT_CONFIG_FILE));
    }
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.join(DEFAULT_CONFIG_FILE));
    }
    candidates
}

/// Load the first existing config among the candidates.
pub async fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, LogsyncConfig), CliError> {
    let candidates = config_candidates(explicit);
    debug!(?candidates, "searching configuration");
    Ok(LogsyncConfig::load_first(candidates).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_comes_first() {
        let candidates = config_candidates(Some(Path::new("/etc/custom.json")));
        assert_eq!(candidates[0], PathBuf::from("/etc/custom.json"));
        assert!(candidates.len() >= 2);
        assert!(candidates[1].ends_with(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_defaults_without_explicit_path() {
        let candidates = config_candidates(None);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|p| p.ends_with(DEFAULT_CONFIG_FILE)));
    }

    #[tokio::test]
    async fn test_load_config_missing_is_config_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.json");
        // cwd/exe candidates may exist on a developer machine, so only the explicit file is checked
        let err = LogsyncConfig::load_first([missing.as_path()]).await.unwrap_err();
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.exit_code(), 2);
    }
}
