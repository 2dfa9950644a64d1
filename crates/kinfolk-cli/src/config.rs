//! Configuration resolution for the CLI.
//!
//! The deriver configuration comes from, in order: the `--config` path, the
//! user's `~/.kinfolk/config.toml` if it exists, or the builtin defaults.

use crate::error::{CliError, Result};
use kinfolk_deriver::DeriverConfig;
use std::path::{Path, PathBuf};

/// Get the default configuration file path.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".kinfolk").join("config.toml"))
}

/// Load the deriver configuration.
///
/// An explicit path must exist; the default path is only read when present.
pub fn resolve(explicit: Option<&Path>) -> Result<DeriverConfig> {
    if let Some(path) = explicit {
        tracing::debug!("Loading configuration from {}", path.display());
        return Ok(DeriverConfig::load(path)?);
    }

    match default_path() {
        Ok(path) if path.exists() => {
            tracing::debug!("Loading configuration from {}", path.display());
            Ok(DeriverConfig::load(&path)?)
        }
        _ => Ok(DeriverConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinfolk_deriver::DeriverError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dry_run = true").unwrap();
        writeln!(file, "event_types = [\"burial\"]").unwrap();

        let config = resolve(Some(file.path())).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.event_types, Some(vec!["burial".to_string()]));
    }

    #[test]
    fn test_resolve_missing_explicit_path() {
        let result = resolve(Some(Path::new("/nonexistent/kinfolk.toml")));
        assert!(matches!(result, Err(CliError::Deriver(DeriverError::Io(_)))));
    }

    #[test]
    fn test_resolve_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "event_types = [\"coronation\"]").unwrap();

        let result = resolve(Some(file.path()));
        assert!(matches!(
            result,
            Err(CliError::Deriver(DeriverError::UnknownEventType(_)))
        ));
    }

    #[test]
    fn test_default_path() {
        if let Ok(path) = default_path() {
            assert!(path.ends_with(".kinfolk/config.toml"));
        }
    }
}
