//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check against [`ConfigLimits`]
//! 2. Read, strip a UTF-8 BOM
//! 3. YAML parsing into [`GameConfig`]
//! 4. Validation; errors abort, warnings are returned to the caller
//! 5. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::schema::GameConfig;
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};

/// Limits applied before a configuration file is parsed.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("PARLOR_MAX_CONFIG_SIZE", 64 * 1024),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<GameConfig>,

    /// Warnings encountered during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads game configuration files.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    limits: ConfigLimits,
}

impl ConfigLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Creates a loader with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing, unreadable, or over the size limit
    /// - YAML parsing fails
    /// - Validation reports errors
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;

        let file_size =
            usize::try_from(metadata.len()).unwrap_or(self.limits.max_config_size.saturating_add(1));
        if file_size > self.limits.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.limits.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;

        debug!(path = %path.display(), bytes = raw.len(), "loading configuration");
        self.load_str(&raw, path)
    }

    /// Parses and validates configuration text; `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML parsing fails or validation reports errors.
    pub fn load_str(&self, raw: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        // An empty file is an empty document, not a parse error
        let config: GameConfig = if raw.trim().is_empty() {
            GameConfig::default()
        } else {
            serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        let result = Validator::new().validate(&config);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: origin.display().to_string(),
                errors: result.errors,
            });
        }

        Ok(LoadResult {
            config: Arc::new(config),
            warnings: result.warnings,
        })
    }
}

/// Maps a failed read to the error the player can act on.
fn read_error(path: &Path, source: std::io::Error) -> ConfigError {
    match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::MissingFile {
            path: path.to_path_buf(),
        },
        // read_to_string reports non-UTF-8 content as invalid data
        std::io::ErrorKind::InvalidData => ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: source.to_string(),
        },
        _ => ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Reads a numeric limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = write_config("hat_trick:\n  slots: 4\n  timings:\n    reveal: 1500ms\n");
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.config.hat_trick.slots, 4);
        assert_eq!(
            result.config.hat_trick.timings.reveal,
            Duration::from_millis(1500)
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_file_is_default() {
        let file = write_config("");
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(*result.config, GameConfig::default());
    }

    #[test]
    fn bom_is_stripped() {
        let file = write_config("\u{feff}cup_flip:\n  cups: 3\n  flips_per_move: 1\n");
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.config.cup_flip.cups, 3);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/nonexistent/parlor.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn non_utf8_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'a', b':', b' ', 0xff, 0xfe, b'\n']).unwrap();
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        match err {
            ConfigError::ParseError { line, message, .. } => {
                assert_eq!(line, None);
                assert!(message.contains("UTF-8"), "{message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn other_read_failures_keep_their_cause() {
        let err = read_error(
            Path::new("game.yaml"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert!(err.to_string().contains("denied"));
        assert!(!err.to_string().contains("not found"));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let file = write_config(&"#".repeat(128));
        let loader = ConfigLoader::new(ConfigLimits {
            max_config_size: 16,
        });
        let err = loader.load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn parse_error_carries_line() {
        let file = write_config("hat_trick:\n  slots: [\n");
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn validation_errors_abort() {
        let file = write_config("hat_trick:\n  slots: 1\n");
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "hat_trick.slots");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn warnings_are_returned() {
        let file = write_config("hat_trick:\n  swaps: 0\n");
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }
}
