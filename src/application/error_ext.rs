//! Error conversion helpers for file reads
//!
//! Attach the offending path to `io::Error`s as they cross into the application layer.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Wrap as `OperationFailed` naming the action and path.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(path).with_path_context("read definition", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Wrap as `Config`, for failures while reading configuration files.
    fn with_config_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn with_config_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_file_when_reading_then_error_names_path() {
        let path = Path::new("/definitely/not/here.toml");
        let err = std::fs::read_to_string(path)
            .with_path_context("read definition", path)
            .unwrap_err();
        assert!(err.to_string().contains("read definition: /definitely/not/here.toml"));
    }

    #[test]
    fn given_missing_file_when_reading_config_then_config_error() {
        let path = Path::new("/definitely/not/here.toml");
        let err = std::fs::read_to_string(path)
            .with_config_context(path)
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }
}
