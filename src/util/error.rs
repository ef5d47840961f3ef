//! Error types for scene setup and configuration.

use thiserror::Error;

/// Main error type for host-side setup.
///
/// Nothing in here is expected once ticking has started: the per-tick path
/// only encodes data whose layout is fixed after setup.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed mesh text (bad number, dangling index)
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Asset source has no entry under this name
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Loading a named asset failed
    #[error("Failed to load asset '{name}': {source}")]
    Asset {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Invalid setting or scene parameter, detected before ticking
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse { line, reason: reason.into() }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach the asset name to a lower-level failure.
    pub fn in_asset(self, name: impl Into<String>) -> Self {
        Self::Asset { name: name.into(), source: Box::new(self) }
    }
}

/// Result type alias for host-side operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::parse(12, "vertex index 9 out of range");
        assert!(e.to_string().contains("12"));
        assert!(e.to_string().contains("vertex index 9"));

        let e = Error::AssetNotFound("cube.obj".into()).in_asset("cube.obj");
        assert!(e.to_string().contains("cube.obj"));
        assert!(matches!(e, Error::Asset { .. }));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
