//! Error types for the inspection kernel.
//!
//! Nothing here is fatal to a traversal: cycles are a node variant and
//! stringification failures are recovered where they happen. What remains
//! are configuration problems, which the kernel reports and then works
//! around.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("unrecognized collapse option: {0}")]
    UnrecognizedCollapse(String),

    #[error("unrecognized collapseExcept option: {0}")]
    UnrecognizedCollapseExcept(String),

    #[error("invalid inspector config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid inspector config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type InspectResult<T> = Result<T, InspectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let err = InspectError::UnrecognizedCollapse("\"sideways\"".into());
        assert_eq!(err.to_string(), "unrecognized collapse option: \"sideways\"");

        let err = InspectError::UnrecognizedCollapseExcept("true".into());
        assert!(err.to_string().contains("collapseExcept"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InspectError>();
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: InspectError = json_err.into();
        assert!(matches!(err, InspectError::Json(_)));
    }
}
