//! Core error types for fedplan.

use thiserror::Error;

/// Result type alias using `FedplanError`.
pub type FedplanResult<T> = std::result::Result<T, FedplanError>;

/// Error type for planning and optimization.
///
/// Capability mismatches are not errors: the validator reports them as a
/// negative verdict. Only lookups that fail outright end up here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FedplanError {
    /// Metadata could not be resolved (model, group, element, searchability).
    #[error("MetadataError: {0}")]
    MetadataError(String),

    /// The cost oracle failed to produce an estimate.
    #[error("CostEstimationError: {0}")]
    CostEstimationError(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Internal error (bug in fedplan).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl FedplanError {
    /// Create a new `MetadataError`.
    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        Self::MetadataError(msg.into())
    }

    /// Create a new `CostEstimationError`.
    pub fn cost_estimation<S: Into<String>>(msg: S) -> Self {
        Self::CostEstimationError(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether this error terminates an optimization pass.
    ///
    /// Metadata and costing failures leave the optimizer without the
    /// information it needs, so no partial result is produced.
    pub const fn is_fatal_to_planning(&self) -> bool {
        matches!(
            self,
            Self::MetadataError(_) | Self::CostEstimationError(_) | Self::InternalError(_)
        )
    }
}

/// Ensure a condition holds, returning an `InternalError` if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::FedplanError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::FedplanError::InternalError($msg.to_string()));
        }
    };
}

/// Return early with a `MetadataError`.
#[macro_export]
macro_rules! metadata_err {
    ($($arg:tt)*) => {
        return Err($crate::FedplanError::MetadataError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(flag: bool) -> FedplanResult<u8> {
        crate::ensure!(flag, "flag was not set");
        Ok(1)
    }

    fn checked_variant(flag: bool) -> FedplanResult<u8> {
        crate::ensure!(flag, InvalidParameter: "node {} has {} children", 3, 1);
        Ok(1)
    }

    fn missing_model(name: &str) -> FedplanResult<()> {
        crate::metadata_err!("model '{name}' not found")
    }

    #[test]
    fn test_error_display() {
        let err = FedplanError::metadata("group 'pm1.g1' has no model");
        assert_eq!(err.to_string(), "MetadataError: group 'pm1.g1' has no model");
    }

    #[test]
    fn test_error_constructors() {
        let _ = FedplanError::cost_estimation("oracle unavailable");
        let _ = FedplanError::invalid_parameter("threshold");
        let _ = FedplanError::internal("unexpected state");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(FedplanError::metadata("x").is_fatal_to_planning());
        assert!(FedplanError::cost_estimation("x").is_fatal_to_planning());
        assert!(FedplanError::internal("x").is_fatal_to_planning());
        assert!(!FedplanError::invalid_parameter("x").is_fatal_to_planning());
        let parse: Result<serde_json::Value, _> = serde_json::from_str("[");
        assert!(!FedplanError::from(parse.unwrap_err()).is_fatal_to_planning());
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(checked(true).unwrap(), 1);
        let err = checked(false).unwrap_err();
        assert!(matches!(err, FedplanError::InternalError(_)));

        let err = checked_variant(false).unwrap_err();
        assert_eq!(err.to_string(), "InvalidParameter: node 3 has 1 children");
    }

    #[test]
    fn test_metadata_err_macro() {
        let err = missing_model("pm1").unwrap_err();
        assert_eq!(err.to_string(), "MetadataError: model 'pm1' not found");
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: FedplanError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("SerdeJsonError"));
    }
}
