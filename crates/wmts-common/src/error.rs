//! Error types for WMTS KVP translation.

use thiserror::Error;

/// Result type alias using WmtsError.
pub type WmtsResult<T> = Result<T, WmtsError>;

/// Failure raised while classifying or translating a WMTS KVP request.
///
/// Every variant maps onto an OGC exception code and an HTTP status, so the
/// same value serves as the control-flow signal inside the pipeline and as
/// the payload of the exception report written at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WmtsError {
    // === Protocol Errors ===
    #[error("Missing parameter(s): {}", .0.join(", "))]
    MissingParameter(Vec<String>),

    #[error("InvalidParameterValue for parameter: {param} with value: {value}")]
    InvalidParameter { param: String, value: String },

    #[error("Multiple query values found for {param}: {}", .values.join(","))]
    MultipleValues { param: String, values: Vec<String> },

    #[error("Unknown request: {0}")]
    UnknownOperation(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WmtsError {
    /// Shorthand for a single missing key.
    pub fn missing(param: impl Into<String>) -> Self {
        WmtsError::MissingParameter(vec![param.into()])
    }

    pub fn invalid(param: impl Into<String>, value: impl Into<String>) -> Self {
        WmtsError::InvalidParameter {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Get the OWS exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            WmtsError::MissingParameter(_) => "MissingParameterValue",
            WmtsError::InvalidParameter { .. } | WmtsError::MultipleValues { .. } => {
                "InvalidParameterValue"
            }
            WmtsError::UnknownOperation(_) => "OperationNotSupported",
            WmtsError::Internal(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WmtsError::MissingParameter(_)
            | WmtsError::InvalidParameter { .. }
            | WmtsError::MultipleValues { .. }
            | WmtsError::UnknownOperation(_) => 400,

            WmtsError::Internal(_) => 500,
        }
    }
}
