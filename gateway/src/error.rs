use thiserror::Error;

/// Failures that indicate an integration bug rather than a business outcome.
///
/// Everything the exchange (or the network) can do to a recognised operation is
/// reported through [`crate::ResultEnvelope`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The operation name is not in the registry.
    #[error("Tool not found: {0}")]
    UnknownOperation(String),

    /// The argument bag is not an object of scalar values.
    #[error("Invalid arguments for {operation}: {reason}")]
    InvalidArguments { operation: String, reason: String },

    /// The operation catalogue itself is inconsistent.
    #[error("Malformed operation schema: {0}")]
    MalformedSchema(String),
}

impl DispatchError {
    pub(crate) fn invalid_arguments(operation: &str, reason: impl Into<String>) -> Self {
        DispatchError::InvalidArguments {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}
