//! Transport adapter: one outbound HTTP call per dispatch.
//!
//! Non-2xx statuses are ordinary outcomes here. Only "no response at all"
//! (connect/DNS/timeout failures, or a request that could not be built) is
//! reported as [`TransportOutcome::Failed`].

mod http;
mod request;

pub use http::HttpTransport;
pub use request::RequestPlan;

use crate::args::InvocationArgs;
use crate::config::Credential;
use crate::registry::OperationSpec;
use async_trait::async_trait;

/// Raw result of attempting the network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// A response was received, whatever its status.
    Response { status: u16, body: String },
    /// No response was received.
    Failed { message: String },
}

/// Performs the outbound call for one operation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        spec: &OperationSpec,
        args: &InvocationArgs,
        credential: Option<&Credential>,
    ) -> TransportOutcome;
}

/// Error message with its source chain, e.g. `error sending request: connection refused`.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1.as_deref().map(|e| e as _)
        }
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let error = Layer(
            "error sending request",
            Some(Box::new(Layer("connection refused", None))),
        );
        assert_eq!(error_chain(&error), "error sending request: connection refused");
    }
}
