//! Request dispatch and error normalization for the Revolut X exchange API.
//!
//! An operation name and an argument bag go in, a [`ResultEnvelope`] comes out.
//! The flow is always registry lookup, precondition check, one HTTP call and
//! normalization of whatever happened into the envelope. Only caller bugs
//! (unknown operations, malformed argument bags, a broken catalogue) surface as
//! [`DispatchError`].

mod args;
mod config;
mod envelope;
mod error;
mod normalize;
mod precondition;
pub mod registry;
mod router;
pub mod transport;

pub use args::{ArgValue, InvocationArgs};
pub use config::{
    Credential, GatewayConfig, GatewayConfigBuilder, BASE_URL_ENV, CREDENTIAL_ENV,
    CREDENTIAL_HEADER, DEFAULT_BASE_URL,
};
pub use envelope::{ContentBlock, ErrorCategory, ResultEnvelope};
pub use error::DispatchError;
pub use normalize::{normalize, reject, Action, CANCEL_CONFIRMATION};
pub use precondition::{check, Violation};
pub use registry::{
    Constraint, FieldKind, FieldSpec, HttpMethod, OperationSpec, ParamPlacement, Registry,
};
pub use router::Dispatcher;
pub use transport::{HttpTransport, Transport, TransportOutcome};
