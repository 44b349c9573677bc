//! Result normalization.
//!
//! Turns a [`TransportOutcome`] or a precondition [`Violation`] into a
//! [`ResultEnvelope`]. Callers match on substrings of the text, so the framing
//! phrases below are part of the contract.

use crate::args::InvocationArgs;
use crate::config::CREDENTIAL_ENV;
use crate::envelope::{ErrorCategory, ResultEnvelope};
use crate::precondition::Violation;
use crate::registry::{placeholders, HttpMethod, OperationSpec};
use crate::transport::TransportOutcome;
use serde_json::Value;

/// Text returned for a successful cancel (DELETE answered with 204).
pub const CANCEL_CONFIRMATION: &str = "Order cancelled successfully.";

/// What a call was trying to do, for framing result text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub description: String,
    pub method: HttpMethod,
}

impl Action {
    /// Render `spec.action` with the call's arguments.
    pub fn for_call(spec: &OperationSpec, args: &InvocationArgs) -> Self {
        let mut description = spec.action.to_string();
        for field in placeholders(spec.action) {
            let value = args
                .present(field)
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("<{field}>"));
            description = description.replace(&format!("{{{field}}}"), &value);
        }
        Self {
            description,
            method: spec.method,
        }
    }

    pub fn new(description: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            description: description.into(),
            method,
        }
    }
}

/// Map a transport outcome to the envelope, per the status table.
pub fn normalize(outcome: TransportOutcome, action: &Action) -> ResultEnvelope {
    let (status, body) = match outcome {
        TransportOutcome::Failed { message } => {
            return ResultEnvelope::failure(
                ErrorCategory::TransportFailure,
                format!("Error {}: {message}", action.description),
            );
        }
        TransportOutcome::Response { status, body } => (status, body),
    };

    let Some(category) = ErrorCategory::from_status(status) else {
        return ResultEnvelope::success(success_text(status, &body, action));
    };

    let framing = match category {
        ErrorCategory::Unauthorized => format!("credential invalid or expired (status {status})"),
        ErrorCategory::Forbidden => format!("insufficient permission (status {status})"),
        ErrorCategory::Conflict => format!("conflicting resource state (status {status})"),
        ErrorCategory::ServerError => format!("remote service error (status {status})"),
        _ => format!("request rejected by remote service (status {status})"),
    };

    let mut text = format!("Error {}: {framing}", action.description);
    if !body.trim().is_empty() {
        text.push_str("\nResponse body: ");
        text.push_str(&compact_body(&body));
    }
    ResultEnvelope::failure(category, text)
}

/// Envelope for a call refused before any network attempt.
pub fn reject(violation: &Violation, action: &Action) -> ResultEnvelope {
    let text = match violation {
        Violation::MissingCredential => format!(
            "Error {}: credential required; set {CREDENTIAL_ENV} to use this operation.",
            action.description
        ),
        Violation::MissingArgument { field, reason } => match reason {
            Some(reason) => format!(
                "Error {}: missing required argument '{field}' ({reason})",
                action.description
            ),
            None => format!(
                "Error {}: missing required argument '{field}'",
                action.description
            ),
        },
    };
    ResultEnvelope::failure(violation.category(), text)
}

fn success_text(status: u16, body: &str, action: &Action) -> String {
    if status == 204 && action.method == HttpMethod::Delete {
        return CANCEL_CONFIRMATION.to_string();
    }
    if body.trim().is_empty() {
        return format!("Request completed with status {status}.");
    }
    match serde_json::from_str::<Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

fn compact_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
