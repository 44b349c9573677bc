use crate::args::InvocationArgs;
use crate::config::{Credential, GatewayConfig};
use crate::envelope::ResultEnvelope;
use crate::error::DispatchError;
use crate::normalize::{normalize, reject, Action};
use crate::precondition::check;
use crate::registry::Registry;
use crate::transport::{HttpTransport, Transport};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Composition root: registry lookup, precondition check, one transport call,
/// normalization.
///
/// Holds no mutable state, so one instance can serve overlapping dispatches.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = HttpTransport> {
    registry: Arc<Registry>,
    transport: T,
    credential: Option<Credential>,
}

impl Dispatcher<HttpTransport> {
    /// Production stack: the Revolut X catalogue over reqwest.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let registry = Registry::revolutx().context("Failed to build operation registry")?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(registry, transport, config.credential.clone()))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(registry: Registry, transport: T, credential: Option<Credential>) -> Self {
        Self {
            registry: Arc::new(registry),
            transport,
            credential,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_credential(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_blank())
    }

    /// Dispatch a recognised operation.
    ///
    /// Every business outcome comes back as `Ok(envelope)`; `Err` means the
    /// operation name is unknown.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &InvocationArgs,
    ) -> Result<ResultEnvelope, DispatchError> {
        let spec = self.registry.lookup(name)?;
        let action = Action::for_call(spec, args);

        if let Some(violation) = check(spec, args, self.credential.as_ref()) {
            info!(
                operation = name,
                category = %violation.category(),
                "call refused before sending"
            );
            return Ok(reject(&violation, &action));
        }

        debug!(operation = name, method = %spec.method, path = spec.path_template, "dispatching");
        let outcome = self
            .transport
            .send(spec, args, self.credential.as_ref())
            .await;
        let envelope = normalize(outcome, &action);

        match envelope.category() {
            None => info!(operation = name, "call succeeded"),
            Some(category) => warn!(operation = name, %category, "call failed"),
        }
        Ok(envelope)
    }

    /// Dispatch with a raw JSON argument bag, as received from an agent.
    ///
    /// The operation is resolved first so an unknown name is reported as such
    /// even when its arguments are also malformed.
    pub async fn dispatch_json(
        &self,
        name: &str,
        raw_args: Option<Value>,
    ) -> Result<ResultEnvelope, DispatchError> {
        self.registry.lookup(name)?;
        let args = InvocationArgs::from_json(name, raw_args)?;
        self.dispatch(name, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ErrorCategory;
    use crate::registry::OperationSpec;
    use crate::transport::TransportOutcome;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        outcome: TransportOutcome,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(outcome: TransportOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn send(
            &self,
            _spec: &OperationSpec,
            _args: &InvocationArgs,
            _credential: Option<&Credential>,
        ) -> TransportOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn dispatcher(outcome: TransportOutcome, key: Option<&str>) -> Dispatcher<Fixed> {
        Dispatcher::new(
            Registry::revolutx().unwrap(),
            Fixed::new(outcome),
            key.map(Credential::new),
        )
    }

    fn ok_body() -> TransportOutcome {
        TransportOutcome::Response {
            status: 200,
            body: r#"[{"currency":"BTC","total":"1"}]"#.into(),
        }
    }

    #[tokio::test]
    async fn test_success_path() {
        let d = dispatcher(ok_body(), Some("key"));
        let envelope = d.dispatch("get_balances", &InvocationArgs::new()).await.unwrap();
        assert!(envelope.is_ok());
        assert!(envelope.text().contains("\"currency\": \"BTC\""));
        assert_eq!(d.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let d = dispatcher(ok_body(), None);
        let envelope = d.dispatch("get_balances", &InvocationArgs::new()).await.unwrap();
        assert_eq!(envelope.category(), Some(ErrorCategory::MissingCredential));
        assert_eq!(d.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_operation_is_not_an_envelope() {
        let d = dispatcher(ok_body(), Some("key"));
        let err = d
            .dispatch("transfer_funds", &InvocationArgs::new())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownOperation("transfer_funds".into()));
        assert_eq!(d.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_json_reports_unknown_before_bad_args() {
        let d = dispatcher(ok_body(), Some("key"));
        let err = d.dispatch_json("nope", Some(json!(42))).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation(_)));

        let err = d.dispatch_json("get_order", Some(json!(42))).await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments { .. }));
        assert_eq!(d.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_envelope() {
        let d = dispatcher(
            TransportOutcome::Failed {
                message: "ECONNRESET".into(),
            },
            None,
        );
        let envelope = d
            .dispatch_json("get_order_book", Some(json!({"symbol": "ETH-USD"})))
            .await
            .unwrap();
        assert_eq!(envelope.category(), Some(ErrorCategory::TransportFailure));
        assert_eq!(
            envelope.text(),
            "Error fetching order book for ETH-USD: ECONNRESET"
        );
    }

    #[test]
    fn test_has_credential() {
        assert!(dispatcher(ok_body(), Some("key")).has_credential());
        assert!(!dispatcher(ok_body(), Some(" ")).has_credential());
        assert!(!dispatcher(ok_body(), None).has_credential());
    }
}
