use super::{error_chain, RequestPlan, Transport, TransportOutcome};
use crate::args::InvocationArgs;
use crate::config::{Credential, GatewayConfig};
use crate::registry::OperationSpec;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// reqwest-backed transport. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, plan: RequestPlan) -> TransportOutcome {
        let mut request = self.client.request(plan.method.into(), plan.url.clone());
        for (name, value) in &plan.headers {
            request = request.header(*name, value);
        }
        if let Some(body) = &plan.body {
            request = request.body(body.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = error_chain(&e);
                warn!(method = %plan.method, url = %plan.url, "request failed: {message}");
                return TransportOutcome::Failed { message };
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                debug!(method = %plan.method, url = %plan.url, status, bytes = body.len(), "response received");
                TransportOutcome::Response { status, body }
            }
            Err(e) => {
                let message = error_chain(&e);
                warn!(status, url = %plan.url, "failed to read response body: {message}");
                TransportOutcome::Failed { message }
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        spec: &OperationSpec,
        args: &InvocationArgs,
        credential: Option<&Credential>,
    ) -> TransportOutcome {
        match RequestPlan::build(&self.base_url, spec, args, credential) {
            Ok(plan) => self.execute(plan).await,
            Err(message) => {
                warn!(operation = spec.name, "could not build request: {message}");
                TransportOutcome::Failed { message }
            }
        }
    }
}
