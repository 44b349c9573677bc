use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "warn,revx_mcp=info,revx_gateway=info";

/// Install the global subscriber. Everything goes to stderr: stdout belongs
/// to the protocol.
pub(crate) fn init_logging() -> anyhow::Result<()> {
    // use RUST_LOG if provided
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")
}
