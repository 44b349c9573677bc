use clap::{Args, Parser, Subcommand, ValueHint};
use revx_gateway::{Credential, GatewayConfig, BASE_URL_ENV, CREDENTIAL_ENV, DEFAULT_BASE_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Revolut X exchange tools for AI agents.
///
/// Serves the agent protocol (JSON-RPC 2.0, one message per line) on
/// stdin/stdout by default. `list` and `call` are for poking at the gateway
/// by hand.
#[derive(Parser, Debug)]
#[command(name = "revx-mcp", author, version, about)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) gateway: GatewayArgs,

    #[command(subcommand)]
    pub(crate) cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Serve the agent protocol over stdio (default)
    Serve,

    /// List the available operations
    List,

    /// Dispatch one operation and print the result envelope
    Call(CallArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CallArgs {
    /// Operation name (e.g. get_order_book)
    pub(crate) operation: String,

    /// Operation argument, repeatable (e.g. --arg symbol=BTC-USD)
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    pub(crate) args: Vec<String>,
}

/// Exchange connection settings
#[derive(Args, Clone, Debug)]
pub(crate) struct GatewayArgs {
    /// API key for private operations (balances, orders)
    #[arg(long = "api-key", env = CREDENTIAL_ENV, hide_env_values = true, global = true)]
    pub(crate) api_key: Option<String>,

    /// Base URL of the exchange REST API
    #[arg(
        long = "base-url",
        env = BASE_URL_ENV,
        value_hint = ValueHint::Url,
        default_value = DEFAULT_BASE_URL,
        global = true
    )]
    pub(crate) base_url: String,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long = "request-timeout-secs", env = "REVOLUTX_REQUEST_TIMEOUT", global = true)]
    pub(crate) request_timeout_secs: Option<u64>,

    /// Path to environment file (default: ./.env). Can also use APP_ENV_FILE.
    #[arg(
        long = "env-file",
        value_hint = ValueHint::FilePath,
        default_value = ".env",
        env = "APP_ENV_FILE",
        global = true
    )]
    pub(crate) env_file: PathBuf,
}

impl TryFrom<&GatewayArgs> for GatewayConfig {
    type Error = anyhow::Error;

    fn try_from(args: &GatewayArgs) -> anyhow::Result<Self> {
        GatewayConfig::builder()
            .base_url(args.base_url.clone())
            .credential(Credential::from_optional(args.api_key.clone()))
            .request_timeout(args.request_timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(Into::into)
    }
}
