mod args;
mod framing;
mod logging;
mod prompts;
mod resources;
mod server;

use crate::args::{CallArgs, Cli, Command};
use crate::logging::init_logging;
use crate::server::McpServer;
use anyhow::{Context, Result};
use clap::Parser;
use revx_gateway::{Dispatcher, GatewayConfig, InvocationArgs, Registry, CREDENTIAL_ENV};
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = load_cli();
    init_logging().context("initializing logging")?;

    let config = GatewayConfig::try_from(&cli.gateway).context("invalid gateway configuration")?;
    let dispatcher = Dispatcher::from_config(&config)?;

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => {
            if !dispatcher.has_credential() {
                warn!("{CREDENTIAL_ENV} is not set; only public market data operations will work");
            }
            info!(base_url = %config.base_url, "serving agent protocol on stdio");
            McpServer::new(dispatcher).serve_stdio().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            print_catalogue(dispatcher.registry());
            Ok(ExitCode::SUCCESS)
        }
        Command::Call(call) => run_call(&dispatcher, call).await,
    }
}

/// Parse the command line, then parse again once the env file is loaded so
/// values from it fill in anything not given explicitly.
fn load_cli() -> Cli {
    let cli = Cli::parse();
    match dotenvy::from_filename(&cli.gateway.env_file) {
        Ok(_) => Cli::parse(),
        Err(_) => cli,
    }
}

fn print_catalogue(registry: &Registry) {
    for spec in registry.iter() {
        let auth = if spec.requires_auth { "auth" } else { "public" };
        println!(
            "{:<18} {:<6} {:<6} {}",
            spec.name, spec.method, auth, spec.path_template
        );
    }
}

async fn run_call(dispatcher: &Dispatcher, call: CallArgs) -> Result<ExitCode> {
    let args = InvocationArgs::parse_pairs(&call.operation, &call.args)?;
    let envelope = dispatcher.dispatch(&call.operation, &args).await?;

    let rendered =
        serde_json::to_string_pretty(&envelope).context("Failed to render result envelope")?;
    println!("{rendered}");

    Ok(if envelope.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
