mod arithmetic;

use anyhow::Context;
use clap::{Parser, Subcommand};
use switchyard_core::{Dispatcher, ExecutionRequest, RegistryBuilder};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::arithmetic::{Arithmetic, Operands};

#[derive(Debug, Parser)]
#[command(name = "switchyard", version, about = "Run arithmetic strategies by key")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one strategy, e.g. `switchyard run Add 6 2`.
    Run {
        key: String,
        #[arg(allow_negative_numbers = true)]
        a: i64,
        #[arg(allow_negative_numbers = true)]
        b: i64,
    },
    /// Run a JSON request, e.g. `switchyard request '{"key":"Sub","input":{"a":6,"b":2}}'`.
    Request { json: String },
    /// List registered strategy keys.
    List,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchyard=info,switchyard_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `token` on Ctrl-C so a long-running strategy is dropped cleanly.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling dispatch");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let dispatcher: Dispatcher = arithmetic::register(RegistryBuilder::new())?
        .build_dispatcher()
        .context("building strategy registry")?;

    match cli.command {
        Command::Run { key, a, b } => {
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());
            let out = dispatcher
                .execute_cancellable::<Arithmetic>(&key, Operands { a, b }, &cancel)
                .await?;
            println!("{out}");
        }
        Command::Request { json } => {
            let request: ExecutionRequest<Operands> =
                serde_json::from_str(&json).context("parsing request JSON")?;
            let out = dispatcher.dispatch::<Arithmetic>(request).await?;
            println!("{out}");
        }
        Command::List => {
            for key in dispatcher.resolver().keys::<Arithmetic>() {
                println!("{key}");
            }
        }
    }
    Ok(())
}
