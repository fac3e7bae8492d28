use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use kubepage::{
    app::run, cli::Cli, config::client_from_env, context::WorkContext, error::KubePageError,
    report::Report,
};
use shared::tracing::setup_tracing;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = setup_tracing() {
        eprintln!("Failed to set up tracing: {e}");
        return ExitCode::FAILURE;
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<(), KubePageError> {
    let ctx = WorkContext::new();

    // Ctrl-C aborts the request in flight and every one after it
    let canceller = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding requests");
            canceller.cancel();
        }
    });

    let client = client_from_env().await?;
    info!(namespace = cli.namespace().unwrap_or("<all>"), "Starting kubepage...");

    let mut report = Report::new(stdout().lock());
    run(&cli, &client, &ctx, &mut report).await
}
