use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use escape_core::model::Language;
use server::AppState;
use services::AppServices;
use tracing::info;

mod cli;
mod play;

use cli::{Cli, Command, ProgressBackend};

const RULE: &str = "====================================";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("escape-room error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let services = build_services(&cli).await?;
    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            let counts = services.levels().level_counts().await;
            print_banner(cli.port, &counts);
            let addr = SocketAddr::new(cli.host, cli.port);
            let state = AppState::new(services.levels().clone(), services.solutions().clone());
            server::serve(addr, state)
                .await
                .context("escape room server failed")?;
        }
        Command::Levels => {
            let counts = services.levels().level_counts().await;
            print_counts(&counts);
        }
        Command::Play { server } => play::run(&services, server.as_deref()).await?,
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn build_services(cli: &Cli) -> anyhow::Result<AppServices> {
    info!(levels = %cli.levels_dir.display(), progress = %cli.progress, "opening stores");
    let services = match &cli.progress {
        ProgressBackend::File(path) => {
            AppServices::with_progress_file(cli.levels_dir.clone(), path.clone())
        }
        ProgressBackend::Sqlite(url) => AppServices::new_sqlite(cli.levels_dir.clone(), url)
            .await
            .with_context(|| format!("failed to open progress database {url}"))?,
        ProgressBackend::Memory => AppServices::with_ephemeral_progress(cli.levels_dir.clone()),
    };
    Ok(services)
}

fn print_banner(port: u16, counts: &[(Language, usize)]) {
    println!("{RULE}");
    println!("404 Escape Room Server Running");
    println!("{RULE}");
    println!("Server: http://localhost:{port}");
    println!("{RULE}");
    print_counts(counts);
    println!("{RULE}");
}

fn print_counts(counts: &[(Language, usize)]) {
    println!("Loaded levels:");
    for (language, count) in counts {
        println!("- {}: {count} levels", language.label());
    }
}
