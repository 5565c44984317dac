use std::process::ExitCode;

use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maconomy_cli::cli::Cli;
use maconomy_cli::commands;
use maconomy_cli::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli)?;
    config.validate()?;
    tracing::debug!("Using endpoint {}", config.rpc.endpoint);

    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &config, &mut stdout).await
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "maconomy=debug,maconomy_cli=debug,maconomy_core=debug"
    } else {
        "maconomy=warn,maconomy_cli=warn,maconomy_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
