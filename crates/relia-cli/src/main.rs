use clap::Parser;
use relia_cli::cli::{Cli, Commands, ConfigCommands};
use relia_core::ReliaError;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Calc {
            input,
            output,
            config,
            json,
        } => commands::calc::handle(input, output.as_deref(), config.as_deref(), *json),
        Commands::Inspect { input, config } => commands::inspect::handle(input, config.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Init { path, force } => commands::config::handle_init(path, *force),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err
                .downcast_ref::<ReliaError>()
                .map_or("Error", ReliaError::kind);
            error!(kind, "{:#}", err);
            eprintln!("{kind}: {err:#}");
            ExitCode::FAILURE
        }
    }
}
