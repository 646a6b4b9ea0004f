mod cli;
mod commands;

use {
    anyhow::Result,
    clap::Parser,
    cli::{Cli, Commands},
    tx_history::logger::{init_log, LogOpts},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // only preserve logs from the single most recent execution
    if !cli.log_file.is_empty() {
        if let Ok(true) = tokio::fs::try_exists(&cli.log_file).await {
            if let Err(err) =
                tokio::fs::rename(&cli.log_file, format!("{}.old", cli.log_file)).await
            {
                eprintln!("failed to rotate log file {err:#?}");
            }
        }
    }
    init_log(LogOpts {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
    })?;

    match cli.command {
        Commands::NewConfig => commands::config::new_config(&cli.config).await,
        Commands::Parse { signatures } => commands::parse::parse(signatures, &cli.config).await,
        Commands::ParseFile { input } => commands::parse::parse_file(&input, &cli.config).await,
        Commands::Serve { listen_url } => commands::serve::serve(listen_url, &cli.config).await,
    }
}
