use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tx_history", about = "solana transaction history parser")]
pub struct Cli {
    #[arg(long, default_value = "info", help = "log verbosity to use")]
    pub log_level: String,

    #[arg(long, default_value = "", help = "optionally output logs to this file")]
    pub log_file: String,

    #[arg(long, default_value = "config.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "initialize a new config file")]
    NewConfig,

    #[command(about = "fetch and parse transactions by signature")]
    Parse {
        #[arg(required = true, help = "transaction signatures, duplicates are fetched once")]
        signatures: Vec<String>,
    },

    #[command(
        about = "parse transactions from a file",
        long_about = "the file holds a single transaction or an array of them, either as returned by getTransaction or as exported records"
    )]
    ParseFile {
        #[arg(long, help = "file containing the transactions")]
        input: String,
    },

    #[command(about = "starts the api used to return parsed transactions")]
    Serve {
        #[arg(long, help = "url to expose the api on, overrides the config")]
        listen_url: Option<String>,
    },
}
