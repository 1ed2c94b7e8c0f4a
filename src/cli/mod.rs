// src/cli/mod.rs — CLI definition (clap derive)

pub mod ask;
pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parable", about = "Smartphone support chatbot", version)]
pub struct Cli {
    /// Config file path (defaults to ~/.parable/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Answer one message in a throwaway session and print the reply
    Ask {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
        /// Start the session with a known platform (iphone or android)
        #[arg(long)]
        platform: Option<String>,
    },
    /// Validate config and check that the API key is present
    Check,
}
