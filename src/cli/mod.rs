pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog CLI - credential and build tooling for the product catalog service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a signed credential for local testing")]
    Token(commands::token::TokenArgs),

    #[command(about = "Verify a credential and print the identity it carries")]
    Decode {
        #[arg(help = "Credential, with or without the Bearer prefix")]
        token: String,
    },

    #[command(about = "Print build information")]
    BuildInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Decode { token } => commands::decode::handle(&token, output_format),
        Commands::BuildInfo => commands::build_info::handle(output_format),
    }
}
