pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use commands::contract::ContractArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "storefront-api")]
#[command(about = "Contract-validated CRUD API over in-memory users and products")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default when no command is given)")]
    Serve(ServeArgs),

    #[command(about = "List the operations mounted under each API version")]
    Routes(ContractArgs),

    #[command(about = "Print the OpenAPI contract (YAML, or JSON with --json)")]
    Contract(ContractArgs),
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

    match cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Routes(args) => commands::routes::handle(args, output_format),
        Commands::Contract(args) => commands::contract::handle(args, output_format),
    }
}
