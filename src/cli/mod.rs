pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "redoot-cli")]
#[command(about = "Redoot CLI - identifiers, password hashes and admin data transfer")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate document identifiers")]
    Id {
        #[arg(default_value_t = 1, help = "How many identifiers to print")]
        count: usize,
        #[arg(short, long, help = "Print without hyphens")]
        strip: bool,
    },

    #[command(about = "Hash a password with the configured Argon2 parameters")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },

    #[command(about = "Download a full dump from a running server (administrator only)")]
    Export {
        #[command(flatten)]
        remote: commands::transfer::Remote,
        #[arg(short, long, help = "Write to file instead of stdout")]
        output: Option<std::path::PathBuf>,
    },

    #[command(about = "Upload a dump to a running server (administrator only)")]
    Import {
        #[command(flatten)]
        remote: commands::transfer::Remote,
        #[arg(help = "Dump file produced by export")]
        input: std::path::PathBuf,
    },
}

#[derive(Debug, Clone, Copy)]
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
        Commands::Id { count, strip } => commands::id::handle(count, strip, output_format),
        Commands::HashPassword { password } => commands::password::handle(password, output_format).await,
        Commands::Export { remote, output } => commands::transfer::export(remote, output, output_format).await,
        Commands::Import { remote, input } => commands::transfer::import(remote, input, output_format).await,
    }
}
