pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xcyber")]
#[command(about = "xcyber CLI - database setup and offline question import")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Create the default provider plus admin and agent accounts")]
    Seed,

    #[command(about = "Bulk import questions from a CSV or spreadsheet file")]
    Import {
        #[arg(long, help = "Target section id")]
        section: String,
        #[arg(help = "Path to a .csv, .xlsx or .xls file")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Seed => commands::seed::handle(output_format).await,
        Commands::Import { section, file } => commands::import::handle(section, file, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_takes_section_and_path() {
        let cli = Cli::try_parse_from(["xcyber", "--json", "import", "--section", "abc", "q.csv"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Import { section, file } => {
                assert_eq!(section, "abc");
                assert_eq!(file, PathBuf::from("q.csv"));
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn import_requires_a_section() {
        assert!(Cli::try_parse_from(["xcyber", "import", "q.csv"]).is_err());
    }
}
