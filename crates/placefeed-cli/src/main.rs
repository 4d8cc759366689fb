//! Operator glue: convert captured record dumps between export formats.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use placefeed_core::{export_records, ExportFormat, Record};

#[derive(Debug, Parser)]
#[command(name = "placefeed")]
#[command(about = "Export captured place records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serialize a JSON record dump to an export format.
    Export {
        /// JSON record dump produced by a traversal session.
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Write here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    ExcelCsv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::TabularPlain,
            Format::ExcelCsv => Self::TabularExcel,
            Format::Json => Self::StructuredDocument,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Export {
            input,
            format,
            output,
        } => export(&input, format.into(), output.as_deref()),
    }
}

fn export(
    input: &std::path::Path,
    format: ExportFormat,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading record dump {}", input.display()))?;
    let records: Vec<Record> =
        serde_json::from_str(&raw).context("parsing record dump as a JSON record list")?;

    if records.is_empty() {
        tracing::warn!(input = %input.display(), "no records to export");
        return Ok(());
    }

    let content = export_records(&records, format)?;
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("writing export to {}", path.display()))?,
        None => print!("{content}"),
    }
    Ok(())
}
