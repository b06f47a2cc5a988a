//! language-model-converter CLI - convert YAML intent definitions to an NLU training model
//!
//! Reads every file matched by the command line arguments (glob patterns,
//! plain paths, or directories contributing their `.yaml`, `.yml` and
//! `.json` files), merges them and prints the model as
//! JSON. Diagnostics go to stderr.

use clap::Parser;
use language_model_converter::loader::{collect_files, load_source};
use language_model_converter::{parse, ConvertError, ConverterConfig, Culture};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "language-model-converter")]
#[command(version, about = "Convert language model files to the NLU service format", long_about = None)]
#[command(after_help = "Examples:\n\n  Convert all files under 'models' starting with 'en', setting the culture to en-us\n    $ language-model-converter './models/**/en*.yaml' -c en-us")]
struct Cli {
    /// Model files, directories or glob patterns (quote patterns to keep the shell from expanding them)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Culture code the files belong to (ex. "en-us")
    #[arg(short, long)]
    culture: Option<String>,

    /// Converter configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the model to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the model even when error diagnostics were reported
    #[arg(long)]
    allow_errors: bool,
}

enum Outcome {
    Written,
    Rejected,
}

fn run(cli: Cli) -> Result<Outcome, ConvertError> {
    let mut config = match &cli.config {
        Some(path) => ConverterConfig::from_file(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(culture) = cli.culture {
        config.culture = Culture::from(culture);
    }
    config.validate()?;

    let files = collect_files(&cli.files)?;
    if files.is_empty() {
        eprintln!("No files found");
        return Ok(Outcome::Rejected);
    }

    let sources = files.iter().map(load_source).collect::<Result<Vec<_>, _>>()?;
    let output = parse(&sources, &config)?;

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }

    if output.diagnostics.has_errors() && !cli.allow_errors {
        return Ok(Outcome::Rejected);
    }

    let json = output
        .model
        .to_json_pretty()
        .map_err(|source| ConvertError::Json {
            path: "<model>".to_string(),
            source,
        })?;

    match &cli.output {
        Some(path) => std::fs::write(path, json + "\n").map_err(|source| ConvertError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => println!("{}", json),
    }

    Ok(Outcome::Written)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(Outcome::Written) => {}
        Ok(Outcome::Rejected) => process::exit(1),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}
