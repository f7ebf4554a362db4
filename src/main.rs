//! Remora Template CLI
//!
//! Usage:
//!   remora-template [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --context <FILE>  Context variables (JSON, or TOML for .toml files)
//!   --config <FILE>       Engine configuration (TOML)
//!   --check               Compile only, print nothing on success
//!   -v, --verbose         Log compilation details to stderr
//!   -h, --help            Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use remora_template::{Context, Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "remora-template")]
#[command(about = "Render templates containing {% remora %} blocks")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Context variables file (JSON, or TOML for .toml files)
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only check that the template compiles
    #[arg(long)]
    check: bool,

    /// Log compilation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
        tracing::debug!("Verbose mode enabled");
    }

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let context = match &cli.context {
        Some(path) => match Context::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading context '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Context::new(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                return ExitCode::FAILURE;
            }
            (buffer, "<stdin>".to_string())
        }
    };

    let engine = Engine::new(config);
    let template = match engine.compile(&source) {
        Ok(t) => t,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        return ExitCode::SUCCESS;
    }

    match template.render(&context) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
