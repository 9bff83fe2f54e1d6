//! specward: check observed HTTP responses against an OpenAPI document.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use specward_lib::report::{check_response, parse_responses, render_check, render_inspect, OutputFormat};
use specward_lib::SpecStore;
use specward_telemetry::{LogFormat, Telemetry, TelemetryConfig};

/// Exit code for a response that does not satisfy the document.
const EXIT_INVALID: u8 = 1;
/// Exit code for load, parse or I/O errors.
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "specward",
    about = "Check HTTP responses against Swagger 2.0 / OpenAPI 3.x documents",
    version
)]
struct Cli {
    /// Log level filter (RUST_LOG takes precedence).
    #[arg(long, global = true, env = "SPECWARD_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format (json or pretty).
    #[arg(long, global = true, env = "SPECWARD_LOG_FORMAT", default_value = "pretty", value_parser = parse_log_format)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check observed response(s) against an API document.
    ///
    /// The response file holds one JSON object
    /// `{"status": 200, "req": {"method": "GET", "path": "/pets"}, "body": ..., "headers": {...}}`
    /// or an array of them.
    Check {
        /// API document (YAML or JSON).
        #[arg(short, long)]
        spec: PathBuf,

        /// Observed response file, or `-` for stdin.
        #[arg(short, long)]
        response: String,

        /// Output format (text or json).
        #[arg(long, default_value = "text", value_parser = parse_output_format)]
        format: OutputFormat,
    },

    /// Print the servers, paths and operations of an API document.
    Inspect {
        /// API document (YAML or JSON).
        #[arg(short, long)]
        spec: PathBuf,

        /// Output format (text or json).
        #[arg(long, default_value = "text", value_parser = parse_output_format)]
        format: OutputFormat,
    },
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (expected json or pretty)", s))
}

fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| format!("unknown output format '{}' (expected text or json)", s))
}

/// Run the check command.
fn run_check(spec: &Path, response: &str, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let store = SpecStore::load(spec)?;
    let input = read_input(response)?;
    let responses = parse_responses(&input)
        .with_context(|| format!("invalid observed response in {}", response))?;

    let spec = store.current();
    let outcomes: Vec<_> = responses
        .iter()
        .map(|response| check_response(&spec, response))
        .collect();

    print!("{}", render_check(&outcomes, format));

    if outcomes.iter().all(|o| o.valid) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INVALID))
    }
}

/// Run the inspect command.
fn run_inspect(spec: &Path, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let store = SpecStore::load(spec)?;
    let rendered = render_inspect(&store.current(), format);
    if format == OutputFormat::Json {
        println!("{}", rendered);
    } else {
        print!("{}", rendered);
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read observed response from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read observed response from {}", source))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = TelemetryConfig::new()
        .with_log_level(&cli.log_level)
        .with_log_format(cli.log_format);
    if let Err(e) = Telemetry::init(config) {
        eprintln!("error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    let result = match cli.command {
        Commands::Check {
            spec,
            response,
            format,
        } => run_check(&spec, &response, format),
        Commands::Inspect { spec, format } => run_inspect(&spec, format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
