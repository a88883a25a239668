//! OpenAPI to Draft-04 CLI
//!
//! Command-line interface for converting OpenAPI schema objects into
//! JSON Schema Draft-04 documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use openapi_draft4::{
    json_type_name, load_options, load_schema_auto, navigate_fragment, ConvertOptions, Converter,
    LoadError,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "openapi-draft4")]
#[command(about = "Convert OpenAPI schema objects to JSON Schema Draft-04")]
#[command(version)]
struct Cli {
    /// Schema source: file path, URL (http:// or https://), or - for stdin
    schema: String,

    /// JSON Pointer fragment of the schema to convert (e.g. #/components/schemas/Pet)
    #[arg(long)]
    pointer: Option<String>,

    /// Drop properties marked readOnly: true
    #[arg(long)]
    remove_read_only: bool,

    /// Drop properties marked writeOnly: true
    #[arg(long)]
    remove_write_only: bool,

    /// Keep an attribute that would otherwise be stripped (repeatable, comma-separated)
    #[arg(long, value_name = "ATTR", value_delimiter = ',')]
    keep_unsupported: Vec<String>,

    /// Options file (JSON or YAML) using removeReadOnly, removeWriteOnly, keepUnsupported
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Emit YAML instead of JSON
    #[arg(long)]
    yaml: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_convert(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("openapi_draft4={}", level))
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_convert(cli: Cli) -> Result<(), u8> {
    let options = build_options(&cli).map_err(report_load_error)?;

    let mut schema = load_schema_auto(&cli.schema).map_err(report_load_error)?;

    if let Some(fragment) = &cli.pointer {
        schema = navigate_fragment(&schema, fragment).map_err(report_load_error)?;
    }

    if !schema.is_object() {
        return Err(report_load_error(LoadError::NotAnObject {
            actual: json_type_name(&schema).to_string(),
        }));
    }

    info!(source = %cli.schema, pointer = ?cli.pointer, "converting schema");
    let converted = Converter::new(&options).convert(schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let rendered = render(&converted, cli.yaml, cli.pretty).map_err(|message| {
        eprintln!("Error serializing output: {}", message);
        2u8
    })?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            info!(path = %path.display(), "wrote converted schema");
        }
        None => {
            if cli.yaml {
                print!("{}", rendered);
            } else {
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}

/// Options file first, then command-line flags on top.
fn build_options(cli: &Cli) -> Result<ConvertOptions, LoadError> {
    let base = match &cli.config {
        Some(path) => load_options(path)?,
        None => ConvertOptions::default(),
    };

    let flags = ConvertOptions::new()
        .remove_read_only(cli.remove_read_only)
        .remove_write_only(cli.remove_write_only)
        .keep_unsupported(cli.keep_unsupported.iter().cloned());

    Ok(base.merge(flags))
}

fn render(schema: &Value, yaml: bool, pretty: bool) -> Result<String, String> {
    if yaml {
        serde_yaml::to_string(schema).map_err(|e| e.to_string())
    } else if pretty {
        serde_json::to_string_pretty(schema).map_err(|e| e.to_string())
    } else {
        serde_json::to_string(schema).map_err(|e| e.to_string())
    }
}

fn report_load_error(e: LoadError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}
