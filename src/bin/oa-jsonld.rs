//! Open Annotation JSON-LD CLI
//!
//! Command-line interface for transforming and checking annotation documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oa_jsonld::{
    apply, load_document_auto, load_document_str, outbound, Direction, Profile,
};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "oa-jsonld")]
#[command(about = "Transform annotation documents between storage and JSON-LD forms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a document in either direction
    Transform {
        /// Document source: file path, URL (http:// or https://), or '-' for stdin
        doc: String,

        /// Apply the outbound transform (storage form to JSON-LD)
        #[arg(
            long,
            conflicts_with = "inbound",
            required_unless_present = "inbound"
        )]
        outbound: bool,

        /// Apply the inbound transform (JSON-LD to storage form)
        #[arg(long, conflicts_with = "outbound", required_unless_present = "outbound")]
        inbound: bool,

        /// Base URL for absolute identifier expansion (outbound) and
        /// relativization (inbound)
        #[arg(long)]
        base_url: Option<Url>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a storage document's link metadata and report warnings
    Check {
        /// Document source: file path, URL (http:// or https://), or '-' for stdin
        doc: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            doc,
            outbound,
            inbound: _,
            base_url,
            output,
            pretty,
        } => run_transform(&doc, outbound, base_url, output, pretty),

        Commands::Check {
            doc,
            format,
            strict,
        } => run_check(&doc, &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_transform(
    doc_source: &str,
    outbound_flag: bool,
    base_url: Option<Url>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let direction = Direction::from_outbound_flag(outbound_flag);
    let mut doc = load_source(doc_source)?;

    // A supplied base URL turns on absolute identifier handling.
    let profile = Profile::new().absolute_ids(base_url.is_some());

    let warnings = apply(&mut doc, direction, base_url.as_ref(), &profile).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    for warning in &warnings {
        eprintln!("warning: [{}] {} ({})", warning.code, warning.message, warning.path);
    }

    let json_output = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_check(doc_source: &str, format: &str, strict: bool) -> Result<(), u8> {
    let mut doc = load_source(doc_source)?;

    let warnings = outbound(&mut doc, None, &Profile::default()).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if format == "json" {
        let result = serde_json::json!({
            "ok": warnings.is_empty(),
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        for warning in &warnings {
            println!(
                "  \x1b[33mwarning\x1b[0m[{}]: {} - {}",
                warning.code, warning.path, warning.message
            );
        }
        if warnings.is_empty() {
            println!("\x1b[32m✓ no link warnings\x1b[0m");
        } else {
            println!("\x1b[33m⚠ {} warning(s)\x1b[0m", warnings.len());
        }
    }

    if strict && !warnings.is_empty() {
        Err(1)
    } else {
        Ok(())
    }
}

/// Load a document from a file path, a URL, or stdin (`-`).
fn load_source(source: &str) -> Result<Value, u8> {
    if source == "-" {
        let buffer = std::io::read_to_string(std::io::stdin()).map_err(|e| {
            eprintln!("Error reading stdin: {}", e);
            3u8
        })?;
        load_document_str(&buffer).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })
    } else {
        load_document_auto(source).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })
    }
}
