//! Command execution

use crate::cli::{Cli, Commands};
use crate::output;
use anyhow::{Context, Result};
use esrows_common::{
    flatten_aggregations, Dialect, EsrowsConfig, FlatRecord, Normalizer, OutputFormat,
    ResponseKind,
};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Run a parsed command line against the given stdin/stdout.
pub fn execute<R: Read, W: Write>(cli: &Cli, stdin: R, mut stdout: W) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EsrowsConfig::load_from(path)?,
        None => EsrowsConfig::load()?,
    };

    match &cli.command {
        Commands::Normalize {
            dialect,
            format,
            input,
        } => {
            let dialect = config.resolve_dialect(dialect.as_deref())?;
            let format = resolve_format(&config, format.as_deref())?;
            let response = read_json(input.as_deref(), stdin)?;
            let records = normalize(dialect, &response, input.as_deref())?;
            write_records(&mut stdout, &records, format)
        }
        Commands::Flatten { format, input } => {
            let format = resolve_format(&config, format.as_deref())?;
            let tree = read_json(input.as_deref(), stdin)?;
            let records = flatten_aggregations(&tree)
                .with_context(|| format!("Failed to flatten {}", source_name(input.as_deref())))?;
            info!(records = records.len(), "flattened aggregation tree");
            write_records(&mut stdout, &records, format)
        }
        Commands::Dialects => {
            for dialect in Dialect::ALL {
                writeln!(stdout, "{:<18} {}", dialect.as_str(), dialect.description())?;
            }
            Ok(())
        }
    }
}

fn normalize(dialect: Dialect, response: &Value, input: Option<&Path>) -> Result<Vec<FlatRecord>> {
    let kind = ResponseKind::detect(response);
    info!(dialect = %dialect, kind = kind.as_str(), "normalizing response");

    let records = Normalizer::new(dialect)
        .normalize(response)
        .with_context(|| format!("Failed to normalize {}", source_name(input)))?;

    info!(records = records.len(), "normalized response");
    Ok(records)
}

fn resolve_format(config: &EsrowsConfig, cli_override: Option<&str>) -> Result<OutputFormat> {
    match cli_override {
        Some(format) => OutputFormat::parse(format),
        None => Ok(config.output.format),
    }
}

fn read_json<R: Read>(input: Option<&Path>, mut stdin: R) -> Result<Value> {
    let body = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut body = String::new();
            stdin
                .read_to_string(&mut body)
                .context("Failed to read stdin")?;
            body
        }
    };
    debug!(bytes = body.len(), source = %source_name(input), "read response");

    let value: Value = serde_json::from_str(&body)
        .map_err(esrows_common::NormalizeError::from)
        .with_context(|| format!("Failed to parse {}", source_name(input)))?;
    Ok(value)
}

fn write_records<W: Write>(stdout: &mut W, records: &[FlatRecord], format: OutputFormat) -> Result<()> {
    let rendered = output::render(records, format)?;
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;
    Ok(())
}

fn source_name(input: Option<&Path>) -> String {
    match input {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

