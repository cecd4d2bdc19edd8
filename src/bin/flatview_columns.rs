//! flatview-columns: per-column analysis report for a JSON document
//!
//! Reports every column's inferred type, distinct and null counts, numeric
//! bounds, and a sample value.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   flatview-columns data.json
//!
//!   # Read from stdin
//!   echo '[{"id": 1, "joined": "2024-01-15"}]' | flatview-columns
//!
//!   # Machine-readable output
//!   flatview-columns data.json --json

use anyhow::{Context, Result};
use clap::Parser;
use flatview::table::{cell_text, ColumnInfo, Table};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "flatview-columns")]
#[command(about = "Analyze the columns of a JSON document", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut content = Vec::new();
    if let Some(path) = &args.input {
        let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
        BufReader::new(file).read_to_end(&mut content)?;
    } else {
        std::io::stdin().read_to_end(&mut content)?;
    }

    let value: Value = serde_json::from_slice(&content).context("failed to parse JSON")?;
    let table = Table::from_value(&value)
        .context("input is neither an object nor an array of objects")?;

    if table.columns().is_empty() {
        eprintln!("Warning: no columns found in input");
    }

    // Report in the table's stable column order
    let report: Vec<&ColumnInfo> = table
        .columns()
        .iter()
        .filter_map(|name| table.info(name))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} rows, {} columns",
        table.rows().len(),
        table.columns().len()
    );
    for info in report {
        let bounds = match (info.min, info.max) {
            (Some(min), Some(max)) => format!(", range {}..{}", min, max),
            _ => String::new(),
        };
        let sample = info
            .sample
            .as_ref()
            .map(cell_text)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: {} ({} unique, {} null{}) sample: {}",
            info.name, info.column_type, info.unique_count, info.null_count, bounds, sample
        );
    }

    Ok(())
}
