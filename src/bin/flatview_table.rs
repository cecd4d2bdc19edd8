//! flatview-table: render the table view of a JSON document
//!
//! Usage:
//!   # Read from file, print an aligned table
//!   flatview-table data.json
//!
//!   # Read from stdin
//!   echo '[{"a":1,"b":{"c":2}},{"a":3,"b":{"c":4}}]' | flatview-table
//!
//!   # Filter, group, paginate
//!   flatview-table data.json --filter user.name=alice
//!   flatview-table data.json --range "score=10..100" --group-by status
//!   flatview-table data.json --page 2 --page-size 25
//!
//!   # Emit the derived rows as NDJSON instead of text
//!   flatview-table data.json --json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatview::table::{cell_text, Filter, FlatRow, PageView, Table, ViewMode, ViewState};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "flatview-table")]
#[command(about = "Render the table view of a JSON document", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Text filter, `column=substring` (repeatable, case-insensitive)
    #[arg(long, short = 'f')]
    filter: Vec<String>,

    /// Numeric range filter, `column=min..max` (either bound optional)
    #[arg(long)]
    range: Vec<String>,

    /// Group rows by this column instead of paginating
    #[arg(long, short = 'g')]
    group_by: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page
    #[arg(long, default_value_t = flatview::table::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Comma-separated columns to show (others are hidden)
    #[arg(long)]
    columns: Option<String>,

    /// Emit the derived rows as newline-delimited JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let value = read_json(args.input.as_deref())?;
    let table = Table::from_value(&value)
        .context("input is neither an object nor an array of objects")?;

    let mut state = ViewState::new();
    for raw in &args.filter {
        let (column, pattern) = split_assignment(raw)
            .with_context(|| format!("invalid --filter '{}', expected column=substring", raw))?;
        state.set_filter(column, Filter::text(pattern));
    }
    for raw in &args.range {
        let (column, bounds) = split_assignment(raw)
            .with_context(|| format!("invalid --range '{}', expected column=min..max", raw))?;
        let (min, max) = parse_range(bounds)
            .with_context(|| format!("invalid --range bounds in '{}'", raw))?;
        state.set_filter(column, Filter::number_range(min, max));
    }

    if let Some(columns) = &args.columns {
        let wanted: Vec<&str> = columns.split(',').map(str::trim).collect();
        for column in table.columns() {
            state.set_visible(column.clone(), wanted.contains(&column.as_str()));
        }
    }

    state.set_group_by(args.group_by.clone());
    state.set_page_size(args.page_size);
    state.set_page(args.page);

    let view = table.view(&state);
    let mut stdout = std::io::stdout();

    match &view.mode {
        ViewMode::Pages(page) => {
            if args.json {
                for row in &page.rows {
                    writeln!(stdout, "{}", serde_json::to_string(row)?)?;
                }
            } else {
                print_rows(&mut stdout, &view.columns, &page.rows)?;
                writeln!(stdout, "{}", page_footer(page, view.total_rows))?;
            }
        }
        ViewMode::Groups(groups) => {
            let group_column = args.group_by.as_deref().unwrap_or_default();
            for group in groups {
                if args.json {
                    for row in &group.rows {
                        let mut out = (*row).clone();
                        out.insert("_group".to_string(), Value::String(group.key.clone()));
                        writeln!(stdout, "{}", serde_json::to_string(&out)?)?;
                    }
                } else {
                    writeln!(
                        stdout,
                        "{} = {} ({} rows)",
                        group_column,
                        group.key,
                        group.rows.len()
                    )?;
                    print_rows(&mut stdout, &view.columns, &group.rows)?;
                    writeln!(stdout)?;
                }
            }
        }
    }

    Ok(())
}

/// Read a whole JSON document, trying SIMD parsing first and falling back to
/// serde_json
fn read_json(input: Option<&str>) -> Result<Value> {
    let mut content = Vec::new();
    if let Some(path) = input {
        let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
        BufReader::new(file).read_to_end(&mut content)?;
    } else {
        std::io::stdin().read_to_end(&mut content)?;
    }

    let mut simd_buf = content.clone();
    match simd_json::to_owned_value(&mut simd_buf) {
        Ok(parsed) => {
            let json_str = simd_json::to_string(&parsed)?;
            Ok(serde_json::from_str(&json_str)?)
        }
        Err(_) => serde_json::from_slice(&content).context("failed to parse JSON"),
    }
}

fn split_assignment(raw: &str) -> Option<(&str, &str)> {
    let (column, rest) = raw.split_once('=')?;
    if column.is_empty() {
        return None;
    }
    Some((column, rest))
}

fn parse_range(bounds: &str) -> Option<(Option<f64>, Option<f64>)> {
    let (lo, hi) = bounds.split_once("..")?;
    let min = if lo.is_empty() { None } else { Some(lo.parse().ok()?) };
    let max = if hi.is_empty() { None } else { Some(hi.parse().ok()?) };
    if min.is_none() && max.is_none() {
        return None;
    }
    Some((min, max))
}

/// Summary line under the table. An empty page has no 1-based row range to
/// report, so it says `no rows` instead of an inverted `rows 1-0`.
fn page_footer(page: &PageView, total_before_filters: usize) -> String {
    let range = if page.rows.is_empty() {
        "no rows".to_string()
    } else {
        format!("rows {}-{}", page.start + 1, page.end)
    };
    format!(
        "page {}/{}, {} of {} ({} total before filters)",
        page.page, page.total_pages, range, page.total_rows, total_before_filters
    )
}

/// Print rows as an aligned text table, `-` for missing cells
fn print_rows(out: &mut impl Write, columns: &[String], rows: &[&FlatRow]) -> Result<()> {
    if columns.is_empty() {
        writeln!(out, "(no visible columns)")?;
        return Ok(());
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let text = match row.get(col) {
                        None | Some(Value::Null) => "-".to_string(),
                        Some(value) => cell_text(value),
                    };
                    widths[i] = widths[i].max(text.len());
                    text
                })
                .collect()
        })
        .collect();

    for (i, col) in columns.iter().enumerate() {
        write!(out, "{:<width$}  ", col, width = widths[i])?;
    }
    writeln!(out)?;
    for width in &widths {
        write!(out, "{}  ", "-".repeat(*width))?;
    }
    writeln!(out)?;

    for row in rendered {
        for (i, cell) in row.iter().enumerate() {
            write!(out, "{:<width$}  ", cell, width = widths[i])?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatview::table::{flatten_value, paginate};
    use serde_json::json;

    #[test]
    fn test_page_footer_row_range() {
        let rows: Vec<FlatRow> = (0..7).map(|i| flatten_value(&json!({ "i": i }))).collect();
        let refs: Vec<&FlatRow> = rows.iter().collect();
        let page = paginate(&refs, 2, 3);
        assert_eq!(
            page_footer(&page, 10),
            "page 2/3, rows 4-6 of 7 (10 total before filters)"
        );
    }

    #[test]
    fn test_page_footer_empty_filtered_set() {
        let page = paginate(&[], 1, 50);
        assert_eq!(
            page_footer(&page, 4),
            "page 1/1, no rows of 0 (4 total before filters)"
        );
    }
}
