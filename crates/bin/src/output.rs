//! Output formatting helpers for human-readable and JSON output.

use positionable::{Assignment, Reposition};
use serde_json::Value;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Print a single JSON document on one line.
pub fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Rows for a list of repositions.
pub fn reposition_rows(repositions: &[Reposition]) -> Vec<Vec<String>> {
    repositions
        .iter()
        .map(|r| vec![r.id.to_string(), r.position.to_string()])
        .collect()
}

/// Print what an assignment writes, in human-readable form.
pub fn print_assignment(id: &str, assignment: &Assignment) {
    println!("{id} -> {}", assignment.position);
    if !assignment.repositions.is_empty() {
        println!();
        println!("Repositioned {} sibling(s):", assignment.repositions.len());
        let rows = reposition_rows(&assignment.repositions);
        print_table(&["ID", "POSITION"], &rows);
    }
}
