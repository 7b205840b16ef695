//! Renders the input surface (pasted text, text files, CSV) into the single
//! string the analyzers consume.

use crate::types::InputFormat;
use crate::{AppError, Result};

pub const EMPTY_INPUT: &str = "Please provide data before analyzing.";

/// Renders the raw payload and rejects input that is blank once rendered.
pub fn prepare_input(raw: &str, format: InputFormat) -> Result<String> {
    let text = match format {
        InputFormat::Text => raw.to_string(),
        InputFormat::Csv => render_csv(raw)?,
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_INPUT.to_string()));
    }

    Ok(text)
}

/// Lays a CSV table out as right-aligned columns, header first, no index.
pub fn render_csv(raw: &str) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Invalid CSV: {}", e)))?;
    if !headers.is_empty() {
        rows.push(headers.iter().map(|h| h.trim().to_string()).collect());
    }

    for record in reader.records() {
        let record = record.map_err(|e| AppError::Validation(format!("Invalid CSV: {}", e)))?;
        rows.push(record.iter().map(|f| f.trim().to_string()).collect());
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    Ok(lines.join("\n"))
}
