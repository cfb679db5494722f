//! Availability file parser.
//!
//! One record per line: a person id, whitespace, then one digit per cell in
//! day-major order (`0` free, `1` class). Blank lines and `#` comments are
//! skipped. Any malformed line fails the whole parse.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::grid::TimeGrid;
use crate::models::{CellState, PersonRecord};

/// Errors raised while reading availability input.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: expected 2 tokens (id and cells), found {found}")]
    TokenCount { line: usize, found: usize },
    #[error("Line {line}, column {column}: invalid cell {found:?} (expected 0 or 1)")]
    InvalidCell {
        line: usize,
        column: usize,
        found: char,
    },
    #[error("Line {line}: expected {expected} cells, found {found}")]
    CellCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: duplicate person id {id:?}")]
    DuplicateId { line: usize, id: String },
}

fn parse_cell(c: char) -> Option<CellState> {
    match c {
        '0' => Some(CellState::Empty),
        '1' => Some(CellState::Class),
        _ => None,
    }
}

/// Parse one non-blank line into a record.
fn parse_line(line_no: usize, line: &str, expected: usize) -> Result<PersonRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(ParseError::TokenCount {
            line: line_no,
            found: tokens.len(),
        });
    }
    let (id, digits) = (tokens[0], tokens[1]);

    let mut cells = Vec::with_capacity(expected);
    for (i, c) in digits.chars().enumerate() {
        let state = parse_cell(c).ok_or(ParseError::InvalidCell {
            line: line_no,
            column: i + 1,
            found: c,
        })?;
        cells.push(state);
    }
    if cells.len() != expected {
        return Err(ParseError::CellCount {
            line: line_no,
            expected,
            found: cells.len(),
        });
    }
    Ok(PersonRecord::new(id, cells))
}

/// Parse availability text against a grid.
///
/// Records keep their input order, which the matcher uses for tie-breaks.
pub fn parse_availability(text: &str, grid: &TimeGrid) -> Result<Vec<PersonRecord>, ParseError> {
    let expected = grid.cell_count();
    let mut records: Vec<PersonRecord> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = i + 1;
        let record = parse_line(line_no, line, expected)?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(ParseError::DuplicateId {
                line: line_no,
                id: record.id,
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// Read and parse an availability file.
pub fn load_availability<P: AsRef<Path>>(
    path: P,
    grid: &TimeGrid,
) -> Result<Vec<PersonRecord>, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_availability(&text, grid)
}
