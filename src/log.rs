//! Parsing of debug-allocator logs.
//!
//! Each non-empty line is `<action> [metadata..] <pointer>`: the first
//! token classifies the event, the last token is the pointer identifier
//! and anything in between is ignored.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unrecognized action {action:?} for pointer {pointer:?} (full line: {raw:?})")]
    UnrecognizedAction {
        line: usize,
        action: String,
        pointer: String,
        raw: String,
    },
    #[error("line {line}: expected at least an action and a pointer, got {raw:?}")]
    TruncatedLine { line: usize, raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Alloc,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub action: Action,
    pub pointer: &'a str,
}

impl<'a> Record<'a> {
    // from str
    fn parse(line_no: usize, line: &'a str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        let truncated = |raw: &str| ParseError::TruncatedLine {
            line: line_no,
            raw: raw.to_string(),
        };
        let action = tokens.next().ok_or_else(|| truncated(line))?;
        // the pointer is always last, middle tokens are metadata
        let pointer = tokens.last().ok_or_else(|| truncated(line))?;

        let action = match action {
            "malloc'd" | "calloc'd" => Action::Alloc,
            "freed" => Action::Free,
            other => {
                return Err(ParseError::UnrecognizedAction {
                    line: line_no,
                    action: other.to_string(),
                    pointer: pointer.to_string(),
                    raw: line.to_string(),
                })
            }
        };

        Ok(Record { action, pointer })
    }
}

/// Parses the whole buffered log, failing on the first bad line.
pub fn parse(input: &str) -> Result<Vec<Record<'_>>, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(Record::parse(idx + 1, line)?);
    }
    Ok(records)
}
