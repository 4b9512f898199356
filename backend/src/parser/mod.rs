//! Readers for already-decoded curve dumps and lookup tables.
//!
//! A curve dump is a delimited text file: the first non-empty line holds the
//! curve mnemonics, every following non-empty line one depth sample. The
//! encoding and the delimiter are auto-detected.

use std::fmt;
use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::models::{CurveMatrix, LookupTable, NULL_VALUE};

/// How cells are separated on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Char(char),
    /// Runs of spaces or tabs.
    Whitespace,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Char('\t') => write!(f, "\\t"),
            Delimiter::Char(c) => write!(f, "{}", c),
            Delimiter::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// A parsed curve dump with the detected reading settings.
#[derive(Debug, Clone)]
pub struct ParsedMatrix {
    pub matrix: CurveMatrix,
    pub encoding: String,
    pub delimiter: Delimiter,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using an encoding label.
pub fn decode_content(bytes: &[u8], encoding: &str) -> InputResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => {
            let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                InputError::EncodingError(format!("unsupported encoding '{}'", label))
            })?;
            encoding.decode(bytes).0.into_owned()
        }
    };
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first non-empty line.
///
/// Falls back to whitespace runs when no separator character appears.
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best = Delimiter::Whitespace;
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best = Delimiter::Char(sep);
        }
    }

    best
}

fn split_line(line: &str, delimiter: Delimiter) -> Vec<&str> {
    match delimiter {
        Delimiter::Char(c) => line.split(c).map(|s| s.trim().trim_matches('"')).collect(),
        Delimiter::Whitespace => line.split_whitespace().collect(),
    }
}

fn parse_cell(cell: &str, delimiter: Delimiter) -> Option<f64> {
    if cell.is_empty() {
        return Some(NULL_VALUE);
    }
    cell.parse().ok().or_else(|| {
        // Decimal comma, only when the comma cannot be the separator
        if delimiter == Delimiter::Char(',') {
            None
        } else {
            cell.replace(',', ".").parse().ok()
        }
    })
}

/// Parse a decoded curve dump with an explicit delimiter.
///
/// Empty cells become the null sentinel.
pub fn parse_matrix(content: &str, delimiter: Delimiter) -> InputResult<CurveMatrix> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(InputError::EmptyFile)?;

    let curves: Vec<String> = split_line(header_line, delimiter)
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    if curves.iter().all(|c| c.is_empty()) {
        return Err(InputError::NoHeaders);
    }

    let mut rows = Vec::new();
    for (line_num, line) in lines {
        let cells = split_line(line, delimiter);
        if cells.len() != curves.len() {
            return Err(InputError::RaggedRow {
                line: line_num,
                expected: curves.len(),
                found: cells.len(),
            });
        }

        let row = cells
            .iter()
            .zip(&curves)
            .map(|(cell, curve)| {
                parse_cell(cell, delimiter).ok_or_else(|| InputError::NonNumeric {
                    line: line_num,
                    column: curve.clone(),
                    value: cell.to_string(),
                })
            })
            .collect::<InputResult<Vec<f64>>>()?;
        rows.push(row);
    }

    CurveMatrix::from_rows(curves, rows)
}

/// Parse curve dump bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> InputResult<ParsedMatrix> {
    if bytes.is_empty() {
        return Err(InputError::EmptyFile);
    }

    let mut encoding = detect_encoding(bytes);
    let content = match decode_content(bytes, &encoding) {
        Ok(content) => content,
        Err(_) => {
            encoding = "utf-8".to_string();
            String::from_utf8_lossy(bytes).into_owned()
        }
    };

    let delimiter = detect_delimiter(&content);
    let matrix = parse_matrix(&content, delimiter)?;

    Ok(ParsedMatrix {
        matrix,
        encoding,
        delimiter,
    })
}

/// Parse a curve dump file with auto-detection.
pub fn parse_matrix_file<P: AsRef<Path>>(path: P) -> InputResult<ParsedMatrix> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse a (depth, code) lookup table.
///
/// A first row that is not two numbers is taken as a header. Any other row
/// that is not exactly two numbers is an error.
pub fn parse_lookup_table(content: &str) -> InputResult<LookupTable> {
    let (content, delimiter) = match detect_delimiter(content) {
        Delimiter::Char(c) if c.is_ascii() => (content.to_string(), c as u8),
        _ => {
            let tabbed: Vec<String> = content
                .lines()
                .map(|line| line.split_whitespace().collect::<Vec<_>>().join("\t"))
                .collect();
            (tabbed.join("\n"), b'\t')
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);

        if record.len() != 2 {
            return Err(InputError::LookupShape(format!(
                "line {} has {} columns",
                line,
                record.len()
            )));
        }

        let depth = parse_cell(&record[0], Delimiter::Char(delimiter as char));
        let code = parse_cell(&record[1], Delimiter::Char(delimiter as char));
        match (depth, code) {
            (Some(depth), Some(code)) if !record[0].is_empty() && !record[1].is_empty() => {
                rows.push(vec![depth, code]);
            }
            _ if i == 0 => continue,
            _ => {
                return Err(InputError::LookupShape(format!(
                    "line {}: '{}', '{}' is not numeric",
                    line,
                    &record[0],
                    &record[1]
                )))
            }
        }
    }

    LookupTable::from_rows(&rows)
}

/// Read a lookup table file (any encoding).
pub fn read_lookup_table<P: AsRef<Path>>(path: P) -> InputResult<LookupTable> {
    let bytes = std::fs::read(path.as_ref())?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding)?;
    parse_lookup_table(&content)
}
