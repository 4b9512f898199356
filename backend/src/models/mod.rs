//! Domain models for the mud-log conversion pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`CurveMatrix`] - Depth-indexed numeric samples, one column per curve
//! - [`CurveIndex`] - Upper-cased mnemonic to column position
//! - [`LookupTable`] - (depth, code) pairs overlaid onto the lithology curve
//! - [`Resolution`] / [`FileKind`] / [`OutputTarget`] - What to produce
//! - [`HeaderFields`] / [`DeclaredDepths`] - Run metadata supplied by the user

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{InputError, InputResult};

/// Sentinel meaning "no measurement".
pub const NULL_VALUE: f64 = -999.25;

/// Textual form of [`NULL_VALUE`] in every output file.
pub const NULL_TEXT: &str = "-999.25";

/// Curve mnemonics the pipeline knows by name.
pub mod mnemonic {
    /// Cumulative bit revolutions, converted to thousands.
    pub const CUMULATIVE_REVS: &str = "BRVC";
    /// Total gas.
    pub const TOTAL_GAS: &str = "GASX";
    pub const METHANE: &str = "MTHA";
    pub const ETHANE: &str = "ETHA";
    pub const PROPANE: &str = "PRPA";
    pub const NORMAL_BUTANE: &str = "NBTA";
    pub const NORMAL_PENTANE: &str = "NPNA";
    pub const C1_C2: &str = "C1C2";
    pub const C1_C3: &str = "C1C3";
    pub const C1_C4: &str = "C1C4";
    pub const C1_C5: &str = "C1C5";
    /// Lithology code curve, target of the lookup overlay.
    pub const LITHOLOGY: &str = "LITH";
}

// =============================================================================
// Curve Matrix
// =============================================================================

/// A row-major matrix of samples. Column 0 is always depth.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMatrix {
    curves: Vec<String>,
    values: Vec<f64>,
}

impl CurveMatrix {
    /// Create a matrix with the given curves and no rows.
    pub fn empty(curves: Vec<String>) -> Self {
        Self {
            curves,
            values: Vec::new(),
        }
    }

    /// Build a matrix from rows. Every row must have one value per curve.
    pub fn from_rows(curves: Vec<String>, rows: Vec<Vec<f64>>) -> InputResult<Self> {
        let width = curves.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(InputError::RaggedRow {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Self { curves, values })
    }

    /// Curve mnemonics, one per column, in column order.
    pub fn curves(&self) -> &[String] {
        &self.curves
    }

    pub fn n_cols(&self) -> usize {
        self.curves.len()
    }

    pub fn n_rows(&self) -> usize {
        if self.curves.is_empty() {
            0
        } else {
            self.values.len() / self.curves.len()
        }
    }

    /// True when there is nothing to transform (no rows or no columns).
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.n_cols();
        &self.values[row * width..(row + 1) * width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let width = self.n_cols();
        &mut self.values[row * width..(row + 1) * width]
    }

    /// Iterate rows in depth order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_cols().max(1))
    }

    /// Depth of a row (column 0).
    pub fn depth(&self, row: usize) -> f64 {
        self.values[row * self.n_cols()]
    }

    /// All depths in row order.
    pub fn depths(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(|r| r[0])
    }

    pub fn first_depth(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.depth(0))
    }

    pub fn last_depth(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.depth(self.n_rows() - 1))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.n_cols() + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let width = self.n_cols();
        self.values[row * width + col] = value;
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|r| r[col]).collect()
    }

    /// Apply `f` to every value of one column in place.
    pub fn map_column(&mut self, col: usize, f: impl Fn(f64) -> f64) {
        let width = self.n_cols();
        for row in self.values.chunks_exact_mut(width.max(1)) {
            row[col] = f(row[col]);
        }
    }

    /// Copy the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut values = Vec::with_capacity(rows.len() * self.n_cols());
        for &r in rows {
            values.extend_from_slice(self.row(r));
        }
        Self {
            curves: self.curves.clone(),
            values,
        }
    }
}

// =============================================================================
// Curve Index
// =============================================================================

/// Maps upper-cased mnemonics to column positions. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct CurveIndex {
    positions: HashMap<String, usize>,
}

impl CurveIndex {
    /// Build from an ordered curve list. A repeated mnemonic maps to its last column.
    pub fn from_curves(curves: &[String]) -> Self {
        let positions = curves
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_uppercase(), i))
            .collect();
        Self { positions }
    }

    /// Column of a mnemonic (case-insensitive). Absent curves are `None`, not an error.
    pub fn get(&self, mnemonic: &str) -> Option<usize> {
        self.positions.get(&mnemonic.to_uppercase()).copied()
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.get(mnemonic).is_some()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// =============================================================================
// Lookup Table
// =============================================================================

/// One (depth, code) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub depth: f64,
    pub code: f64,
}

/// Ordered (depth, code) pairs. Later entries win on the same depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        Self { entries }
    }

    /// Build from raw numeric rows, each of which must hold exactly two values.
    pub fn from_rows(rows: &[Vec<f64>]) -> InputResult<Self> {
        let mut entries = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match row.as_slice() {
                [depth, code] => entries.push(LookupEntry {
                    depth: *depth,
                    code: *code,
                }),
                other => {
                    return Err(InputError::LookupShape(format!(
                        "row {} has {} columns",
                        i + 1,
                        other.len()
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Output selection
// =============================================================================

/// Depth sampling resolution of an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Native half-step sampling of the source.
    Fine,
    /// Integer depths only.
    OneUnit,
    /// Every Nth fine row from the first integer depth.
    Coarse,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Fine, Resolution::OneUnit, Resolution::Coarse];
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Fine => write!(f, "fine"),
            Resolution::OneUnit => write!(f, "1-unit"),
            Resolution::Coarse => write!(f, "coarse"),
        }
    }
}

/// Output file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// LAS 2.0 file with templated header.
    Las,
    /// Tab-separated ASCII file with a column banner.
    Ascii,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Las => "las",
            FileKind::Ascii => "asc",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Las => write!(f, "LAS"),
            FileKind::Ascii => write!(f, "ASCII"),
        }
    }
}

/// One requested (resolution, file kind) combination.
///
/// Parses from strings such as `las-1`, `ascii-0.5m`, `las-coarse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputTarget {
    pub kind: FileKind,
    pub resolution: Resolution,
}

impl OutputTarget {
    pub fn new(kind: FileKind, resolution: Resolution) -> Self {
        Self { kind, resolution }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FileKind::Las => "las",
            FileKind::Ascii => "ascii",
        };
        let resolution = match self.resolution {
            Resolution::Fine => "fine",
            Resolution::OneUnit => "1",
            Resolution::Coarse => "coarse",
        };
        write!(f, "{}-{}", kind, resolution)
    }
}

impl FromStr for OutputTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let (kind, resolution) = normalized
            .split_once(|c: char| matches!(c, '-' | ' ' | '_'))
            .ok_or_else(|| format!("expected <las|ascii>-<resolution>, got '{}'", s))?;

        let kind = match kind {
            "las" => FileKind::Las,
            "ascii" | "asc" => FileKind::Ascii,
            other => return Err(format!("unknown file kind '{}'", other)),
        };
        let resolution = match resolution.trim_end_matches('m') {
            "fine" | "0.5" => Resolution::Fine,
            "1" | "1.0" | "one" => Resolution::OneUnit,
            "coarse" | "5" | "5.0" => Resolution::Coarse,
            other => return Err(format!("unknown resolution '{}'", other)),
        };
        Ok(Self { kind, resolution })
    }
}

impl TryFrom<String> for OutputTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputTarget> for String {
    fn from(target: OutputTarget) -> Self {
        target.to_string()
    }
}

// =============================================================================
// Run metadata
// =============================================================================

/// The well's true drilled extent, as declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclaredDepths {
    pub start: f64,
    pub end: f64,
}

/// Parse a user-typed depth, accepting a decimal comma (`1234,5`).
pub fn parse_depth(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// Free-text well header values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFields {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub well: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub rig: String,
    #[serde(default)]
    pub rig_type: String,
    /// `MM/DD/YYYY`; today's date when absent.
    #[serde(default)]
    pub creation_date: Option<String>,
}

impl HeaderFields {
    /// Trim every value and upper-case field, rig and rig type names.
    pub fn normalized(&self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            well: self.well.trim().to_string(),
            field: self.field.trim().to_uppercase(),
            rig: self.rig.trim().to_uppercase(),
            rig_type: self.rig_type.trim().to_uppercase(),
            creation_date: self.creation_date.as_ref().map(|d| d.trim().to_string()),
        }
    }
}
