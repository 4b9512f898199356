//! Formatter: turn a curve matrix into output text lines.
//!
//! Precision and width are resolved once per column when the
//! [`Formatter`] is built, not per cell.

pub mod layout;
pub mod precision;

pub use layout::Layout;
pub use precision::{decimals_for, format_value};

use crate::models::CurveMatrix;

/// Rendering rule of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFormat {
    pub decimals: usize,
}

/// Formats rows of a matrix with a fixed curve list and layout.
#[derive(Debug, Clone)]
pub struct Formatter {
    layout: Layout,
    columns: Vec<ColumnFormat>,
}

impl Formatter {
    pub fn new(curves: &[String], layout: Layout) -> Self {
        let columns = curves
            .iter()
            .map(|name| ColumnFormat {
                decimals: decimals_for(name),
            })
            .collect();
        Self { layout, columns }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// One row, without line terminator.
    pub fn format_row(&self, row: &[f64]) -> String {
        let values: Vec<String> = row
            .iter()
            .zip(&self.columns)
            .map(|(&v, col)| format_value(v, col.decimals))
            .collect();
        self.layout.join(&values)
    }

    /// One line per row, each terminated by `\n`.
    pub fn format_lines(&self, matrix: &CurveMatrix) -> Vec<String> {
        matrix
            .rows()
            .map(|row| {
                let mut line = self.format_row(row);
                line.push('\n');
                line
            })
            .collect()
    }
}
