//! Column layouts and their width tables.

use crate::models::{FileKind, OutputTarget, Resolution};

/// Separator of the delimited layout.
pub const DELIMITER: &str = "     ";

/// Right-justification widths of the LAS fixed-width layout, by column.
pub const LAS_WIDTHS: [usize; 44] = [
    9, 11, 12, 11, 11, 11, 11, 11, 11, 13, 13, 11, 11, 13, 11, 13, 13, 12, 12, 13, 11, 11, 12, 11,
    13, 15, 11, 11, 11, 11, 11, 11, 11, 11, 11, 16, 16, 16, 16, 16, 11, 11, 11, 11,
];

/// Same as [`LAS_WIDTHS`] with a wider depth column. Includes the tab.
pub const ASCII_WIDTHS: [usize; 44] = [
    10, 11, 12, 11, 11, 11, 11, 11, 11, 13, 13, 11, 11, 13, 11, 13, 13, 12, 12, 13, 11, 11, 12,
    11, 13, 15, 11, 11, 11, 11, 11, 11, 11, 11, 11, 16, 16, 16, 16, 16, 11, 11, 11, 11,
];

/// Width of any column past the end of a width table.
pub const OVERFLOW_WIDTH: usize = 11;

/// How formatted values are joined into a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Values joined by [`DELIMITER`].
    Delimited,
    /// Each value right-justified in its [`LAS_WIDTHS`] slot, no separator.
    FixedLas,
    /// First value right-justified in its slot, then `\t` plus the value
    /// right-justified in one less than its [`ASCII_WIDTHS`] slot.
    FixedTab,
}

impl Layout {
    /// Layout used for an output file.
    ///
    /// The 1-unit LAS file is delimited; the other LAS files are fixed-width;
    /// ASCII files are always tab-prefixed fixed-width.
    pub fn for_target(target: OutputTarget) -> Self {
        match (target.kind, target.resolution) {
            (FileKind::Las, Resolution::OneUnit) => Layout::Delimited,
            (FileKind::Las, _) => Layout::FixedLas,
            (FileKind::Ascii, _) => Layout::FixedTab,
        }
    }

    /// Width slot of a column, if this layout pads.
    pub fn width(&self, column: usize) -> Option<usize> {
        let table: &[usize] = match self {
            Layout::Delimited => return None,
            Layout::FixedLas => &LAS_WIDTHS,
            Layout::FixedTab => &ASCII_WIDTHS,
        };
        Some(table.get(column).copied().unwrap_or(OVERFLOW_WIDTH))
    }

    /// Join already-formatted values into one line (no terminator).
    pub fn join(&self, values: &[String]) -> String {
        match self {
            Layout::Delimited => values.join(DELIMITER),
            Layout::FixedLas => values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:>w$}", v, w = self.width(i).unwrap_or(OVERFLOW_WIDTH)))
                .collect(),
            Layout::FixedTab => {
                let mut line = String::new();
                for (i, v) in values.iter().enumerate() {
                    let w = self.width(i).unwrap_or(OVERFLOW_WIDTH);
                    if i == 0 {
                        line.push_str(&format!("{:>w$}", v, w = w));
                    } else {
                        line.push('\t');
                        line.push_str(&format!("{:>w$}", v, w = w.saturating_sub(1)));
                    }
                }
                line
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_delimited() {
        let line = Layout::Delimited.join(&strings(&["100.00", "-999.25", "3"]));
        assert_eq!(line, "100.00     -999.25     3");
    }

    #[test]
    fn test_fixed_las() {
        let line = Layout::FixedLas.join(&strings(&["100.00", "99.50", "8.50"]));
        assert_eq!(line, "   100.00      99.50        8.50");
        assert_eq!(line.len(), 9 + 11 + 12);
    }

    #[test]
    fn test_fixed_tab() {
        let line = Layout::FixedTab.join(&strings(&["100.00", "99.50"]));
        assert_eq!(line, "    100.00\t     99.50");
    }

    #[test]
    fn test_overflow_width() {
        assert_eq!(Layout::FixedLas.width(43), Some(11));
        assert_eq!(Layout::FixedLas.width(60), Some(OVERFLOW_WIDTH));
        assert_eq!(Layout::Delimited.width(0), None);
    }

    #[test]
    fn test_layout_per_target() {
        let las1 = OutputTarget::new(FileKind::Las, Resolution::OneUnit);
        let las5 = OutputTarget::new(FileKind::Las, Resolution::Coarse);
        let asc1 = OutputTarget::new(FileKind::Ascii, Resolution::OneUnit);
        assert_eq!(Layout::for_target(las1), Layout::Delimited);
        assert_eq!(Layout::for_target(las5), Layout::FixedLas);
        assert_eq!(Layout::for_target(asc1), Layout::FixedTab);
    }
}
