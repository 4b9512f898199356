//! Lookup overlay: stamp lithology codes from a (depth, code) table.
//!
//! Matching uses exact floating-point equality on the depth column. Depths
//! that carry binary rounding error will not match; the overlay reports how
//! many table entries found no row so the caller can flag it.

use crate::models::{mnemonic, CurveIndex, CurveMatrix, LookupTable};

/// Outcome of one overlay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Rows overwritten (a row hit by two entries counts twice).
    pub rows_written: usize,
    /// Table entries whose depth matched no row.
    pub unmatched_entries: usize,
}

/// Overwrite the lithology column at every row whose depth equals a table depth.
///
/// Entries apply in table order, so the last entry for a depth wins. Rows are
/// never added, removed or reordered. Returns `None` when there is nothing to
/// do (no lithology curve, or an empty table).
pub fn apply_lookup(
    matrix: &mut CurveMatrix,
    index: &CurveIndex,
    table: &LookupTable,
) -> Option<OverlayStats> {
    let lith = index.get(mnemonic::LITHOLOGY)?;
    if table.is_empty() {
        return None;
    }

    let mut stats = OverlayStats::default();
    for entry in table.entries() {
        let mut matched = false;
        for r in 0..matrix.n_rows() {
            if matrix.depth(r) == entry.depth {
                matrix.set(r, lith, entry.code);
                stats.rows_written += 1;
                matched = true;
            }
        }
        if !matched {
            stats.unmatched_entries += 1;
        }
    }
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LookupEntry, NULL_VALUE};

    fn lith_matrix() -> (CurveMatrix, CurveIndex) {
        let curves: Vec<String> = ["DEPT", "GASX", "LITH"].iter().map(|s| s.to_string()).collect();
        let index = CurveIndex::from_curves(&curves);
        let m = CurveMatrix::from_rows(
            curves,
            vec![
                vec![100.0, 0.1, NULL_VALUE],
                vec![101.0, 0.2, NULL_VALUE],
                vec![102.0, 0.3, NULL_VALUE],
            ],
        )
        .unwrap();
        (m, index)
    }

    fn table(pairs: &[(f64, f64)]) -> LookupTable {
        LookupTable::new(
            pairs
                .iter()
                .map(|&(depth, code)| LookupEntry { depth, code })
                .collect(),
        )
    }

    #[test]
    fn test_codes_written_at_matching_depths() {
        let (mut m, index) = lith_matrix();
        let stats = apply_lookup(&mut m, &index, &table(&[(101.0, 4.0), (250.0, 9.0)])).unwrap();

        assert_eq!(m.column(2), vec![NULL_VALUE, 4.0, NULL_VALUE]);
        assert_eq!(stats.rows_written, 1);
        assert_eq!(stats.unmatched_entries, 1);
        assert_eq!(m.column(0), vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_last_writer_wins() {
        let (mut m, index) = lith_matrix();
        apply_lookup(&mut m, &index, &table(&[(100.0, 1.0), (100.0, 2.0)]));
        assert_eq!(m.get(0, 2), 2.0);
    }

    #[test]
    fn test_exact_equality_only() {
        let (mut m, index) = lith_matrix();
        let stats = apply_lookup(&mut m, &index, &table(&[(100.0000001, 3.0)])).unwrap();
        assert_eq!(m.get(0, 2), NULL_VALUE);
        assert_eq!(stats.unmatched_entries, 1);
    }

    #[test]
    fn test_no_lithology_curve() {
        let curves: Vec<String> = ["DEPT", "GASX"].iter().map(|s| s.to_string()).collect();
        let index = CurveIndex::from_curves(&curves);
        let mut m = CurveMatrix::from_rows(curves, vec![vec![100.0, 0.1]]).unwrap();
        let before = m.clone();

        assert!(apply_lookup(&mut m, &index, &table(&[(100.0, 3.0)])).is_none());
        assert_eq!(m, before);
    }

    #[test]
    fn test_empty_table() {
        let (mut m, index) = lith_matrix();
        assert!(apply_lookup(&mut m, &index, &LookupTable::default()).is_none());
    }
}
