//! Boundary corrector for rows outside the well's true drilled extent.
//!
//! Source files are often exported over a wider range than was drilled. An
//! edge row beyond the declared extent keeps its identifying columns and
//! loses everything else.

use crate::models::{CurveMatrix, DeclaredDepths, NULL_VALUE};

/// Columns kept on a masked edge row: depth plus two identifying curves.
pub const PRESERVED_COLUMNS: usize = 3;

/// Which edge rows were masked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryFix {
    pub first_row: bool,
    pub last_row: bool,
}

fn mask_row(matrix: &mut CurveMatrix, row: usize) {
    for value in matrix.row_mut(row).iter_mut().skip(PRESERVED_COLUMNS) {
        *value = NULL_VALUE;
    }
}

/// Null out the first/last row when it lies outside `declared`.
///
/// No-op on an empty matrix or when no declared depths were supplied.
pub fn correct_boundaries(matrix: &mut CurveMatrix, declared: Option<DeclaredDepths>) -> BoundaryFix {
    let mut fix = BoundaryFix::default();
    let Some(declared) = declared else {
        return fix;
    };
    if matrix.is_empty() {
        return fix;
    }

    let last = matrix.n_rows() - 1;
    if matrix.depth(last) > declared.end {
        mask_row(matrix, last);
        fix.last_row = true;
    }
    if matrix.depth(0) < declared.start {
        mask_row(matrix, 0);
        fix.first_row = true;
    }
    fix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CurveMatrix {
        let curves: Vec<String> = ["DEPT", "DVER", "BDIA", "ROPA", "GASX"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        CurveMatrix::from_rows(
            curves,
            vec![
                vec![99.0, 98.0, 8.5, 20.0, 0.1],
                vec![100.0, 99.0, 8.5, 21.0, 0.2],
                vec![101.0, 100.0, 8.5, 22.0, 0.3],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_last_row_beyond_td() {
        let mut m = matrix();
        let fix = correct_boundaries(&mut m, Some(DeclaredDepths { start: 99.0, end: 100.0 }));
        assert!(fix.last_row);
        assert!(!fix.first_row);
        assert_eq!(m.row(2), &[101.0, 100.0, 8.5, NULL_VALUE, NULL_VALUE]);
        assert_eq!(m.row(1), &[100.0, 99.0, 8.5, 21.0, 0.2]);
    }

    #[test]
    fn test_first_row_above_start() {
        let mut m = matrix();
        let fix = correct_boundaries(&mut m, Some(DeclaredDepths { start: 99.5, end: 200.0 }));
        assert!(fix.first_row);
        assert!(!fix.last_row);
        assert_eq!(m.row(0), &[99.0, 98.0, 8.5, NULL_VALUE, NULL_VALUE]);
    }

    #[test]
    fn test_no_declared_depths() {
        let mut m = matrix();
        let before = m.clone();
        assert_eq!(correct_boundaries(&mut m, None), BoundaryFix::default());
        assert_eq!(m, before);
    }

    #[test]
    fn test_empty_matrix() {
        let mut m = CurveMatrix::empty(vec!["DEPT".into()]);
        let fix = correct_boundaries(&mut m, Some(DeclaredDepths { start: 0.0, end: 1.0 }));
        assert_eq!(fix, BoundaryFix::default());
    }

    #[test]
    fn test_narrow_matrix_keeps_all_columns() {
        let mut m = CurveMatrix::from_rows(vec!["DEPT".into(), "DVER".into()], vec![vec![5.0, 4.0]])
            .unwrap();
        let fix = correct_boundaries(&mut m, Some(DeclaredDepths { start: 0.0, end: 1.0 }));
        assert!(fix.last_row);
        assert_eq!(m.row(0), &[5.0, 4.0]);
    }
}
