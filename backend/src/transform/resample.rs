//! Resampler: derive the 1-unit and coarse subsets of a fine matrix.
//!
//! Both are row selections, never interpolation, and both copy: the source
//! matrix is left untouched.

use crate::error::{ConfigError, ConfigResult};
use crate::models::CurveMatrix;

/// Depth whose fractional part is exactly zero.
fn is_whole(depth: f64) -> bool {
    depth % 1.0 == 0.0
}

/// Number of fine rows per coarse row, e.g. 5.0 / 0.5 = 10.
pub fn stride(fine_step: f64, coarse_step: f64) -> ConfigResult<usize> {
    if !(fine_step > 0.0) || !(coarse_step > 0.0) {
        return Err(ConfigError::InvalidValue {
            field: "step".into(),
            message: format!("steps must be positive (fine {}, coarse {})", fine_step, coarse_step),
        });
    }
    let ratio = coarse_step / fine_step;
    let rounded = ratio.round();
    if rounded < 1.0 || (ratio - rounded).abs() > 1e-9 {
        return Err(ConfigError::InvalidValue {
            field: "coarse_step".into(),
            message: format!(
                "coarse step {} is not a whole multiple of fine step {}",
                coarse_step, fine_step
            ),
        });
    }
    Ok(rounded as usize)
}

/// Rows whose depth is an integer, in their original order.
pub fn one_unit_subset(fine: &CurveMatrix) -> CurveMatrix {
    let rows: Vec<usize> = fine
        .depths()
        .enumerate()
        .filter(|&(_, d)| is_whole(d))
        .map(|(i, _)| i)
        .collect();
    fine.select_rows(&rows)
}

/// Every `stride`-th row, starting at the first integer-depth row (row 0 if none).
pub fn coarse_subset(fine: &CurveMatrix, stride: usize) -> CurveMatrix {
    let start = fine.depths().position(is_whole).unwrap_or(0);
    let rows: Vec<usize> = (start..fine.n_rows()).step_by(stride.max(1)).collect();
    fine.select_rows(&rows)
}
