//! Derivation engine: unit conversion, precision snapping and gas ratios.
//!
//! Runs in place on a [`CurveMatrix`]. Each step only happens when the curves
//! it needs are present; a missing curve skips that step and is not an error.
//! Invalid operands never produce NaN or garbage, they produce [`NULL_VALUE`].

use crate::models::{mnemonic, CurveIndex, CurveMatrix, NULL_VALUE};
use crate::progress::ProgressSender;

/// Ratio curves and their (numerator, denominator) sources, in evaluation order.
pub const RATIO_CURVES: [(&str, &str, &str); 4] = [
    (mnemonic::C1_C2, mnemonic::METHANE, mnemonic::ETHANE),
    (mnemonic::C1_C3, mnemonic::METHANE, mnemonic::PROPANE),
    (mnemonic::C1_C4, mnemonic::METHANE, mnemonic::NORMAL_BUTANE),
    (mnemonic::C1_C5, mnemonic::METHANE, mnemonic::NORMAL_PENTANE),
];

/// Cumulative revolutions are reported in thousands.
const REVS_DIVISOR: f64 = 1000.0;

/// Round to `places` decimals, ties away from zero.
///
/// Works on the shortest decimal representation of `value`, so `2.675`
/// rounds to `2.68` even though its binary value sits just below the tie.
/// NaN and infinities are returned unchanged.
pub fn round_half_up(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if frac_part.len() <= places {
        return value;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part[..places].bytes())
        .map(|b| b - b'0')
        .collect();
    let mut int_len = int_part.len();

    if frac_part.as_bytes()[places] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                int_len += 1;
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let mut text = String::with_capacity(digits.len() + 1);
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            text.push('.');
        }
        text.push(char::from(b'0' + d));
    }

    let magnitude: f64 = text.parse().unwrap_or(value.abs());
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Element-wise gas ratio. Zero, null or NaN operands yield the null sentinel.
pub fn gas_ratio(numerator: f64, denominator: f64) -> f64 {
    let invalid = |v: f64| v == 0.0 || v == NULL_VALUE || v.is_nan();
    if invalid(numerator) || invalid(denominator) {
        NULL_VALUE
    } else {
        round_half_up(numerator / denominator, 2)
    }
}

/// Column positions of one ratio derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioColumns {
    pub target_name: &'static str,
    pub target: usize,
    pub numerator: usize,
    pub denominator: usize,
}

/// Which derivations apply to a given curve set, resolved once per index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivationPlan {
    pub cumulative_revs: Option<usize>,
    pub total_gas: Option<usize>,
    pub ratios: Vec<RatioColumns>,
}

impl DerivationPlan {
    pub fn for_index(index: &CurveIndex) -> Self {
        let ratios = RATIO_CURVES
            .iter()
            .filter_map(|&(target_name, num, den)| {
                Some(RatioColumns {
                    target_name,
                    target: index.get(target_name)?,
                    numerator: index.get(num)?,
                    denominator: index.get(den)?,
                })
            })
            .collect();

        Self {
            cumulative_revs: index.get(mnemonic::CUMULATIVE_REVS),
            total_gas: index.get(mnemonic::TOTAL_GAS),
            ratios,
        }
    }

    /// Short descriptions of every step that will run.
    pub fn describe(&self) -> Vec<String> {
        let mut steps = Vec::new();
        if self.cumulative_revs.is_some() {
            steps.push(format!("{} / {}", mnemonic::CUMULATIVE_REVS, REVS_DIVISOR));
        }
        if self.total_gas.is_some() {
            steps.push(format!("{} rounded to 3 decimals", mnemonic::TOTAL_GAS));
        }
        for ratio in &self.ratios {
            steps.push(format!("{} ratio", ratio.target_name));
        }
        steps
    }
}

/// Apply every available derivation to `matrix` in place.
///
/// Order: cumulative revolutions to thousands, total gas snapped to 3
/// decimals, then the four methane ratios at 2 decimals. Returns the plan
/// that was executed.
pub fn derive_curves(
    matrix: &mut CurveMatrix,
    index: &CurveIndex,
    progress: &ProgressSender,
) -> DerivationPlan {
    if matrix.is_empty() {
        progress.warning("Data matrix is empty; skipping derivations.");
        return DerivationPlan::default();
    }

    let plan = DerivationPlan::for_index(index);

    if let Some(col) = plan.cumulative_revs {
        // Every value is scaled, the null sentinel included
        matrix.map_column(col, |v| v / REVS_DIVISOR);
        progress.info("Cumulative bit revolutions (BRVC) converted to krev (/1000).");
    }

    if let Some(col) = plan.total_gas {
        matrix.map_column(col, |v| round_half_up(v, 3));
        progress.info("Total gas (GASX) rounded to 3 decimal places.");
    }

    for ratio in &plan.ratios {
        for r in 0..matrix.n_rows() {
            let value = gas_ratio(matrix.get(r, ratio.numerator), matrix.get(r, ratio.denominator));
            matrix.set(r, ratio.target, value);
        }
        progress.info(format!(
            "{} ratio derived (2 decimal places).",
            ratio.target_name
        ));
    }

    plan
}
