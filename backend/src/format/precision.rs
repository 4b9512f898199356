//! Per-curve decimal precision.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::{NULL_TEXT, NULL_VALUE};

/// Decimals used for any curve not listed below.
pub const DEFAULT_DECIMALS: usize = 2;

/// Mnemonic groups and their decimals.
pub const PRECISION_GROUPS: &[(usize, &[&str])] = &[
    (5, &["DXC"]),
    (3, &["GASX", "MDIA", "MDOA", "ECDT", "BDTI", "BDDI", "BRVC", "LITH"]),
    (
        2,
        &[
            "C1C2", "C1C3", "C1C4", "C1C5", "DEPT", "DEPTH", "DVER", "ROPA", "TQA", "TQX", "TVA",
            "MFIA", "TCTI", "BDIA",
        ],
    ),
    (1, &["HKLA", "HKLX", "WOBA", "SPPA", "MTIA", "MTOA"]),
    (
        0,
        &["RPMA", "RPMB", "HSX", "MTHA", "ETHA", "PRPA", "IBTA", "NBTA", "IPNA", "NPNA"],
    ),
];

static PRECISION_TABLE: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PRECISION_GROUPS
        .iter()
        .flat_map(|&(decimals, names)| names.iter().map(move |&n| (n, decimals)))
        .collect()
});

/// Decimals for a curve mnemonic (case-insensitive).
pub fn decimals_for(mnemonic: &str) -> usize {
    PRECISION_TABLE
        .get(mnemonic.trim().to_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_DECIMALS)
}

/// True for values that must print as the null sentinel.
pub fn is_missing(value: f64) -> bool {
    value == NULL_VALUE || !value.is_finite()
}

/// Render one value with fixed decimals, or the null text.
pub fn format_value(value: f64, decimals: usize) -> String {
    if is_missing(value) {
        NULL_TEXT.to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}
