//! Transformation module.
//!
//! This module turns source matrices into output files:
//! - Derive: unit scale, total gas snap and methane ratios
//! - Lookup: lithology overlay
//! - Resample: 1-unit and coarse subsets
//! - Boundary: edge-row masking against declared depths
//! - Pipeline: the whole run

pub mod boundary;
pub mod derive;
pub mod lookup;
pub mod pipeline;
pub mod resample;

pub use boundary::{correct_boundaries, BoundaryFix};
pub use derive::{derive_curves, gas_ratio, round_half_up, DerivationPlan};
pub use lookup::{apply_lookup, OverlayStats};
pub use pipeline::*;
pub use resample::{coarse_subset, one_unit_subset, stride};
