//! Run configuration.
//!
//! A [`RunConfig`] can be loaded from a JSON file and is then overridden by
//! command-line flags. Output directories also fall back to environment
//! variables (a `.env` file is honoured by the CLI).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{parse_depth, DeclaredDepths, HeaderFields, OutputTarget, Resolution};
use crate::transform::resample;

/// Environment variable holding the default LAS output directory.
pub const LAS_DIR_ENV: &str = "MUDLOG_LAS_DIR";

/// Environment variable holding the default ASCII output directory.
pub const ASCII_DIR_ENV: &str = "MUDLOG_ASCII_DIR";

pub const DEFAULT_FINE_STEP: f64 = 0.5;
pub const DEFAULT_COARSE_STEP: f64 = 5.0;
pub const ONE_UNIT_STEP: f64 = 1.0;

/// Everything a conversion run needs besides the source matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Requested (file kind, resolution) combinations.
    pub targets: Vec<OutputTarget>,
    /// Well header values.
    pub header: HeaderFields,
    /// True drilled extent, used to mask edge rows of the 1-unit LAS file.
    pub declared_depths: Option<DeclaredDepths>,
    /// Optional (depth, code) lithology table.
    pub lookup_path: Option<PathBuf>,
    pub las_dir: Option<PathBuf>,
    pub ascii_dir: Option<PathBuf>,
    pub fine_step: f64,
    pub coarse_step: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            header: HeaderFields::default(),
            declared_depths: None,
            lookup_path: None,
            las_dir: None,
            ascii_dir: None,
            fine_step: DEFAULT_FINE_STEP,
            coarse_step: DEFAULT_COARSE_STEP,
        }
    }
}

impl RunConfig {
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Nominal depth step of a resolution.
    pub fn step(&self, resolution: Resolution) -> f64 {
        match resolution {
            Resolution::Fine => self.fine_step,
            Resolution::OneUnit => ONE_UNIT_STEP,
            Resolution::Coarse => self.coarse_step,
        }
    }

    /// Requested targets, sorted and without duplicates.
    pub fn requested_targets(&self) -> Vec<OutputTarget> {
        let mut targets = self.targets.clone();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Fine rows per coarse row. Only needed when coarse data is resampled.
    pub fn coarse_stride(&self) -> ConfigResult<usize> {
        resample::stride(self.fine_step, self.coarse_step)
    }

    /// Check that steps are positive and declared depths are ordered.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, step) in [("fineStep", self.fine_step), ("coarseStep", self.coarse_step)] {
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: format!("step {} must be a positive number", step),
                });
            }
        }

        if let Some(depths) = self.declared_depths {
            if !depths.start.is_finite() || !depths.end.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "declaredDepths".into(),
                    message: "depths must be finite numbers".into(),
                });
            }
            if depths.start > depths.end {
                return Err(ConfigError::InvalidValue {
                    field: "declaredDepths".into(),
                    message: format!(
                        "start depth {} is below total depth {}",
                        depths.start, depths.end
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Build declared depths from user text. Both values or neither.
pub fn parse_declared_depths(
    start: Option<&str>,
    end: Option<&str>,
) -> ConfigResult<Option<DeclaredDepths>> {
    let parse = |field: &str, raw: &str| {
        parse_depth(raw).ok_or_else(|| ConfigError::InvalidValue {
            field: field.into(),
            message: format!("'{}' is not a depth", raw),
        })
    };

    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some(DeclaredDepths {
            start: parse("startDepth", start)?,
            end: parse("totalDepth", end)?,
        })),
        (None, Some(_)) | (Some(_), None) => Err(ConfigError::InvalidValue {
            field: "declaredDepths".into(),
            message: "start and total depth must be given together".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileKind;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.fine_step, 0.5);
        assert_eq!(config.coarse_step, 5.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.coarse_stride().unwrap(), 10);
        assert_eq!(config.step(Resolution::OneUnit), 1.0);
    }

    #[test]
    fn test_from_json() {
        let config = RunConfig::from_json(
            r#"{
                "targets": ["las-1", "ascii-0.5m", "las-1"],
                "header": { "company": "ACME", "rigType": "jack-up" },
                "declaredDepths": { "start": 100.0, "end": 2500.0 },
                "coarseStep": 10.0
            }"#,
        )
        .unwrap();

        assert_eq!(config.header.rig_type, "jack-up");
        assert_eq!(config.fine_step, 0.5);
        assert_eq!(config.coarse_stride().unwrap(), 20);
        assert_eq!(
            config.requested_targets(),
            vec![
                OutputTarget::new(FileKind::Las, Resolution::OneUnit),
                OutputTarget::new(FileKind::Ascii, Resolution::Fine),
            ]
        );
    }

    #[test]
    fn test_bad_target_is_json_error() {
        let err = RunConfig::from_json(r#"{ "targets": ["pdf-1"] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_invalid_steps() {
        let config = RunConfig {
            coarse_step: 1.75,
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.coarse_stride().is_err());

        let config = RunConfig {
            fine_step: 0.0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_depths() {
        let config = RunConfig {
            declared_depths: Some(DeclaredDepths { start: 10.0, end: 5.0 }),
            ..RunConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("declaredDepths"));
    }

    #[test]
    fn test_parse_declared_depths() {
        let depths = parse_declared_depths(Some("120,5"), Some("2500")).unwrap();
        assert_eq!(depths, Some(DeclaredDepths { start: 120.5, end: 2500.0 }));
        assert_eq!(parse_declared_depths(None, None).unwrap(), None);
        assert!(parse_declared_depths(Some("12"), None).is_err());
        assert!(parse_declared_depths(Some("abc"), Some("1")).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{ "lasDir": "/tmp/las" }"#).unwrap();
        let config = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(config.las_dir, Some(PathBuf::from("/tmp/las")));
    }
}
