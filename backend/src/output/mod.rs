//! Output file naming and persistence.
//!
//! Every produced file is written on its own: a failure is reported and the
//! remaining files are still attempted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WriteError, WriteResult};
use crate::models::{FileKind, OutputTarget};
use crate::progress::ProgressSender;

/// File name prefix shared by every output.
pub const FILE_PREFIX: &str = "MUD_LOG_";

/// One rendered output file, not yet on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub target: OutputTarget,
    pub file_name: String,
    pub contents: String,
}

/// Step as it appears in file names: `0.5m`, `1m`, `5m`.
pub fn step_label(step: f64) -> String {
    format!("{}m", step)
}

/// `MUD_LOG_<label>.<extension>`
pub fn file_name(kind: FileKind, step: f64) -> String {
    format!("{}{}.{}", FILE_PREFIX, step_label(step), kind.extension())
}

/// Target directory per file kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDirs {
    pub las: Option<PathBuf>,
    pub ascii: Option<PathBuf>,
}

impl OutputDirs {
    pub fn dir_for(&self, kind: FileKind) -> Option<&Path> {
        match kind {
            FileKind::Las => self.las.as_deref(),
            FileKind::Ascii => self.ascii.as_deref(),
        }
    }
}

/// Paths written and files that could not be written.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, WriteError)>,
}

/// Write one file into `dir`, creating the directory if needed.
pub fn write_file(dir: &Path, file: &OutputFile) -> WriteResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDirectory {
        path: dir.display().to_string(),
        source,
    })?;

    let path = dir.join(&file.file_name);
    fs::write(&path, &file.contents).map_err(|source| WriteError::WriteFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

/// Write every file to the directory of its kind.
pub fn write_outputs(files: &[OutputFile], dirs: &OutputDirs, progress: &ProgressSender) -> WriteReport {
    let mut report = WriteReport::default();

    for file in files {
        let Some(dir) = dirs.dir_for(file.target.kind) else {
            progress.error(format!("{}: no {} directory given, skipped", file.file_name, file.target.kind));
            continue;
        };

        match write_file(dir, file) {
            Ok(path) => {
                progress.success(format!("Wrote {}", path.display()));
                report.written.push(path);
            }
            Err(e) => {
                progress.error(format!("{}: {}", file.file_name, e));
                report.failed.push((file.file_name.clone(), e));
            }
        }
    }

    report
}
