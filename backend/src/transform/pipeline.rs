//! High-level conversion pipeline.
//!
//! Combines all steps for one run: source selection and resampling,
//! derivations, the lithology overlay and boundary correction on the 1-unit
//! LAS branch, formatting, headers and finally file writes.
//!
//! # Example
//!
//! ```rust,ignore
//! use mudlog::{progress, run, RunConfig, RunRequest, SourceMatrices};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (progress, mut rx) = progress::channel();
//!     let request = RunRequest::new(SourceMatrices::fine(matrix), RunConfig::default());
//!     let handle = tokio::spawn(run(request, progress));
//!     while let Some(event) = rx.recv().await {
//!         println!("{:?}", event);
//!     }
//!     handle.await??;
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::format::{Formatter, Layout};
use crate::header::{ascii_header, render_las_header};
use crate::models::{CurveIndex, CurveMatrix, FileKind, LookupTable, OutputTarget, Resolution};
use crate::output::{file_name, write_outputs, OutputDirs, OutputFile};
use crate::parser::read_lookup_table;
use crate::progress::ProgressSender;

use super::boundary::correct_boundaries;
use super::derive::derive_curves;
use super::lookup::apply_lookup;
use super::resample::{coarse_subset, one_unit_subset};

/// Source matrices of a run.
///
/// The fine matrix feeds resampling. An explicit 1-unit or coarse matrix,
/// when given, is used instead of the resampled subset.
#[derive(Debug, Clone, Default)]
pub struct SourceMatrices {
    pub fine: Option<CurveMatrix>,
    pub one_unit: Option<CurveMatrix>,
    pub coarse: Option<CurveMatrix>,
}

impl SourceMatrices {
    pub fn fine(matrix: CurveMatrix) -> Self {
        Self {
            fine: Some(matrix),
            ..Self::default()
        }
    }
}

/// Everything one run consumes.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub sources: SourceMatrices,
    pub config: RunConfig,
    /// Takes precedence over `config.lookup_path`.
    pub lookup: Option<LookupTable>,
}

impl RunRequest {
    pub fn new(sources: SourceMatrices, config: RunConfig) -> Self {
        Self {
            sources,
            config,
            lookup: None,
        }
    }

    pub fn with_lookup(mut self, lookup: LookupTable) -> Self {
        self.lookup = Some(lookup);
        self
    }
}

/// Result of a run, sent as the terminal success signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub files_produced: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

fn base_matrix(
    resolution: Resolution,
    sources: &SourceMatrices,
    config: &RunConfig,
) -> PipelineResult<CurveMatrix> {
    let explicit = match resolution {
        Resolution::Fine => &sources.fine,
        Resolution::OneUnit => &sources.one_unit,
        Resolution::Coarse => &sources.coarse,
    };
    if let Some(matrix) = explicit {
        return Ok(matrix.clone());
    }

    let fine = sources
        .fine
        .as_ref()
        .ok_or(PipelineError::MissingSource(resolution))?;
    Ok(match resolution {
        Resolution::Fine => fine.clone(),
        Resolution::OneUnit => one_unit_subset(fine),
        Resolution::Coarse => coarse_subset(fine, config.coarse_stride()?),
    })
}

fn load_lookup(request: &RunRequest, progress: &ProgressSender) -> PipelineResult<LookupTable> {
    if let Some(table) = &request.lookup {
        return Ok(table.clone());
    }
    match &request.config.lookup_path {
        Some(path) => {
            progress.info(format!("Reading lithology table {}", path.display()));
            let table = read_lookup_table(path)?;
            progress.success(format!("Read {} lithology entries", table.len()));
            Ok(table)
        }
        None => Ok(LookupTable::default()),
    }
}

/// LAS-bound 1-unit variant: lithology overlay, then edge-row masking.
fn las_one_unit_variant(
    derived: &CurveMatrix,
    lookup: &LookupTable,
    config: &RunConfig,
    progress: &ProgressSender,
) -> CurveMatrix {
    let mut matrix = derived.clone();
    let index = CurveIndex::from_curves(matrix.curves());

    match apply_lookup(&mut matrix, &index, lookup) {
        Some(stats) => {
            progress.info(format!(
                "Lithology overlay: {} rows updated",
                stats.rows_written
            ));
            if stats.unmatched_entries > 0 {
                progress.warning(format!(
                    "{} lithology entries matched no depth exactly",
                    stats.unmatched_entries
                ));
            }
        }
        None if !lookup.is_empty() => {
            progress.warning("No LITH curve; lithology table ignored");
        }
        None => {}
    }

    match config.declared_depths {
        Some(declared) => {
            let fix = correct_boundaries(&mut matrix, Some(declared));
            if fix.first_row {
                progress.info_indent("First row above the declared start depth was masked", 1);
            }
            if fix.last_row {
                progress.info_indent("Last row below the declared total depth was masked", 1);
            }
        }
        None => progress.warning("No declared depths; boundary correction skipped"),
    }
    matrix
}

/// Render header and body of one output file.
pub fn render_file(
    target: OutputTarget,
    matrix: &CurveMatrix,
    config: &RunConfig,
) -> OutputFile {
    let step = config.step(target.resolution);
    let formatter = Formatter::new(matrix.curves(), Layout::for_target(target));

    let mut body = formatter.format_lines(matrix).concat();
    if body.ends_with('\n') {
        body.pop();
    }

    let header = match target.kind {
        FileKind::Las => render_las_header(
            &config.header.normalized(),
            matrix.first_depth(),
            matrix.last_depth(),
            step,
        ),
        FileKind::Ascii => ascii_header(),
    };

    OutputFile {
        target,
        file_name: file_name(target.kind, step),
        contents: header + &body,
    }
}

/// Produce every requested file in memory.
///
/// Fatal problems (no targets, invalid steps, missing source, malformed
/// lookup table) abort the run. Missing curves only skip their step.
pub fn run_pipeline(request: &RunRequest, progress: &ProgressSender) -> PipelineResult<Vec<OutputFile>> {
    let config = &request.config;
    let targets = config.requested_targets();
    if targets.is_empty() {
        return Err(PipelineError::NoTargets);
    }
    config.validate()?;
    let lookup = load_lookup(request, progress)?;

    // Derived matrix per requested resolution
    let mut derived: BTreeMap<Resolution, CurveMatrix> = BTreeMap::new();
    for target in &targets {
        if derived.contains_key(&target.resolution) {
            continue;
        }
        progress.info(format!("Preparing {} data...", target.resolution));
        let mut matrix = base_matrix(target.resolution, &request.sources, config)?;
        let index = CurveIndex::from_curves(matrix.curves());
        derive_curves(&mut matrix, &index, progress);
        progress.success(format!("{} rows at {} resolution", matrix.n_rows(), target.resolution));
        derived.insert(target.resolution, matrix);
    }

    let mut files = Vec::with_capacity(targets.len());
    for target in targets {
        let Some(matrix) = derived.get(&target.resolution) else {
            return Err(PipelineError::MissingSource(target.resolution));
        };

        let file = if target == OutputTarget::new(FileKind::Las, Resolution::OneUnit) {
            let variant = las_one_unit_variant(matrix, &lookup, config, progress);
            render_file(target, &variant, config)
        } else {
            render_file(target, matrix, config)
        };
        progress.info_indent(format!("Formatted {}", file.file_name), 1);
        files.push(file);
    }

    Ok(files)
}

fn output_dirs(config: &RunConfig, targets: &[OutputTarget]) -> PipelineResult<OutputDirs> {
    let dirs = OutputDirs {
        las: config.las_dir.clone(),
        ascii: config.ascii_dir.clone(),
    };
    for target in targets {
        if dirs.dir_for(target.kind).is_none() {
            return Err(PipelineError::MissingDirectory(target.kind));
        }
    }
    Ok(dirs)
}

/// Produce every requested file and write it to its directory.
pub fn run_and_write(request: &RunRequest, progress: &ProgressSender) -> PipelineResult<RunSummary> {
    let dirs = output_dirs(&request.config, &request.config.requested_targets())?;
    let files = run_pipeline(request, progress)?;

    progress.info("Writing files...");
    let report = write_outputs(&files, &dirs, progress);

    Ok(RunSummary {
        files_produced: files.len(),
        written: report.written,
        failed: report.failed.into_iter().map(|(name, _)| name).collect(),
    })
}

/// Run on a blocking worker thread, ending with a terminal progress event.
pub async fn run(request: RunRequest, progress: ProgressSender) -> PipelineResult<RunSummary> {
    let worker_progress = progress.clone();
    let handle = tokio::task::spawn_blocking(move || run_and_write(&request, &worker_progress));

    let result = match handle.await {
        Ok(result) => result,
        Err(e) => Err(PipelineError::Task(e.to_string())),
    };

    match &result {
        Ok(summary) => {
            progress.success(format!(
                "Done: {} written, {} failed",
                summary.written.len(),
                summary.failed.len()
            ));
            progress.completed(summary.clone());
        }
        Err(e) => progress.failed(e.to_string()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeclaredDepths, HeaderFields, LookupEntry, NULL_VALUE};
    use crate::progress::{channel, ProgressEvent};

    fn curves(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Depths 99.5..=101.0 at half steps.
    fn fine_matrix() -> CurveMatrix {
        CurveMatrix::from_rows(
            curves(&["DEPT", "DVER", "BDIA", "GASX", "LITH"]),
            vec![
                vec![99.5, 99.4, 8.5, 0.12345, 1.0],
                vec![100.0, 99.9, 8.5, 0.2, 1.0],
                vec![100.5, 100.4, 8.5, 0.3, 1.0],
                vec![101.0, 100.9, 8.5, 0.4, 1.0],
            ],
        )
        .unwrap()
    }

    fn config(targets: &[&str]) -> RunConfig {
        RunConfig {
            targets: targets.iter().map(|t| t.parse().unwrap()).collect(),
            header: HeaderFields {
                company: "ACME".into(),
                well: "W-1".into(),
                field: "north".into(),
                rig: "rig 7".into(),
                rig_type: "land".into(),
                creation_date: Some("01/02/2025".into()),
            },
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_no_targets() {
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config(&[]));
        let err = run_pipeline(&request, &ProgressSender::silent()).unwrap_err();
        assert!(matches!(err, PipelineError::NoTargets));
    }

    #[test]
    fn test_missing_source() {
        let request = RunRequest::new(SourceMatrices::default(), config(&["las-1"]));
        let err = run_pipeline(&request, &ProgressSender::silent()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingSource(Resolution::OneUnit)));
    }

    #[test]
    fn test_las_one_unit_branch() {
        let mut config = config(&["las-1", "ascii-1"]);
        config.declared_depths = Some(DeclaredDepths { start: 100.0, end: 100.5 });
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config)
            .with_lookup(LookupTable::new(vec![LookupEntry { depth: 100.0, code: 7.0 }]));

        let files = run_pipeline(&request, &ProgressSender::silent()).unwrap();
        assert_eq!(files.len(), 2);

        let las = &files[0];
        assert_eq!(las.file_name, "MUD_LOG_1m.las");
        let data = las.contents.split("~A\n").nth(1).unwrap();
        assert_eq!(
            data,
            "100.00     99.90     8.50     0.200     7.000\n101.00     100.90     8.50     -999.25     -999.25"
        );
        assert!(las.contents.contains("NORTH"));

        let ascii = &files[1];
        assert_eq!(ascii.file_name, "MUD_LOG_1m.asc");
        assert!(ascii.contents.starts_with("Depth (m)\t"));
        assert!(ascii.contents.ends_with(&format!(
            "{:>10}\t{:>10}\t{:>11}\t{:>10}\t{:>10}",
            "101.00", "100.90", "8.50", "0.400", "1.000"
        )));
    }

    #[test]
    fn test_fine_las_is_fixed_width() {
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config(&["las-0.5"]));
        let files = run_pipeline(&request, &ProgressSender::silent()).unwrap();
        let contents = &files[0].contents;

        assert!(contents.contains("STEP                    .m                 0.5 "));
        assert!(contents.contains("99.5 "));
        let first = contents.split("~A\n").nth(1).unwrap().lines().next().unwrap();
        assert_eq!(
            first,
            format!("{:>9}{:>11}{:>12}{:>11}{:>11}", "99.50", "99.40", "8.50", "0.123", "1.000")
        );
    }

    #[test]
    fn test_explicit_coarse_source_wins() {
        let coarse = CurveMatrix::from_rows(curves(&["DEPT", "GASX"]), vec![vec![500.0, NULL_VALUE]])
            .unwrap();
        let sources = SourceMatrices {
            coarse: Some(coarse),
            ..SourceMatrices::default()
        };
        let request = RunRequest::new(sources, config(&["ascii-5"]));
        let files = run_pipeline(&request, &ProgressSender::silent()).unwrap();
        assert_eq!(files[0].file_name, "MUD_LOG_5m.asc");
        assert!(files[0].contents.ends_with(&format!("{:>10}\t{:>10}", "500.00", "-999.25")));
    }

    #[test]
    fn test_uneven_steps_only_matter_for_resampled_coarse() {
        let mut config = config(&["las-1", "ascii-0.5"]);
        config.fine_step = 0.3;
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config.clone());
        assert_eq!(run_pipeline(&request, &ProgressSender::silent()).unwrap().len(), 2);

        let coarse = CurveMatrix::from_rows(curves(&["DEPT"]), vec![vec![500.0]]).unwrap();
        config.targets = vec!["las-5".parse().unwrap()];
        let sources = SourceMatrices {
            coarse: Some(coarse),
            ..SourceMatrices::fine(fine_matrix())
        };
        let request = RunRequest::new(sources, config.clone());
        assert!(run_pipeline(&request, &ProgressSender::silent()).is_ok());

        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config);
        let err = run_pipeline(&request, &ProgressSender::silent()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_missing_directory() {
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config(&["ascii-1"]));
        let err = run_and_write(&request, &ProgressSender::silent()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDirectory(FileKind::Ascii)));
    }

    #[tokio::test]
    async fn test_run_reports_completion() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&["las-1", "las-5"]);
        config.las_dir = Some(dir.path().to_path_buf());
        let request = RunRequest::new(SourceMatrices::fine(fine_matrix()), config);

        let (progress, mut rx) = channel();
        let summary = run(request, progress).await.unwrap();

        assert_eq!(summary.files_produced, 2);
        assert_eq!(summary.written.len(), 2);
        assert!(dir.path().join("MUD_LOG_5m.las").exists());

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(ProgressEvent::Completed(_))));
    }

    #[tokio::test]
    async fn test_run_reports_failure() {
        let request = RunRequest::new(SourceMatrices::default(), config(&[]));
        let (progress, mut rx) = channel();
        assert!(run(request, progress).await.is_err());

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        match last {
            Some(ProgressEvent::Failed { message }) => assert!(message.contains("No output")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
