//! Mudlog CLI - Convert mud-log curve dumps to LAS and ASCII files
//!
//! # Main Commands
//!
//! ```bash
//! mudlog convert well.txt --targets las-1,ascii-5 --las-dir out/las --ascii-dir out/asc
//! mudlog inspect well.txt          # Show detected encoding, delimiter and curves
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! mudlog header --step 0.5         # Print the rendered LAS header
//! mudlog precision                 # Show the per-curve decimals table
//! ```

use clap::{Args, Parser, Subcommand};
use mudlog::config::parse_declared_depths;
use mudlog::format::precision::{DEFAULT_DECIMALS, PRECISION_GROUPS};
use mudlog::header::render_las_header;
use mudlog::transform::DerivationPlan;
use mudlog::{
    parse_matrix_file, progress, run, CurveIndex, CurveMatrix, HeaderFields, OutputTarget,
    ProgressEvent, RunConfig, RunRequest, SourceMatrices,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mudlog")]
#[command(about = "Convert mud-log curve dumps to LAS and ASCII files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full conversion: dump → derived resolutions → LAS / ASCII files
    Convert(ConvertArgs),

    /// Show how a curve dump is read and which derivations apply
    Inspect {
        /// Input curve dump
        input: PathBuf,
    },

    /// Print the LAS header for a step
    Header {
        /// Depth step written on the STEP line
        #[arg(long, default_value = "1.0")]
        step: f64,

        #[command(flatten)]
        fields: HeaderArgs,
    },

    /// Show the per-curve decimals table
    Precision,
}

#[derive(Args)]
struct ConvertArgs {
    /// Fine-step curve dump
    input: Option<PathBuf>,

    /// Explicit 1-unit curve dump (instead of resampling)
    #[arg(long)]
    one_unit: Option<PathBuf>,

    /// Explicit coarse curve dump (instead of resampling)
    #[arg(long)]
    coarse: Option<PathBuf>,

    /// Files to produce, e.g. las-0.5,las-1,las-5,ascii-0.5,ascii-1,ascii-5
    #[arg(short, long, value_delimiter = ',')]
    targets: Vec<OutputTarget>,

    #[command(flatten)]
    fields: HeaderArgs,

    /// Actual start depth of the well
    #[arg(long)]
    start_depth: Option<String>,

    /// Actual total depth of the well
    #[arg(long)]
    total_depth: Option<String>,

    /// Two-column (depth, code) lithology table
    #[arg(long)]
    lookup: Option<PathBuf>,

    /// Directory for LAS files
    #[arg(long, env = "MUDLOG_LAS_DIR")]
    las_dir: Option<PathBuf>,

    /// Directory for ASCII files
    #[arg(long, env = "MUDLOG_ASCII_DIR")]
    ascii_dir: Option<PathBuf>,

    /// Fine depth step
    #[arg(long)]
    fine_step: Option<f64>,

    /// Coarse depth step
    #[arg(long)]
    coarse_step: Option<f64>,

    /// JSON run configuration, overridden by the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print progress as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HeaderArgs {
    /// Company name
    #[arg(long)]
    company: Option<String>,

    /// Well name
    #[arg(long)]
    well: Option<String>,

    /// Field name
    #[arg(long)]
    field: Option<String>,

    /// Rig name
    #[arg(long)]
    rig: Option<String>,

    /// Rig type
    #[arg(long)]
    rig_type: Option<String>,

    /// Creation date (MM/DD/YYYY, default: today)
    #[arg(long)]
    date: Option<String>,
}

impl HeaderArgs {
    fn apply(self, fields: &mut HeaderFields) {
        if let Some(v) = self.company {
            fields.company = v;
        }
        if let Some(v) = self.well {
            fields.well = v;
        }
        if let Some(v) = self.field {
            fields.field = v;
        }
        if let Some(v) = self.rig {
            fields.rig = v;
        }
        if let Some(v) = self.rig_type {
            fields.rig_type = v;
        }
        if self.date.is_some() {
            fields.creation_date = self.date;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => cmd_convert(args).await,
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Header { step, fields } => cmd_header(step, fields),
        Commands::Precision => cmd_precision(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn read_matrix(path: Option<&Path>) -> Result<Option<CurveMatrix>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    eprintln!("📄 Reading: {}", path.display());
    let parsed = parse_matrix_file(path)?;
    eprintln!(
        "   Encoding: {}, delimiter: '{}', {} curves, {} rows",
        parsed.encoding,
        parsed.delimiter,
        parsed.matrix.n_cols(),
        parsed.matrix.n_rows()
    );
    Ok(Some(parsed.matrix))
}

async fn cmd_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };

    if !args.targets.is_empty() {
        config.targets = args.targets;
    }
    args.fields.apply(&mut config.header);
    if let Some(depths) =
        parse_declared_depths(args.start_depth.as_deref(), args.total_depth.as_deref())?
    {
        config.declared_depths = Some(depths);
    }
    if args.lookup.is_some() {
        config.lookup_path = args.lookup;
    }
    if args.las_dir.is_some() {
        config.las_dir = args.las_dir;
    }
    if args.ascii_dir.is_some() {
        config.ascii_dir = args.ascii_dir;
    }
    if let Some(step) = args.fine_step {
        config.fine_step = step;
    }
    if let Some(step) = args.coarse_step {
        config.coarse_step = step;
    }

    let sources = SourceMatrices {
        fine: read_matrix(args.input.as_deref())?,
        one_unit: read_matrix(args.one_unit.as_deref())?,
        coarse: read_matrix(args.coarse.as_deref())?,
    };

    let (progress, mut rx) = progress::channel();
    let handle = tokio::spawn(run(RunRequest::new(sources, config), progress));

    while let Some(event) = rx.recv().await {
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }
        match event {
            ProgressEvent::Log(entry) => eprintln!("{}", entry.render()),
            ProgressEvent::Completed(summary) => {
                eprintln!("\n✨ Done! {} file(s) produced", summary.files_produced);
            }
            ProgressEvent::Failed { .. } => {}
        }
    }

    let summary = handle.await??;
    if !summary.failed.is_empty() {
        return Err(format!("could not write {}", summary.failed.join(", ")).into());
    }
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Inspecting: {}", input.display());
    let parsed = parse_matrix_file(input)?;
    let matrix = &parsed.matrix;

    println!("Encoding: {}", parsed.encoding);
    println!("Delimiter: '{}'", parsed.delimiter);
    println!("Curves ({}): {}", matrix.n_cols(), matrix.curves().join(", "));
    println!("Rows: {}", matrix.n_rows());
    if let (Some(first), Some(last)) = (matrix.first_depth(), matrix.last_depth()) {
        println!("Depth range: {} - {}", first, last);
    }

    let index = CurveIndex::from_curves(matrix.curves());
    let steps = DerivationPlan::for_index(&index).describe();
    if steps.is_empty() {
        println!("Derivations: none");
    } else {
        println!("Derivations:");
        for step in steps {
            println!("  - {}", step);
        }
    }
    println!(
        "Lithology overlay: {}",
        if index.contains("LITH") { "available" } else { "no LITH curve" }
    );
    Ok(())
}

fn cmd_header(step: f64, args: HeaderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut fields = HeaderFields::default();
    args.apply(&mut fields);
    print!("{}", render_las_header(&fields.normalized(), None, None, step));
    Ok(())
}

fn cmd_precision() -> Result<(), Box<dyn std::error::Error>> {
    for (decimals, names) in PRECISION_GROUPS {
        println!("{} decimals: {}", decimals, names.join(", "));
    }
    println!("{} decimals: any other curve", DEFAULT_DECIMALS);
    Ok(())
}
