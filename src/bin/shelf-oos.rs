use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use shelf_oos::{evaluate, io, EvalConfig, OosDetector, RowGapConfig};

#[derive(Parser)]
#[command(name = "shelf-oos")]
#[command(about = "Infer out-of-stock shelf gaps from product detections and evaluate them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute out-of-stock regions (row gaps) from a detections JSON.
    Gaps(GapsArgs),

    /// Evaluate predicted regions against ground truth with bootstrap CIs.
    Eval(EvalArgs),
}

#[derive(Debug, Args)]
struct GapsArgs {
    /// Detections JSON: {image: [[x1,y1,x2,y2], ...], ...}.
    #[arg(long)]
    detections_json: PathBuf,

    /// Where to write the out-of-stock regions JSON.
    #[arg(long)]
    out_json: PathBuf,

    /// JSON file with row/gap parameters; flags below take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vertical tolerance for row grouping (pixels).
    #[arg(long)]
    row_tol_px: Option<f64>,

    /// Gap must be >= gap_factor * median box width of its row.
    #[arg(long)]
    gap_factor: Option<f64>,

    /// Absolute minimum gap in pixels.
    #[arg(long)]
    min_abs_gap: Option<f64>,
}

#[derive(Debug, Args)]
struct EvalArgs {
    /// Predicted regions JSON.
    #[arg(long)]
    pred_json: PathBuf,

    /// Ground-truth regions JSON (same format).
    #[arg(long)]
    gt_json: PathBuf,

    /// Add every image of this box map to the ground truth as an empty entry
    /// if it is missing there.
    #[arg(long)]
    images_from: Option<PathBuf>,

    /// JSON file with evaluation parameters; flags below take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum IoU of a true positive.
    #[arg(long)]
    iou_thr: Option<f64>,

    /// Bootstrap iterations.
    #[arg(long)]
    bootstrap: Option<usize>,

    /// Bootstrap seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate bootstrap rounds in parallel (same numbers as sequential).
    #[arg(long)]
    parallel: bool,

    /// Also write the report as JSON to this path.
    #[arg(long)]
    out_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gaps(args) => run_gaps(args),
        Commands::Eval(args) => run_eval(args),
    }
}

fn run_gaps(args: GapsArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RowGapConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RowGapConfig::default(),
    };

    if let Some(v) = args.row_tol_px {
        config.row_tol_px = v;
    }
    if let Some(v) = args.gap_factor {
        config.gap_factor = v;
    }
    if let Some(v) = args.min_abs_gap {
        config.min_abs_gap = v;
    }
    config.validate()?;

    let detections = io::load_box_map(&args.detections_json)
        .with_context(|| format!("failed to read detections {}", args.detections_json.display()))?;

    let oos = OosDetector::new(config).detect(&detections);

    io::save_box_map(&args.out_json, &oos)
        .with_context(|| format!("failed to write {}", args.out_json.display()))?;

    tracing::info!(images = oos.len(), path = %args.out_json.display(), "out-of-stock regions written");

    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EvalConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EvalConfig::default(),
    };

    if let Some(v) = args.iou_thr {
        config.iou_thr = v;
    }
    if let Some(v) = args.bootstrap {
        config.iterations = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    config.parallel |= args.parallel;
    config.validate()?;

    let pred = io::load_box_map(&args.pred_json)
        .with_context(|| format!("failed to read predictions {}", args.pred_json.display()))?;
    let mut gt = io::load_box_map(&args.gt_json)
        .with_context(|| format!("failed to read ground truth {}", args.gt_json.display()))?;

    if let Some(path) = &args.images_from {
        let images = io::load_box_map(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let added = io::ensure_images(&mut gt, images.keys().map(String::as_str));
        tracing::info!(added, "completed ground truth image keys");
    }

    let report = evaluate(&pred, &gt, &config);
    println!("{}", report);

    if let Some(path) = &args.out_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}
