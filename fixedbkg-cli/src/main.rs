use anyhow::{Context, Result, bail};
use clap::Parser;
use fixedbkg_rs::{FixedCountsConfig, FixedCountsReport, run_fixed_counts};
use skyreg::{RegionFormat, read_region_file, write_region_file};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

mod input;

/// fixedbkg - fixed-counts background regions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "fixedbkg")]
#[command(about = "Background annuli enclosing a fixed number of counts around point sources", long_about = None)]
struct Cli {
    /// Source list: rows of `x y inner_radius [theta phi]` in pixels
    #[arg(long, value_name = "FILE")]
    positions: PathBuf,

    /// Event list: rows of `x y` in pixels
    #[arg(long, value_name = "FILE")]
    events: PathBuf,

    /// Extra exclusion regions (comma-separated region files, or "none")
    #[arg(long, value_name = "LIST")]
    exclude: Option<String>,

    /// Field-of-view region; annuli cut by it are clipped
    #[arg(long, value_name = "FILE")]
    fov: Option<PathBuf>,

    /// Background counts each annulus should enclose
    #[arg(long, default_value = "50")]
    min_counts: usize,

    /// Maximum outer radius in pixels
    #[arg(long, value_name = "PIXELS")]
    max_radius: Option<f64>,

    /// Grid cell size for area integration, in pixels
    #[arg(long, default_value = "1.0")]
    bin_size: f64,

    /// Output prefix; source i is written to PREFIX_<i>_bkg.reg
    #[arg(long, value_name = "PREFIX")]
    outroot: String,

    /// Region file format
    #[arg(long, value_enum, default_value = "ascii")]
    format: FormatArg,

    /// Save a JSON run report
    #[arg(long, value_name = "REPORT_PATH")]
    report: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long)]
    clobber: bool,

    /// Number of worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    /// Shape-list text
    Ascii,
    /// JSON entry list
    Json,
}

impl From<FormatArg> for RegionFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Ascii => RegionFormat::Ascii,
            FormatArg::Json => RegionFormat::Json,
        }
    }
}

/// Output path of source `index`
fn output_path(outroot: &str, index: usize, format: RegionFormat) -> PathBuf {
    PathBuf::from(format!("{}_{}_bkg.{}", outroot, index, format.extension()))
}

/// Refuse to overwrite anything before the run starts
fn check_outputs(paths: &[PathBuf], clobber: bool) -> Result<()> {
    if clobber {
        return Ok(());
    }
    if let Some(existing) = paths.iter().find(|p| p.exists()) {
        bail!(
            "Output file {} exists; use --clobber to overwrite",
            existing.display()
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the thread pool")?;
        debug!("Using {} worker threads", threads);
    }

    let start_time = Instant::now();

    let sources = input::read_positions(&args.positions)?;
    let events = input::read_events(&args.events)?;
    info!(
        "Loaded {} sources and {} events",
        sources.len(),
        events.len()
    );

    let extras = match input::exclusion_paths(args.exclude.as_deref()) {
        Some(paths) => Some(input::read_regions(&paths)?),
        None => None,
    };
    let fov = args
        .fov
        .as_deref()
        .map(|path| {
            read_region_file(path)
                .with_context(|| format!("Failed to read field of view {}", path.display()))
        })
        .transpose()?;

    let format: RegionFormat = args.format.into();
    let outputs: Vec<PathBuf> = sources
        .iter()
        .map(|s| output_path(&args.outroot, s.index, format))
        .collect();
    check_outputs(&outputs, args.clobber)?;
    if let Some(report) = &args.report {
        check_outputs(std::slice::from_ref(report), args.clobber)?;
    }

    let config = FixedCountsConfig {
        min_counts: args.min_counts,
        max_radius: args.max_radius,
        area_bin_size: args.bin_size,
        ..Default::default()
    };

    let result = run_fixed_counts(&sources, &events, extras.as_deref(), fov.as_ref(), &config)?;

    if let Some(parent) = outputs.first().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut report = FixedCountsReport::new(&result, &config);
    for ((bkg, path), row) in result
        .sources
        .iter()
        .zip(&outputs)
        .zip(report.sources.iter_mut())
    {
        write_region_file(path, &bkg.region, format)
            .with_context(|| format!("Failed to write region for source {}", bkg.index()))?;
        row.region_file = Some(path.display().to_string());
        debug!("Wrote {}", path.display());
    }

    if let Some(report_path) = &args.report {
        report
            .write_json(report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        info!("Report written to {}", report_path.display());
    }

    println!("Processed {} source(s)", result.sources.len());
    println!(
        "   Background events: {} of {}",
        result.n_background, result.n_events
    );
    if report.n_flagged > 0 {
        println!("   Flagged: {} (see warnings above)", report.n_flagged);
    }
    if args.verbose {
        for row in &report.sources {
            let area = row
                .area
                .map(|a| format!("  area = {:.1}", a))
                .unwrap_or_default();
            println!(
                "   {:>4}  r = {:.2} .. {:.2}  counts = {:<6}{}{}",
                row.index,
                row.inner_radius,
                row.outer_radius,
                row.enclosed_counts,
                area,
                if row.clipped { "  (clipped)" } else { "" }
            );
        }
    }
    println!(
        "   Total time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
