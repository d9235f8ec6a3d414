//! casemask CLI - layout-aware redaction and opinion splitting

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use casemask::{DetectionManifest, RedactionOptions, RedactionPipeline};

#[derive(Parser)]
#[command(name = "casemask")]
#[command(version)]
#[command(about = "Redact scanned legal documents and split them per opinion", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact a document and extract per-opinion files
    Run {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Detection manifest JSON
        #[arg(value_name = "DETECTIONS")]
        detections: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        output: PathBuf,

        /// Override the manifest's first printed page number
        #[arg(long)]
        first_page: Option<usize>,

        /// Override the detection raster resolution
        #[arg(long)]
        dpi: Option<u32>,

        /// Extract opinions one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Options JSON file; flags above still win
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,
    },

    /// Plan redactions without touching the document
    Plan {
        /// Detection manifest JSON
        #[arg(value_name = "DETECTIONS")]
        detections: PathBuf,

        /// Override the manifest's first printed page number
        #[arg(long)]
        first_page: Option<usize>,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show detection manifest statistics
    Info {
        /// Detection manifest JSON
        #[arg(value_name = "DETECTIONS")]
        detections: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = dispatch(cli) {
        eprintln!("{} {err}", "error:".red().bold());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn dispatch(cli: Cli) -> casemask::Result<()> {
    match cli.command {
        Commands::Run {
            input,
            detections,
            output,
            first_page,
            dpi,
            sequential,
            options,
        } => run(input, detections, output, first_page, dpi, sequential, options),
        Commands::Plan {
            detections,
            first_page,
            json,
        } => plan(detections, first_page, json),
        Commands::Info { detections } => info(detections),
    }
}

fn load_options(path: Option<&PathBuf>) -> casemask::Result<RedactionOptions> {
    match path {
        Some(path) => {
            let data = fs::read_to_string(path)?;
            let options = serde_json::from_str(&data)
                .map_err(|e| casemask::Error::InvalidManifest(format!("options file: {e}")))?;
            Ok(options)
        }
        None => Ok(RedactionOptions::default()),
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn run(
    input: PathBuf,
    detections: PathBuf,
    output: PathBuf,
    first_page: Option<usize>,
    dpi: Option<u32>,
    sequential: bool,
    options_path: Option<PathBuf>,
) -> casemask::Result<()> {
    let mut manifest = DetectionManifest::load(&detections)?;
    if let Some(first_page) = first_page {
        manifest.first_page = first_page;
    }

    let mut options = load_options(options_path.as_ref())?;
    if let Some(dpi) = dpi {
        options = options.with_dpi(dpi);
    }
    if sequential {
        options = options.sequential();
    }

    let pb = spinner(&format!("redacting {}", input.display()));
    let mut pipeline = RedactionPipeline::new(options);
    let result = pipeline.run(&input, &manifest, &output)?;
    pb.finish_and_clear();

    println!(
        "{} {}",
        "redacted:".green().bold(),
        result.redacted_path.display()
    );
    println!(
        "{} {} instructions, {} opinions",
        "planned:".green().bold(),
        result.plan.instructions.len(),
        result.plan.spans.len()
    );
    for (span, path) in result.plan.spans.iter().zip(&result.opinion_paths) {
        println!(
            "  {} pages {}-{} -> {}",
            span.display_name().cyan(),
            span.start.page_index + 1,
            span.end.page_index + 1,
            path.display()
        );
    }
    Ok(())
}

fn plan(detections: PathBuf, first_page: Option<usize>, json: bool) -> casemask::Result<()> {
    let mut manifest = DetectionManifest::load(&detections)?;
    if let Some(first_page) = first_page {
        manifest.first_page = first_page;
    }

    let plan = casemask::plan_opinions(&manifest, RedactionOptions::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} {} instructions, {} opinions",
        "plan:".green().bold(),
        plan.instructions.len(),
        plan.spans.len()
    );
    for span in &plan.spans {
        println!(
            "  {} pages {}-{} ({})",
            span.display_name().cyan(),
            span.start.page_index + 1,
            span.end.page_index + 1,
            span.reason
        );
    }
    Ok(())
}

fn info(detections: PathBuf) -> casemask::Result<()> {
    let manifest = DetectionManifest::load(&detections)?;

    let mut by_label: BTreeMap<String, usize> = BTreeMap::new();
    for obj in &manifest.objects {
        *by_label.entry(format!("{:?}", obj.label)).or_default() += 1;
    }
    let last_page = manifest
        .objects
        .iter()
        .map(|o| o.page_index)
        .max()
        .map(|p| p + 1)
        .unwrap_or(0);

    println!("{} {}", "manifest:".green().bold(), detections.display());
    println!("  objects:     {}", manifest.objects.len());
    println!("  pages seen:  {last_page}");
    println!("  dimensions:  {} pages", manifest.dimensioned_pages());
    println!("  columns:     {} pages", manifest.page_columns.len());
    println!("  first page:  {}", manifest.first_page);
    for (label, count) in &by_label {
        println!("    {label:<12} {count}");
    }
    Ok(())
}
