//! GCD Benchmark Analysis Tool
//!
//! Loads a directory of benchmark CSV files, joins the parallel runs against
//! the sequential baseline and prints the performance summary table.
//!
//! # Usage
//!
//! ```bash
//! # Analyse ./Benchmarks with the default sweep
//! cargo run --release --bin gcd-analysis
//!
//! # Another directory, figures for two views, summary written to a file
//! cargo run --release --bin gcd-analysis -- --benchmarks results/ \
//!     --plots figures/ --view speedup-by-dataset --view runtime-by-dataset \
//!     --report summary.md
//!
//! # Generate a sample config, then run from it
//! cargo run --release --bin gcd-analysis -- --generate-config analysis.toml
//! cargo run --release --bin gcd-analysis -- --config analysis.toml
//! ```
//!
//! Logging follows `RUST_LOG`; `--verbose` lowers the default level to debug.

use chrono::Local;
use clap::{Parser, ValueEnum};
use gcd_bench_analysis::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gcd-analysis")]
#[command(about = "Speedup, efficiency and summary analysis of GCD benchmark CSVs", long_about = None)]
struct Cli {
    /// Benchmarks directory (overrides the config file)
    #[arg(short, long)]
    benchmarks: Option<PathBuf>,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a sample configuration to this path and exit
    #[arg(long, value_name = "FILE")]
    generate_config: Option<PathBuf>,

    /// Render figures as SVG into this directory
    #[arg(short, long, value_name = "DIR")]
    plots: Option<PathBuf>,

    /// Plot view to render (repeatable; default all)
    #[arg(long = "view", value_name = "NAME")]
    views: Vec<PlotView>,

    /// Also write the summary table to this file
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Benchmark family summarised in the table
    #[arg(long, value_enum, default_value_t = FamilyArg::Parallel)]
    family: FamilyArg,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FamilyArg {
    Sequential,
    Parallel,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Sequential => Family::Sequential,
            FamilyArg::Parallel => Family::Parallel,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Some(path) = &cli.generate_config {
        generate_sample_config(path);
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("❌ Analysis failed: {e}");
        std::process::exit(1);
    }
}

/// Write the default configuration for editing.
fn generate_sample_config(path: &Path) {
    let config = AnalysisConfig::default();
    let result = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => config.save_json(path),
        _ => config.save_toml(path),
    };
    match result {
        Ok(()) => {
            println!("✅ Generated sample config: {}", path.display());
            println!("\nEdit the following fields before running:");
            println!("  - benchmarks_dir: Directory holding the benchmark CSV files");
            println!("  - parameters: Dataset bounds, core counts, strategies, chunk sizes");
            println!("  - views: Fixed filters for each plot view");
        }
        Err(e) => {
            eprintln!("Error generating config: {e}");
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = AnalysisConfig::from_file(path)?;
            println!("✅ Loaded configuration: {}", path.display());
            config
        }
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &cli.benchmarks {
        config.benchmarks_dir = dir.clone();
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 GCD Benchmark Analysis Tool                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = load_config(cli)?;
    let pipeline = Pipeline::from_config(config)?;
    println!(
        "📂 Benchmarks: {}",
        pipeline.config().benchmarks_dir.display()
    );

    let output = pipeline.run()?;
    println!(
        "   {} sequential / {} parallel runs from {} files",
        output.loaded.sequential.len(),
        output.loaded.parallel.len(),
        output.loaded.files.len()
    );
    for path in &output.loaded.skipped {
        println!("   ⚠️  Skipped {}", path.display());
    }
    println!(
        "   {} configurations processed, {} excluded",
        output.processed().len(),
        output.report.excluded.len()
    );
    println!();

    let family = Family::from(cli.family);
    let table = output.summary_table_for(family);
    println!("Performance summary ({family} runs):");
    println!();
    println!("{table}");

    print_best_chunks(&output);

    if let Some(path) = &cli.report {
        write_report(path, family, &table)?;
        println!("✅ Report written: {}", path.display());
    }

    if let Some(dir) = &cli.plots {
        let views = if cli.views.is_empty() {
            PlotView::all().to_vec()
        } else {
            cli.views.clone()
        };
        let written = output.render_plots(dir, &views)?;
        println!("✅ {} figures written to {}", written.len(), dir.display());
    }

    println!();
    print!("{}", output.validation);
    Ok(())
}

/// Best chunk size per core count on the largest dataset.
fn print_best_chunks(output: &AnalysisOutput) {
    let config = output.config();
    let Some(upper) = config.parameters.largest_bound() else {
        return;
    };
    let strategy = &config.views.dataset_view_strategy;
    let rows = output.select(
        &Selection::for_variant(&config.baseline_gcd_version)
            .upper(upper)
            .scheduling_strategy(strategy.as_str()),
    );
    let best = best_chunk_sizes(&rows, Metric::Speedup, Objective::Max);
    if best.is_empty() {
        return;
    }

    println!(
        "Best chunk size per core count ({}, {strategy}):",
        config.parameters.dataset_label(upper)
    );
    for b in best {
        println!(
            "   {:>3} cores: chunk {:>4}  speedup {:.3}",
            b.core_count, b.chunk_size, b.value
        );
    }
    println!();
}

fn write_report(path: &Path, family: Family, table: &SummaryTable) -> Result<()> {
    let text = format!(
        "# GCD benchmark summary ({family} runs)\n\nGenerated {}\n\n{table}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(path, text).map_err(|e| AnalysisError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
