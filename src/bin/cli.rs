//! dwellmap CLI - Debug tool for session clustering and trails
//!
//! Usage:
//!   dwellmap-cli <session.csv> [--config <cfg.json>] [--mode heatmap|path]
//!                [--delimiter <c>] [--output <out.json>]
//!
//! Loads a session log, runs culling, density clustering and trail
//! construction, and prints a summary. The full render output can be
//! written as JSON for inspection.

use clap::{Parser, ValueEnum};
use dwellmap::geometry::compute_center;
use dwellmap::{
    BoundingVolume, PipelineOutput, Point3, Result, VisualizationMode, VisualizerConfig,
    read_records_from_path, run_pipeline,
};
use log::error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dwellmap-cli")]
#[command(about = "Debug tool for gaze density clustering and trails", long_about = None)]
struct Cli {
    /// Session log (delimited text with a header row)
    input: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the visualization mode
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Override the item delimiter
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Write the pipeline output as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print per-point results
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Heatmap,
    Path,
}

impl From<ModeArg> for VisualizationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Heatmap => VisualizationMode::Heatmap,
            ModeArg::Path => VisualizationMode::Path,
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => VisualizerConfig::from_json_file(path)?,
        None => VisualizerConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(delimiter) = cli.delimiter {
        config.reader.delimiter = delimiter;
    }
    // Only the field the mode reads has to be present
    config.reader.required = vec![config.point_source()];

    let records = read_records_from_path(&cli.input, &config.reader)?;
    let output = run_pipeline(&records, &config)?;

    print_summary(&output, cli.verbose);

    if let Some(path) = &cli.output {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &output)?;
        writer.flush()?;
        println!("\nWrote {}", path.display());
    }

    Ok(())
}

fn print_summary(output: &PipelineOutput, verbose: bool) {
    println!("\n{}", "=".repeat(60));
    println!("Mode: {:?}", output.mode);
    println!("{}", "=".repeat(60));
    println!(
        "Records: {} loaded, {} after culling",
        output.input_count, output.culled_count
    );

    let positions: Vec<Point3> = output.points.iter().map(|p| p.position).collect();
    if let Some(extent) = BoundingVolume::from_points(&positions) {
        let c = compute_center(&positions);
        println!(
            "Extent: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3}), centroid ({:.3}, {:.3}, {:.3})",
            extent.min.x, extent.min.y, extent.min.z, extent.max.x, extent.max.y, extent.max.z, c.x,
            c.y, c.z
        );
    }

    if let Some(stats) = &output.cluster_stats {
        println!(
            "Clusters: {} clustered, {} isolated (max {} neighbors)",
            stats.clustered, stats.isolated, stats.global_max_neighbor_count
        );
    }

    if let Some(trail) = &output.trail {
        println!(
            "Trail: {} vertices, {}/{} segments visible, {} runs, {:.2}m drawn",
            trail.trail.len(),
            trail.trail.visible_segment_count(),
            trail.trail.segment_visible.len(),
            trail.trail.runs().len(),
            trail.trail.visible_length()
        );
    }

    if verbose {
        println!();
        for (i, p) in output.points.iter().enumerate() {
            println!(
                "  {:>6}  ({:>9.4}, {:>9.4}, {:>9.4})  rgba({:.2}, {:.2}, {:.2}, {:.2})",
                i,
                p.position.x,
                p.position.y,
                p.position.z,
                p.color.r,
                p.color.g,
                p.color.b,
                p.color.a
            );
        }
    }
}
