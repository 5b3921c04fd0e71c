//! Trisect CLI - mesh refinement command-line tool.
//!
//! Usage: trisect <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `trisect --help` for available commands. Set `RUST_LOG=debug` for
//! per-generation statistics.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use trisect::algo::refine::{
    refine_with_rule, LinearTriangleSubdivision, LoopTriangleSubdivision, RefineOptions,
    RefineReport, Selection,
};
use trisect::algo::Progress;
use trisect::error::{MeshError, Result};
use trisect::io;
use trisect::mesh::{CellKind, MeshAdapter, SurfaceMesh};

#[derive(Parser)]
#[command(name = "trisect")]
#[command(author, version, about = "Crack-free mesh refinement CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Refine a mesh uniformly, or adaptively around selected cells
    Refine {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of generations
        #[arg(short, long, default_value = "1")]
        generations: usize,

        /// Comma-separated cell indices to refine (default: all cells)
        #[arg(short, long)]
        cells: Option<String>,

        /// Where new edge points are placed
        #[arg(short, long, value_enum, default_value = "linear")]
        rule: RuleArg,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum RuleArg {
    /// Exact edge midpoints
    Linear,
    /// Loop edge mask (smoother, existing points stay put)
    Loop,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input),
        Commands::Refine {
            input,
            output,
            generations,
            cells,
            rule,
            sequential,
        } => {
            let selection = match cells.as_deref() {
                Some(list) => Selection::cells(parse_cells(list)?),
                None => Selection::All,
            };
            let options = RefineOptions::new(generations)
                .with_selection(selection)
                .with_parallel(!sequential);
            cmd_refine(&input, &output, &options, rule)
        }
    }
}

/// Parse `"1,5, 9"` into cell indices.
fn parse_cells(list: &str) -> Result<Vec<usize>> {
    let cells = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| MeshError::invalid_param("cells", s, "expected a cell index"))
        })
        .collect::<Result<Vec<_>>>()?;

    if cells.is_empty() {
        return Err(MeshError::invalid_param(
            "cells",
            list,
            "expected at least one cell index",
        ));
    }
    Ok(cells)
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only move forward.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            raw_percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<()> {
    let mesh: SurfaceMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Points: {}", mesh.num_points());
    println!(
        "Cells: {} ({} triangles, {} polygons, {} lines, {} vertices)",
        mesh.num_cells(),
        mesh.count_kind(CellKind::Triangle),
        mesh.count_kind(CellKind::Polygon),
        mesh.count_kind(CellKind::Line),
        mesh.count_kind(CellKind::Vertex),
    );
    println!("Edges: {}", mesh.num_edges());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let boundary = mesh.boundary_edges().count();
    let non_manifold = mesh.non_manifold_edges().count();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary);
    }
    if non_manifold > 0 {
        println!("Non-manifold edges: {}", non_manifold);
    }
    println!(
        "Watertight: {}",
        if mesh.is_watertight() { "yes" } else { "no" }
    );

    Ok(())
}

fn cmd_refine(
    input: &PathBuf,
    output: &PathBuf,
    options: &RefineOptions,
    rule: RuleArg,
) -> Result<()> {
    let mut mesh: SurfaceMesh = io::load(input)?;

    println!("Loaded: {} points, {} cells", mesh.num_points(), mesh.num_cells());

    let mode = if options.parallel { "parallel" } else { "sequential" };
    let scope = match &options.selection {
        Selection::All => "uniform".to_string(),
        Selection::Cells(ids) => format!("adaptive, {} cells", ids.len()),
    };
    println!(
        "Refining ({} generations, {}, {:?} rule, {})...",
        options.generations, scope, rule, mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let report = match rule {
        RuleArg::Linear => refine_with_rule(&mut mesh, options, LinearTriangleSubdivision, &progress)?,
        RuleArg::Loop => refine_with_rule(&mut mesh, options, LoopTriangleSubdivision, &progress)?,
    };
    let elapsed = start.elapsed();

    print_report(&report);
    info!("refined {} in {:.2?}", input.display(), elapsed);

    println!("Result: {} points, {} cells", mesh.num_points(), mesh.num_cells());
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn print_report(report: &RefineReport) {
    for (i, g) in report.generations.iter().enumerate() {
        println!(
            "  generation {}: +{} points, {} subdivided, {} transitioned, {} carried, {} skipped",
            i + 1,
            g.points_added,
            g.cells_subdivided,
            g.cells_transitioned,
            g.cells_carried,
            g.cells_skipped
        );
    }
}
