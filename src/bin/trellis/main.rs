//! Trellis CLI - build a seed solid and run topology modifiers on it.
//!
//! Usage: trellis <COMMAND> [OPTIONS] [SEED]
//!
//! Run `trellis --help` for available commands. Set `RUST_LOG=debug` to see
//! per-step counts from the library.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use trellis::algo::conway;
use trellis::algo::dual::dual;
use trellis::algo::solidify::{solidify, SolidifyOptions};
use trellis::algo::subdivide::{subdivide_with_progress, SubdivideOptions};
use trellis::algo::weld::{weld, WeldOptions, WeldTolerance};
use trellis::algo::Progress;
use trellis::mesh::{Mesh, NormalWeighting};
use trellis::seed::{Cube, Dodecahedron, Generator, Grid, Icosahedron, Octahedron, Tetrahedron};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about = "Polygon mesh topology CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which seed solid to start from.
#[derive(Args)]
struct SeedArgs {
    /// Seed solid
    #[arg(value_enum, default_value = "cube")]
    seed: Seed,

    /// Cells per side when the seed is a grid
    #[arg(long, default_value = "4")]
    grid_size: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display seed information
    Info {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Subdivide a seed
    Subdivide {
        #[command(flatten)]
        seed: SeedArgs,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Split faces without moving any vertex
        #[arg(long)]
        flat: bool,

        /// Let open boundary vertices move
        #[arg(long)]
        move_boundary: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Give an open surface thickness
    Solidify {
        #[command(flatten)]
        seed: SeedArgs,

        /// Shell thickness (negative grows outward)
        #[arg(short, long, default_value = "0.1", allow_hyphen_values = true)]
        thickness: f64,

        /// Normal weighting for the offset direction
        #[arg(short, long, value_enum, default_value = "area")]
        weighting: Weighting,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Build the dual of a closed seed
    Dual {
        #[command(flatten)]
        seed: SeedArgs,
    },

    /// Apply a Conway operator to a closed seed
    #[command(visible_alias = "truncate")]
    Conway {
        #[command(flatten)]
        seed: SeedArgs,

        /// Operator
        #[arg(short, long, value_enum, default_value = "truncate")]
        op: ConwayOp,

        /// Truncation ratio, in (0, 0.5)
        #[arg(short, long, default_value = "0.3333333333333333")]
        ratio: f64,
    },

    /// Weld coincident vertices
    Weld {
        #[command(flatten)]
        seed: SeedArgs,

        /// Round positions to this many decimals before comparing
        #[arg(short, long, conflicts_with = "distance")]
        decimals: Option<u32>,

        /// Merge vertices closer than this distance
        #[arg(long)]
        distance: Option<f64>,

        /// Explode every face into its own vertices first
        #[arg(long)]
        explode: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Seed {
    /// Unit cube
    Cube,
    /// Regular tetrahedron
    Tetrahedron,
    /// Regular octahedron
    Octahedron,
    /// Regular dodecahedron
    Dodecahedron,
    /// Regular icosahedron
    Icosahedron,
    /// Open square grid in the z = 0 plane
    Grid,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Weighting {
    /// Area-weighted face normals
    Area,
    /// Corner-angle-weighted face normals
    Angle,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ConwayOp {
    /// Rectification
    Ambo,
    /// Corner truncation
    Truncate,
    /// Gyro
    Gyro,
    /// Snub
    Snub,
}

impl SeedArgs {
    fn produce(&self) -> Mesh {
        match self.seed {
            Seed::Cube => Cube::default().produce(),
            Seed::Tetrahedron => Tetrahedron.produce(),
            Seed::Octahedron => Octahedron.produce(),
            Seed::Dodecahedron => Dodecahedron.produce(),
            Seed::Icosahedron => Icosahedron.produce(),
            Seed::Grid => Grid::new(self.grid_size, self.grid_size).produce(),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { seed } => {
            let mesh = seed.produce();
            print_summary(&mesh);
        }

        Commands::Subdivide {
            seed,
            iterations,
            flat,
            move_boundary,
            sequential,
        } => {
            cmd_subdivide(seed.produce(), iterations, flat, move_boundary, sequential);
        }

        Commands::Solidify {
            seed,
            thickness,
            weighting,
            sequential,
        } => {
            cmd_solidify(seed.produce(), thickness, weighting, sequential)?;
        }

        Commands::Dual { seed } => {
            let mesh = seed.produce();
            let start = Instant::now();
            let result = dual(&mesh)?;
            println!("Dual built ({:.2?})", start.elapsed());
            print_summary(&result);
        }

        Commands::Conway { seed, op, ratio } => {
            cmd_conway(seed.produce(), op, ratio)?;
        }

        Commands::Weld {
            seed,
            decimals,
            distance,
            explode,
            sequential,
        } => {
            cmd_weld(seed.produce(), decimals, distance, explode, sequential)?;
        }
    }

    Ok(())
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

        // Monotonic: only ever move the bar forward.
        let (percent, increased) = loop {
            let old_max = max_percent.load(Ordering::Relaxed);
            let new_max = old_max.max(raw_percent);
            if new_max == old_max {
                break (old_max, false);
            }
            match max_percent.compare_exchange_weak(
                old_max,
                new_max,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break (new_max, true),
                Err(_) => continue,
            }
        };

        if !increased && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn print_summary(mesh: &Mesh) {
    let report = mesh.topology_report();

    println!("Vertices: {}", report.vertex_count);
    println!("Edges: {}", report.edge_count);
    println!("Faces: {}", report.face_count);
    println!("Euler characteristic: {}", report.euler_characteristic());
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    if report.is_closed() {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", report.boundary_edges);
    }
    if report.is_manifold() {
        println!("Manifold: yes");
    } else {
        println!(
            "Manifold: no ({} duplicate directed edges, {} edges with 3+ faces)",
            report.duplicate_directed_edges, report.non_manifold_edges
        );
    }
}

fn cmd_subdivide(mut mesh: Mesh, iterations: usize, flat: bool, move_boundary: bool, sequential: bool) {
    println!("Seed: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let options = SubdivideOptions::new(iterations)
        .with_smooth(!flat)
        .with_preserve_boundary(!move_boundary)
        .with_parallel(!sequential);

    let rule = if flat { "flat" } else { "Catmull-Clark" };
    let mode = if sequential { "sequential" } else { "parallel" };
    println!("Applying {} subdivision ({} iterations, {})...", rule, iterations, mode);

    let progress = create_progress();
    let start = Instant::now();
    subdivide_with_progress(&mut mesh, &options, &progress);
    println!("Subdivided ({:.2?})", start.elapsed());

    print_summary(&mesh);
}

fn cmd_solidify(
    mut mesh: Mesh,
    thickness: f64,
    weighting: Weighting,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let weighting = match weighting {
        Weighting::Area => NormalWeighting::Area,
        Weighting::Angle => NormalWeighting::Angle,
    };
    let options = SolidifyOptions::new(thickness)
        .with_weighting(weighting)
        .with_rim_tag("rim")
        .with_parallel(!sequential);

    let start = Instant::now();
    let rim = solidify(&mut mesh, &options)?;
    println!("Solidified: {} rim quads ({:.2?})", rim, start.elapsed());

    print_summary(&mesh);
    Ok(())
}

fn cmd_conway(mesh: Mesh, op: ConwayOp, ratio: f64) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let result = match op {
        ConwayOp::Ambo => conway::ambo(&mesh)?,
        ConwayOp::Truncate => conway::truncate(&mesh, ratio)?,
        ConwayOp::Gyro => conway::gyro(&mesh)?,
        ConwayOp::Snub => conway::snub(&mesh)?,
    };
    println!("Operator applied ({:.2?})", start.elapsed());

    print_summary(&result);
    Ok(())
}

fn cmd_weld(
    mesh: Mesh,
    decimals: Option<u32>,
    distance: Option<f64>,
    explode: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = if explode { exploded(&mesh)? } else { mesh };
    println!("Before weld: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let tolerance = match (decimals, distance) {
        (_, Some(d)) => WeldTolerance::Distance(d),
        (Some(n), None) => WeldTolerance::Decimals(n),
        (None, None) => WeldTolerance::default(),
    };
    let options = WeldOptions::new(tolerance).with_parallel(!sequential);

    let start = Instant::now();
    let report = weld(&mut mesh, &options)?;
    println!(
        "Welded: {} merged, {} removed, {} degenerate faces, {} duplicate faces ({:.2?})",
        report.merged_vertices,
        report.removed_vertices,
        report.degenerate_faces,
        report.duplicate_faces,
        start.elapsed()
    );

    print_summary(&mesh);
    Ok(())
}

/// Every face gets private copies of its corners.
fn exploded(mesh: &Mesh) -> Result<Mesh, Box<dyn std::error::Error>> {
    let mut out = Mesh::with_capacity(
        mesh.faces().iter().map(|f| f.len()).sum(),
        mesh.num_faces(),
    );
    for face in mesh.faces() {
        let corners: Vec<_> = face
            .indices()
            .iter()
            .map(|&v| out.add_vertex(*mesh.position(v)))
            .collect();
        out.add_face(corners)?;
    }
    Ok(out)
}
