//! lnormal - local-space custom normal tool
//!
//! Assigns per-face normals to OBJ meshes (stored in a JSON sidecar),
//! mirrors and relaxes them, and bakes them to a normal map PNG.

use anyhow::Result;
use clap::{Parser, Subcommand};
use normal_bake::EdgeMode;
use normal_core::{Axis, MirrorAxis, DEFAULT_MIRROR_THRESHOLD, GeometryPort};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use normal_cli::{commands, Config, Workspace};

#[derive(Parser)]
#[command(name = "lnormal")]
#[command(about = "Local-space custom normal editor and normal map baker")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the store lives
#[derive(clap::Args)]
struct StoreArgs {
    /// Slots file (default: <mesh>.normals.json)
    #[arg(long)]
    slots: Option<PathBuf>,

    /// Object id (default: mesh file stem)
    #[arg(long)]
    object: Option<String>,

    /// Config file (default: ./lnormal.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake stored normals to a PNG normal map
    Bake {
        /// Input OBJ mesh
        mesh: PathBuf,

        /// Output PNG (default: <mesh>_normal.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolution (512, 1024, 2048, 4096)
        #[arg(long)]
        resolution: Option<u32>,

        /// Edge padding in pixels (0-64)
        #[arg(long)]
        padding: Option<u32>,

        /// Invert red channel (X)
        #[arg(long)]
        flip_red: bool,

        /// Invert green channel (Y)
        #[arg(long)]
        flip_green: bool,

        /// Invert blue channel (Z)
        #[arg(long)]
        flip_blue: bool,

        /// Enable smoothing
        #[arg(long)]
        smooth: bool,

        /// Smoothing radius (1-20)
        #[arg(long)]
        radius: Option<u32>,

        /// Smoothing iterations (1-10)
        #[arg(long)]
        iterations: Option<u32>,

        /// Smoothing edge mode (wrap, clamp)
        #[arg(long)]
        edge_mode: Option<EdgeMode>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Set a direction on faces from yaw/pitch angles
    Apply {
        /// Input OBJ mesh
        mesh: PathBuf,

        /// Face indices, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        faces: Vec<usize>,

        /// Yaw in degrees (0 faces -Y)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        yaw: f32,

        /// Pitch in degrees (90 points at +Z)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f32,

        /// Mirror axis (none, x, y, z)
        #[arg(long)]
        mirror: Option<MirrorAxis>,

        /// Disable angle snapping
        #[arg(long)]
        no_snap: bool,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the mirror map of faces
    Mirror {
        /// Input OBJ mesh
        mesh: PathBuf,

        /// Face indices, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        faces: Vec<usize>,

        /// Mirror axis (x, y, z)
        #[arg(long, default_value = "x")]
        axis: MirrorAxis,

        /// Match distance
        #[arg(long, default_value_t = DEFAULT_MIRROR_THRESHOLD)]
        threshold: f32,
    },

    /// Relax stored normals towards their neighbours
    Relax {
        /// Input OBJ mesh
        mesh: PathBuf,

        /// Blend factor (0-1)
        #[arg(long)]
        factor: Option<f32>,

        /// Iterations (1-20)
        #[arg(long)]
        iterations: Option<u32>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Clear stored normals
    Clear {
        /// Input OBJ mesh
        mesh: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Validate a config file
    Check {
        /// Path to lnormal.toml
        #[arg(default_value = "lnormal.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Bake {
            mesh,
            output,
            resolution,
            padding,
            flip_red,
            flip_green,
            flip_blue,
            smooth,
            radius,
            iterations,
            edge_mode,
            store,
        } => {
            let mut settings = Config::discover(store.config.as_deref())?.bake;
            if let Some(resolution) = resolution {
                settings.resolution = resolution;
            }
            if let Some(padding) = padding {
                settings.padding = padding;
            }
            settings.flip_red |= flip_red;
            settings.flip_green |= flip_green;
            settings.flip_blue |= flip_blue;
            if smooth || radius.is_some() || iterations.is_some() || edge_mode.is_some() {
                let smoothing = settings.smoothing.get_or_insert_with(Default::default);
                if let Some(radius) = radius {
                    smoothing.radius = radius;
                }
                if let Some(iterations) = iterations {
                    smoothing.iterations = iterations;
                }
                if let Some(edge_mode) = edge_mode {
                    smoothing.edge_mode = edge_mode;
                }
            }

            let ws = Workspace::open(&mesh, store.slots.as_deref(), store.object.as_deref())?;
            let output = output.unwrap_or_else(|| commands::default_output_path(&mesh));
            tracing::info!("Baking {:?} -> {:?}", mesh, output);
            commands::bake(&ws, &settings, &output)?;
            tracing::info!("Done!");
        }

        Commands::Apply {
            mesh,
            faces,
            yaw,
            pitch,
            mirror,
            no_snap,
            store,
        } => {
            let mut settings = Config::discover(store.config.as_deref())?.edit;
            if let Some(mirror) = mirror {
                settings.mirror_axis = mirror;
            }
            if no_snap {
                settings.use_snap = false;
            }

            let mut ws = Workspace::open(&mesh, store.slots.as_deref(), store.object.as_deref())?;
            let outcome = commands::apply(&mut ws, &faces, yaw, pitch, &settings)?;
            tracing::info!(
                "Updated {} polygons ({} mirrored), saved to {:?}",
                outcome.source_polygons.len(),
                outcome.mirrored_polygons.len(),
                ws.slots_path()
            );
        }

        Commands::Mirror {
            mesh,
            faces,
            axis,
            threshold,
        } => {
            let Some(axis) = axis.axis() else {
                anyhow::bail!("Mirror needs an axis (x, y or z)");
            };
            let mut ws = Workspace::open(&mesh, None, None)?;
            let map = commands::mirror(&mut ws, &faces, axis, threshold)?;
            print_mirror_map(&ws, &map, axis);
        }

        Commands::Relax {
            mesh,
            factor,
            iterations,
            store,
        } => {
            let mut settings = Config::discover(store.config.as_deref())?.edit;
            if let Some(factor) = factor {
                settings.relax_factor = factor;
            }
            if let Some(iterations) = iterations {
                settings.relax_iterations = iterations;
            }
            settings.validate()?;

            let mut ws = Workspace::open(&mesh, store.slots.as_deref(), store.object.as_deref())?;
            commands::relax(&mut ws, settings.relax())?;
            for (polygon, direction) in commands::stored_normals(&ws) {
                println!("{polygon}: {:?}", direction.rounded());
            }
        }

        Commands::Clear { mesh, store } => {
            let mut ws = Workspace::open(&mesh, store.slots.as_deref(), store.object.as_deref())?;
            commands::clear(&mut ws)?;
        }

        Commands::Check { config } => {
            tracing::info!("Checking config {:?}", config);
            let config = Config::load(&config)?;
            config.validate()?;
            tracing::info!("Config is valid!");
        }
    }

    Ok(())
}

fn print_mirror_map(ws: &Workspace, map: &normal_core::MirrorMap, axis: Axis) {
    if map.is_empty() {
        println!("No mirrored corners found across {axis}");
        return;
    }
    for (source, target) in map.iter() {
        let a = ws.mesh.corner_position(source);
        let b = ws.mesh.corner_position(target);
        println!(
            "corner {source} ({:.3}, {:.3}, {:.3}) -> corner {target} ({:.3}, {:.3}, {:.3})",
            a.x, a.y, a.z, b.x, b.y, b.z
        );
    }
}
