//! bonemesh - Armature envelope mesh tool
//!
//! Reads a JSON rig scene, builds the envelope mesh for the active armature
//! and writes it as OBJ plus a weight group sidecar.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod mesh;
mod scene;

#[derive(Parser)]
#[command(name = "bonemesh")]
#[command(about = "Armature envelope mesh tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the envelope mesh for the active armature
    Build {
        /// Path to the scene JSON file
        scene: PathBuf,

        /// Output directory (default: next to the scene file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build options TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Joint sphere segments (3-64)
        #[arg(long)]
        segments: Option<u32>,

        /// Joint sphere rings (2-64)
        #[arg(long)]
        rings: Option<u32>,

        /// Skip weight group generation
        #[arg(long)]
        no_vertex_groups: bool,

        /// Object to build from (overrides the scene's active object)
        #[arg(long)]
        active: Option<String>,
    },

    /// List objects and bones in a scene
    Inspect {
        /// Path to the scene JSON file
        scene: PathBuf,
    },

    /// Validate a scene without building
    Check {
        /// Path to the scene JSON file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            scene,
            output,
            config,
            segments,
            rings,
            no_vertex_groups,
            active,
        } => {
            let overrides = mesh::Overrides {
                segments,
                rings,
                no_vertex_groups,
            };
            let options = mesh::load_options(config.as_deref(), &overrides)?;
            mesh::build(&scene, output, active.as_deref(), &options)?;
            tracing::info!("Build complete!");
        }

        Commands::Inspect { scene } => {
            scene::inspect(&scene)?;
        }

        Commands::Check { scene } => {
            tracing::info!("Checking scene {:?}", scene);
            scene::check(&scene)?;
            tracing::info!("Scene is valid!");
        }
    }

    Ok(())
}
