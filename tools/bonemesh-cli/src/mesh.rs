//! `bonemesh build`

use anyhow::{Context, Result, bail};
use bonemesh_core::export::face_kinds;
use bonemesh_core::{BuildOptions, BuildResult, FileSink, RigScene, TracingReporter, create_mesh};
use std::path::{Path, PathBuf};

/// Command line overrides applied on top of the options file
#[derive(Debug, Default)]
pub struct Overrides {
    pub segments: Option<u32>,
    pub rings: Option<u32>,
    pub no_vertex_groups: bool,
}

/// Load options from `config` (or defaults) and apply `overrides`
///
/// Out-of-range values are an error, not clamped.
pub fn load_options(config: Option<&Path>, overrides: &Overrides) -> Result<BuildOptions> {
    let mut options = match config {
        Some(path) => BuildOptions::load(path)
            .with_context(|| format!("Failed to load build options: {:?}", path))?,
        None => BuildOptions::default(),
    };

    if let Some(segments) = overrides.segments {
        options.sphere.segments = segments;
    }
    if let Some(rings) = overrides.rings {
        options.sphere.rings = rings;
    }
    if overrides.no_vertex_groups {
        options.vertex_groups = false;
    }

    options.validate().context("Invalid build options")?;
    Ok(options)
}

/// Build the active armature in `scene_path` and write it to `output`
pub fn build(
    scene_path: &Path,
    output: Option<PathBuf>,
    active: Option<&str>,
    options: &BuildOptions,
) -> Result<()> {
    let mut scene = RigScene::load(scene_path)?;
    if let Some(name) = active {
        scene.set_active(name)?;
    }

    let output = output.unwrap_or_else(|| {
        scene_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    tracing::info!(
        "Building {:?} -> {:?} (segments {}, rings {})",
        scene_path,
        output,
        options.sphere.segments,
        options.sphere.rings
    );

    let mut sink = FileSink::new(output);
    match create_mesh(scene.active_object_mut(), options, &mut sink, TracingReporter) {
        BuildResult::Success(mesh) => {
            let (triangles, quads) = face_kinds(&mesh.faces);
            tracing::info!(
                "'{}': {} vertices, {} triangles, {} quads, {} weight groups",
                mesh.name,
                mesh.vertices.len(),
                triangles,
                quads,
                mesh.weight_groups.len()
            );
            Ok(())
        }
        BuildResult::PartialFailure(mesh, e) => {
            bail!(
                "Build incomplete, partial mesh '{}' written with {} vertices: {}",
                mesh.name,
                mesh.vertices.len(),
                e
            )
        }
        BuildResult::Failure(e) => Err(e).context("Build failed"),
    }
}
