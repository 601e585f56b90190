//! Build entry point
//!
//! `create_mesh` is what the host's "create mesh" command runs: it checks the
//! selection, reads bones in edit mode, assembles the envelope mesh and hands
//! whatever geometry exists to the sink.

use tracing::info;

use crate::assembler::assemble;
use crate::config::BuildOptions;
use crate::error::BuildError;
use crate::host::{ArmatureHost, InteractionMode, MeshSink, ModeGuard, ObjectKind};
use crate::report::{ReportLevel, Reporter};
use crate::result::BuildResult;
use crate::types::ArmatureMesh;

/// Reported when nothing is selected
pub const NO_SELECTION: &str = "No selection";

/// Reported when the active object is not an armature
pub const ARMATURE_EXPECTED: &str = "Armature expected";

/// Build a mesh for the active armature and commit it to `sink`
///
/// Geometry is committed on success and on partial failure. The armature's
/// interaction mode is the same on return as it was on entry.
pub fn create_mesh<H, S, R>(
    active: Option<&mut H>,
    options: &BuildOptions,
    mut sink: S,
    mut reporter: R,
) -> BuildResult
where
    H: ArmatureHost + ?Sized,
    S: MeshSink,
    R: Reporter,
{
    let Some(armature) = active else {
        reporter.report(ReportLevel::Error, NO_SELECTION);
        return BuildResult::Failure(BuildError::InvalidSelection(NO_SELECTION.to_string()));
    };

    if armature.kind() != ObjectKind::Armature {
        reporter.report(ReportLevel::Warning, ARMATURE_EXPECTED);
        return BuildResult::Failure(BuildError::InvalidSelection(
            ARMATURE_EXPECTED.to_string(),
        ));
    }

    let name = armature.name().to_string();
    let world_matrix = armature.world_matrix();
    reporter.report(ReportLevel::Info, &format!("Processing armature: {}", name));

    let guard = match ModeGuard::enter(armature, InteractionMode::Edit) {
        Ok(guard) => guard,
        Err(e) => {
            reporter.report(ReportLevel::Error, &format!("Error processing armature: {}", e));
            return BuildResult::Failure(e.into());
        }
    };

    let mut result = assemble(guard.edit_bones(), options);

    if let Some(e) = result.error() {
        reporter.report(ReportLevel::Error, &format!("Error processing armature: {}", e));
    }

    if let Err(e) = guard.restore() {
        reporter.report(ReportLevel::Error, &format!("Error processing armature: {}", e));
        result = match result {
            BuildResult::Success(parts) => BuildResult::PartialFailure(parts, e.into()),
            other => other,
        };
    }

    let result = result.map(|parts| ArmatureMesh::from_parts(&name, world_matrix, parts));

    if let Some(mesh) = result.mesh() {
        let (vertices, faces, groups) =
            (mesh.vertices.len(), mesh.faces.len(), mesh.weight_groups.len());
        if let Err(e) = sink.commit(mesh.clone()) {
            reporter.report(ReportLevel::Error, &format!("Failed to commit mesh: {}", e));
            return BuildResult::Failure(e.into());
        }
        info!(
            "Committed '{}': {} vertices, {} faces, {} weight groups",
            mesh.name, vertices, faces, groups
        );
    }

    result
}
