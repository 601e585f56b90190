//! Mesh sinks and file export
//!
//! Geometry is written as Wavefront OBJ. Weight groups, the armature binding
//! and the world transform go to a JSON sidecar, since OBJ has no place for
//! them.

use glam::Mat4;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::SinkError;
use crate::host::MeshSink;
use crate::types::{ArmatureMesh, ArmatureModifier, Face, WeightGroup};

/// Write `mesh` as a Wavefront OBJ object
///
/// Faces are written as-is (triangles and quads) with 1-based indices.
pub fn write_obj<W: Write>(mesh: &ArmatureMesh, mut w: W) -> std::io::Result<()> {
    writeln!(w, "# bonemesh")?;
    writeln!(w, "o {}", mesh.name)?;
    for v in &mesh.vertices {
        writeln!(w, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for face in &mesh.faces {
        write!(w, "f")?;
        for index in face.indices() {
            write!(w, " {}", index + 1)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// JSON sidecar describing how the mesh binds to its armature
#[derive(Debug, Serialize)]
pub struct WeightsDocument<'a> {
    pub name: &'a str,
    pub vertex_count: usize,
    pub face_count: usize,
    pub world_matrix: Mat4,
    pub modifier: &'a ArmatureModifier,
    pub weight_groups: &'a [WeightGroup],
}

impl<'a> WeightsDocument<'a> {
    pub fn new(mesh: &'a ArmatureMesh) -> Self {
        Self {
            name: &mesh.name,
            vertex_count: mesh.vertices.len(),
            face_count: mesh.faces.len(),
            world_matrix: mesh.world_matrix,
            modifier: &mesh.modifier,
            weight_groups: &mesh.weight_groups,
        }
    }
}

/// Write the weight groups and binding of `mesh` as pretty JSON
pub fn write_weights_json<W: Write>(mesh: &ArmatureMesh, mut w: W) -> Result<(), SinkError> {
    serde_json::to_writer_pretty(&mut w, &WeightsDocument::new(mesh))?;
    writeln!(w)?;
    Ok(())
}

/// File stem for `mesh_name` that stays inside the output directory
///
/// Path separators and drive colons become `_`. Names made only of dots are
/// rejected.
pub fn file_stem(mesh_name: &str) -> Result<String, SinkError> {
    let stem: String = mesh_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    if stem.chars().all(|c| c == '.') {
        return Err(SinkError::Rejected(format!(
            "'{}' is not a usable file name",
            mesh_name
        )));
    }
    Ok(stem)
}

/// Writes committed meshes to `<dir>/<name>.obj` and `<dir>/<name>.weights.json`
///
/// Both files are staged under `.tmp` names and renamed into place together,
/// so a failed commit leaves neither behind.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn obj_path(&self, mesh_name: &str) -> Result<PathBuf, SinkError> {
        Ok(self.dir.join(format!("{}.obj", file_stem(mesh_name)?)))
    }

    pub fn weights_path(&self, mesh_name: &str) -> Result<PathBuf, SinkError> {
        Ok(self.dir.join(format!("{}.weights.json", file_stem(mesh_name)?)))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn write_file<F>(path: &Path, write: F) -> Result<(), SinkError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), SinkError>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn discard(paths: &[&Path]) {
    for path in paths {
        // Missing files are expected here
        let _ = std::fs::remove_file(path);
    }
}

impl MeshSink for FileSink {
    fn commit(&mut self, mesh: ArmatureMesh) -> Result<(), SinkError> {
        let obj_path = self.obj_path(&mesh.name)?;
        let weights_path = self.weights_path(&mesh.name)?;
        std::fs::create_dir_all(&self.dir)?;

        let obj_staged = staging_path(&obj_path);
        let weights_staged = staging_path(&weights_path);

        let staged = write_file(&obj_staged, |w| Ok(write_obj(&mesh, w)?))
            .and_then(|()| write_file(&weights_staged, |w| write_weights_json(&mesh, w)));
        if let Err(e) = staged {
            discard(&[&obj_staged, &weights_staged]);
            return Err(e);
        }

        if let Err(e) = std::fs::rename(&weights_staged, &weights_path) {
            discard(&[&obj_staged, &weights_staged]);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&obj_staged, &obj_path) {
            discard(&[&obj_staged, &weights_path]);
            return Err(e.into());
        }

        info!("Wrote {:?} and {:?}", obj_path, weights_path);
        self.written.push(obj_path);
        self.written.push(weights_path);
        Ok(())
    }
}

/// Keeps committed meshes in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub meshes: Vec<ArmatureMesh>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently committed mesh
    pub fn last(&self) -> Option<&ArmatureMesh> {
        self.meshes.last()
    }
}

impl MeshSink for MemorySink {
    fn commit(&mut self, mesh: ArmatureMesh) -> Result<(), SinkError> {
        self.meshes.push(mesh);
        Ok(())
    }
}

/// Count of triangle and quad faces
pub fn face_kinds(faces: &[Face]) -> (usize, usize) {
    faces.iter().fold((0, 0), |(tris, quads), f| match f {
        Face::Triangle(_) => (tris + 1, quads),
        Face::Quad(_) => (tris, quads + 1),
    })
}
