//! Bone envelope mesh types
//!
//! Shared types for bone input, generated geometry and the payload handed to
//! the host mesh sink.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Weight assigned to every vertex a bone contributes (rigid binding)
pub const RIGID_WEIGHT: f32 = 1.0;

/// Name of the armature modifier the host binds to the generated mesh
pub const ARMATURE_MODIFIER_NAME: &str = "ArmatureMod";

/// One bone as read from the host skeleton in edit mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneRecord {
    pub name: String,
    pub head: Vec3,
    pub tail: Vec3,
    /// Local X axis of the bone (already includes roll)
    pub x_axis: Vec3,
    /// Local Z axis of the bone (already includes roll)
    pub z_axis: Vec3,
    /// Roll around the bone axis in radians
    #[serde(default)]
    pub roll: f32,
    /// Only deform bones get geometry
    #[serde(default = "default_deform")]
    pub deform: bool,
}

fn default_deform() -> bool {
    true
}

impl BoneRecord {
    /// Distance from head to tail
    pub fn length(&self) -> f32 {
        (self.tail - self.head).length()
    }

    /// True when every coordinate and the roll are finite numbers
    pub fn is_finite(&self) -> bool {
        self.head.is_finite()
            && self.tail.is_finite()
            && self.x_axis.is_finite()
            && self.z_axis.is_finite()
            && self.roll.is_finite()
    }
}

/// A planar polygon referencing vertices by absolute index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Triangle([u32; 3]),
    Quad([u32; 4]),
}

impl Face {
    /// Vertex indices in winding order
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Triangle(i) => i.as_slice(),
            Face::Quad(i) => i.as_slice(),
        }
    }

    /// Same face with every index shifted by `base`
    pub fn offset(self, base: u32) -> Face {
        match self {
            Face::Triangle([a, b, c]) => Face::Triangle([a + base, b + base, c + base]),
            Face::Quad([a, b, c, d]) => Face::Quad([a + base, b + base, c + base, d + base]),
        }
    }

    /// Largest referenced index
    pub fn max_index(&self) -> u32 {
        self.indices().iter().copied().max().unwrap_or(0)
    }
}

/// Trait for mesh construction - lets builders stay generic over the buffer
pub trait MeshBuilder: Default {
    /// Add a vertex, returning its index
    fn add_vertex(&mut self, position: Vec3) -> u32;

    /// Add a face using indices already returned by `add_vertex`
    fn add_face(&mut self, face: Face);

    /// Number of vertices added so far
    fn vertex_count(&self) -> usize;
}

/// Locally indexed geometry produced by a single builder call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl MeshBuilder for PartGeometry {
    fn add_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Vertices bound to one bone with a fixed weight
///
/// Membership is the contiguous range `[start, end)`, which is exactly the
/// vertices the bone contributed during assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    pub bone_name: String,
    pub start: u32,
    pub end: u32,
    pub weight: f32,
}

impl WeightGroup {
    /// Rigid group over `[start, end)`
    pub fn rigid(bone_name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            bone_name: bone_name.into(),
            start,
            end,
            weight: RIGID_WEIGHT,
        }
    }

    /// `(vertex index, weight)` pairs in ascending index order
    pub fn members(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        (self.start..self.end).map(move |index| (index, self.weight))
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, index: u32) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Modifier binding the mesh to its armature through vertex groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmatureModifier {
    pub name: String,
    /// Armature object driving the deformation
    pub object: String,
    pub use_bone_envelopes: bool,
    pub use_vertex_groups: bool,
}

impl ArmatureModifier {
    /// Vertex-group-only binding to `armature`
    pub fn for_armature(armature: &str) -> Self {
        Self {
            name: ARMATURE_MODIFIER_NAME.to_string(),
            object: armature.to_string(),
            use_bone_envelopes: false,
            use_vertex_groups: true,
        }
    }
}

/// Raw buffers accumulated by the assembler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshParts {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub weight_groups: Vec<WeightGroup>,
}

impl MeshParts {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Finished mesh object handed to the host sink in one piece
#[derive(Debug, Clone, PartialEq)]
pub struct ArmatureMesh {
    /// Object name, `<armature>_mesh`
    pub name: String,
    /// World transform copied from the armature
    pub world_matrix: Mat4,
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub weight_groups: Vec<WeightGroup>,
    pub modifier: ArmatureModifier,
}

impl ArmatureMesh {
    /// Wrap assembled buffers for the armature `armature_name`
    pub fn from_parts(armature_name: &str, world_matrix: Mat4, parts: MeshParts) -> Self {
        Self {
            name: mesh_name_for(armature_name),
            world_matrix,
            vertices: parts.vertices,
            faces: parts.faces,
            weight_groups: parts.weight_groups,
            modifier: ArmatureModifier::for_armature(armature_name),
        }
    }
}

/// Object name used for the mesh generated from `armature_name`
pub fn mesh_name_for(armature_name: &str) -> String {
    format!("{}_mesh", armature_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_offset() {
        let tri = Face::Triangle([0, 2, 4]).offset(10);
        assert_eq!(tri, Face::Triangle([10, 12, 14]));

        let quad = Face::Quad([0, 8, 9, 1]).offset(6);
        assert_eq!(quad.indices(), &[6, 14, 15, 7]);
        assert_eq!(quad.max_index(), 15);
    }

    #[test]
    fn test_weight_group_members() {
        let group = WeightGroup::rigid("spine", 4, 7);
        let members: Vec<_> = group.members().collect();
        assert_eq!(members, vec![(4, 1.0), (5, 1.0), (6, 1.0)]);
        assert_eq!(group.len(), 3);
        assert!(group.contains(6));
        assert!(!group.contains(7));
    }

    #[test]
    fn test_empty_weight_group() {
        let group = WeightGroup::rigid("stub", 3, 3);
        assert!(group.is_empty());
        assert_eq!(group.members().count(), 0);
    }

    #[test]
    fn test_bone_record_defaults_from_json() {
        let json = r#"{
            "name": "forearm",
            "head": [0.0, 0.0, 0.0],
            "tail": [0.0, 1.0, 0.0],
            "x_axis": [1.0, 0.0, 0.0],
            "z_axis": [0.0, 0.0, 1.0]
        }"#;
        let bone: BoneRecord = serde_json::from_str(json).unwrap();
        assert!(bone.deform);
        assert_eq!(bone.roll, 0.0);
        assert!((bone.length() - 1.0).abs() < 1e-6);
        assert!(bone.is_finite());
    }

    #[test]
    fn test_non_finite_bone() {
        let bone = BoneRecord {
            name: "bad".into(),
            head: Vec3::ZERO,
            tail: Vec3::new(f32::NAN, 0.0, 0.0),
            x_axis: Vec3::X,
            z_axis: Vec3::Z,
            roll: 0.0,
            deform: true,
        };
        assert!(!bone.is_finite());
    }

    #[test]
    fn test_mesh_from_parts_naming() {
        let mesh = ArmatureMesh::from_parts("Rig", Mat4::IDENTITY, MeshParts::default());
        assert_eq!(mesh.name, "Rig_mesh");
        assert_eq!(mesh.modifier.object, "Rig");
        assert_eq!(mesh.modifier.name, ARMATURE_MODIFIER_NAME);
        assert!(!mesh.modifier.use_bone_envelopes);
        assert!(mesh.modifier.use_vertex_groups);
    }
}
