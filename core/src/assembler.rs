//! Mesh assembly across the bone list
//!
//! Each deform bone appends its shape and any new joint spheres to one global
//! vertex/face buffer. Indices are absolute and never renumbered, so the
//! buffers only grow, strictly in bone order.

use glam::Vec3;
use std::ops::Range;
use tracing::debug;

use crate::config::{BuildOptions, SphereConfig};
use crate::error::{BuildError, HostError};
use crate::geometry::{
    JointDeduper, MIN_RINGS, MIN_SEGMENTS, SPHERE_RADIUS_FACTOR, bone_shape, joint_sphere,
    sphere_counts,
};
use crate::result::BuildResult;
use crate::types::{BoneRecord, Face, MeshParts, PartGeometry, WeightGroup};

/// Vertices in one bone shape
const BONE_SHAPE_VERTICES: usize = 6;

/// Accumulates geometry one bone at a time
#[derive(Debug, Clone)]
pub struct MeshAssembler {
    sphere: SphereConfig,
    vertex_groups: bool,
    joints: JointDeduper,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    weight_groups: Vec<WeightGroup>,
}

impl MeshAssembler {
    /// Assembler for one build
    ///
    /// Tessellation below the minimum is raised here, as the sphere builder
    /// would, so vertex budgets match what gets built.
    pub fn new(options: &BuildOptions) -> Self {
        Self {
            sphere: SphereConfig {
                segments: options.sphere.segments.max(MIN_SEGMENTS),
                rings: options.sphere.rings.max(MIN_RINGS),
            },
            vertex_groups: options.vertex_groups,
            joints: JointDeduper::with_decimals(options.key_decimals),
            vertices: Vec::new(),
            faces: Vec::new(),
            weight_groups: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Joints capped with a sphere so far
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Append one bone's shape and joint spheres
    ///
    /// Returns the vertex range the bone contributed. The bone is validated
    /// before anything is appended, so a failing bone leaves no trace.
    pub fn push_bone(&mut self, bone: &BoneRecord) -> Result<Range<u32>, BuildError> {
        if let Some(reason) = malformed_reason(bone) {
            return Err(BuildError::MalformedBone {
                bone: bone.name.clone(),
                reason: reason.to_string(),
            });
        }

        let (sphere_vertices, _) = sphere_counts(self.sphere.segments, self.sphere.rings);
        let worst_case = self.vertices.len() + BONE_SHAPE_VERTICES + 2 * sphere_vertices;
        if worst_case > u32::MAX as usize {
            return Err(BuildError::IndexOverflow {
                bone: bone.name.clone(),
            });
        }

        let base = self.vertices.len() as u32;

        let shape = bone_shape(bone.head, bone.tail, bone.x_axis, bone.z_axis, base, bone.roll);
        self.vertices.extend_from_slice(&shape.vertices);
        self.faces.extend_from_slice(&shape.faces);

        let radius = bone.length() * SPHERE_RADIUS_FACTOR;
        for joint in [bone.head, bone.tail] {
            if self.joints.claim(joint) {
                let sphere: PartGeometry =
                    joint_sphere(joint, radius, self.sphere.segments, self.sphere.rings);
                self.append_part(sphere);
            }
        }

        let end = self.vertices.len() as u32;
        if self.vertex_groups {
            self.weight_groups.push(WeightGroup::rigid(&bone.name, base, end));
        }

        debug!(
            "Bone '{}': vertices {}..{}, faces total {}",
            bone.name,
            base,
            end,
            self.faces.len()
        );

        Ok(base..end)
    }

    /// Hand over the accumulated buffers
    pub fn finish(self) -> MeshParts {
        MeshParts {
            vertices: self.vertices,
            faces: self.faces,
            weight_groups: self.weight_groups,
        }
    }

    /// Append locally indexed geometry, offsetting its faces
    fn append_part(&mut self, part: PartGeometry) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(part.vertices);
        self.faces.extend(part.faces.into_iter().map(|f| f.offset(offset)));
    }
}

fn malformed_reason(bone: &BoneRecord) -> Option<&'static str> {
    if !bone.head.is_finite() {
        Some("head is not finite")
    } else if !bone.tail.is_finite() {
        Some("tail is not finite")
    } else if !bone.x_axis.is_finite() {
        Some("x axis is not finite")
    } else if !bone.z_axis.is_finite() {
        Some("z axis is not finite")
    } else if !bone.roll.is_finite() {
        Some("roll is not finite")
    } else {
        None
    }
}

/// Build geometry for every deform bone, in order
///
/// Non-deform bones are skipped. The first unreadable or malformed bone stops
/// the build; everything appended before it is returned alongside the error.
pub fn assemble<I>(bones: I, options: &BuildOptions) -> BuildResult<MeshParts>
where
    I: IntoIterator<Item = Result<BoneRecord, HostError>>,
{
    let mut assembler = MeshAssembler::new(options);

    for bone in bones {
        let bone = match bone {
            Ok(bone) => bone,
            Err(e) => return BuildResult::PartialFailure(assembler.finish(), e.into()),
        };

        if !bone.deform {
            continue;
        }

        if let Err(e) = assembler.push_bone(&bone) {
            return BuildResult::PartialFailure(assembler.finish(), e);
        }
    }

    BuildResult::Success(assembler.finish())
}
