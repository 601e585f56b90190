//! Bone shape: an octahedron spanning head to tail
//!
//! The cross-section is a diamond of four waist points sitting a little way
//! up the bone, turned by the bone's roll plus a fixed 45 degrees.

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_4;

use crate::types::Face;

/// Waist radius as a fraction of bone length
pub const BONE_RADIUS_FACTOR: f32 = 0.15;

/// How far up the bone the waist sits, as a fraction of head -> tail
pub const WAIST_OFFSET_FACTOR: f32 = 0.1;

/// Fixed turn added to the bone roll when placing the waist
pub const ROLL_OFFSET: f32 = FRAC_PI_4;

/// Vertex slots inside a bone shape
const HEAD: u32 = 0;
const TAIL: u32 = 1;
const POS_X: u32 = 2;
const NEG_X: u32 = 3;
const POS_Z: u32 = 4;
const NEG_Z: u32 = 5;

/// Geometry for one bone, indices already offset by the base index
#[derive(Debug, Clone, PartialEq)]
pub struct BoneShape {
    /// `head, tail, +x, -x, +z, -z`
    pub vertices: [Vec3; 6],
    pub faces: [Face; 8],
}

/// Build the octahedral shape for a bone
///
/// # Arguments
/// * `head`, `tail` - Bone endpoints
/// * `x_axis`, `z_axis` - Bone local axes (unit length, perpendicular to the bone)
/// * `base_index` - Index the first vertex will have in the global buffer
/// * `roll` - Bone roll in radians
///
/// A zero-length bone collapses every vertex onto `head`; nothing fails.
pub fn bone_shape(
    head: Vec3,
    tail: Vec3,
    x_axis: Vec3,
    z_axis: Vec3,
    base_index: u32,
    roll: f32,
) -> BoneShape {
    let span = tail - head;
    let radius = span.length() * BONE_RADIUS_FACTOR;
    let x = x_axis * radius;
    let z = z_axis * radius;

    let lift = span * WAIST_OFFSET_FACTOR;
    let rotation = waist_rotation(span, roll);
    let place = |offset: Vec3| head + rotation * (offset + lift);

    let vertices = [head, tail, place(x), place(-x), place(z), place(-z)];

    let b = base_index;
    let faces = [
        // Head apex, wound outward seen from below the head
        Face::Triangle([b + HEAD, b + POS_X, b + POS_Z]),
        Face::Triangle([b + HEAD, b + POS_Z, b + NEG_X]),
        Face::Triangle([b + HEAD, b + NEG_X, b + NEG_Z]),
        Face::Triangle([b + HEAD, b + NEG_Z, b + POS_X]),
        // Tail apex, reversed so it also faces outward
        Face::Triangle([b + TAIL, b + POS_Z, b + POS_X]),
        Face::Triangle([b + TAIL, b + NEG_X, b + POS_Z]),
        Face::Triangle([b + TAIL, b + NEG_Z, b + NEG_X]),
        Face::Triangle([b + TAIL, b + POS_X, b + NEG_Z]),
    ];

    BoneShape { vertices, faces }
}

/// Rotation of `roll + 45deg` about the bone direction
///
/// Identity when the bone has no length.
fn waist_rotation(span: Vec3, roll: f32) -> Quat {
    let axis = span.normalize_or_zero();
    if axis == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, roll + ROLL_OFFSET)
}
