//! Procedural geometry for bone envelopes
//!
//! Bone shapes, joint spheres, and the joint deduplication they share.

mod bone_shape;
mod dedup;
mod sphere;

pub use bone_shape::{
    BONE_RADIUS_FACTOR, BoneShape, ROLL_OFFSET, WAIST_OFFSET_FACTOR, bone_shape,
};
pub use dedup::{DEFAULT_KEY_DECIMALS, JointDeduper, JointKey, MAX_KEY_DECIMALS};
pub use sphere::{MIN_RINGS, MIN_SEGMENTS, SPHERE_RADIUS_FACTOR, joint_sphere, sphere_counts};
