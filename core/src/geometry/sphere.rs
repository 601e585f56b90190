//! Joint caps: UV spheres placed on bone heads and tails

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use tracing::warn;

use crate::types::{Face, MeshBuilder};

/// Fewest longitude steps that still close a ring
pub const MIN_SEGMENTS: u32 = 3;

/// Fewest latitude bands that still give the sphere an equator
pub const MIN_RINGS: u32 = 2;

/// Joint sphere radius as a fraction of bone length
pub const SPHERE_RADIUS_FACTOR: f32 = 0.1;

/// Vertex and face counts of a joint sphere: `((rings+1)*segments, rings*segments)`
pub fn sphere_counts(segments: u32, rings: u32) -> (usize, usize) {
    let segments = segments as usize;
    let rings = rings as usize;
    ((rings + 1) * segments, rings * segments)
}

/// Generate a UV sphere around `center`
///
/// # Arguments
/// * `center` - Sphere center
/// * `radius` - Sphere radius (>= 0.0, zero gives a collapsed but valid sphere)
/// * `segments` - Longitude steps per band (min 3)
/// * `rings` - Latitude bands between the poles (min 2)
///
/// # Returns
/// `(rings+1) * segments` vertices, band-major, and `rings * segments` quads.
/// Pole bands keep their pinched quads; they are not collapsed to triangles.
pub fn joint_sphere<M: MeshBuilder>(center: Vec3, radius: f32, segments: u32, rings: u32) -> M {
    let radius = if radius < 0.0 {
        warn!("joint_sphere: radius must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius
    };

    let segments = if segments < MIN_SEGMENTS {
        warn!(
            "joint_sphere: segments must be >= {}, clamping {} up",
            MIN_SEGMENTS, segments
        );
        MIN_SEGMENTS
    } else {
        segments
    };

    let rings = if rings < MIN_RINGS {
        warn!(
            "joint_sphere: rings must be >= {}, clamping {} up",
            MIN_RINGS, rings
        );
        MIN_RINGS
    } else {
        rings
    };

    let mut mesh = M::default();
    let first = mesh.vertex_count() as u32;

    for i in 0..=rings {
        let phi = PI * i as f32 / rings as f32; // 0 to PI inclusive
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..segments {
            let theta = TAU * j as f32 / segments as f32; // 2*PI excluded
            let (sin_theta, cos_theta) = theta.sin_cos();

            let offset = Vec3::new(sin_phi * cos_theta, sin_phi * sin_theta, cos_phi);
            mesh.add_vertex(center + offset * radius);
        }
    }

    for i in 0..rings {
        for j in 0..segments {
            let next_j = (j + 1) % segments;

            let a = first + i * segments + j;
            let b = a + segments;
            let c = first + (i + 1) * segments + next_j;
            let d = first + i * segments + next_j;

            mesh.add_face(Face::Quad([a, b, c, d]));
        }
    }

    mesh
}
