//! Bonemesh Core - Solid envelope meshes for armatures
//!
//! Turns the deform bones of an armature into one mesh: an octahedral shape
//! per bone plus a UV sphere at every distinct joint, with one rigid vertex
//! group per bone so the mesh deforms with the armature.
//!
//! # Architecture
//!
//! - [`geometry`] - Bone shapes, joint spheres and joint deduplication
//! - [`MeshAssembler`] - Appends per-bone geometry into one index space
//! - [`ArmatureHost`] / [`MeshSink`] - Seams to the application owning the scene
//! - [`create_mesh`] - Build entry point with mode restoration and reporting
//! - [`RigScene`] - JSON scene file acting as a host
//! - [`FileSink`] - OBJ plus weight sidecar output

pub mod assembler;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod host;
pub mod operator;
pub mod report;
pub mod result;
pub mod rig_file;
pub mod types;

// Re-export core traits and types
pub use assembler::{MeshAssembler, assemble};
pub use config::{BuildOptions, SphereConfig};
pub use error::{BuildError, ConfigError, HostError, SceneError, SinkError};
pub use export::{FileSink, MemorySink, write_obj, write_weights_json};
pub use host::{ArmatureHost, InteractionMode, MeshSink, ModeGuard, ObjectKind, is_ready};
pub use operator::create_mesh;
pub use report::{RecordingReporter, ReportLevel, Reporter, TracingReporter};
pub use result::BuildResult;
pub use rig_file::{RigObject, RigScene};
pub use types::{ArmatureMesh, BoneRecord, Face, MeshParts, WeightGroup};
