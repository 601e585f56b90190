//! Build outcome with explicit partial success

use crate::error::BuildError;
use crate::types::ArmatureMesh;

/// Outcome of a build
///
/// A failure part way through the bone list keeps the geometry built so far
/// in `PartialFailure`; nothing is rolled back.
#[derive(Debug)]
pub enum BuildResult<T = ArmatureMesh> {
    Success(T),
    PartialFailure(T, BuildError),
    Failure(BuildError),
}

impl<T> BuildResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success(_))
    }

    /// Geometry produced, complete or partial
    pub fn mesh(&self) -> Option<&T> {
        match self {
            BuildResult::Success(mesh) | BuildResult::PartialFailure(mesh, _) => Some(mesh),
            BuildResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&BuildError> {
        match self {
            BuildResult::Success(_) => None,
            BuildResult::PartialFailure(_, err) | BuildResult::Failure(err) => Some(err),
        }
    }

    /// Split into the geometry (if any) and the error (if any)
    pub fn into_parts(self) -> (Option<T>, Option<BuildError>) {
        match self {
            BuildResult::Success(mesh) => (Some(mesh), None),
            BuildResult::PartialFailure(mesh, err) => (Some(mesh), Some(err)),
            BuildResult::Failure(err) => (None, Some(err)),
        }
    }

    /// Transform the geometry, keeping the outcome
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BuildResult<U> {
        match self {
            BuildResult::Success(mesh) => BuildResult::Success(f(mesh)),
            BuildResult::PartialFailure(mesh, err) => BuildResult::PartialFailure(f(mesh), err),
            BuildResult::Failure(err) => BuildResult::Failure(err),
        }
    }
}
