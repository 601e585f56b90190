//! Error types for bone mesh builds

/// Failure reported by the host while reading an armature or switching modes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("bone '{bone}' could not be read: {reason}")]
    UnreadableBone { bone: String, reason: String },

    #[error("cannot switch '{object}' to {mode} mode: {reason}")]
    ModeSwitch {
        object: String,
        mode: String,
        reason: String,
    },
}

/// Failure while committing a finished mesh to the host
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write mesh output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode weight groups: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("sink rejected mesh: {0}")]
    Rejected(String),
}

/// Invalid build options
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} = {value} is out of range ({min}-{max})")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("failed to parse build options: {0}")]
    Parse(String),

    #[error("failed to read build options: {0}")]
    Read(String),
}

/// Failure loading a rig scene file
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no object named '{0}' in scene")]
    UnknownObject(String),
}

/// Why a build stopped
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No active object, or the active object is not an armature
    #[error("{0}")]
    InvalidSelection(String),

    /// A bone record the geometry builders cannot use
    #[error("bone '{bone}' is malformed: {reason}")]
    MalformedBone { bone: String, reason: String },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("vertex count exceeds the u32 index range at bone '{bone}'")]
    IndexOverflow { bone: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl BuildError {
    /// True for errors raised while processing bones (geometry may be partial)
    pub fn is_geometry_failure(&self) -> bool {
        matches!(
            self,
            BuildError::MalformedBone { .. }
                | BuildError::IndexOverflow { .. }
                | BuildError::Host(HostError::UnreadableBone { .. })
        )
    }
}
