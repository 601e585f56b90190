//! JSON rig scenes
//!
//! A scene file stands in for the host application: it lists objects with
//! their type, interaction mode, world transform and bones, and names the
//! active one.
//!
//! ```json
//! {
//!   "active": "Rig",
//!   "objects": [
//!     {
//!       "name": "Rig",
//!       "type": "ARMATURE",
//!       "mode": "OBJECT",
//!       "bones": [
//!         { "name": "root", "head": [0, 0, 0], "tail": [0, 0, 2],
//!           "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Bones are kept as raw JSON until edit mode reads them, so one bad bone
//! fails on its own instead of rejecting the whole file.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HostError, SceneError};
use crate::host::{ArmatureHost, InteractionMode, ObjectKind};
use crate::types::BoneRecord;

/// Placeholder name for a bone whose record has no readable name
const UNNAMED_BONE: &str = "<unnamed>";

/// Every object in a scene plus the active selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigScene {
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub objects: Vec<RigObject>,
}

/// One scene object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default)]
    pub mode: InteractionMode,
    /// Column-major object-to-world transform
    #[serde(default)]
    pub matrix_world: Mat4,
    #[serde(default)]
    pub bones: Vec<serde_json::Value>,
}

impl RigScene {
    pub fn from_json_str(s: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a scene from a JSON file
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn object(&self, name: &str) -> Option<&RigObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// The active object, if one is named and exists
    pub fn active_object(&self) -> Option<&RigObject> {
        self.active.as_deref().and_then(|name| self.object(name))
    }

    pub fn active_object_mut(&mut self) -> Option<&mut RigObject> {
        let name = self.active.as_deref()?;
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Make `name` the active object
    pub fn set_active(&mut self, name: &str) -> Result<(), SceneError> {
        if self.object(name).is_none() {
            return Err(SceneError::UnknownObject(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }
}

impl RigObject {
    /// Parse every bone regardless of mode
    pub fn bone_records(&self) -> Vec<Result<BoneRecord, HostError>> {
        self.bones.iter().map(parse_bone).collect()
    }
}

fn parse_bone(value: &serde_json::Value) -> Result<BoneRecord, HostError> {
    BoneRecord::deserialize(value).map_err(|e| HostError::UnreadableBone {
        bone: value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or(UNNAMED_BONE)
            .to_string(),
        reason: e.to_string(),
    })
}

impl ArmatureHost for RigObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind.clone()
    }

    fn world_matrix(&self) -> Mat4 {
        self.matrix_world
    }

    fn mode(&self) -> InteractionMode {
        self.mode
    }

    fn set_mode(&mut self, mode: InteractionMode) -> Result<(), HostError> {
        let allowed = match mode {
            InteractionMode::Object => true,
            InteractionMode::Edit => matches!(self.kind, ObjectKind::Armature | ObjectKind::Mesh),
            InteractionMode::Pose => self.kind == ObjectKind::Armature,
        };
        if !allowed {
            return Err(HostError::ModeSwitch {
                object: self.name.clone(),
                mode: mode.to_string(),
                reason: "not supported for this object type".to_string(),
            });
        }
        self.mode = mode;
        Ok(())
    }

    /// Rest bones are only available in edit mode
    fn edit_bones(&self) -> Vec<Result<BoneRecord, HostError>> {
        if self.mode != InteractionMode::Edit {
            return vec![Err(HostError::UnreadableBone {
                bone: UNNAMED_BONE.to_string(),
                reason: format!("'{}' is in {} mode, not EDIT", self.name, self.mode),
            })];
        }
        self.bone_records()
    }
}
