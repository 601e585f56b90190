//! Host application seams
//!
//! The host owns the scene: it supplies armature bones, switches interaction
//! modes, and receives the finished mesh. The build only talks to it through
//! these traits.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::{HostError, SinkError};
use crate::types::{ArmatureMesh, BoneRecord};

/// Interaction mode of a host object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum InteractionMode {
    #[default]
    Object,
    /// Bone rest data (head, tail, axes, roll) is only readable here
    Edit,
    Pose,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InteractionMode::Object => "OBJECT",
            InteractionMode::Edit => "EDIT",
            InteractionMode::Pose => "POSE",
        };
        f.write_str(s)
    }
}

/// Kind of a host object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Armature,
    Mesh,
    Empty,
    #[serde(other)]
    Other,
}

/// An object the build can read bones from
pub trait ArmatureHost {
    fn name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    /// Object-to-world transform, copied onto the generated mesh
    fn world_matrix(&self) -> Mat4;

    fn mode(&self) -> InteractionMode;

    fn set_mode(&mut self, mode: InteractionMode) -> Result<(), HostError>;

    /// Every bone in the armature's natural order (not necessarily parent first)
    fn edit_bones(&self) -> Vec<Result<BoneRecord, HostError>>;
}

/// Receives the finished mesh as one payload
pub trait MeshSink {
    fn commit(&mut self, mesh: ArmatureMesh) -> Result<(), SinkError>;
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn commit(&mut self, mesh: ArmatureMesh) -> Result<(), SinkError> {
        (**self).commit(mesh)
    }
}

/// Whether `active` can be turned into a mesh right now
///
/// Requires an armature sitting in object mode.
pub fn is_ready<H: ArmatureHost + ?Sized>(active: Option<&H>) -> bool {
    active.is_some_and(|obj| {
        obj.kind() == ObjectKind::Armature && obj.mode() == InteractionMode::Object
    })
}

/// Switches a host object into a mode and puts it back on drop
///
/// The previous mode is restored on every exit path, including early returns
/// and panics. `restore` does it explicitly and surfaces the error.
pub struct ModeGuard<'a, H: ArmatureHost + ?Sized> {
    host: &'a mut H,
    previous: InteractionMode,
    restored: bool,
}

impl<'a, H: ArmatureHost + ?Sized> ModeGuard<'a, H> {
    /// Record the current mode and switch to `mode`
    pub fn enter(host: &'a mut H, mode: InteractionMode) -> Result<Self, HostError> {
        let previous = host.mode();
        host.set_mode(mode)?;
        Ok(Self {
            host,
            previous,
            restored: false,
        })
    }

    /// Mode that will be restored
    pub fn previous(&self) -> InteractionMode {
        self.previous
    }

    /// Restore the previous mode now
    pub fn restore(mut self) -> Result<(), HostError> {
        self.restored = true;
        self.host.set_mode(self.previous)
    }
}

impl<H: ArmatureHost + ?Sized> Deref for ModeGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: ArmatureHost + ?Sized> DerefMut for ModeGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: ArmatureHost + ?Sized> Drop for ModeGuard<'_, H> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.host.set_mode(self.previous) {
            tracing::error!("Failed to restore {} mode: {}", self.previous, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        kind: ObjectKind,
        mode: InteractionMode,
        history: Vec<InteractionMode>,
        refuse: Option<InteractionMode>,
    }

    impl FakeHost {
        fn armature(mode: InteractionMode) -> Self {
            Self {
                kind: ObjectKind::Armature,
                mode,
                history: Vec::new(),
                refuse: None,
            }
        }
    }

    impl ArmatureHost for FakeHost {
        fn name(&self) -> &str {
            "Rig"
        }

        fn kind(&self) -> ObjectKind {
            self.kind.clone()
        }

        fn world_matrix(&self) -> Mat4 {
            Mat4::IDENTITY
        }

        fn mode(&self) -> InteractionMode {
            self.mode
        }

        fn set_mode(&mut self, mode: InteractionMode) -> Result<(), HostError> {
            if self.refuse == Some(mode) {
                return Err(HostError::ModeSwitch {
                    object: "Rig".into(),
                    mode: mode.to_string(),
                    reason: "refused".into(),
                });
            }
            self.history.push(mode);
            self.mode = mode;
            Ok(())
        }

        fn edit_bones(&self) -> Vec<Result<BoneRecord, HostError>> {
            Vec::new()
        }
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let mut host = FakeHost::armature(InteractionMode::Pose);
        {
            let guard = ModeGuard::enter(&mut host, InteractionMode::Edit).unwrap();
            assert_eq!(guard.mode(), InteractionMode::Edit);
            assert_eq!(guard.previous(), InteractionMode::Pose);
        }
        assert_eq!(host.mode, InteractionMode::Pose);
        assert_eq!(host.history, vec![InteractionMode::Edit, InteractionMode::Pose]);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn read_then_bail(host: &mut FakeHost) -> Result<(), &'static str> {
            let _guard = ModeGuard::enter(host, InteractionMode::Edit).map_err(|_| "enter")?;
            Err("bail")
        }

        let mut host = FakeHost::armature(InteractionMode::Object);
        assert_eq!(read_then_bail(&mut host), Err("bail"));
        assert_eq!(host.mode, InteractionMode::Object);
    }

    #[test]
    fn test_explicit_restore_runs_once() {
        let mut host = FakeHost::armature(InteractionMode::Object);
        let guard = ModeGuard::enter(&mut host, InteractionMode::Edit).unwrap();
        guard.restore().unwrap();
        assert_eq!(host.history, vec![InteractionMode::Edit, InteractionMode::Object]);
    }

    #[test]
    fn test_enter_failure_leaves_mode() {
        let mut host = FakeHost::armature(InteractionMode::Object);
        host.refuse = Some(InteractionMode::Edit);
        assert!(ModeGuard::enter(&mut host, InteractionMode::Edit).is_err());
        assert_eq!(host.mode, InteractionMode::Object);
        assert!(host.history.is_empty());
    }

    #[test]
    fn test_restore_failure_is_returned() {
        let mut host = FakeHost::armature(InteractionMode::Object);
        host.refuse = Some(InteractionMode::Object);
        let guard = ModeGuard::enter(&mut host, InteractionMode::Edit).unwrap();
        assert!(guard.restore().is_err());
        assert_eq!(host.mode, InteractionMode::Edit);
    }

    #[test]
    fn test_is_ready() {
        let ready = FakeHost::armature(InteractionMode::Object);
        assert!(is_ready(Some(&ready)));

        let editing = FakeHost::armature(InteractionMode::Edit);
        assert!(!is_ready(Some(&editing)));

        let mut mesh = FakeHost::armature(InteractionMode::Object);
        mesh.kind = ObjectKind::Mesh;
        assert!(!is_ready(Some(&mesh)));

        assert!(!is_ready::<FakeHost>(None));
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: InteractionMode = serde_json::from_str("\"EDIT\"").unwrap();
        assert_eq!(mode, InteractionMode::Edit);
        let kind: ObjectKind = serde_json::from_str("\"CAMERA\"").unwrap();
        assert_eq!(kind, ObjectKind::Other);
    }
}
