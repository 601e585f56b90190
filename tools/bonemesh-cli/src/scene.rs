//! `bonemesh inspect` and `bonemesh check`

use anyhow::{Result, bail};
use bonemesh_core::{ArmatureHost, InteractionMode, ObjectKind, RigScene, is_ready};
use std::path::Path;

/// Log every object and bone in the scene
pub fn inspect(path: &Path) -> Result<()> {
    let scene = RigScene::load(path)?;

    if scene.objects.is_empty() {
        tracing::info!("No objects found in {:?}", path);
        return Ok(());
    }

    tracing::info!("Objects in {:?}:", path);
    for object in &scene.objects {
        let marker = if scene.active.as_deref() == Some(object.name.as_str()) {
            " (active)"
        } else {
            ""
        };
        tracing::info!(
            "  '{}' {:?} in {} mode, {} bones{}",
            object.name,
            object.kind(),
            object.mode(),
            object.bones.len(),
            marker
        );

        for bone in object.bone_records() {
            match bone {
                Ok(bone) => tracing::info!(
                    "    {} length {:.4}{}",
                    bone.name,
                    bone.length(),
                    if bone.deform { "" } else { " (no deform)" }
                ),
                Err(e) => tracing::warn!("    {}", e),
            }
        }
    }

    Ok(())
}

/// Problems that would stop the active armature from building
pub fn problems(scene: &RigScene) -> Vec<String> {
    let Some(active) = scene.active_object() else {
        return vec![match &scene.active {
            Some(name) => format!("active object '{}' not found", name),
            None => "no active object".to_string(),
        }];
    };

    let mut problems = Vec::new();
    if active.kind() != ObjectKind::Armature {
        problems.push(format!("'{}' is not an armature", active.name));
    } else if !is_ready(Some(active)) {
        problems.push(format!(
            "'{}' is in {} mode, expected {}",
            active.name,
            active.mode(),
            InteractionMode::Object
        ));
    }

    for bone in active.bone_records() {
        match bone {
            Ok(bone) if !bone.is_finite() => {
                problems.push(format!("bone '{}' has non-finite values", bone.name))
            }
            Ok(_) => {}
            Err(e) => problems.push(e.to_string()),
        }
    }

    problems
}

/// Fail unless the active armature is ready to build
pub fn check(path: &Path) -> Result<()> {
    let scene = RigScene::load(path)?;
    let problems = problems(&scene);

    for problem in &problems {
        tracing::warn!("{}", problem);
    }
    if !problems.is_empty() {
        bail!("Scene has {} problem(s)", problems.len());
    }

    if let Some(active) = scene.active_object() {
        let deform = active
            .bone_records()
            .into_iter()
            .filter(|b| b.as_ref().is_ok_and(|b| b.deform))
            .count();
        tracing::info!("'{}': {} deform bones", active.name, deform);
    }
    Ok(())
}
