//! Integration tests for bonemesh
//!
//! Tests the full pipeline: write scene -> build -> verify OBJ and weights

use std::path::Path;
use std::process::Output;
use tempfile::tempdir;

const SINGLE_BONE: &str = r#"{
    "active": "Rig",
    "objects": [
        {
            "name": "Rig",
            "type": "ARMATURE",
            "mode": "OBJECT",
            "bones": [
                { "name": "root", "head": [0, 0, 0], "tail": [0, 0, 2],
                  "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] }
            ]
        }
    ]
}"#;

const ARM_CHAIN: &str = r#"{
    "active": "Arm",
    "objects": [
        { "name": "Cube", "type": "MESH" },
        {
            "name": "Arm",
            "type": "ARMATURE",
            "bones": [
                { "name": "upper", "head": [0, 0, 0], "tail": [0, 1, 0],
                  "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] },
                { "name": "lower", "head": [0, 1, 0], "tail": [0, 2, 0],
                  "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] },
                { "name": "pole", "head": [0, 1, 0], "tail": [0, 1, -1],
                  "x_axis": [1, 0, 0], "z_axis": [0, 1, 0], "deform": false }
            ]
        }
    ]
}"#;

const BROKEN_BONE: &str = r#"{
    "active": "Rig",
    "objects": [
        {
            "name": "Rig",
            "type": "ARMATURE",
            "bones": [
                { "name": "good", "head": [0, 0, 0], "tail": [0, 1, 0],
                  "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] },
                { "name": "broken", "head": [0, 1, 0] },
                { "name": "never", "head": [4, 0, 0], "tail": [4, 1, 0],
                  "x_axis": [1, 0, 0], "z_axis": [0, 0, 1] }
            ]
        }
    ]
}"#;

/// Test the single bone scene produces 86 vertices and 72 faces
#[test]
fn test_build_single_bone() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), SINGLE_BONE);
    let out = dir.path().join("out");

    let output = bonemesh(&["build", path_str(&scene), "-o", path_str(&out)]);
    assert!(output.status.success(), "bonemesh build failed: {}", stderr(&output));

    let (vertices, faces) = count_obj(&out.join("Rig_mesh.obj"));
    assert_eq!(vertices, 86);
    assert_eq!(faces, 72);

    let weights = read_weights(&out.join("Rig_mesh.weights.json"));
    assert_eq!(weights["vertex_count"], 86);
    assert_eq!(weights["weight_groups"].as_array().unwrap().len(), 1);
    assert_eq!(weights["weight_groups"][0]["bone_name"], "root");
    assert_eq!(weights["weight_groups"][0]["start"], 0);
    assert_eq!(weights["weight_groups"][0]["end"], 86);
    assert_eq!(weights["modifier"]["object"], "Rig");
}

/// Test output defaults to the scene's directory
#[test]
fn test_build_default_output_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), SINGLE_BONE);

    let output = bonemesh(&["build", path_str(&scene)]);
    assert!(output.status.success(), "bonemesh build failed: {}", stderr(&output));
    assert!(dir.path().join("Rig_mesh.obj").exists());
    assert!(dir.path().join("Rig_mesh.weights.json").exists());
}

/// Test shared joints get a single sphere and helper bones are skipped
#[test]
fn test_build_chain_dedupes_joints() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), ARM_CHAIN);

    let output = bonemesh(&["build", path_str(&scene), "--segments", "6", "--rings", "3"]);
    assert!(output.status.success(), "bonemesh build failed: {}", stderr(&output));

    // 3 joints * (4 * 6) sphere vertices + 2 * 6 shape vertices
    let (vertices, faces) = count_obj(&dir.path().join("Arm_mesh.obj"));
    assert_eq!(vertices, 3 * 24 + 12);
    assert_eq!(faces, 3 * 18 + 16);

    let weights = read_weights(&dir.path().join("Arm_mesh.weights.json"));
    let groups = weights["weight_groups"].as_array().unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g["bone_name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["upper", "lower"]);
    assert_eq!(groups[1]["start"], 54);
    assert_eq!(groups[1]["end"], 84);
}

/// Test --no-vertex-groups leaves the group list empty
#[test]
fn test_build_without_vertex_groups() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), SINGLE_BONE);

    let output = bonemesh(&["build", path_str(&scene), "--no-vertex-groups"]);
    assert!(output.status.success(), "bonemesh build failed: {}", stderr(&output));

    let weights = read_weights(&dir.path().join("Rig_mesh.weights.json"));
    assert!(weights["weight_groups"].as_array().unwrap().is_empty());
}

/// Test options file is honored
#[test]
fn test_build_with_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), SINGLE_BONE);
    let config = dir.path().join("bonemesh.toml");
    std::fs::write(&config, "[sphere]\nsegments = 3\nrings = 2\n").unwrap();

    let output = bonemesh(&["build", path_str(&scene), "--config", path_str(&config)]);
    assert!(output.status.success(), "bonemesh build failed: {}", stderr(&output));

    let (vertices, faces) = count_obj(&dir.path().join("Rig_mesh.obj"));
    assert_eq!(vertices, 6 + 9 + 9);
    assert_eq!(faces, 8 + 6 + 6);
}

/// Test out-of-range tessellation is rejected before building
#[test]
fn test_build_rejects_out_of_range() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), SINGLE_BONE);

    let output = bonemesh(&["build", path_str(&scene), "--segments", "65"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("Rig_mesh.obj").exists());
}

/// Test a broken bone fails the build but keeps the partial mesh
#[test]
fn test_build_partial_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), BROKEN_BONE);

    let output = bonemesh(&["build", path_str(&scene)]);
    assert!(!output.status.success());

    let (vertices, _) = count_obj(&dir.path().join("Rig_mesh.obj"));
    assert_eq!(vertices, 86);
    let weights = read_weights(&dir.path().join("Rig_mesh.weights.json"));
    assert_eq!(weights["weight_groups"].as_array().unwrap().len(), 1);
}

/// Test a non-armature selection writes nothing
#[test]
fn test_build_non_armature() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), ARM_CHAIN);

    let output = bonemesh(&["build", path_str(&scene), "--active", "Cube"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("Cube_mesh.obj").exists());
}

/// Test inspect lists bones
#[test]
fn test_inspect() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene = write_scene(dir.path(), ARM_CHAIN);

    let output = bonemesh(&["inspect", path_str(&scene)]);
    assert!(output.status.success(), "bonemesh inspect failed: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("upper"));
    assert!(stdout.contains("pole"));
    assert!(stdout.contains("(active)"));
}

/// Test check passes a ready scene and fails a broken one
#[test]
fn test_check() {
    let dir = tempdir().expect("Failed to create temp dir");
    let good = write_scene(dir.path(), SINGLE_BONE);
    let output = bonemesh(&["check", path_str(&good)]);
    assert!(output.status.success(), "bonemesh check failed: {}", stderr(&output));

    let other = tempdir().expect("Failed to create temp dir");
    let broken = write_scene(other.path(), BROKEN_BONE);
    let output = bonemesh(&["check", path_str(&broken)]);
    assert!(!output.status.success());
}

// Helper to run bonemesh with arguments
fn bonemesh(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_bonemesh"))
        .args(args)
        .output()
        .expect("Failed to run bonemesh")
}

fn write_scene(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("scene.json");
    std::fs::write(&path, json).expect("Failed to write scene");
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Non UTF-8 temp path")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Count `v` and `f` lines in an OBJ file
fn count_obj(path: &Path) -> (usize, usize) {
    let text = std::fs::read_to_string(path).expect("Failed to read OBJ");
    let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
    let faces = text.lines().filter(|l| l.starts_with("f ")).count();
    (vertices, faces)
}

fn read_weights(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("Failed to read weights");
    serde_json::from_str(&text).expect("Invalid weights JSON")
}
