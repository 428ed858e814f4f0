//! End-to-end CLI tests against the fixture detector.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use tempfile::TempDir;

const DETECTIONS: &str = r#"{
    "return_front.jpg": [
        {"label": "dent", "score": 0.9, "box": {"xmin": 0.0, "ymin": 0.0, "xmax": 0.04, "ymax": 0.05}},
        {"label": "unknown_label", "score": 0.5, "box": {"xmin": 0.4, "ymin": 0.4, "xmax": 0.41, "ymax": 0.41}}
    ],
    "return_rear.jpg": [
        {"label": "scratch", "score": 0.95, "box": {"xmin": 0.4, "ymin": 0.4, "xmax": 0.6, "ymax": 0.6}}
    ]
}"#;

/// Temp workspace with a project config pointing at the fixture detector.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("detections.json"), DETECTIONS).unwrap();
        fs::write(
            dir.path().join(".vehicle-inspect.toml"),
            r#"
[catalog]
path = "inspections.db"

[detector]
kind = "fixture"
fixture_path = "detections.json"
"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("xdg")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn photo(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        ImageBuffer::from_fn(200, 100, |_x, _y| Rgb([40_u8, 40_u8, 40_u8]))
            .save(&path)
            .unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("vehicle-inspect").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("RUST_LOG");
        cmd
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).assert().success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }

    fn create(&self) -> String {
        self.stdout(&["create"]).trim().to_string()
    }

    /// Adds a photo and returns its id.
    fn add(&self, inspection: &str, file: &str, side: &str, kind: &str) -> String {
        let path = self.photo(file);
        let row = self.stdout(&[
            "add-photo",
            inspection,
            path.to_str().unwrap(),
            "--side",
            side,
            "--type",
            kind,
        ]);
        row.split('\t').next().unwrap().trim().to_string()
    }
}

#[test]
fn full_inspection_flow() {
    let ws = Workspace::new();
    let id = ws.create();
    assert!(id.starts_with("ins_"), "unexpected id {id}");

    ws.add(&id, "pickup_front.jpg", "front", "pickup");
    let return_id = ws.add(&id, "return_front.jpg", "front", "return");

    let analysis: serde_json::Value =
        serde_json::from_str(&ws.stdout(&["analyze", &id, "--json"])).unwrap();
    assert_eq!(analysis["summary"]["totalEstimatedCost"], 2580);
    assert_eq!(analysis["issues"][0]["label"], "dent");
    assert_eq!(analysis["issues"][0]["estimatedCost"], 2400);
    assert_eq!(analysis["issues"][0]["severity"], "major");
    assert_eq!(analysis["issues"][1]["estimatedCost"], 180);
    assert_eq!(analysis["issues"][1]["photoId"], return_id.as_str());

    ws.cmd()
        .args(["annotate", &id, "--out", "overlays"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total estimated cost: 2580"));
    let overlay = ws.path().join("overlays").join(format!("{return_id}.png"));
    let decoded = image::open(&overlay).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 100));

    let shown: serde_json::Value =
        serde_json::from_str(&ws.stdout(&["show", &id, "--json"])).unwrap();
    assert_eq!(shown["photos"].as_array().unwrap().len(), 2);
    assert_eq!(shown["photos"][1]["type"], "return");
    assert_eq!(shown["results"]["summary"]["totalEstimatedCost"], 2580);

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()).and(predicate::str::contains("2580")));
}

#[test]
fn unpaired_return_photo_is_reported_as_skipped() {
    let ws = Workspace::new();
    let id = ws.create();
    ws.add(&id, "pickup_front.jpg", "front", "pickup");
    ws.add(&id, "return_front.jpg", "front", "return");
    ws.add(&id, "return_rear.jpg", "rear", "return");

    ws.cmd()
        .args(["analyze", &id])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("skipped, no pickup photo for side 'rear'")
                .and(predicate::str::contains("total estimated cost: 2580")),
        );
}

#[test]
fn import_adds_photos_from_folder_layout() {
    let ws = Workspace::new();
    let id = ws.create();
    ws.photo("batch/pickup/front.jpg");
    ws.photo("batch/return_front.jpg");

    ws.cmd()
        .args(["import", &id, "batch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("imported=2"));

    ws.cmd()
        .args(["analyze", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("total estimated cost: 2580"));
}

#[test]
fn analyze_unknown_inspection_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["analyze", "ins_missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn add_photo_to_unknown_inspection_is_not_found_before_reading_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["add-photo", "ins_missing", "missing.jpg", "--side", "front"])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("not found")
                .and(predicate::str::contains("failed to read").not()),
        );
}

#[test]
fn annotate_requires_prior_analysis() {
    let ws = Workspace::new();
    let id = ws.create();
    ws.cmd()
        .args(["annotate", &id, "--out", "overlays"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no return photos found"));

    ws.add(&id, "return_front.jpg", "front", "return");
    ws.cmd()
        .args(["annotate", &id, "--out", "overlays"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no analysis results found"));
}

#[test]
fn explicit_config_overrides_project_config() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("strict.toml"),
        "[pairing]\npolicy = \"reject-ambiguous\"\n",
    )
    .unwrap();
    let id = ws.create();
    ws.add(&id, "pickup_front.jpg", "front", "pickup");
    ws.add(&id, "pickup/front.jpg", "front", "pickup");
    ws.add(&id, "return_front.jpg", "front", "return");

    ws.cmd()
        .args(["analyze", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("total estimated cost: 2580"));

    ws.cmd()
        .args(["--config", "strict.toml", "analyze", &id])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn catalog_flag_overrides_config_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--catalog", "other.db", "create"])
        .assert()
        .success();

    assert!(ws.path().join("other.db").exists());
    assert!(!ws.path().join("inspections.db").exists());
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let ws = Workspace::new();
    ws.cmd().assert().code(2);
}

#[test]
fn invalid_config_value_is_reported() {
    let ws = Workspace::new();
    fs::write(ws.path().join("bad.toml"), "[annotation]\ncolor = \"red\"\n").unwrap();

    ws.cmd()
        .args(["--config", "bad.toml", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("annotation.color"));
}
