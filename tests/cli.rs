//! End-to-end CLI tests

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const CONFIG: &str = r#"
manifest = "manifest"

[[buckets]]
name = "vendor"
path = "node_modules"

[[buckets]]
name = "styles"
path = "./css"
"#;

const GRAPH: &str = r#"{
    "chunks": [
        {
            "name": "app",
            "modules": [
                "./src/app.js",
                "node_modules/react/index.js",
                "style-loader!css-loader!./css/app.css"
            ]
        },
        {
            "name": "other",
            "modules": ["./src/other.js", "node_modules/react/index.js"]
        }
    ],
    "entrypoints": [
        { "name": "app", "chunks": ["app"] },
        { "name": "other", "chunks": ["other"] }
    ]
}"#;

#[test]
fn split_reports_manifest_first_load_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("splitpath.toml");
    let graph = dir.path().join("graph.json");
    fs::write(&config, CONFIG).unwrap();
    fs::write(&graph, GRAPH).unwrap();

    Command::cargo_bin("splitpath")
        .unwrap()
        .arg("split")
        .arg(&graph)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("manifest → vendor → styles → app"))
        .stderr(predicate::str::contains("manifest → vendor → other"));
}

#[test]
fn split_writes_partitioned_graph() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("splitpath.toml");
    let graph = dir.path().join("graph.json");
    let output = dir.path().join("out.json");
    fs::write(&config, CONFIG).unwrap();
    fs::write(&graph, GRAPH).unwrap();

    Command::cargo_bin("splitpath")
        .unwrap()
        .arg("split")
        .arg(&graph)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let out: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let chunks = out["chunks"].as_array().unwrap();
    let names: Vec<&str> = chunks
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert!(names.contains(&"vendor"));
    assert!(names.contains(&"styles"));
    assert!(names.contains(&"manifest"));

    // the shared react module ended up only in vendor
    let vendor = chunks
        .iter()
        .find(|c| c["name"] == "vendor")
        .unwrap();
    assert!(vendor["modules"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "node_modules/react/index.js"));
    let app = chunks.iter().find(|c| c["name"] == "app").unwrap();
    assert!(!app["modules"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == "node_modules/react/index.js"));
}

#[test]
fn check_validates_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("splitpath.toml");
    fs::write(&config, CONFIG).unwrap();

    Command::cargo_bin("splitpath")
        .unwrap()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("is valid"));
}

#[test]
fn check_rejects_bad_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("splitpath.toml");
    fs::write(
        &config,
        r#"
[[buckets]]
name = "vendor"
path = { regex = "(unclosed" }
"#,
    )
    .unwrap();

    Command::cargo_bin("splitpath")
        .unwrap()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}
