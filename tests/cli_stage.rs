//! Integration tests for `stevedore stage`

mod common;

use common::*;

#[test]
fn stage_fails_without_resources() {
    let env = TestEnv::builder().with_config("[app]\n").build();
    let result = env.run(&["stage"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("no deployment resources declared"),
        "unexpected output:\n{}",
        result.combined_output()
    );
}

#[test]
fn stage_copies_resource_files() {
    let env = TestEnv::builder()
        .with_config(CONFIG_DIST_ONLY)
        .with_resource_file("dist/index.html", "<html>")
        .with_resource_file("dist/assets/app.js", "js")
        .build();
    let result = env.run(&["stage"]);

    assert!(
        result.success,
        "stage failed:\n{}",
        result.combined_output()
    );
    assert!(result.stdout.contains("2 file(s)"));
}

#[test]
fn stage_respects_excludes() {
    let config = r#"
[[deploy.resources]]
directory = "dist"
excludes = ["*.log"]
"#;
    let env = TestEnv::builder()
        .with_config(config)
        .with_resource_file("dist/index.html", "<html>")
        .with_resource_file("dist/debug.log", "noise")
        .build();
    let result = env.run(&["stage"]);

    assert!(result.success);
    assert!(result.stdout.contains("1 file(s)"));
}

#[test]
fn stage_fails_for_missing_resource_directory() {
    let env = TestEnv::builder().with_config(CONFIG_DIST_ONLY).build();
    let result = env.run(&["stage"]);

    assert!(!result.success);
    assert!(result.stderr.contains("resource directory not found"));
}

#[test]
fn stage_json_lists_staged_directories() {
    let env = TestEnv::builder()
        .with_config(CONFIG_DIST_ONLY)
        .with_resource_file("dist/index.html", "<html>")
        .build();
    let result = env.run(&["--json", "stage"]);

    assert!(result.success);
    let parsed: serde_json::Value = serde_json::from_str(result.stdout.trim())
        .unwrap_or_else(|e| panic!("invalid JSON ({e}):\n{}", result.stdout));
    assert_eq!(parsed["event"], "stage");
    let staged = parsed["staged"].as_array().unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0]["files"], 1);

    // The staging directory is kept for inspection
    let staged_path = staged[0]["path"].as_str().unwrap();
    assert!(std::path::Path::new(staged_path).join("index.html").exists());
    std::fs::remove_dir_all(staged_path).ok();
}
