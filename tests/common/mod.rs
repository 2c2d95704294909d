//! Common test utilities for Stevedore CLI tests.
//!
//! Provides `TestEnv` - an isolated test environment with temp directories
//! for the project and a fake home, plus helpers to run the stevedore
//! binary and build resource fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a stevedore CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory standing in for HOME
    pub home_dir: TempDir,
    /// Path to the stevedore binary
    bin: PathBuf,
}

impl TestEnv {
    /// Create a new TestEnvBuilder
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a file under the project root, creating parent directories
    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content);
    }

    /// Run stevedore in this environment from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run stevedore with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("STEVEDORE_APP_URL")
            .env_remove("STEVEDORE_MAX_RETRIES")
            .env_remove("STEVEDORE_DEPLOY_USERNAME")
            .env_remove("STEVEDORE_DEPLOY_PASSWORD");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute stevedore");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    config: Option<String>,
    resource_files: Vec<(String, String)>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            resource_files: Vec::new(),
        }
    }

    /// Set stevedore.toml content
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    /// Add a file under the project (e.g. "dist/index.html")
    pub fn with_resource_file(mut self, relative: &str, content: &str) -> Self {
        self.resource_files
            .push((relative.to_string(), content.to_string()));
        self
    }

    /// Build the TestEnv
    pub fn build(self) -> TestEnv {
        let project_root = TempDir::new().expect("Failed to create project temp dir");
        let home_dir = TempDir::new().expect("Failed to create home temp dir");

        if let Some(config) = &self.config {
            write_file(&project_root.path().join("stevedore.toml"), config);
        }
        for (relative, content) in &self.resource_files {
            write_file(&project_root.path().join(relative), content);
        }

        TestEnv {
            project_root,
            home_dir,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_stevedore")),
        }
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Config with one dist resource and no endpoint
pub const CONFIG_DIST_ONLY: &str = r#"
[[deploy.resources]]
directory = "dist"
"#;

/// Config with a dist resource and a placeholder endpoint
pub const CONFIG_WITH_URL: &str = r#"
[app]
url = "https://my-app.scm.example.com"

[[deploy.resources]]
directory = "dist"
"#;

/// Build a config pointing at `url` with a single dist resource
pub fn config_for_endpoint(url: &str) -> String {
    format!(
        r#"
[app]
url = "{url}"

[[deploy.resources]]
directory = "dist"
"#
    )
}

/// Deploy credentials as env var pairs
pub const TEST_CREDENTIALS: &[(&str, &str)] = &[
    ("STEVEDORE_DEPLOY_USERNAME", "deployer"),
    ("STEVEDORE_DEPLOY_PASSWORD", "hunter2"),
];
