//! Spec DSL: a temporary workspace with its own state directory, and a
//! fluent wrapper around `assert_cmd` runs of the `dvo` binary.

#![allow(dead_code)]

pub use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Deploy tag shared by the seeded resources and checkpoints.
pub const TAG: &str = "t1";

/// A temporary directory holding deployed folders and `state/`.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    /// Write a file relative to the project root, creating parents.
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }

    /// Seed the provider inventory with `(id, kind, scope)` resources
    /// tagged with [`TAG`].
    pub fn inventory(&self, resources: &[(&str, &str, &str)]) {
        let resources: Vec<Value> = resources
            .iter()
            .map(|(id, kind, scope)| {
                json!({
                    "id": id,
                    "kind": kind,
                    "scope": scope,
                    "display_name": id,
                    "tags": { "devops_tooling_deployID": TAG },
                })
            })
            .collect();
        self.file("state/inventory.json", &json!({ "resources": resources }).to_string());
    }

    /// Ids of the live resources in the saved inventory.
    pub fn live_ids(&self) -> Vec<String> {
        let text = std::fs::read_to_string(self.state_dir().join("inventory.json")).unwrap();
        let inventory: Value = serde_json::from_str(&text).unwrap();
        inventory["resources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    }

    /// Write a current-version checkpoint for `key`.
    pub fn checkpoint(&self, key: &str, record: Value) {
        let envelope = json!({ "v": 2, "key": key, "record": record });
        self.file(&format!("state/checkpoints/{key}.json"), &envelope.to_string());
    }

    pub fn has_checkpoint(&self, key: &str) -> bool {
        self.state_dir().join("checkpoints").join(format!("{key}.json")).exists()
    }

    /// `dvo` bound to this project's state directory.
    pub fn dvo(&self) -> CliBuilder {
        cli().env("DVO_STATE_DIR", &self.state_dir().display().to_string()).pwd(self.path())
    }
}

/// One repository `svc` with build pipeline `p1` and code repository `r1`.
pub fn single_repository(compartment: Option<&str>) -> Value {
    let mut record = json!({
        "tag": TAG,
        "repositories": {
            "svc": {
                "code_repository": "r1",
                "build": { "docker_native": { "pipeline": "p1" } },
            },
        },
    });
    if let Some(compartment) = compartment {
        record["compartment"] = json!({ "ocid": compartment });
    }
    record
}

/// `dvo` with a throwaway state directory, no color, no notifications and
/// no delay between work request polls.
pub fn cli() -> CliBuilder {
    CliBuilder {
        args: vec!["--no-notify".to_string()],
        envs: vec![
            ("NO_COLOR".to_string(), "1".to_string()),
            ("DVO_POLL_INTERVAL_MS".to_string(), "0".to_string()),
        ],
        pwd: None,
    }
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    pwd: Option<PathBuf>,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn pwd(mut self, dir: &Path) -> Self {
        self.pwd = Some(dir.to_path_buf());
        self
    }

    fn run(self) -> Output {
        let mut cmd = assert_cmd::Command::cargo_bin("dvo").unwrap();
        cmd.env_remove("DVO_LOG").env_remove("COLOR");
        let scratch = TempDir::new().unwrap();
        if !self.envs.iter().any(|(key, _)| key == "DVO_STATE_DIR") {
            cmd.env("DVO_STATE_DIR", scratch.path());
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.pwd {
            cmd.current_dir(dir);
        }
        cmd.args(&self.args).output().unwrap()
    }

    /// Run and assert a zero exit code.
    pub fn passes(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    /// Run and assert a non-zero exit code.
    pub fn fails(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected), "{}", self.describe());
        self
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }

    fn describe(&self) -> String {
        format!("--- stdout ---\n{}--- stderr ---\n{}", self.stdout(), self.stderr())
    }
}
