//! `dvo teardown` specs

use crate::prelude::*;

fn deployed() -> Project {
    let project = Project::empty();
    project.inventory(&[("p1", "build-pipeline", "c1"), ("r1", "code-repository", "c1"), ("x1", "log", "c1")]);
    project.checkpoint("svc", single_repository(Some("c1")));
    project.file("svc/.devops/build.json", "{}");
    project.file("svc/src/main.rs", "fn main() {}");
    project
}

#[test]
fn teardown_deletes_everything_and_clears_the_checkpoint() {
    let project = deployed();

    project
        .dvo()
        .args(&["teardown", "svc"])
        .passes()
        .stdout_has("Deleting docker_native build pipeline of svc")
        .stdout_has("Deleting code repository of svc")
        .stdout_has("done")
        .stdout_has("svc: 2 deleted");

    assert!(!project.has_checkpoint("svc"));
    assert_eq!(project.live_ids(), vec!["x1"]);
    assert!(!project.exists("svc/.devops"));
    assert!(project.exists("svc/src/main.rs"));
}

#[test]
fn teardown_is_idempotent() {
    let project = deployed();
    project.dvo().args(&["teardown", "svc"]).passes();

    project.dvo().args(&["teardown", "svc"]).passes().stdout_has("svc: no checkpoint");
}

#[test]
fn teardown_without_folders_has_nothing_to_do() {
    let project = deployed();

    project.dvo().args(&["teardown"]).passes().stdout_has("No folders to undeploy.");

    assert!(project.has_checkpoint("svc"));
}

#[test]
fn failed_sweep_keeps_the_checkpoint_and_exits_nonzero() {
    let project = Project::empty();
    // p1 is already gone, so it can only be swept, and there is no compartment to sweep in.
    project.inventory(&[("r1", "code-repository", "c1")]);
    project.checkpoint("svc", single_repository(None));

    project
        .dvo()
        .args(&["teardown", "svc"])
        .fails()
        .code(1)
        .stdout_has("record has no compartment");

    assert!(project.has_checkpoint("svc"));
}

#[test]
fn json_progress_is_one_event_per_line() {
    let project = deployed();

    let run = project.dvo().args(&["-o", "json", "teardown", "svc"]).passes();

    let events: Vec<Value> =
        run.stdout().lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(events.first().unwrap()["type"], "step");
    assert_eq!(events.last().unwrap(), &json!({ "type": "finished", "outcome": { "result": "succeeded" } }));
}

#[test]
fn teardown_is_busy_while_another_process_holds_the_state_dir() {
    use fs2::FileExt;

    let project = deployed();
    let lock = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(project.state_dir().join("dvo.lock"))
        .unwrap();
    lock.try_lock_exclusive().unwrap();

    project
        .dvo()
        .args(&["teardown", "svc"])
        .fails()
        .code(3)
        .stderr_has("another dvo operation");

    assert!(project.has_checkpoint("svc"));
    drop(lock);
    project.dvo().args(&["teardown", "svc"]).passes();
}
