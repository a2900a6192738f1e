//! `dvo show` specs

use crate::prelude::*;

#[test]
fn lists_checkpoints_with_pending_counts() {
    let project = Project::empty();
    project.checkpoint("svc", single_repository(Some("c1")));

    project.dvo().args(&["show"]).passes().stdout_eq("svc  2 pending\n");
}

#[test]
fn no_checkpoints() {
    Project::empty().dvo().args(&["show"]).passes().stdout_eq("No checkpoints\n");
}

#[test]
fn shows_one_record() {
    let project = Project::empty();
    project.checkpoint("svc", single_repository(Some("c1")));

    project
        .dvo()
        .args(&["show", "svc"])
        .passes()
        .stdout_has("compartment  c1")
        .stdout_has("tag          t1")
        .stdout_has("docker_native build pipeline of svc p1");
}

#[test]
fn json_is_the_record() {
    let project = Project::empty();
    project.checkpoint("svc", single_repository(Some("c1")));

    let run = project.dvo().args(&["show", "svc", "--output", "json"]).passes();

    assert_eq!(run.json(), single_repository(Some("c1")));
}

#[test]
fn legacy_checkpoints_are_migrated() {
    let project = Project::empty();
    project.file(
        "state/checkpoints/svc.json",
        r#"{"compartment":{"ocid":"c1"},"tag":"t1","repositories":{"svc":{"codeRepository":"r1"}}}"#,
    );

    project.dvo().args(&["show", "svc"]).passes().stdout_has("code repository of svc r1");
}

#[test]
fn missing_checkpoint_exits_two() {
    Project::empty().dvo().args(&["show", "web"]).fails().code(2).stderr_has("No checkpoint for web");
}
