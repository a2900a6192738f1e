//! `dvo tree` specs

use crate::prelude::*;

fn seeded() -> Project {
    let project = Project::empty();
    project.inventory(&[
        ("proj1", "project", "c1"),
        ("svc", "code-repository", "proj1"),
        ("bp-svc", "build-pipeline", "proj1"),
        ("st-build", "build-stage", "bp-svc"),
    ]);
    project
}

#[test]
fn lists_groups_resources_and_stages() {
    seeded()
        .dvo()
        .args(&["tree", "--compartment", "c1", "--project", "proj1"])
        .passes()
        .stdout_has("proj1 proj1\n")
        .stdout_has("  Code Repositories\n    svc\n")
        .stdout_has("  Build Pipelines\n    bp-svc\n      st-build\n")
        .stdout_has("  Environments\n    <no items>\n");
}

#[test]
fn depth_limits_expansion() {
    let run = seeded().dvo().args(&["tree", "--compartment", "c1", "--project", "proj1", "--depth", "1"]).passes();

    assert_eq!(run.stdout().lines().count(), 10);
}

#[test]
fn json_tree() {
    let run = seeded().dvo().args(&["-o", "json", "tree", "--compartment", "c1", "--project", "proj1"]).passes();

    let tree = run.json();
    assert_eq!(tree["context"], "project");
    assert_eq!(tree["children"][0]["children"][0]["id"], "svc");
}
