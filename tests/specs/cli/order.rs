//! `dvo order` specs

use crate::prelude::*;

#[test]
fn prints_the_tier_plan() {
    let project = Project::empty();
    project.checkpoint("svc", single_repository(Some("c1")));

    project.dvo().args(&["order", "svc"]).passes().stdout_eq(
        "4. build pipelines\n   docker_native build pipeline of svc p1\n\
         6. source code repositories\n   code repository of svc r1\n",
    );
}

#[test]
fn json_plan() {
    let project = Project::empty();
    project.checkpoint("svc", single_repository(Some("c1")));

    let run = project.dvo().args(&["order", "svc", "-o", "json"]).passes();

    let plan = run.json();
    assert_eq!(plan[0]["tier"], 4);
    assert_eq!(plan[1]["slots"][0], json!({ "slot": "code repository of svc", "id": "r1" }));
}

#[test]
fn order_needs_a_checkpoint() {
    Project::empty().dvo().args(&["order", "svc"]).fails().code(2);
}
