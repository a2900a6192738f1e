//! `dvo remove-repo` specs

use crate::prelude::*;

fn remove(project: &Project, folder: &str) -> CliBuilder {
    project.dvo().args(&["remove-repo", folder, "--compartment", "c1", "--project", "proj1"])
}

#[test]
fn removing_one_of_two_repositories_keeps_the_project() {
    let project = Project::empty();
    project.inventory(&[
        ("proj1", "project", "c1"),
        ("svc", "code-repository", "proj1"),
        ("web", "code-repository", "proj1"),
        ("proj1-svc", "container-repository", "c1"),
        ("proj1-web", "container-repository", "c1"),
    ]);
    project.file("svc/.devops/build.json", "{}");

    remove(&project, "svc")
        .passes()
        .stdout_has("Deleting container repository proj1-svc")
        .stdout_has("Deleting code repository svc")
        .stdout_has("svc: 2 resources deleted")
        .stdout_lacks("project removed");

    assert_eq!(project.live_ids(), vec!["proj1", "web", "proj1-web"]);
    assert!(!project.exists("svc/.devops"));
}

#[test]
fn removing_the_last_repository_removes_the_project() {
    let project = Project::empty();
    project.inventory(&[("proj1", "project", "c1"), ("svc", "code-repository", "proj1")]);

    remove(&project, "svc")
        .passes()
        .stdout_has("Deleting devops project proj1")
        .stdout_has("svc: 2 resources deleted, project removed");

    assert!(project.live_ids().is_empty());
}

#[test]
fn unknown_repository_fails() {
    let project = Project::empty();
    project.inventory(&[("proj1", "project", "c1"), ("web", "code-repository", "proj1")]);

    remove(&project, "svc")
        .fails()
        .code(1)
        .stdout_has("code repository svc not found in project proj1");

    assert_eq!(project.live_ids(), vec!["proj1", "web"]);
}
