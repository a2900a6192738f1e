//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("teardown")
        .stdout_has("remove-repo")
        .stdout_has("show")
        .stdout_has("order")
        .stdout_has("tree");
}

#[test]
fn remove_repo_help_shows_its_options() {
    cli()
        .args(&["remove-repo", "--help"])
        .passes()
        .stdout_has("--compartment")
        .stdout_has("--project-name")
        .stdout_has("--sub");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_command_fails() {
    cli().args(&["deploy"]).fails().code(2);
}
