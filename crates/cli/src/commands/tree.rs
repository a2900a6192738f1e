// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dvo tree`: list a project's resources through the lazy tree.

use super::{Context, Workspace};
use crate::color;
use crate::output;
use anyhow::Result;
use clap::Args;
use dvo_core::ScopeRef;
use dvo_tree::{ChildState, NodeId, Tree, TreeError};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;

#[derive(Args)]
pub struct TreeArgs {
    /// Compartment holding the project
    #[arg(long)]
    pub compartment: String,

    /// Project identifier
    #[arg(long)]
    pub project: String,

    /// Levels to expand below the project
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct Listed {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip)]
    placeholder: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Listed>,
}

pub async fn handle(args: TreeArgs, ctx: &Context) -> Result<()> {
    let workspace = Workspace::open(ctx)?;
    let name = workspace.provider.get(&args.project).map(|p| p.display_name).unwrap_or_default();
    let root = workspace.session.browse(args.compartment, ScopeRef::new(args.project, name));

    let listed = list(workspace.session.tree(), root, args.depth).await?;
    workspace.session.close();
    output::format_or_json(ctx.format, &listed, || print(&listed, 0))
}

/// Expand `id` and its descendants down to `depth` levels.
pub(crate) async fn list(tree: &Tree, id: NodeId, depth: usize) -> Result<Listed, TreeError> {
    let mut pending = vec![(id, 0usize)];
    let mut expanded = HashMap::new();
    while let Some((node, level)) = pending.pop() {
        let children = if level < depth { expand(tree, node).await? } else { Vec::new() };
        pending.extend(children.iter().map(|child| (*child, level + 1)));
        expanded.insert(node, children);
    }
    assemble(tree, id, &mut expanded)
}

fn assemble(tree: &Tree, id: NodeId, expanded: &mut HashMap<NodeId, Vec<NodeId>>) -> Result<Listed, TreeError> {
    let view = tree.node(id)?;
    let children = expanded.remove(&id).unwrap_or_default();
    Ok(Listed {
        placeholder: view.is_placeholder(),
        label: view.label,
        description: view.description,
        context: view.context,
        id: view.resource.map(|summary| summary.id),
        children: children
            .into_iter()
            .map(|child| assemble(tree, child, expanded))
            .collect::<Result<_, _>>()?,
    })
}

/// Children of `id` once its fetch, if any, has completed.
async fn expand(tree: &Tree, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
    let mut changes = tree.subscribe();
    let mut children = tree.children(id)?;
    while tree.node(id)?.state == ChildState::Fetching {
        match changes.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => break,
        }
        children = tree.children(id)?;
    }
    Ok(children)
}

fn print(listed: &Listed, indent: usize) {
    let pad = "  ".repeat(indent);
    let label = if listed.placeholder {
        color::muted(&listed.label)
    } else if indent == 0 {
        color::header(&listed.label)
    } else {
        listed.label.clone()
    };
    match &listed.description {
        Some(description) => println!("{pad}{label} {}", color::context(description)),
        None => println!("{pad}{label}"),
    }
    for child in &listed.children {
        print(child, indent + 1);
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
