// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tree: node ownership, lazy population and change broadcasting.

use crate::arena::{Arena, NodeId};
use crate::fetch::{ChildFetcher, FetchError};
use crate::node::{Capabilities, ChildState, Content, NodeSpec, NodeView};
use dvo_core::Summary;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

const CHANGE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("{label} does not support {action}")]
    Unsupported { action: &'static str, label: String },
    #[error("node {0} cannot become a child of itself or its descendants")]
    WouldCycle(NodeId),
}

/// Published whenever the visible shape of the tree changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeChange {
    /// The roots changed, or the change has no displayed ancestor.
    Roots,
    /// Refresh this displayed node and everything below it.
    Node(NodeId),
}

enum Children {
    Leaf,
    Unfetched,
    Fetching { token: u64 },
    Ready(Vec<NodeId>),
}

struct Node {
    label: String,
    description: Option<String>,
    context: Option<String>,
    caps: Capabilities,
    resource: Option<Summary>,
    fetcher: Option<Arc<dyn ChildFetcher>>,
    children: Children,
    parent: Option<NodeId>,
    displayed: bool,
    /// Host that took over this node's children and displays them.
    collapsed_into: Option<NodeId>,
    /// Child folded into this node, freed along with it.
    absorbed: Option<NodeId>,
}

impl Node {
    /// Split a spec into the node itself and its fixed children.
    fn from_spec(spec: NodeSpec) -> (Self, Vec<NodeSpec>) {
        let NodeSpec { label, description, context, caps, resource, content } = spec;
        let (children, fetcher, fixed) = match content {
            Content::Leaf => (Children::Leaf, None, Vec::new()),
            Content::Lazy(fetcher) => (Children::Unfetched, Some(fetcher), Vec::new()),
            Content::Fixed(specs) => (Children::Ready(Vec::new()), None, specs),
        };
        let node = Node {
            label,
            description,
            context,
            caps,
            resource,
            fetcher,
            children,
            parent: None,
            displayed: false,
            collapsed_into: None,
            absorbed: None,
        };
        (node, fixed)
    }
}

struct TreeState {
    arena: Arena<Node>,
    roots: Vec<NodeId>,
    loading: NodeId,
    next_token: u64,
}

impl TreeState {
    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.arena.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.arena.get_mut(id).ok_or(TreeError::UnknownNode(id))
    }

    /// Materialize a spec and its fixed descendants as a detached subtree.
    fn build(&mut self, spec: NodeSpec) -> NodeId {
        let (node, fixed) = Node::from_spec(spec);
        let id = self.arena.insert(node);
        let ids: Vec<NodeId> = fixed.into_iter().map(|spec| self.build(spec)).collect();
        if !ids.is_empty() {
            self.install(id, ids);
        }
        id
    }

    /// Unlink a node from its parent (or the root list).
    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.arena.get_mut(id).and_then(|node| node.parent.take());
        match parent {
            Some(parent) => {
                if let Some(Node { children: Children::Ready(ids), .. }) = self.arena.get_mut(parent) {
                    ids.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
        parent
    }

    /// Make `ids` the complete child list of `owner`. Previous children
    /// lose their parent reference; a collapsed owner hands the list on
    /// to its host, whose previous children are freed.
    fn install(&mut self, owner: NodeId, ids: Vec<NodeId>) {
        let (owner, redirected) = match self.arena.get_mut(owner) {
            Some(node) => match node.collapsed_into {
                Some(host) if host != owner => {
                    node.children = Children::Ready(Vec::new());
                    (host, true)
                }
                _ => (owner, false),
            },
            None => return,
        };
        for &id in &ids {
            self.detach(id);
            if let Some(node) = self.arena.get_mut(id) {
                node.parent = Some(owner);
            }
        }
        let previous = match self.arena.get_mut(owner) {
            Some(node) => std::mem::replace(&mut node.children, Children::Ready(ids)),
            None => return,
        };
        if let Children::Ready(previous) = previous {
            for id in previous {
                let orphaned = match self.arena.get_mut(id) {
                    Some(node) if node.parent == Some(owner) => {
                        node.parent = None;
                        true
                    }
                    _ => false,
                };
                if orphaned && redirected {
                    self.free(id);
                }
            }
        }
    }

    /// Remove a detached subtree from the arena.
    fn free(&mut self, id: NodeId) {
        if id == self.loading {
            return;
        }
        if let Some(node) = self.arena.remove(id) {
            if let Children::Ready(ids) = node.children {
                for child in ids {
                    self.free(child);
                }
            }
            if let Some(absorbed) = node.absorbed {
                self.free(absorbed);
            }
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.arena.get(id).and_then(|node| node.parent);
        }
        false
    }

    /// Nearest displayed node at or above `id`.
    fn change_for(&self, id: NodeId) -> TreeChange {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.arena.get(id) else { break };
            if let Some(host) = node.collapsed_into {
                current = Some(host);
                continue;
            }
            if node.displayed {
                return TreeChange::Node(id);
            }
            current = node.parent;
        }
        TreeChange::Roots
    }

    fn unsupported(&self, id: NodeId, action: &'static str) -> TreeError {
        let label = self.arena.get(id).map(|node| node.label.clone()).unwrap_or_default();
        TreeError::Unsupported { action, label }
    }
}

/// Lazily populated tree shared between the caller and fetch tasks.
///
/// Cloning is cheap; every clone refers to the same nodes.
#[derive(Clone)]
pub struct Tree {
    state: Arc<Mutex<TreeState>>,
    changes: broadcast::Sender<TreeChange>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let (placeholder, _) = Node::from_spec(NodeSpec::loading());
        let loading = arena.insert(placeholder);
        let state = TreeState { arena, roots: Vec::new(), loading, next_token: 0 };
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self { state: Arc::new(Mutex::new(state)), changes }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: TreeChange) {
        // No subscribers is fine
        let _ = self.changes.send(change);
    }

    pub fn insert_root(&self, spec: NodeSpec) -> NodeId {
        let id = {
            let mut state = self.state.lock();
            let id = state.build(spec);
            state.roots.push(id);
            id
        };
        self.publish(TreeChange::Roots);
        id
    }

    /// Create a detached node, to be placed later with [`Tree::set_children`].
    pub fn add_node(&self, spec: NodeSpec) -> NodeId {
        self.state.lock().build(spec)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.state.lock().roots.clone()
    }

    /// The shared placeholder returned while a fetch is in flight.
    pub fn loading_node(&self) -> NodeId {
        self.state.lock().loading
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().arena.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.state.lock().arena.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Result<NodeView, TreeError> {
        let state = self.state.lock();
        let node = state.node(id)?;
        let state_of = match &node.children {
            Children::Leaf => ChildState::Leaf,
            Children::Unfetched => ChildState::Unfetched,
            Children::Fetching { .. } => ChildState::Fetching,
            Children::Ready(ids) => ChildState::Ready(ids.len()),
        };
        Ok(NodeView {
            id,
            label: node.label.clone(),
            description: node.description.clone(),
            context: node.context.clone(),
            caps: node.caps,
            state: state_of,
            parent: node.parent,
            displayed: node.displayed,
            resource: node.resource.clone(),
        })
    }

    /// Children of a node. The first call on a lazy node starts its fetch
    /// and returns the loading placeholder until the fetch lands.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let (fetcher, token, loading) = {
            let mut state = self.state.lock();
            let loading = state.loading;
            let token = state.next_token;
            let node = state.node_mut(id)?;
            match &node.children {
                Children::Leaf => return Ok(Vec::new()),
                Children::Ready(ids) => return Ok(ids.clone()),
                Children::Fetching { .. } => return Ok(vec![loading]),
                Children::Unfetched => {}
            }
            let Some(fetcher) = node.fetcher.clone() else {
                node.children = Children::Ready(Vec::new());
                return Ok(Vec::new());
            };
            node.children = Children::Fetching { token };
            state.next_token += 1;
            (fetcher, token, loading)
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let tree = self.clone();
                runtime.spawn(async move {
                    let result = fetcher.fetch().await;
                    tree.complete(id, token, result);
                });
            }
            Err(e) => self.complete(id, token, Err(FetchError::Other(e.to_string()))),
        }
        Ok(vec![loading])
    }

    /// Land a fetch result unless the node was reset or discarded meanwhile.
    fn complete(&self, id: NodeId, token: u64, result: Result<Vec<NodeSpec>, FetchError>) {
        let change = {
            let mut state = self.state.lock();
            let label = match state.arena.get(id) {
                Some(Node { children: Children::Fetching { token: current }, label, .. })
                    if *current == token =>
                {
                    label.clone()
                }
                Some(_) => {
                    tracing::debug!(node = %id, "discarding stale fetch result");
                    return;
                }
                None => {
                    tracing::debug!(node = %id, "discarding fetch result of a discarded node");
                    return;
                }
            };
            let specs = match result {
                Ok(specs) if !specs.is_empty() => specs,
                Ok(_) => vec![NodeSpec::no_items()],
                Err(e) => {
                    tracing::warn!(node = %label, error = %e, "failed to fetch children");
                    vec![NodeSpec::no_items()]
                }
            };
            let ids = specs.into_iter().map(|spec| state.build(spec)).collect();
            state.install(id, ids);
            state.change_for(id)
        };
        self.publish(change);
    }

    /// Replace a node's children with existing nodes, taking them away
    /// from wherever they were. The previous children become detached.
    pub fn set_children(&self, id: NodeId, children: Vec<NodeId>) -> Result<(), TreeError> {
        let change = {
            let mut state = self.state.lock();
            state.node(id)?;
            for &child in &children {
                state.node(child)?;
                if state.is_ancestor_or_self(child, id) {
                    return Err(TreeError::WouldCycle(child));
                }
            }
            state.install(id, children);
            state.change_for(id)
        };
        self.publish(change);
        Ok(())
    }

    /// Unlink a node from its parent. Returns whether it had one.
    pub fn remove_from_parent(&self, id: NodeId) -> Result<bool, TreeError> {
        let change = {
            let mut state = self.state.lock();
            state.node(id)?;
            let was_root = state.roots.contains(&id);
            match state.detach(id) {
                Some(parent) => state.change_for(parent),
                None if was_root => TreeChange::Roots,
                None => return Ok(false),
            }
        };
        self.publish(change);
        Ok(true)
    }

    /// Remove a node and its subtree for good. In-flight fetches below it
    /// are dropped when they land.
    pub fn discard(&self, id: NodeId) -> Result<(), TreeError> {
        let change = {
            let mut state = self.state.lock();
            if id == state.loading {
                return Err(state.unsupported(id, "discard"));
            }
            state.node(id)?;
            let was_root = state.roots.contains(&id);
            let change = match state.detach(id) {
                Some(parent) => Some(state.change_for(parent)),
                None if was_root => Some(TreeChange::Roots),
                None => None,
            };
            state.free(id);
            change
        };
        if let Some(change) = change {
            self.publish(change);
        }
        Ok(())
    }

    /// Drop every root and every detached node. Only the loading
    /// placeholder survives.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.roots.clear();
            let loading = state.loading;
            state.arena.retain(|id| id == loading);
        }
        self.publish(TreeChange::Roots);
    }

    /// Reset a lazy node so its next access fetches again. A host also
    /// lets go of the child it absorbed.
    pub fn reload(&self, id: NodeId) -> Result<(), TreeError> {
        let change = {
            let mut state = self.state.lock();
            let node = state.node(id)?;
            if !node.caps.reloadable || node.fetcher.is_none() {
                return Err(state.unsupported(id, "reload"));
            }
            let (previous, absorbed) = match state.node_mut(id) {
                Ok(node) => {
                    (std::mem::replace(&mut node.children, Children::Unfetched), node.absorbed.take())
                }
                Err(e) => return Err(e),
            };
            if let Children::Ready(ids) = previous {
                for child in ids {
                    state.free(child);
                }
            }
            if let Some(absorbed) = absorbed {
                state.free(absorbed);
            }
            state.change_for(id)
        };
        self.publish(change);
        Ok(())
    }

    pub fn rename(&self, id: NodeId, label: impl Into<String>) -> Result<(), TreeError> {
        let change = {
            let mut state = self.state.lock();
            if !state.node(id)?.caps.renameable {
                return Err(state.unsupported(id, "rename"));
            }
            state.node_mut(id)?.label = label.into();
            state.change_for(id)
        };
        self.publish(change);
        Ok(())
    }

    pub fn set_description(&self, id: NodeId, description: Option<String>) -> Result<(), TreeError> {
        let change = {
            let mut state = self.state.lock();
            state.node_mut(id)?.description = description;
            state.change_for(id)
        };
        self.publish(change);
        Ok(())
    }

    /// Mark whether the caller currently renders this node. Changes below
    /// a displayed node are reported against it.
    pub fn set_displayed(&self, id: NodeId, displayed: bool) -> Result<(), TreeError> {
        self.state.lock().node_mut(id)?.displayed = displayed;
        Ok(())
    }

    /// Fold a node's single child into it: the node adopts the
    /// grandchildren and the child reports its later changes through the
    /// node. Returns false when the node does not have exactly one
    /// populated child.
    pub fn collapse(&self, id: NodeId) -> Result<bool, TreeError> {
        let change = {
            let mut state = self.state.lock();
            let only = match &state.node(id)?.children {
                Children::Ready(ids) if ids.len() == 1 => ids[0],
                _ => return Ok(false),
            };
            let grandchildren = match &state.node(only)?.children {
                Children::Ready(ids) => ids.clone(),
                _ => return Ok(false),
            };
            state.install(id, grandchildren);
            state.node_mut(only)?.collapsed_into = Some(id);
            if let Some(previous) = state.node_mut(id)?.absorbed.replace(only) {
                state.free(previous);
            }
            state.change_for(id)
        };
        self.publish(change);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
