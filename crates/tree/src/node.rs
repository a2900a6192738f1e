// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node descriptions and read-only views.

use crate::arena::NodeId;
use crate::fetch::ChildFetcher;
use dvo_core::Summary;
use std::fmt;
use std::sync::Arc;

/// Label of the shared placeholder shown while children are being fetched.
pub const LOADING_LABEL: &str = "<loading...>";
/// Label of the placeholder standing in for an empty or failed listing.
pub const NO_ITEMS_LABEL: &str = "<no items>";

pub(crate) const LOADING_CONTEXT: &str = "loading";
pub(crate) const NO_ITEMS_CONTEXT: &str = "no-items";

/// Optional interactions a node supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub renameable: bool,
    pub removable: bool,
    pub reloadable: bool,
}

impl Capabilities {
    dvo_core::setters! {
        set {
            renameable: bool,
            removable: bool,
            reloadable: bool,
        }
    }
}

/// How a node's children come to be.
#[derive(Clone)]
pub(crate) enum Content {
    Leaf,
    Fixed(Vec<NodeSpec>),
    Lazy(Arc<dyn ChildFetcher>),
}

/// Description of a node to insert. Lazy specs carry the fetcher that
/// produces their children.
#[derive(Clone)]
pub struct NodeSpec {
    pub(crate) label: String,
    pub(crate) description: Option<String>,
    pub(crate) context: Option<String>,
    pub(crate) caps: Capabilities,
    pub(crate) resource: Option<Summary>,
    pub(crate) content: Content,
}

impl NodeSpec {
    /// A node that never has children.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            context: None,
            caps: Capabilities::default(),
            resource: None,
            content: Content::Leaf,
        }
    }

    /// A node whose children are known up front.
    pub fn branch(label: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self { content: Content::Fixed(children), ..Self::leaf(label) }
    }

    /// A node whose children are fetched on first access. Lazy nodes are
    /// reloadable unless told otherwise.
    pub fn lazy(label: impl Into<String>, fetcher: Arc<dyn ChildFetcher>) -> Self {
        Self {
            caps: Capabilities::default().reloadable(true),
            content: Content::Lazy(fetcher),
            ..Self::leaf(label)
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn resource(mut self, resource: Summary) -> Self {
        self.resource = Some(resource);
        self
    }

    dvo_core::setters! {
        set {
            caps: Capabilities,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.content, Content::Lazy(_))
    }

    pub(crate) fn loading() -> Self {
        Self::leaf(LOADING_LABEL).context(LOADING_CONTEXT)
    }

    pub(crate) fn no_items() -> Self {
        Self::leaf(NO_ITEMS_LABEL).context(NO_ITEMS_CONTEXT)
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match &self.content {
            Content::Leaf => "leaf",
            Content::Fixed(_) => "fixed",
            Content::Lazy(_) => "lazy",
        };
        f.debug_struct("NodeSpec")
            .field("label", &self.label)
            .field("description", &self.description)
            .field("context", &self.context)
            .field("content", &content)
            .finish()
    }
}

/// Where a node stands in its population lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    /// Has no children and never will.
    Leaf,
    /// Lazy, not yet asked for its children.
    Unfetched,
    /// A fetch is in flight; the loading placeholder stands in.
    Fetching,
    /// Children are materialized.
    Ready(usize),
}

/// Snapshot of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub description: Option<String>,
    pub context: Option<String>,
    pub caps: Capabilities,
    pub state: ChildState,
    pub parent: Option<NodeId>,
    pub displayed: bool,
    pub resource: Option<Summary>,
}

impl NodeView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.context.as_deref(), Some(LOADING_CONTEXT) | Some(NO_ITEMS_CONTEXT))
    }
}
