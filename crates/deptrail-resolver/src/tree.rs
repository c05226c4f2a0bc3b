//! The walk tree: one node per dependency edge the walker expanded.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. A node
//! owns nothing; `outer` is a plain parent index and `inner` lists children
//! in the order they were attached.

use std::collections::VecDeque;

use deptrail_core::library::{names_match, LibraryRange};

use crate::cache::{ItemId, ResolutionCache};

/// Index of a node in a [`WalkTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub key: LibraryRange,
    /// Empty until resolved; stays empty when no provider knows the range.
    pub item: Option<ItemId>,
    pub outer: Option<NodeId>,
    pub inner: Vec<NodeId>,
}

/// Why a dependency may not be attached below a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eclipse {
    /// Nothing claims the name yet.
    None,
    /// The node itself or one of its ancestors has the name.
    Cycle,
    /// A node beside the path already claimed the name.
    Sibling(NodeId),
}

#[derive(Debug, Clone)]
pub struct WalkTree {
    nodes: Vec<Node>,
}

impl WalkTree {
    pub fn with_root(key: LibraryRange) -> Self {
        Self {
            nodes: vec![Node {
                key,
                item: None,
                outer: None,
                inner: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_item(&mut self, id: NodeId, item: Option<ItemId>) {
        self.nodes[id.0].item = item;
    }

    /// Attach a new child under `outer` and return it.
    pub fn add_child(&mut self, outer: NodeId, key: LibraryRange) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            item: None,
            outer: Some(outer),
            inner: Vec::new(),
        });
        self.nodes[outer.0].inner.push(id);
        id
    }

    /// Decide whether a dependency named `name` of `node` is eclipsed.
    ///
    /// Scans from `node` up to the root. At each step the step's own name is
    /// checked first (a match is a cycle), then the children already attached
    /// to it (a match means a nearer node owns the name). The scan stops at
    /// the first match.
    pub fn find_eclipsing(&self, node: NodeId, name: &str) -> Eclipse {
        let mut scan = Some(node);
        while let Some(id) = scan {
            let current = self.node(id);
            if names_match(&current.key.name, name) {
                return Eclipse::Cycle;
            }
            if let Some(&side) = current
                .inner
                .iter()
                .find(|&&side| names_match(&self.node(side).key.name, name))
            {
                return Eclipse::Sibling(side);
            }
            scan = current.outer;
        }
        Eclipse::None
    }

    /// Names from the root down to `node`, joined with ` -> `.
    pub fn path(&self, node: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.node(id);
            names.push(n.key.name.as_str());
            current = n.outer;
        }
        names.reverse();
        names.join(" -> ")
    }

    /// [`Self::path`] extended by the dependency `name` below `node`.
    pub fn chain(&self, node: NodeId, name: &str) -> String {
        format!("{} -> {name}", self.path(node))
    }

    /// Breadth-first visit from the root, threading per-branch state.
    ///
    /// The visitor receives the state its parent returned; the root gets
    /// `state`. Children are visited after all nodes queued before them.
    pub fn breadth_first<S, F>(&self, state: S, mut visitor: F)
    where
        S: Clone,
        F: FnMut(NodeId, &Node, S) -> S,
    {
        let mut queue = VecDeque::new();
        queue.push_back((self.root(), state));
        while let Some((id, state)) = queue.pop_front() {
            let node = self.node(id);
            let inner_state = visitor(id, node, state);
            for &child in &node.inner {
                queue.push_back((child, inner_state.clone()));
            }
        }
    }

    /// Render the tree, showing resolved identities where known.
    pub fn render(&self, cache: &ResolutionCache, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let root = self.root();
        output.push_str(&format!("{}\n", self.label(root, cache)));

        // (node, prefix, is_last, depth), popped in pre-order.
        let mut stack: Vec<(NodeId, String, bool, usize)> = Vec::new();
        let push_children = |stack: &mut Vec<_>, id: NodeId, prefix: &str, depth: usize| {
            let inner = &self.node(id).inner;
            for (i, &child) in inner.iter().enumerate().rev() {
                stack.push((child, prefix.to_string(), i == inner.len() - 1, depth));
            }
        };
        push_children(&mut stack, root, "", 1);

        while let Some((id, prefix, is_last, depth)) = stack.pop() {
            let connector = if is_last { "└── " } else { "├── " };
            output.push_str(&format!("{prefix}{connector}{}\n", self.label(id, cache)));

            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            push_children(&mut stack, id, &child_prefix, depth + 1);
        }

        output
    }

    fn label(&self, id: NodeId, cache: &ResolutionCache) -> String {
        let node = self.node(id);
        match node.item {
            Some(item) => cache.item(item).key.to_string(),
            None if node.key.is_framework_reference => format!("{} (framework)", node.key),
            None => format!("{} (unresolved)", node.key),
        }
    }
}
