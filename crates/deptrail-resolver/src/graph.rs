//! Graph view of a populated library set.
//!
//! Built after [`crate::walker::WalkContext::populate`], so every edge
//! already points at the identity that won resolution.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use semver::Version;

use deptrail_core::library::{name_key, LibraryDescription, LibraryType};

/// A node in the resolved graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResolvedNode {
    pub name: String,
    pub version: Option<Version>,
    pub library_type: LibraryType,
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

/// Resolved libraries and their corrected dependency edges.
pub struct ResolvedGraph {
    graph: DiGraph<ResolvedNode, ()>,
    /// Lower-cased name to node index.
    index: HashMap<String, NodeIndex>,
    pub root: Option<NodeIndex>,
}

impl ResolvedGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    /// Build the graph for `libraries`, rooted at the library named `root`.
    pub fn from_libraries(root: &str, libraries: &[LibraryDescription]) -> Self {
        let mut g = Self::new();
        for lib in libraries {
            g.add_node(ResolvedNode {
                name: lib.identity.name.clone(),
                version: lib.identity.version.clone(),
                library_type: lib.library_type,
            });
        }
        for lib in libraries {
            let Some(from) = g.find(&lib.identity.name) else {
                continue;
            };
            for dep in &lib.dependencies {
                let target = dep.library.as_ref().map_or(dep.name(), |id| id.name.as_str());
                if let Some(to) = g.find(target) {
                    g.add_edge(from, to);
                }
            }
        }
        g.root = g.find(root);
        g
    }

    /// Add or retrieve a node. If the name already exists, returns the existing index.
    pub fn add_node(&mut self, node: ResolvedNode) -> NodeIndex {
        let key = name_key(&node.name);
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        idx
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Look up a node by library name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(&name_key(name)).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &ResolvedNode {
        &self.graph[idx]
    }

    /// Direct dependencies of a node, sorted by name.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Outgoing)
    }

    /// Reverse dependencies (who depends on this node), sorted by name.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Incoming)
    }

    fn neighbors_sorted(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort_by(|a, b| self.graph[*a].name.cmp(&self.graph[*b].name));
        out
    }

    /// Render the dependency tree below the root.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        match self.root {
            Some(root) => self.render(root, Direction::Outgoing, max_depth),
            None => String::new(),
        }
    }

    /// Render `start` and its neighbors in `dir`, depth-first, without recursion.
    ///
    /// A node already on the current path is printed but not expanded again;
    /// corrected edges can point back up the tree.
    fn render(&self, start: NodeIndex, dir: Direction, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[start]);
        let mut stack = Vec::new();
        self.push_frames(&mut stack, start, dir, "", 1, &[start]);

        while let Some(frame) = stack.pop() {
            let connector = if frame.is_last { "└── " } else { "├── " };
            output.push_str(&format!(
                "{}{connector}{}\n",
                frame.prefix, self.graph[frame.node]
            ));

            let too_deep = max_depth.is_some_and(|max| frame.depth >= max);
            if too_deep || frame.on_path.contains(&frame.node) {
                continue;
            }
            let child_prefix = format!(
                "{}{}",
                frame.prefix,
                if frame.is_last { "    " } else { "│   " }
            );
            let mut on_path = frame.on_path;
            on_path.push(frame.node);
            self.push_frames(
                &mut stack,
                frame.node,
                dir,
                &child_prefix,
                frame.depth + 1,
                &on_path,
            );
        }
        output
    }

    fn push_frames(
        &self,
        stack: &mut Vec<Frame>,
        parent: NodeIndex,
        dir: Direction,
        prefix: &str,
        depth: usize,
        on_path: &[NodeIndex],
    ) {
        let children = self.neighbors_sorted(parent, dir);
        let count = children.len();
        // Reversed so the first child is popped first.
        for (i, node) in children.into_iter().enumerate().rev() {
            stack.push(Frame {
                node,
                prefix: prefix.to_string(),
                is_last: i + 1 == count,
                depth,
                on_path: on_path.to_vec(),
            });
        }
    }

    /// Shortest path from the root to the library named `name`.
    pub fn find_path(&self, name: &str) -> Option<Vec<&ResolvedNode>> {
        let root = self.root?;
        let target = self.find(name)?;

        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([root]);
        let mut seen = HashSet::from([root]);
        while let Some(idx) = queue.pop_front() {
            if idx == target {
                let mut path = vec![idx];
                let mut current = idx;
                while let Some(&prev) = came_from.get(&current) {
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return Some(path.into_iter().map(|i| &self.graph[i]).collect());
            }
            for edge in self.graph.edges(idx) {
                if seen.insert(edge.target()) {
                    came_from.insert(edge.target(), idx);
                    queue.push_back(edge.target());
                }
            }
        }
        None
    }

    /// Render everything that depends on `name`, transitively.
    pub fn print_inverted_tree(&self, name: &str) -> String {
        match self.find(name) {
            Some(idx) => self.render(idx, Direction::Incoming, None),
            None => String::new(),
        }
    }

    /// Number of nodes (excluding root).
    pub fn len(&self) -> usize {
        let total = self.graph.node_count();
        if self.root.is_some() {
            total.saturating_sub(1)
        } else {
            total
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Frame {
    node: NodeIndex,
    prefix: String,
    is_last: bool,
    depth: usize,
    on_path: Vec<NodeIndex>,
}

impl Default for ResolvedGraph {
    fn default() -> Self {
        Self::new()
    }
}
