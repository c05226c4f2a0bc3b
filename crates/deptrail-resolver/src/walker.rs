//! The dependency walker.
//!
//! A walk runs in two breadth-first passes over an in-memory tree:
//!
//! 1. **Build.** Starting from the root, each node's range is resolved
//!    through the [`ResolutionCache`]. Every dependency of the resolved item
//!    is checked against the node's ancestors (a match is a cycle, which
//!    fails the walk) and against nodes already attached beside the path (a
//!    match means a nearer node owns the name, so the edge is dropped).
//!    Surviving dependencies become child nodes.
//! 2. **Collect.** The first resolved item seen per name wins. A node without
//!    an item cuts its subtree out of the result.
//!
//! Because both passes are breadth-first, the winner for a name is the one
//! nearest the root ("nearest wins").
//!
//! [`WalkContext::populate`] then flattens the winners into library
//! descriptions whose dependencies point at the winning identities.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use semver::Version;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{name_key, LibraryDescription, LibraryRange};
use deptrail_util::errors::{DeptrailError, DeptrailResult};

use crate::cache::{Item, ItemId, ResolutionCache};
use crate::provider::DependencyProvider;
use crate::report::{EclipsedEdge, UnresolvedRange, WalkReport};
use crate::tree::{Eclipse, WalkTree};

/// State for one or more walks. Not meant to be shared across threads.
#[derive(Debug, Default)]
pub struct WalkContext {
    cache: ResolutionCache,
    /// Lower-cased library name to the winning item.
    used_items: HashMap<String, ItemId>,
    /// Winners in the order they were collected.
    used_order: Vec<ItemId>,
    tree: Option<WalkTree>,
    report: WalkReport,
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the graph rooted at `name` `version` for `framework`.
    ///
    /// Fails on the first circular dependency or provider error; nothing is
    /// collected from a failed walk, and [`Self::tree`] and [`Self::report`]
    /// keep describing the last successful one. Winners from an earlier
    /// successful walk on the same context are kept.
    pub fn walk(
        &mut self,
        providers: &[Box<dyn DependencyProvider>],
        name: &str,
        version: &Version,
        framework: &FrameworkName,
    ) -> DeptrailResult<()> {
        self.cache.reset_lookups();

        let build_started = Instant::now();
        let mut report = WalkReport::new();
        let tree = self.build_tree(
            providers,
            LibraryRange::exact(name, version),
            framework,
            &mut report,
        )?;
        tracing::debug!(
            nodes = tree.len(),
            provider_lookups = self.cache.provider_lookups(),
            elapsed_ms = build_started.elapsed().as_millis() as u64,
            "graph walk stage 1 finished"
        );

        let collect_started = Instant::now();
        self.collect(&tree);
        tracing::debug!(
            used = self.used_order.len(),
            eclipsed = report.eclipsed.len(),
            unresolved = report.unresolved.len(),
            elapsed_ms = collect_started.elapsed().as_millis() as u64,
            "graph walk stage 2 finished"
        );

        self.tree = Some(tree);
        self.report = report;
        Ok(())
    }

    fn build_tree(
        &mut self,
        providers: &[Box<dyn DependencyProvider>],
        root: LibraryRange,
        framework: &FrameworkName,
        report: &mut WalkReport,
    ) -> DeptrailResult<WalkTree> {
        let mut tree = WalkTree::with_root(root);
        let mut queue = VecDeque::from([tree.root()]);

        while let Some(id) = queue.pop_front() {
            let key = tree.node(id).key.clone();
            let resolved = self.cache.resolve(providers, &key, framework)?;
            tree.set_item(id, resolved);

            let Some(item) = resolved else {
                if !key.is_framework_reference {
                    tracing::warn!(range = %key, path = %tree.path(id), "unresolved dependency");
                    report.unresolved.push(UnresolvedRange {
                        chain: tree.path(id),
                        range: key,
                    });
                }
                continue;
            };

            for dependency in self.cache.item(item).dependencies() {
                match tree.find_eclipsing(id, dependency.name()) {
                    Eclipse::Cycle => {
                        return Err(DeptrailError::CircularDependency {
                            chain: tree.chain(id, dependency.name()),
                        }
                        .into());
                    }
                    Eclipse::Sibling(winner) => {
                        let claimed_by = &tree.node(winner).key;
                        tracing::trace!(
                            dependency = %dependency.range,
                            claimed_by = %claimed_by,
                            "dependency eclipsed"
                        );
                        // Framework references never resolve; nothing won over them.
                        if dependency.range.is_framework_reference
                            || claimed_by.is_framework_reference
                        {
                            continue;
                        }
                        report.eclipsed.push(EclipsedEdge {
                            chain: tree.chain(id, dependency.name()),
                            requested: dependency.range.clone(),
                            claimed_by: claimed_by.clone(),
                            claimed_at: tree.path(winner),
                        });
                    }
                    Eclipse::None => {
                        let child = tree.add_child(id, dependency.range.clone());
                        queue.push_back(child);
                    }
                }
            }
        }

        Ok(tree)
    }

    fn collect(&mut self, tree: &WalkTree) {
        let cache = &self.cache;
        let used_items = &mut self.used_items;
        let used_order = &mut self.used_order;

        tree.breadth_first(true, |_, node, active| {
            let Some(item) = node.item.filter(|_| active) else {
                return false;
            };
            used_items
                .entry(name_key(&cache.item(item).key.name))
                .or_insert_with(|| {
                    used_order.push(item);
                    item
                });
            true
        });
    }

    /// Append the winning libraries to `libraries`.
    ///
    /// Each dependency is re-pointed at the identity that won for its name.
    /// Dependencies whose name has no winner are dropped. A library without
    /// a framework gets `framework`.
    pub fn populate(&self, framework: &FrameworkName, libraries: &mut Vec<LibraryDescription>) {
        let started = Instant::now();

        for &id in &self.used_order {
            let mut library = self.cache.item(id).description.clone();
            library.dependencies = library
                .dependencies
                .into_iter()
                .filter_map(|mut dependency| {
                    let winner = self.used_items.get(&name_key(dependency.name()))?;
                    dependency.library = Some(self.cache.item(*winner).key.clone());
                    Some(dependency)
                })
                .collect();
            library.framework.get_or_insert_with(|| framework.clone());
            libraries.push(library);
        }

        tracing::debug!(
            libraries = self.used_order.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "populate finished"
        );
    }

    /// The winning item for `name`, compared case-insensitively.
    pub fn used_item(&self, name: &str) -> Option<&Item> {
        self.used_items
            .get(&name_key(name))
            .map(|&id| self.cache.item(id))
    }

    pub fn used_item_id(&self, name: &str) -> Option<ItemId> {
        self.used_items.get(&name_key(name)).copied()
    }

    /// Winning items in breadth-first discovery order.
    pub fn used_items(&self) -> impl Iterator<Item = &Item> {
        self.used_order.iter().map(|&id| self.cache.item(id))
    }

    /// The tree built by the last successful walk.
    pub fn tree(&self) -> Option<&WalkTree> {
        self.tree.as_ref()
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Edges dropped by the last successful walk.
    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    /// Render the last walk's tree.
    pub fn render_tree(&self, max_depth: Option<usize>) -> Option<String> {
        self.tree
            .as_ref()
            .map(|tree| tree.render(&self.cache, max_depth))
    }
}
