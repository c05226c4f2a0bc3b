//! Resolution cache: memoizes provider answers for the length of a walk.
//!
//! Lookups are keyed twice. The requested range maps to its answer (possibly
//! "not found"), and the resolved identity maps to the item built for it, so
//! two ranges that land on the same concrete version share one [`Item`].

use std::collections::HashMap;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{
    LibraryDependency, LibraryDescription, LibraryIdentity, LibraryRange,
};
use deptrail_util::errors::{DeptrailError, DeptrailResult};
use miette::WrapErr;

use crate::provider::DependencyProvider;

/// Index of an [`Item`] in a [`ResolutionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

/// A resolved library, shared by every node whose range resolved to it.
#[derive(Debug, Clone)]
pub struct Item {
    pub key: LibraryIdentity,
    pub description: LibraryDescription,
}

impl Item {
    pub fn dependencies(&self) -> &[LibraryDependency] {
        &self.description.dependencies
    }
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    items: Vec<Item>,
    by_range: HashMap<LibraryRange, Option<ItemId>>,
    by_identity: HashMap<LibraryIdentity, ItemId>,
    provider_lookups: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.0]
    }

    /// Number of distinct items allocated so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ranges that had to be sent to the providers.
    pub fn provider_lookups(&self) -> usize {
        self.provider_lookups
    }

    /// Forget range and identity lookups while keeping allocated items valid.
    pub fn reset_lookups(&mut self) {
        self.by_range.clear();
        self.by_identity.clear();
        self.provider_lookups = 0;
    }

    /// Resolve `range`, asking `providers` in order only on a cache miss.
    ///
    /// A provider error stops the lookup and names the provider that failed.
    pub fn resolve(
        &mut self,
        providers: &[Box<dyn DependencyProvider>],
        range: &LibraryRange,
        framework: &FrameworkName,
    ) -> DeptrailResult<Option<ItemId>> {
        if let Some(&cached) = self.by_range.get(range) {
            return Ok(cached);
        }

        self.provider_lookups += 1;
        let mut found = None;
        for provider in providers {
            let answer = provider
                .get_description(range, framework)
                .wrap_err_with(|| DeptrailError::Provider {
                    provider: provider.name().to_string(),
                    message: format!("could not describe {range}"),
                })?;
            if let Some(description) = answer {
                tracing::trace!(
                    range = %range,
                    provider = provider.name(),
                    identity = %description.identity,
                    "range resolved"
                );
                found = Some(description);
                break;
            }
        }

        let Some(description) = found else {
            self.by_range.insert(range.clone(), None);
            return Ok(None);
        };

        // Another range already produced this identity: share its item.
        if let Some(&existing) = self.by_identity.get(&description.identity) {
            self.by_range.insert(range.clone(), Some(existing));
            return Ok(Some(existing));
        }

        let id = ItemId(self.items.len());
        let key = description.identity.clone();
        self.items.push(Item {
            key: key.clone(),
            description,
        });
        self.by_range.insert(range.clone(), Some(id));
        self.by_identity.insert(key, id);
        Ok(Some(id))
    }
}
