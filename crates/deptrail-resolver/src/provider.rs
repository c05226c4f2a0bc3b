//! The provider capability the walker negotiates with.
//!
//! Providers are consulted in priority order; the first one to describe a
//! range wins it outright, there is no merging across providers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{names_match, LibraryDescription, LibraryRange};
use deptrail_util::errors::DeptrailResult;

/// Something that can turn a requested range into a concrete library.
pub trait DependencyProvider {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Describe the library satisfying `range` for `framework`.
    ///
    /// `Ok(None)` means "not mine"; errors abort the whole walk.
    fn get_description(
        &self,
        range: &LibraryRange,
        framework: &FrameworkName,
    ) -> DeptrailResult<Option<LibraryDescription>>;

    /// Locations this provider looked in, for "not found" diagnostics.
    fn attempted_paths(&self, _framework: &FrameworkName) -> Vec<String> {
        Vec::new()
    }
}

impl<T: DependencyProvider + ?Sized> DependencyProvider for Rc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_description(
        &self,
        range: &LibraryRange,
        framework: &FrameworkName,
    ) -> DeptrailResult<Option<LibraryDescription>> {
        (**self).get_description(range, framework)
    }

    fn attempted_paths(&self, framework: &FrameworkName) -> Vec<String> {
        (**self).attempted_paths(framework)
    }
}

/// A provider backed by a fixed set of library descriptions.
///
/// Picks the highest version whose identity satisfies the requested range.
/// Framework references are never answered.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    name: String,
    libraries: Vec<LibraryDescription>,
    calls: Cell<usize>,
    requests: RefCell<Vec<LibraryRange>>,
}

impl InMemoryProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_library(mut self, library: LibraryDescription) -> Self {
        self.add(library);
        self
    }

    pub fn add(&mut self, library: LibraryDescription) {
        self.libraries.push(library);
    }

    /// Number of times [`DependencyProvider::get_description`] was called.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Every range this provider was asked about, in order.
    pub fn requests(&self) -> Vec<LibraryRange> {
        self.requests.borrow().clone()
    }
}

impl DependencyProvider for InMemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_description(
        &self,
        range: &LibraryRange,
        _framework: &FrameworkName,
    ) -> DeptrailResult<Option<LibraryDescription>> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(range.clone());

        if range.is_framework_reference {
            return Ok(None);
        }

        let best = self
            .libraries
            .iter()
            .filter(|lib| names_match(&lib.identity.name, &range.name))
            .filter(|lib| match (&range.version_range, &lib.identity.version) {
                (None, _) => true,
                (Some(req), Some(version)) => req.matches(version),
                (Some(_), None) => false,
            })
            .max_by(|a, b| a.identity.version.cmp(&b.identity.version));

        Ok(best.map(|lib| {
            let mut lib = lib.clone();
            lib.requested = range.clone();
            lib
        }))
    }
}
