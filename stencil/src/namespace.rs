//! Fragment namespaces.

use crate::fragment::Fragment;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::sync::Arc;
use stencil_filters::FilterSet;

/// An ordered set of fragments sharing one set of filter bindings.
///
/// Fragment names are unique: inserting a fragment under a name that is
/// already present replaces the earlier definition in place. Cloning a
/// namespace copies every fragment, while the filter table stays shared.
///
/// A namespace is also the partial source its layout is compiled against,
/// which is how `{% include "name" %}` finds fragments by name.
#[derive(Debug, Clone)]
pub struct Namespace {
    fragments: IndexMap<String, Fragment>,
    filters: Arc<FilterSet>,
}

impl Namespace {
    /// Create an empty namespace using `filters`.
    pub fn new(filters: Arc<FilterSet>) -> Self {
        Self {
            fragments: IndexMap::new(),
            filters,
        }
    }

    /// Copy of this namespace that can be changed independently.
    pub fn derive(&self) -> Self {
        self.clone()
    }

    /// Add a fragment, returning the definition it replaced.
    pub fn insert(&mut self, fragment: Fragment) -> Option<Fragment> {
        self.fragments.insert(fragment.name().to_string(), fragment)
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Fragment names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.fragments.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.values()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The filter bindings shared by this namespace.
    pub fn filters(&self) -> &Arc<FilterSet> {
        &self.filters
    }
}

impl liquid::partials::PartialSource for Namespace {
    fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    fn names(&self) -> Vec<&str> {
        Namespace::names(self)
    }

    fn try_get<'a>(&'a self, name: &str) -> Option<Cow<'a, str>> {
        self.fragments
            .get(name)
            .map(|fragment| Cow::Borrowed(fragment.source()))
    }
}
