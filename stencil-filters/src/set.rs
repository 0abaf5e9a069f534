//! Filter binding tables

use crate::{AbsUrl, Markdown, Mod, ModBool};
use indexmap::IndexMap;
use liquid_core::ParseFilter;

/// An ordered table of liquid filters keyed by filter name.
///
/// A filter's name is taken from its reflection, so inserting a filter whose
/// name is already present replaces the earlier binding. This is how caller
/// supplied filters shadow the built-ins:
///
/// ```rust
/// use stencil_filters::{FilterSet, Mod};
///
/// let mut user = FilterSet::new();
/// user.insert(Mod);
///
/// let merged = FilterSet::merged(&FilterSet::builtin(), &user);
/// assert!(merged.contains("mod"));
/// assert_eq!(merged.len(), FilterSet::builtin().len());
/// ```
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: IndexMap<String, Box<dyn ParseFilter>>,
}

impl FilterSet {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// The helper filters available in every stencil namespace
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.insert(AbsUrl);
        set.insert(Mod);
        set.insert(ModBool);
        set.insert(Markdown);
        set
    }

    /// Merge two tables; bindings from `overrides` replace same-named bindings in `base`.
    pub fn merged(base: &FilterSet, overrides: &FilterSet) -> Self {
        let mut set = base.clone();
        for filter in overrides.filters.values() {
            set.insert_boxed(filter.clone());
        }
        set
    }

    /// Add a filter, replacing any existing binding with the same name
    pub fn insert<F: ParseFilter + 'static>(&mut self, filter: F) {
        self.insert_boxed(Box::new(filter));
    }

    /// Add an already boxed filter, replacing any existing binding with the same name
    pub fn insert_boxed(&mut self, filter: Box<dyn ParseFilter>) {
        let name = filter.reflection().name().to_string();
        if self.filters.insert(name.clone(), filter).is_some() {
            tracing::trace!("filter '{}' replaced an earlier binding", name);
        }
    }

    /// Whether a filter with this name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Names of all bound filters, in binding order
    pub fn names(&self) -> Vec<&str> {
        self.filters.keys().map(|s| s.as_str()).collect()
    }

    /// Number of bound filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filters are bound
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Register every filter in this set with a liquid parser builder
    pub fn register<P>(&self, builder: liquid::ParserBuilder<P>) -> liquid::ParserBuilder<P>
    where
        P: liquid::partials::PartialCompiler,
    {
        self.filters
            .values()
            .fold(builder, |builder, filter| builder.filter(filter.clone()))
    }
}

impl std::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSet")
            .field("filters", &self.names())
            .finish()
    }
}
