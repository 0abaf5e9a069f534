//! The finished set of layouts and rendering by layout name.

use crate::composer::compose_layouts;
use crate::defaults::assemble_defaults;
use crate::error::{Result, StencilError};
use crate::fragment::FragmentParser;
use crate::layout::Layout;
use crate::tree::{DirTree, FileTree};
use crate::validate::validate_tree;
use crate::DEFAULT_LAYOUT;
use liquid::ObjectView;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use stencil_filters::FilterSet;

/// Every layout composed from one template tree.
///
/// A registry is built once and is read-only afterwards; it can be shared
/// between threads and rendered from concurrently.
///
/// ```rust
/// use stencil::{FilterSet, LayoutRegistry, MemoryTree};
///
/// let tree = MemoryTree::new()
///     .file("layouts/_defaults/_index.html.tmpl", "<h1>{{ page.title | escape }}</h1>{% include \"body.html.tmpl\" %}")
///     .file("layouts/_defaults/body.html.tmpl", "default body")
///     .file("layouts/post/body.html.tmpl", "post body");
///
/// let registry = LayoutRegistry::build(&tree, FilterSet::new()).unwrap();
/// let data = liquid::object!({ "page": { "title": "Hi" } });
///
/// assert_eq!(registry.render_to_string("post", &data).unwrap(), "<h1>Hi</h1>post body");
/// assert_eq!(registry.render_to_string("", &data).unwrap(), "<h1>Hi</h1>default body");
/// ```
#[derive(Debug)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, Layout>,
}

impl LayoutRegistry {
    /// Build every layout found in `tree`.
    ///
    /// `user_filters` are merged over the built-in filters; a user filter
    /// with a built-in's name replaces it. Any error aborts the whole build.
    pub fn build(tree: &dyn FileTree, user_filters: FilterSet) -> Result<Self> {
        validate_tree(tree)?;

        let filters = Arc::new(FilterSet::merged(&FilterSet::builtin(), &user_filters));
        let parser = FragmentParser::new(tree, &filters)?;
        let base = assemble_defaults(&parser, Arc::clone(&filters))?;
        let layouts = compose_layouts(&parser, &base)?;

        tracing::debug!("built {} layouts", layouts.len());
        Ok(Self { layouts })
    }

    /// Build from a template tree on disk.
    pub fn from_dir(root: impl AsRef<Path>, user_filters: FilterSet) -> Result<Self> {
        Self::build(&DirTree::new(root.as_ref()), user_filters)
    }

    /// Layout names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.layouts.keys().map(|s| s.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.values()
    }

    /// Render layout `name` with `data` into `sink`.
    ///
    /// An empty name selects the defaults layout.
    pub fn render(&self, name: &str, data: &dyn ObjectView, sink: &mut dyn Write) -> Result<()> {
        self.resolve(name)?.render(data, sink)
    }

    /// Render layout `name` with `data` and return the output.
    pub fn render_to_string(&self, name: &str, data: &dyn ObjectView) -> Result<String> {
        self.resolve(name)?.render_to_string(data)
    }

    fn resolve(&self, name: &str) -> Result<&Layout> {
        let name = if name.is_empty() { DEFAULT_LAYOUT } else { name };
        self.layouts
            .get(name)
            .ok_or_else(|| StencilError::LayoutNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;
    use crate::ErrorKind;
    use liquid_core::{
        Display_filter, Filter, FilterReflection, ParseFilter, Runtime, Value, ValueView,
    };

    #[derive(Clone, ParseFilter, FilterReflection)]
    #[filter(name = "shout", description = "Upper-cases its input.", parsed(ShoutFilter))]
    struct Shout;

    #[derive(Debug, Default, Display_filter)]
    #[name = "shout"]
    struct ShoutFilter;

    impl Filter for ShoutFilter {
        fn evaluate(
            &self,
            input: &dyn ValueView,
            _runtime: &dyn Runtime,
        ) -> liquid_core::Result<Value> {
            Ok(Value::scalar(input.to_kstr().to_uppercase()))
        }
    }

    fn sample_tree() -> MemoryTree {
        MemoryTree::new()
            .file(
                "layouts/_defaults/_index.html.tmpl",
                "<main>{% include \"_main.html.tmpl\" %}</main>",
            )
            .file("layouts/_defaults/_main.html.tmpl", "default main")
            .file("layouts/article/_main.html.tmpl", "article main")
            .file("layouts/bare/_index.html.tmpl", "bare only")
            .dir("layouts/.git")
            .file("layouts/README", "not a layout")
    }

    #[test]
    fn test_layout_names() {
        let registry = LayoutRegistry::build(&sample_tree(), FilterSet::new()).unwrap();
        assert_eq!(registry.names(), vec!["_defaults", "article", "bare"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("article"));
        assert!(!registry.contains(".git"));
        assert!(registry.get("README").is_none());
    }

    #[test]
    fn test_render_by_name() {
        let registry = LayoutRegistry::build(&sample_tree(), FilterSet::new()).unwrap();
        let data = liquid::Object::new();

        assert_eq!(
            registry.render_to_string("article", &data).unwrap(),
            "<main>article main</main>"
        );
        assert_eq!(registry.render_to_string("bare", &data).unwrap(), "bare only");
        assert_eq!(
            registry.render_to_string("", &data).unwrap(),
            registry.render_to_string("_defaults", &data).unwrap()
        );
    }

    #[test]
    fn test_render_to_sink() {
        let registry = LayoutRegistry::build(&sample_tree(), FilterSet::new()).unwrap();
        let mut sink = Vec::new();
        registry
            .render("article", &liquid::Object::new(), &mut sink)
            .unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "<main>article main</main>");
    }

    #[test]
    fn test_unknown_layout() {
        let registry = LayoutRegistry::build(&sample_tree(), FilterSet::new()).unwrap();
        let err = registry
            .render_to_string("missing", &liquid::Object::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_user_filters_are_available() {
        let tree = MemoryTree::new().file(
            "layouts/_defaults/_index.html.tmpl",
            "{{ \"hi\" | shout }} {{ 7 | mod: 4 }}",
        );
        let mut filters = FilterSet::new();
        filters.insert(Shout);

        let registry = LayoutRegistry::build(&tree, filters).unwrap();
        assert_eq!(
            registry
                .render_to_string("", &liquid::Object::new())
                .unwrap(),
            "HI 3"
        );
    }

    #[test]
    fn test_unknown_filter_fails_build() {
        let tree = MemoryTree::new().file(
            "layouts/_defaults/_index.html.tmpl",
            "{{ \"hi\" | shout }}",
        );
        let err = LayoutRegistry::build(&tree, FilterSet::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayoutRegistry>();
        assert_send_sync::<Layout>();
    }

    #[test]
    fn test_concurrent_renders() {
        let registry = LayoutRegistry::build(&sample_tree(), FilterSet::new()).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let name = if i % 2 == 0 { "article" } else { "_defaults" };
                        registry
                            .render_to_string(name, &liquid::Object::new())
                            .unwrap()
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let expected = if i % 2 == 0 {
                    "<main>article main</main>"
                } else {
                    "<main>default main</main>"
                };
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
