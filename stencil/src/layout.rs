//! Compiled layouts.

use crate::error::{Result, StencilError};
use crate::include::parser_builder;
use crate::namespace::Namespace;
use crate::INDEX_FRAGMENT;
use liquid::partials::EagerCompiler;
use liquid::ObjectView;
use std::fmt;
use std::io::Write;

/// A fully composed namespace with its entry fragment compiled.
///
/// Every fragment of the namespace is compiled into the entry template's
/// partial store, so `{% include %}` resolves against this layout only.
/// A layout never changes once compiled.
pub struct Layout {
    name: String,
    namespace: Namespace,
    entry: liquid::Template,
}

impl Layout {
    /// Close `namespace` into a renderable layout named `name`.
    pub fn compile(name: impl Into<String>, namespace: Namespace) -> Result<Self> {
        let name = name.into();
        let entry_source = match namespace.get(INDEX_FRAGMENT) {
            Some(fragment) => fragment.source().to_string(),
            None => return Err(StencilError::MissingEntry { layout: name }),
        };

        let compile_error = |source| StencilError::Compile {
            layout: name.clone(),
            source,
        };

        let parser = parser_builder(namespace.filters())
            .partials(EagerCompiler::new(namespace.clone()))
            .build()
            .map_err(compile_error)?;
        let entry = parser.parse(&entry_source).map_err(compile_error)?;

        Ok(Self {
            name,
            namespace,
            entry,
        })
    }

    /// The layout name, which is its directory's base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fragment names in the order they were registered.
    pub fn fragment_names(&self) -> Vec<&str> {
        self.namespace.names()
    }

    pub fn has_fragment(&self, name: &str) -> bool {
        self.namespace.contains(name)
    }

    /// Source of the named fragment as it is used by this layout.
    pub fn fragment_source(&self, name: &str) -> Option<&str> {
        self.namespace.get(name).map(|fragment| fragment.source())
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Execute the entry fragment against `data`, writing to `sink`.
    pub fn render(&self, data: &dyn ObjectView, sink: &mut dyn Write) -> Result<()> {
        self.entry
            .render_to(sink, data)
            .map_err(|source| self.render_error(source))
    }

    /// Execute the entry fragment against `data` and return the output.
    pub fn render_to_string(&self, data: &dyn ObjectView) -> Result<String> {
        self.entry
            .render(data)
            .map_err(|source| self.render_error(source))
    }

    fn render_error(&self, source: liquid::Error) -> StencilError {
        StencilError::Render {
            layout: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("name", &self.name)
            .field("fragments", &self.fragment_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Fragment, FragmentOrigin};
    use std::sync::Arc;
    use stencil_filters::FilterSet;

    fn namespace(fragments: &[(&str, &str)]) -> Namespace {
        let mut ns = Namespace::new(Arc::new(FilterSet::builtin()));
        for (name, source) in fragments {
            ns.insert(Fragment::new(*name, *source, FragmentOrigin::Synthesized));
        }
        ns
    }

    #[test]
    fn test_compile_and_render_with_include() {
        let ns = namespace(&[
            (INDEX_FRAGMENT, "<p>{% include \"body.html.tmpl\" %}</p>"),
            ("body.html.tmpl", "{{ who }}"),
        ]);
        let layout = Layout::compile("page", ns).unwrap();

        let data = liquid::object!({ "who": "world" });
        assert_eq!(layout.render_to_string(&data).unwrap(), "<p>world</p>");

        let mut sink = Vec::new();
        layout.render(&data, &mut sink).unwrap();
        assert_eq!(sink, b"<p>world</p>");
    }

    #[test]
    fn test_missing_entry() {
        let err = Layout::compile("empty", namespace(&[("a", "a")])).unwrap_err();
        assert!(matches!(err, StencilError::MissingEntry { ref layout } if layout == "empty"));
    }

    #[test]
    fn test_render_error_names_layout() {
        let ns = namespace(&[(INDEX_FRAGMENT, "{{ 1 | mod: 0 }}")]);
        let layout = Layout::compile("maths", ns).unwrap();

        let err = layout.render_to_string(&liquid::Object::new()).unwrap_err();
        assert!(err.is_execution());
        assert!(err.to_string().contains("'maths'"));
    }

    #[test]
    fn test_fragment_accessors() {
        let ns = namespace(&[(INDEX_FRAGMENT, "index"), ("side.html.tmpl", "side")]);
        let layout = Layout::compile("blog", ns).unwrap();

        assert_eq!(layout.name(), "blog");
        assert_eq!(
            layout.fragment_names(),
            vec![INDEX_FRAGMENT, "side.html.tmpl"]
        );
        assert!(layout.has_fragment("side.html.tmpl"));
        assert_eq!(layout.fragment_source("side.html.tmpl"), Some("side"));
        assert_eq!(layout.fragment_source("nope"), None);
        assert!(format!("{:?}", layout).contains("blog"));
    }
}
