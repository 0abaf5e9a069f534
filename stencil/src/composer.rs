//! Per-layout composition on top of the defaults namespace.

use crate::error::{Result, StencilError};
use crate::fragment::{FragmentOrigin, FragmentParser};
use crate::layout::Layout;
use crate::namespace::Namespace;
use crate::{INDEX_FRAGMENT, LAYOUTS_DIR, MAIN_FRAGMENT};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Entry fragment used when a namespace has none: it renders the main slot.
pub const FALLBACK_ENTRY_SOURCE: &str = "{%- include \"_main.html.tmpl\" -%}";

/// Compose a layout for every visible directory under `layouts`.
///
/// The defaults directory is composed like any other layout, so it is
/// renderable under its own name.
pub fn compose_layouts(
    parser: &FragmentParser<'_>,
    base: &Namespace,
) -> Result<BTreeMap<String, Layout>> {
    let dir = PathBuf::from(LAYOUTS_DIR);
    let entries = parser
        .tree()
        .read_dir(&dir)
        .map_err(|e| StencilError::read_directory(&dir, e))?;

    let mut layouts = BTreeMap::new();
    for entry in entries {
        if !entry.is_dir() || entry.is_hidden() {
            continue;
        }
        let layout = compose_layout(parser, base, &entry.name)?;
        layouts.insert(entry.name, layout);
    }

    Ok(layouts)
}

/// Derive the namespace for one layout directory and compile it.
///
/// Files in the layout directory replace inherited fragments of the same
/// name. A layout's own `_index.html.tmpl` replaces the inherited entry.
/// Subdirectories and hidden entries are ignored.
pub fn compose_layout(
    parser: &FragmentParser<'_>,
    base: &Namespace,
    name: &str,
) -> Result<Layout> {
    let tree = parser.tree();
    let dir = PathBuf::from(LAYOUTS_DIR).join(name);
    let entries = tree
        .read_dir(&dir)
        .map_err(|e| StencilError::read_directory(&dir, e))?;

    let mut namespace = base.derive();
    if ensure_entry_fragment(parser, &mut namespace)? {
        tracing::debug!("layout '{}' uses the fallback entry fragment", name);
    }

    let index = dir.join(INDEX_FRAGMENT);
    match tree.metadata(&index) {
        Ok(_) => {
            parser.parse_file(&mut namespace, &index, INDEX_FRAGMENT)?;
            tracing::trace!("layout '{}' defines its own entry fragment", name);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(StencilError::stat(index, e)),
    }

    for entry in entries {
        if entry.is_dir() || entry.is_hidden() || entry.name == INDEX_FRAGMENT {
            continue;
        }
        let path = dir.join(&entry.name);
        if let Some(previous) = parser.parse_file(&mut namespace, &path, &entry.name)? {
            tracing::trace!(
                "fragment '{}' in layout '{}' overrides definition from {}",
                entry.name,
                name,
                previous.origin()
            );
        }
    }

    let layout = Layout::compile(name, namespace)?;
    tracing::debug!(
        "composed layout '{}' with {} fragments",
        name,
        layout.fragment_names().len()
    );
    Ok(layout)
}

/// Give `namespace` an entry fragment if it lacks one.
///
/// The synthesized entry renders `_main.html.tmpl`, which is added empty
/// when absent so later files can fill it. Returns whether anything was
/// added.
pub fn ensure_entry_fragment(
    parser: &FragmentParser<'_>,
    namespace: &mut Namespace,
) -> Result<bool> {
    if namespace.contains(INDEX_FRAGMENT) {
        return Ok(false);
    }

    parser.parse_source(
        namespace,
        INDEX_FRAGMENT,
        FALLBACK_ENTRY_SOURCE,
        FragmentOrigin::Synthesized,
    )?;
    if !namespace.contains(MAIN_FRAGMENT) {
        parser.parse_source(namespace, MAIN_FRAGMENT, "", FragmentOrigin::Synthesized)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;
    use crate::registry::LayoutRegistry;
    use crate::tree::{DirEntry, EntryKind, FileTree, MemoryTree};
    use std::error::Error as _;
    use std::path::Path;
    use std::sync::Arc;
    use stencil_filters::FilterSet;

    fn empty_base() -> Namespace {
        Namespace::new(Arc::new(FilterSet::builtin()))
    }

    /// Memory tree where one path cannot be stat'ed or read.
    #[derive(Debug)]
    struct DeniedPath {
        inner: MemoryTree,
        stat_denied: Option<&'static str>,
        read_denied: Option<&'static str>,
    }

    fn permission_denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")
    }

    impl FileTree for DeniedPath {
        fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
            if self.stat_denied.is_some_and(|denied| path == Path::new(denied)) {
                return Err(permission_denied());
            }
            self.inner.metadata(path)
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
            self.inner.read_dir(path)
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            if self.read_denied.is_some_and(|denied| path == Path::new(denied)) {
                return Err(permission_denied());
            }
            self.inner.read(path)
        }
    }

    fn blog_tree() -> MemoryTree {
        MemoryTree::new()
            .file("layouts/_defaults/_index.html.tmpl", "index")
            .file("layouts/blog/_index.html.tmpl", "blog index")
            .file("layouts/blog/post.html.tmpl", "post")
            .file("layouts/other/_main.html.tmpl", "other")
    }

    #[test]
    fn test_ensure_entry_fragment_adds_fallback() {
        let tree = MemoryTree::new();
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();
        let mut ns = empty_base();

        assert!(ensure_entry_fragment(&parser, &mut ns).unwrap());
        assert_eq!(ns.names(), vec![INDEX_FRAGMENT, MAIN_FRAGMENT]);
        assert_eq!(
            ns.get(INDEX_FRAGMENT).unwrap().source(),
            FALLBACK_ENTRY_SOURCE
        );
        assert_eq!(ns.get(MAIN_FRAGMENT).unwrap().source(), "");
        assert!(!ensure_entry_fragment(&parser, &mut ns).unwrap());
    }

    #[test]
    fn test_ensure_entry_fragment_keeps_existing_main() {
        let tree = MemoryTree::new();
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();
        let mut ns = empty_base();
        ns.insert(Fragment::new(
            MAIN_FRAGMENT,
            "kept",
            FragmentOrigin::Synthesized,
        ));

        ensure_entry_fragment(&parser, &mut ns).unwrap();
        assert_eq!(ns.get(MAIN_FRAGMENT).unwrap().source(), "kept");
    }

    #[test]
    fn test_fallback_entry_renders_layout_main() {
        let tree =
            MemoryTree::new().file("layouts/post/_main.html.tmpl", "post body {{ n }}");
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();

        let layout = compose_layout(&parser, &empty_base(), "post").unwrap();
        let output = layout
            .render_to_string(&liquid::object!({ "n": 3 }))
            .unwrap();
        assert_eq!(output, "post body 3");
    }

    #[test]
    fn test_fallback_entry_without_main_renders_empty() {
        let tree = MemoryTree::new().dir("layouts/bare");
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();

        let layout = compose_layout(&parser, &empty_base(), "bare").unwrap();
        assert_eq!(layout.render_to_string(&liquid::Object::new()).unwrap(), "");
    }

    #[test]
    fn test_override_does_not_leak_into_base() {
        let tree = MemoryTree::new()
            .file("layouts/_defaults/_index.html.tmpl", "[{% include \"slot\" %}]")
            .file("layouts/_defaults/slot", "default")
            .file("layouts/custom/slot", "custom");
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();
        let base = crate::defaults::assemble_defaults(&parser, Arc::new(FilterSet::builtin()))
            .unwrap();

        let layouts = compose_layouts(&parser, &base).unwrap();
        let data = liquid::Object::new();

        assert_eq!(layouts["custom"].render_to_string(&data).unwrap(), "[custom]");
        assert_eq!(layouts["_defaults"].render_to_string(&data).unwrap(), "[default]");
        assert_eq!(base.get("slot").unwrap().source(), "default");
    }

    #[test]
    fn test_layout_subdirectories_are_ignored() {
        let tree = MemoryTree::new()
            .file("layouts/_defaults/_index.html.tmpl", "index")
            .file("layouts/blog/partials/extra.html.tmpl", "{% broken");
        let parser = FragmentParser::new(&tree, &FilterSet::builtin()).unwrap();
        let base = crate::defaults::assemble_defaults(&parser, Arc::new(FilterSet::builtin()))
            .unwrap();

        let layout = compose_layout(&parser, &base, "blog").unwrap();
        assert_eq!(layout.fragment_names(), vec![INDEX_FRAGMENT]);
    }

    #[test]
    fn test_layout_index_stat_failure_aborts_build() {
        let tree = DeniedPath {
            inner: blog_tree(),
            stat_denied: Some("layouts/blog/_index.html.tmpl"),
            read_denied: None,
        };

        let err = LayoutRegistry::build(&tree, FilterSet::new()).unwrap_err();
        assert!(matches!(
            err,
            StencilError::Stat { ref path, .. } if path == Path::new("layouts/blog/_index.html.tmpl")
        ));
        assert!(err.is_configuration());
        assert_eq!(err.source().unwrap().to_string(), "permission denied");
    }

    #[test]
    fn test_layout_fragment_read_failure_aborts_build() {
        let tree = DeniedPath {
            inner: blog_tree(),
            stat_denied: None,
            read_denied: Some("layouts/blog/post.html.tmpl"),
        };

        let err = LayoutRegistry::build(&tree, FilterSet::new()).unwrap_err();
        assert!(matches!(
            err,
            StencilError::ReadFile { ref path, .. } if path == Path::new("layouts/blog/post.html.tmpl")
        ));
        assert_eq!(err.kind(), crate::ErrorKind::Read);
    }

    #[test]
    fn test_denied_tree_builds_when_nothing_is_denied() {
        let tree = DeniedPath {
            inner: blog_tree(),
            stat_denied: None,
            read_denied: None,
        };
        let registry = LayoutRegistry::build(&tree, FilterSet::new()).unwrap();
        assert_eq!(registry.names(), vec!["_defaults", "blog", "other"]);
    }
}
