//! Assembly of the base namespace from `layouts/_defaults`.

use crate::error::{Result, StencilError};
use crate::fragment::FragmentParser;
use crate::namespace::Namespace;
use crate::{DEFAULT_LAYOUT, INDEX_FRAGMENT, LAYOUTS_DIR};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use stencil_filters::FilterSet;

/// Build the base namespace every layout is derived from.
///
/// The defaults index is mandatory and registered first. Every other file
/// in the defaults directory follows in listing order; subdirectories and
/// hidden entries are skipped.
pub fn assemble_defaults(
    parser: &FragmentParser<'_>,
    filters: Arc<FilterSet>,
) -> Result<Namespace> {
    let tree = parser.tree();
    let dir = PathBuf::from(LAYOUTS_DIR).join(DEFAULT_LAYOUT);

    let entries = tree
        .read_dir(&dir)
        .map_err(|e| StencilError::read_directory(&dir, e))?;

    let index = dir.join(INDEX_FRAGMENT);
    if let Err(e) = tree.metadata(&index) {
        return Err(if e.kind() == io::ErrorKind::NotFound {
            StencilError::MissingDefaultsIndex { path: index }
        } else {
            StencilError::stat(index, e)
        });
    }

    let mut base = Namespace::new(filters);
    parser.parse_file(&mut base, &index, INDEX_FRAGMENT)?;

    for entry in entries {
        if entry.is_dir() || entry.is_hidden() || entry.name == INDEX_FRAGMENT {
            continue;
        }
        parser.parse_file(&mut base, &dir.join(&entry.name), &entry.name)?;
    }

    tracing::debug!("assembled defaults namespace with {} fragments", base.len());
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn assemble(tree: &MemoryTree) -> Result<Namespace> {
        let filters = Arc::new(FilterSet::builtin());
        let parser = FragmentParser::new(tree, &filters)?;
        assemble_defaults(&parser, filters)
    }

    #[test]
    fn test_index_first_then_listing_order() {
        let tree = MemoryTree::new()
            .file("layouts/_defaults/zeta.html.tmpl", "z")
            .file("layouts/_defaults/_index.html.tmpl", "index")
            .file("layouts/_defaults/alpha.html.tmpl", "a");

        let base = assemble(&tree).unwrap();
        assert_eq!(
            base.names(),
            vec!["_index.html.tmpl", "alpha.html.tmpl", "zeta.html.tmpl"]
        );
    }

    #[test]
    fn test_skips_hidden_and_subdirectories() {
        let tree = MemoryTree::new()
            .file("layouts/_defaults/_index.html.tmpl", "index")
            .file("layouts/_defaults/.swp", "{% broken")
            .file("layouts/_defaults/nested/inner.html.tmpl", "inner");

        let base = assemble(&tree).unwrap();
        assert_eq!(base.names(), vec!["_index.html.tmpl"]);
    }

    #[test]
    fn test_missing_index() {
        let tree = MemoryTree::new().file("layouts/_defaults/main.html.tmpl", "main");
        let err = assemble(&tree).unwrap_err();

        assert!(matches!(err, StencilError::MissingDefaultsIndex { .. }));
        assert!(err.is_configuration());
        assert!(err.to_string().contains("_index"));
    }

    #[test]
    fn test_syntax_error_in_default_fragment() {
        let tree = MemoryTree::new()
            .file("layouts/_defaults/_index.html.tmpl", "index")
            .file("layouts/_defaults/bad.html.tmpl", "{% for %}");

        let err = assemble(&tree).unwrap_err();
        assert!(matches!(err, StencilError::Syntax { .. }));
        assert!(err.to_string().contains("bad.html.tmpl"));
    }
}
