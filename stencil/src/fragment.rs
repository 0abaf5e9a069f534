//! Fragments and the parser that registers them into a namespace.

use crate::error::{Result, StencilError};
use crate::include::parser_builder;
use crate::namespace::Namespace;
use crate::tree::FileTree;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use stencil_filters::FilterSet;

/// Where a fragment's source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOrigin {
    /// Read from this path of the template tree.
    File(PathBuf),
    /// Supplied by stencil itself rather than read from the tree.
    Synthesized,
}

impl fmt::Display for FragmentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "'{}'", path.display()),
            Self::Synthesized => write!(f, "<synthesized>"),
        }
    }
}

/// A named unit of liquid source inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    name: String,
    source: String,
    origin: FragmentOrigin,
}

impl Fragment {
    pub(crate) fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        origin: FragmentOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            origin,
        }
    }

    /// The fragment name, which is the base name of its file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The liquid source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Where the source was read from.
    pub fn origin(&self) -> &FragmentOrigin {
        &self.origin
    }
}

/// Reads files from a [`FileTree`] and registers them as fragments.
///
/// Every fragment is syntax checked on registration with a parser that knows
/// the namespace's filters, so broken source is reported against the file it
/// came from instead of at render time.
pub struct FragmentParser<'a> {
    tree: &'a dyn FileTree,
    parser: liquid::Parser,
}

impl<'a> FragmentParser<'a> {
    /// Create a parser reading from `tree` that accepts the given filters.
    pub fn new(tree: &'a dyn FileTree, filters: &FilterSet) -> Result<Self> {
        let parser = parser_builder(filters)
            .build()
            .map_err(|source| StencilError::Engine { source })?;
        Ok(Self { tree, parser })
    }

    /// The tree fragments are read from.
    pub fn tree(&self) -> &'a dyn FileTree {
        self.tree
    }

    /// Read `path` and register it in `namespace` under `name`.
    ///
    /// Returns the fragment it replaced, if any.
    pub fn parse_file(
        &self,
        namespace: &mut Namespace,
        path: &Path,
        name: &str,
    ) -> Result<Option<Fragment>> {
        let bytes = self
            .tree
            .read(path)
            .map_err(|e| StencilError::read_file(path, e))?;
        let source = String::from_utf8(bytes).map_err(|e| {
            StencilError::read_file(path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        self.parse_source(
            namespace,
            name,
            source,
            FragmentOrigin::File(path.to_path_buf()),
        )
    }

    /// Register `source` in `namespace` under `name` after checking its syntax.
    pub fn parse_source(
        &self,
        namespace: &mut Namespace,
        name: &str,
        source: impl Into<String>,
        origin: FragmentOrigin,
    ) -> Result<Option<Fragment>> {
        let source = source.into();
        if let Err(err) = self.parser.parse(&source) {
            return Err(StencilError::Syntax {
                origin,
                source: err,
            });
        }

        tracing::trace!("registered fragment '{}' from {}", name, origin);
        Ok(namespace.insert(Fragment::new(name, source, origin)))
    }
}

impl fmt::Debug for FragmentParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentParser")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}
