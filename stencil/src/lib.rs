//! Layered liquid layouts.
//!
//! A template tree holds one directory per layout under `layouts/`. The
//! `_defaults` directory is mandatory and must contain `_index.html.tmpl`;
//! its fragments form the base every layout starts from. Each layout
//! directory (including `_defaults` itself) gets its own copy of the base,
//! and any file in it replaces the inherited fragment with the same name.
//!
//! ```text
//! layouts/
//!   _defaults/
//!     _index.html.tmpl     entry fragment, mandatory
//!     _main.html.tmpl      a slot layouts can replace
//!   post/
//!     _main.html.tmpl      replaces the slot for "post" only
//! ```
//!
//! Fragments refer to each other by file name with `{% include "name" %}`.
//! Includes are resolved against the layout being rendered, so a defaults
//! index that includes `_main.html.tmpl` renders each layout's own slot.
//!
//! # Overview
//!
//! - [`FileTree`] - read-only access to the template tree ([`DirTree`], [`MemoryTree`])
//! - [`LayoutRegistry`] - builds every layout and renders them by name
//! - [`Layout`] - one compiled layout
//! - [`RenderData`] - the usual `site` / `page` globals
//! - [`FilterSet`] - built-in helper filters merged with caller filters
//!
//! # Example
//!
//! ```rust
//! use stencil::{FilterSet, LayoutRegistry, MemoryTree, PageData, RenderData};
//!
//! let tree = MemoryTree::new()
//!     .file(
//!         "layouts/_defaults/_index.html.tmpl",
//!         "<title>{{ page.title | escape }}</title>{% include \"_main.html.tmpl\" %}",
//!     )
//!     .file("layouts/_defaults/_main.html.tmpl", "nothing here")
//!     .file("layouts/post/_main.html.tmpl", "{{ page.data.body | markdown }}");
//!
//! let registry = LayoutRegistry::build(&tree, FilterSet::new())?;
//!
//! let mut page = PageData::default();
//! page.title = "Hello".to_string();
//! page.data.insert("body".to_string(), "*hi*".into());
//! let data = RenderData { page, ..Default::default() }.to_object()?;
//!
//! let html = registry.render_to_string("post", &data)?;
//! assert_eq!(html, "<title>Hello</title><p><em>hi</em></p>\n");
//! # Ok::<(), stencil::StencilError>(())
//! ```

mod composer;
mod data;
mod defaults;
mod error;
mod fragment;
mod include;
mod layout;
mod namespace;
mod registry;
mod tree;
mod validate;

pub use composer::{
    compose_layout, compose_layouts, ensure_entry_fragment, FALLBACK_ENTRY_SOURCE,
};
pub use data::{to_object, PageData, RenderData, SiteData};
pub use defaults::assemble_defaults;
pub use error::{ErrorKind, Result, StencilError};
pub use fragment::{Fragment, FragmentOrigin, FragmentParser};
pub use include::{IncludeTag, MAX_INCLUDE_DEPTH};
pub use layout::Layout;
pub use namespace::Namespace;
pub use registry::LayoutRegistry;
pub use tree::{DirEntry, DirTree, EntryKind, FileTree, MemoryTree};
pub use validate::validate_tree;

pub use stencil_filters as filters;
pub use stencil_filters::FilterSet;

/// Directory under the tree root that holds one directory per layout.
pub const LAYOUTS_DIR: &str = "layouts";

/// Name of the mandatory defaults layout, also used when no layout is named.
pub const DEFAULT_LAYOUT: &str = "_defaults";

/// File name of a layout's entry fragment.
pub const INDEX_FRAGMENT: &str = "_index.html.tmpl";

/// File name of the slot rendered by the fallback entry fragment.
pub const MAIN_FRAGMENT: &str = "_main.html.tmpl";
