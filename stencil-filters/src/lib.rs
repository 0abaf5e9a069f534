//! Helper filters for stencil layouts
//!
//! This crate provides the helper bindings every stencil namespace starts
//! with, and the [`FilterSet`] table used to merge them with caller-supplied
//! filters.
//!
//! # Built-in filters
//!
//! | filter     | usage                                  | result                         |
//! |------------|----------------------------------------|--------------------------------|
//! | `mod`      | `{{ 7 \| mod: 3 }}`                    | `1`                            |
//! | `mod_bool` | `{{ 9 \| mod_bool: 3 }}`               | `true`                         |
//! | `abs_url`  | `{{ site.base_url \| abs_url: "a" }}`  | base URL with `a` joined on    |
//! | `markdown` | `{{ page.body \| markdown }}`          | HTML with heading ids          |
//!
//! # Example
//!
//! ```rust
//! use stencil_filters::FilterSet;
//!
//! let filters = FilterSet::builtin();
//! let parser = filters
//!     .register(liquid::ParserBuilder::with_stdlib())
//!     .build()
//!     .unwrap();
//!
//! let template = parser.parse("{{ 10 | mod: 4 }}").unwrap();
//! let output = template.render(&liquid::Object::new()).unwrap();
//! assert_eq!(output, "2");
//! ```

mod links;
mod markdown;
mod math;
mod set;

pub use links::{abs_url, AbsUrl};
pub use markdown::{markdown_to_html, Markdown};
pub use math::{modulo, Mod, ModBool, DIVIDE_BY_ZERO};
pub use set::FilterSet;
