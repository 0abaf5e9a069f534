//! Markdown to HTML conversion
//!
//! Conversion follows CommonMark. Raw HTML in the source is emitted as-is,
//! and every heading receives an `id` attribute derived from its text so
//! that pages can link to sections.

use liquid_core::{
    Display_filter, Filter, FilterReflection, ParseFilter, Result, Runtime, Value, ValueView,
};
use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Convert a markdown document to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let mut events: Vec<Event<'_>> = Parser::new(source).collect();
    assign_heading_ids(&mut events);

    let mut output = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for index in 0..events.len() {
        if !matches!(&events[index], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let slug = slugify(&heading_text(&events[index + 1..]));
        let count = seen.entry(slug.clone()).or_insert(0);
        let unique = if *count == 0 {
            slug
        } else {
            format!("{}-{}", slug, count)
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(unique));
        }
    }
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "heading".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `{{ text | markdown }}` converts markdown to HTML.
#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "markdown",
    description = "Converts markdown text to HTML.",
    parsed(MarkdownFilter)
)]
pub struct Markdown;

#[derive(Debug, Default, Display_filter)]
#[name = "markdown"]
struct MarkdownFilter;

impl Filter for MarkdownFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let source = input.to_kstr();
        Ok(Value::scalar(markdown_to_html(source.as_str())))
    }
}
