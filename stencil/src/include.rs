//! `{% include %}` with a nesting limit.
//!
//! Fragments include each other by name, so a fragment can end up including
//! itself. Each include counts its nesting in the render's registers and
//! fails the render once the limit is passed, instead of recursing until the
//! stack runs out.

use liquid_core::error::ResultLiquidExt;
use liquid_core::model::KString;
use liquid_core::runtime::StackFrame;
use liquid_core::{
    Error, Expression, Language, ParseTag, Renderable, Result, Runtime, TagReflection,
    TagTokenIter, ValueView,
};
use std::collections::HashMap;
use std::io::Write;
use stencil_filters::FilterSet;

/// Maximum include nesting during a single render.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Replacement for the standard `include` tag that enforces [`MAX_INCLUDE_DEPTH`].
///
/// Syntax is unchanged: `{% include "name" %}` or
/// `{% include "name" key: value, other: value %}`.
#[derive(Copy, Clone, Debug, Default)]
pub struct IncludeTag;

impl TagReflection for IncludeTag {
    fn tag(&self) -> &'static str {
        "include"
    }

    fn description(&self) -> &'static str {
        "Renders another fragment of the same layout by name."
    }
}

impl ParseTag for IncludeTag {
    fn parse(
        &self,
        mut arguments: TagTokenIter<'_>,
        _options: &Language,
    ) -> Result<Box<dyn Renderable>> {
        let partial = arguments
            .expect_next("Identifier or literal expected.")?
            .expect_value()
            .into_result()?;

        let mut vars: Vec<(KString, Expression)> = Vec::new();
        while let Ok(next) = arguments.expect_next("") {
            let id = next.expect_identifier().into_result()?.to_owned();
            arguments
                .expect_next("\":\" expected.")?
                .expect_str(":")
                .into_result_custom_msg("expected \":\" to be used for the assignment")?;
            let value = arguments
                .expect_next("expected value")?
                .expect_value()
                .into_result()?;
            vars.push((id.into(), value));

            // one trailing comma is allowed
            match arguments.expect_next("") {
                Ok(comma) => {
                    if comma.expect_str(",").into_result().is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        arguments.expect_nothing()?;

        Ok(Box::new(Include { partial, vars }))
    }

    fn reflection(&self) -> &dyn TagReflection {
        self
    }
}

/// Parser builder every fragment and layout is parsed with: the standard
/// library, the depth-limited `include`, and `filters`.
pub(crate) fn parser_builder(filters: &FilterSet) -> liquid::ParserBuilder {
    filters
        .register(liquid::ParserBuilder::with_stdlib())
        .tag(IncludeTag)
}

#[derive(Debug, Default)]
struct IncludeDepth(usize);

#[derive(Debug)]
struct Include {
    partial: Expression,
    vars: Vec<(KString, Expression)>,
}

impl Include {
    fn render_partial(
        &self,
        name: &str,
        writer: &mut dyn Write,
        runtime: &dyn Runtime,
    ) -> Result<()> {
        let mut pass_through = HashMap::new();
        for (id, value) in &self.vars {
            pass_through.insert(id.as_ref(), value.evaluate(runtime)?);
        }

        let scope = StackFrame::new(runtime, &pass_through);
        let partial = scope
            .partials()
            .get(name)
            .trace_with(|| format!("{{% include {} %}}", self.partial).into())?;
        partial.render_to(writer, &scope)
    }
}

impl Renderable for Include {
    fn render_to(&self, writer: &mut dyn Write, runtime: &dyn Runtime) -> Result<()> {
        let value = self.partial.evaluate(runtime)?;
        if !value.is_scalar() {
            return Error::with_msg("Can only `include` strings")
                .context("partial", value.source().to_string())
                .into_err();
        }
        let name = value.to_kstr().into_owned();

        {
            let mut depth = runtime.registers().get_mut::<IncludeDepth>();
            if depth.0 >= MAX_INCLUDE_DEPTH {
                return Error::with_msg(format!(
                    "exceeded maximum include depth of {}",
                    MAX_INCLUDE_DEPTH
                ))
                .context("partial", name.to_string())
                .into_err();
            }
            depth.0 += 1;
        }

        let result = self.render_partial(name.as_str(), writer, runtime);
        runtime.registers().get_mut::<IncludeDepth>().0 -= 1;
        result
    }
}
