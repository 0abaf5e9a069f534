//! Command implementations.
//!
//! Each command writes its normal output to the given sink so it can be
//! exercised without a terminal.

use crate::config::StencilConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use stencil::{FilterSet, LayoutRegistry, PageData, RenderData};

fn build_registry(config: &StencilConfig) -> Result<LayoutRegistry> {
    LayoutRegistry::from_dir(&config.root, FilterSet::new())
        .with_context(|| format!("failed to build layouts from '{}'", config.root.display()))
}

/// Build every layout and report how many there are.
pub fn run_check(config: &StencilConfig, out: &mut dyn Write) -> Result<()> {
    let registry = build_registry(config)?;
    writeln!(out, "ok: {} layouts", registry.len())?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct LayoutSummary<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fragments: Option<Vec<&'a str>>,
}

/// List layout names, optionally with their fragments.
pub fn run_list(
    config: &StencilConfig,
    fragments: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let registry = build_registry(config)?;
    let summaries: Vec<LayoutSummary<'_>> = registry
        .iter()
        .map(|layout| LayoutSummary {
            name: layout.name(),
            fragments: fragments.then(|| layout.fragment_names()),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &summaries)?;
        writeln!(out)?;
        return Ok(());
    }

    for summary in &summaries {
        writeln!(out, "{}", summary.name)?;
        for fragment in summary.fragments.iter().flatten() {
            writeln!(out, "  {}", fragment)?;
        }
    }
    Ok(())
}

/// Render the configured layout.
///
/// Render data from `data_file` is laid over the configured `site` values.
/// Output goes to `output_file` when given, otherwise to `out`. The output
/// file is only written once the render has succeeded.
pub fn run_render(
    config: &StencilConfig,
    data_file: Option<&Path>,
    output_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let registry = build_registry(config)?;

    let mut globals = serde_json::to_value(RenderData::new(
        config.site.clone(),
        PageData::default(),
    ))?;
    if let Some(path) = data_file {
        merge_json(&mut globals, load_data(path)?);
    }
    let globals = stencil::to_object(&globals)?;

    match output_file {
        Some(path) => {
            let html = registry.render_to_string(&config.layout, &globals)?;
            fs::write(path, html)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            tracing::debug!("wrote {}", path.display());
        }
        None => registry.render(&config.layout, &globals, out)?,
    }
    Ok(())
}

/// Read render data as JSON, or YAML for `.yaml`/`.yml` files.
fn load_data(path: &Path) -> Result<serde_json::Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file '{}'", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let value = if is_yaml {
        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("invalid YAML in '{}'", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON in '{}'", path.display()))?
    };
    Ok(value)
}

/// Recursively lay `overlay` over `base`; objects merge, anything else replaces.
fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
