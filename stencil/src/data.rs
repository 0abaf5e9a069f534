//! Render data passed to layouts.
//!
//! Layouts accept any [`liquid::ObjectView`]. The types here describe the
//! usual shape of a page render: site-wide settings under `site` and
//! per-page values under `page`.

use crate::error::{Result, StencilError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Site-wide values, available as `site` in templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    /// Base URL that `abs_url` joins paths onto.
    pub base_url: String,
    pub title: String,
    pub copyright: String,
}

/// Values for one page, available as `page` in templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageData {
    pub title: String,
    /// Arbitrary page content.
    pub data: BTreeMap<String, serde_json::Value>,
    /// Submitted form values.
    pub form: BTreeMap<String, serde_json::Value>,
}

/// The complete set of globals for a page render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderData {
    pub site: SiteData,
    pub page: PageData,
}

impl RenderData {
    pub fn new(site: SiteData, page: PageData) -> Self {
        Self { site, page }
    }

    /// Convert into template globals.
    pub fn to_object(&self) -> Result<liquid::Object> {
        to_object(self)
    }
}

/// Convert any serializable value into template globals.
///
/// The value must serialize as a map.
pub fn to_object<T: Serialize>(value: &T) -> Result<liquid::Object> {
    liquid::to_object(value).map_err(|source| StencilError::InvalidData { source })
}
