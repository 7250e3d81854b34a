//! Template catalogue: resolves a layout id to its static zone definition.
//!
//! The catalogue is parsed once (from the bundled YAML or a file named by
//! `TEMPLATES_PATH`) before any request is served, and is read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{FieldError, PipelineError};
use crate::layout::model::{
    Canvas, ContentKind, CopyField, ExplicitStyle, LayoutDocument, TransparencyHandling, Zone,
};
use crate::layout::schema::{expected_zones, is_zone_required, read_coordinate, read_z_index};

const BUILTIN_CATALOGUE: &str = include_str!("../../templates/layouts.yaml");

// ────────────────────────────────────────────────────────────────────────────
// File format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    layouts: BTreeMap<String, RawTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    #[serde(default)]
    name: Option<String>,
    layout_type: String,
    canvas: Canvas,
    zones: BTreeMap<String, RawZone>,
    #[serde(default)]
    transparency_handling: Option<TransparencyHandling>,
}

/// Coordinates stay untyped until `read_coordinate` has checked them, so a
/// bad template reports every offending field instead of the first.
#[derive(Debug, Deserialize)]
struct RawZone {
    #[serde(default)]
    x: Option<serde_yaml::Value>,
    #[serde(default)]
    y: Option<serde_yaml::Value>,
    #[serde(default)]
    width: Option<serde_yaml::Value>,
    #[serde(default)]
    height: Option<serde_yaml::Value>,
    #[serde(default)]
    z: Option<serde_yaml::Value>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    copy_field: Option<CopyField>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    container_style: Option<ExplicitStyle>,
}

// ────────────────────────────────────────────────────────────────────────────
// Catalogue
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub layout_id: String,
    pub name: String,
    pub layout_type: String,
    pub canvas: Canvas,
    pub zone_count: usize,
    /// Template zones its layout type requires.
    pub required_zones: Vec<String>,
    /// Every zone the layout type knows about, required first.
    pub expected_zones: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Catalogue {
    templates: BTreeMap<String, LayoutDocument>,
}

impl Catalogue {
    /// Catalogue bundled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOGUE).context("Bundled layout catalogue is invalid")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout catalogue {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Failed to load layout catalogue {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let file: CatalogueFile =
            serde_yaml::from_str(raw).context("Layout catalogue is not valid YAML")?;

        let mut templates = BTreeMap::new();
        let mut errors = Vec::new();

        for (layout_id, template) in file.layouts {
            if let Some(doc) = build_document(&layout_id, template, &mut errors) {
                templates.insert(layout_id, doc);
            }
        }

        if !errors.is_empty() {
            return Err(PipelineError::SchemaViolation(errors).into());
        }

        info!("Loaded {} layout templates", templates.len());
        Ok(Self { templates })
    }

    /// Template as loaded; the geometry engine copies it before adjusting.
    /// Unknown ids are `ResourceNotFound`.
    pub fn get(&self, layout_id: &str) -> Result<&LayoutDocument, PipelineError> {
        self.templates
            .get(layout_id)
            .ok_or_else(|| PipelineError::ResourceNotFound {
                layout_id: layout_id.to_string(),
            })
    }

    pub fn list(&self) -> Vec<LayoutSummary> {
        self.templates
            .iter()
            .map(|(id, doc)| LayoutSummary {
                layout_id: id.clone(),
                name: doc.name.clone(),
                layout_type: doc.layout_type.clone(),
                canvas: doc.canvas,
                zone_count: doc.zones.len(),
                required_zones: doc
                    .zones
                    .keys()
                    .filter(|name| is_zone_required(&doc.layout_type, name))
                    .cloned()
                    .collect(),
                expected_zones: expected_zones(&doc.layout_type),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }
}

fn build_document(
    layout_id: &str,
    template: RawTemplate,
    errors: &mut Vec<FieldError>,
) -> Option<LayoutDocument> {
    let before = errors.len();
    let mut zones = BTreeMap::new();

    for (name, raw) in template.zones {
        let x = read_coordinate(&name, "x", raw.x.as_ref(), errors);
        let y = read_coordinate(&name, "y", raw.y.as_ref(), errors);
        let width = read_coordinate(&name, "width", raw.width.as_ref(), errors);
        let height = read_coordinate(&name, "height", raw.height.as_ref(), errors);
        let z = read_z_index(&name, raw.z.as_ref(), errors);

        if let (Some(x), Some(y), Some(width), Some(height)) = (x, y, width, height) {
            zones.insert(
                name,
                Zone {
                    x,
                    y,
                    width,
                    height,
                    z,
                    content_kind: ContentKind::from_template(raw.content_type.as_deref()),
                    copy_field: raw.copy_field,
                    description: raw.description,
                    transparency: None,
                    bound_text: None,
                    explicit_style: raw.container_style,
                },
            );
        }
    }

    if errors.len() > before {
        return None;
    }

    Some(LayoutDocument {
        layout_id: layout_id.to_string(),
        name: template.name.unwrap_or_else(|| layout_id.to_string()),
        layout_type: template.layout_type,
        canvas: template.canvas,
        zones,
        transparency_handling: template.transparency_handling,
        calculated_values: None,
        certified: false,
        status: None,
        warnings: Vec::new(),
    })
}
