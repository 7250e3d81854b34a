//! Record types shared by the catalogue, geometry engine and validator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::FieldError;
use crate::style::roles::{BorderSpec, ShadowSpec};

// ────────────────────────────────────────────────────────────────────────────
// Canvas and zones
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
}

/// What a zone carries. Templates spell these `text_elements`, `image_motiv`
/// and anything else (logos, ornaments) counts as decorative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    Decorative,
}

impl ContentKind {
    pub fn from_template(content_type: Option<&str>) -> Self {
        match content_type {
            Some("text_elements") | Some("text") => ContentKind::Text,
            Some("image_motiv") | Some("image") => ContentKind::Image,
            _ => ContentKind::Decorative,
        }
    }
}

/// Copy field a zone is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyField {
    Headline,
    Subline,
    Benefits,
    Cta,
    JobTitle,
    Location,
    Company,
}

/// Style values a template pins on a zone. Merged with the resolver output
/// according to the zone's role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplicitStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z: i32,
    pub content_kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_field: Option<CopyField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Container opacity fraction stamped by the geometry engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    /// Copy bound to this zone for the current run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_style: Option<ExplicitStyle>,
}

impl Zone {
    pub fn is_text(&self) -> bool {
        self.content_kind == ContentKind::Text
    }

    pub fn is_image(&self) -> bool {
        self.content_kind == ContentKind::Image
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransparencyHandling {
    #[serde(default)]
    pub apply_to_zones: Vec<String>,
    #[serde(default = "default_fallback_opacity")]
    pub fallback_opacity: f64,
}

fn default_fallback_opacity() -> f64 {
    0.9
}

/// Summary the geometry engine writes next to the adjusted zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedValues {
    pub text_width: i32,
    pub image_width: i32,
    /// Clamped transparency slider as a 0–1 fraction.
    pub container_transparency: f64,
    /// Clamped image/text ratio slider (30–70).
    pub image_text_ratio: i32,
    /// Family whose routine produced this geometry.
    pub family: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub family_fallback: bool,
    /// Hero layouts: height of the top image band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif_band_height: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Warnings,
}

/// A layout template after loading, and after the geometry engine has run
/// on it. Read-only once `certified` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub layout_id: String,
    pub name: String,
    pub layout_type: String,
    pub canvas: Canvas,
    pub zones: BTreeMap<String, Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_handling: Option<TransparencyHandling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_values: Option<CalculatedValues>,
    #[serde(default)]
    pub certified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ValidationStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldError>,
}

impl LayoutDocument {
    pub fn text_zones(&self) -> impl Iterator<Item = (&String, &Zone)> {
        self.zones.iter().filter(|(_, zone)| zone.is_text())
    }

    pub fn image_zones(&self) -> impl Iterator<Item = (&String, &Zone)> {
        self.zones.iter().filter(|(_, zone)| zone.is_image())
    }

    /// Reference text-column width used by adaptive typography and padding.
    pub fn reference_text_width(&self) -> i32 {
        self.calculated_values
            .as_ref()
            .map(|cv| cv.text_width)
            .unwrap_or(400)
    }
}
