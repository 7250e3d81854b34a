//! Geometry engine: turns a template plus the two sliders into concrete zone
//! rectangles.
//!
//! The image/text ratio slider splits the canvas width into a text column and
//! an image column separated by a fixed gutter. Each layout family then has a
//! routine that narrows text zones to fit the column and places the image zone.
//! Routines never move text zones; only widths change. Unknown layout types
//! use the vertical split routine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::model::{CalculatedValues, Canvas, LayoutDocument};

// ────────────────────────────────────────────────────────────────────────────
// Constants
// ────────────────────────────────────────────────────────────────────────────

pub const GUTTER_PX: i32 = 60;
pub const MIN_TEXT_WIDTH: i32 = 350;
pub const MAX_TEXT_WIDTH: i32 = 800;
pub const MIN_IMAGE_WIDTH: i32 = 200;
pub const MAX_IMAGE_WIDTH: i32 = 900;

pub const MIN_RATIO: i32 = 30;
pub const MAX_RATIO: i32 = 70;
pub const DEFAULT_RATIO: i32 = 50;
pub const DEFAULT_TRANSPARENCY: i32 = 80;

/// Horizontal split keeps a narrower gap between its bands.
const HORIZONTAL_GUTTER_PX: i32 = 20;

const WIDE_MARGIN: i32 = 80;
const NARROW_MARGIN: i32 = 40;

const MIN_ZONE_OPACITY: f64 = 0.1;
const MAX_ZONE_OPACITY: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Slider input
// ────────────────────────────────────────────────────────────────────────────

/// Slider value as it arrives from the control surface: a number or a
/// numeric string. Anything unparseable resolves to the slider default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl SliderValue {
    fn resolve(&self, default: i32) -> i64 {
        match self {
            SliderValue::Int(v) => *v,
            SliderValue::Float(v) if v.is_finite() => v.trunc() as i64,
            SliderValue::Float(_) => default as i64,
            SliderValue::Text(raw) => raw.trim().parse::<i64>().unwrap_or(default as i64),
        }
    }
}

impl From<i32> for SliderValue {
    fn from(v: i32) -> Self {
        SliderValue::Int(v as i64)
    }
}

impl From<&str> for SliderValue {
    fn from(v: &str) -> Self {
        SliderValue::Text(v.to_string())
    }
}

pub fn clamp_ratio(value: &SliderValue) -> i32 {
    value
        .resolve(DEFAULT_RATIO)
        .clamp(MIN_RATIO as i64, MAX_RATIO as i64) as i32
}

pub fn clamp_transparency(value: &SliderValue) -> i32 {
    value.resolve(DEFAULT_TRANSPARENCY).clamp(0, 100) as i32
}

/// Splits the canvas width into `(text_width, image_width)`.
///
/// text + image + gutter == canvas unless the text column hit a clamp bound.
pub fn split_widths(ratio: i32, canvas_width: i32) -> (i32, i32) {
    let image_width = (ratio as f64 / 100.0 * canvas_width as f64).round() as i32;
    let text_width =
        (canvas_width - image_width - GUTTER_PX).clamp(MIN_TEXT_WIDTH, MAX_TEXT_WIDTH);
    // Re-derived from the clamped text column, which supersedes the image
    // column's own bounds.
    let image_width = canvas_width - text_width - GUTTER_PX;
    (text_width, image_width)
}

// ────────────────────────────────────────────────────────────────────────────
// Layout families
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFamily {
    VerticalSplit,
    VerticalSplitLeft,
    HorizontalSplit,
    ModernSplit,
    Minimalist,
    Hero,
    Portfolio,
    Storytelling,
    Infographic,
    Magazine,
}

impl LayoutFamily {
    /// Normalises a layout-type tag. `dynamic_` prefixes, `_layout` suffixes
    /// and hyphens are ignored, so `dynamic_hero_layout` and `hero` agree.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalised = tag.trim().to_ascii_lowercase().replace('-', "_");
        let core = normalised
            .strip_prefix("dynamic_")
            .unwrap_or(&normalised);
        let core = core.strip_suffix("_layout").unwrap_or(core);

        match core {
            "vertical_split" => Some(LayoutFamily::VerticalSplit),
            "vertical_split_left" => Some(LayoutFamily::VerticalSplitLeft),
            "horizontal_split" => Some(LayoutFamily::HorizontalSplit),
            "modern_split" => Some(LayoutFamily::ModernSplit),
            "minimalist" => Some(LayoutFamily::Minimalist),
            "hero" => Some(LayoutFamily::Hero),
            "portfolio" => Some(LayoutFamily::Portfolio),
            "storytelling" => Some(LayoutFamily::Storytelling),
            "infographic" => Some(LayoutFamily::Infographic),
            "magazine" => Some(LayoutFamily::Magazine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutFamily::VerticalSplit => "vertical_split",
            LayoutFamily::VerticalSplitLeft => "vertical_split_left",
            LayoutFamily::HorizontalSplit => "horizontal_split",
            LayoutFamily::ModernSplit => "modern_split",
            LayoutFamily::Minimalist => "minimalist",
            LayoutFamily::Hero => "hero",
            LayoutFamily::Portfolio => "portfolio",
            LayoutFamily::Storytelling => "storytelling",
            LayoutFamily::Infographic => "infographic",
            LayoutFamily::Magazine => "magazine",
        }
    }

    /// Families whose text column and image column sit side by side.
    pub fn is_split(&self) -> bool {
        matches!(
            self,
            LayoutFamily::VerticalSplit
                | LayoutFamily::VerticalSplitLeft
                | LayoutFamily::HorizontalSplit
                | LayoutFamily::ModernSplit
        )
    }
}

/// Clamped slider values and the derived column widths handed to a routine.
#[derive(Debug, Clone, Copy)]
pub struct GeometryInput {
    pub canvas: Canvas,
    pub ratio: i32,
    pub transparency: i32,
    pub text_width: i32,
    pub image_width: i32,
}

/// What a routine reports back for the calculated-values summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutineOutput {
    pub text_width: i32,
    pub image_width: i32,
    pub motif_band_height: Option<i32>,
}

type GeometryFn = fn(&mut LayoutDocument, &GeometryInput) -> RoutineOutput;

const FAMILY_ROUTINES: &[(LayoutFamily, GeometryFn)] = &[
    (LayoutFamily::VerticalSplit, vertical_split),
    (LayoutFamily::VerticalSplitLeft, vertical_split_left),
    (LayoutFamily::HorizontalSplit, horizontal_split),
    (LayoutFamily::ModernSplit, modern_split),
    (LayoutFamily::Minimalist, minimalist),
    (LayoutFamily::Hero, hero),
    (LayoutFamily::Portfolio, portfolio),
    (LayoutFamily::Storytelling, storytelling),
    (LayoutFamily::Infographic, infographic),
    (LayoutFamily::Magazine, magazine),
];

const FALLBACK_ROUTINE: (LayoutFamily, GeometryFn) = (LayoutFamily::VerticalSplit, vertical_split);

/// Looks up the routine for a layout-type tag. The flag is true when the tag
/// was not recognised and the fallback entry was used.
fn routine_for(layout_type: &str) -> (LayoutFamily, GeometryFn, bool) {
    LayoutFamily::from_tag(layout_type)
        .and_then(|family| FAMILY_ROUTINES.iter().find(|(f, _)| *f == family))
        .map(|(family, routine)| (*family, *routine, false))
        .unwrap_or((FALLBACK_ROUTINE.0, FALLBACK_ROUTINE.1, true))
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Computes concrete geometry for a template. Pure: identical inputs produce
/// identical documents. The result is not certified.
pub fn compute(
    template: &LayoutDocument,
    ratio: &SliderValue,
    transparency: &SliderValue,
) -> LayoutDocument {
    let ratio = clamp_ratio(ratio);
    let transparency = clamp_transparency(transparency);
    let (text_width, image_width) = split_widths(ratio, template.canvas.width);

    let mut doc = template.clone();
    doc.certified = false;
    doc.status = None;
    doc.warnings.clear();

    let input = GeometryInput {
        canvas: doc.canvas,
        ratio,
        transparency,
        text_width,
        image_width,
    };

    let (family, routine, fallback) = routine_for(&doc.layout_type);
    let output = routine(&mut doc, &input);

    apply_transparency_handling(&mut doc);

    doc.calculated_values = Some(CalculatedValues {
        text_width: output.text_width,
        image_width: output.image_width,
        container_transparency: transparency as f64 / 100.0,
        image_text_ratio: ratio,
        family: family.as_str().to_string(),
        family_fallback: fallback,
        motif_band_height: output.motif_band_height,
    });

    debug!(
        "Computed '{}' as {} (ratio={ratio}, transparency={transparency}, text={}, image={})",
        doc.layout_id,
        family.as_str(),
        output.text_width,
        output.image_width
    );

    doc
}

/// Normalises the opacity of zones listed under `transparency_handling`:
/// percentages become fractions, the result is clamped to [0.1, 1.0], and
/// zones without a value receive the fallback opacity.
pub fn apply_transparency_handling(doc: &mut LayoutDocument) {
    let Some(handling) = doc.transparency_handling.clone() else {
        return;
    };

    for name in &handling.apply_to_zones {
        if let Some(zone) = doc.zones.get_mut(name) {
            let raw = zone.transparency.unwrap_or(handling.fallback_opacity);
            let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
            zone.transparency = Some(fraction.clamp(MIN_ZONE_OPACITY, MAX_ZONE_OPACITY));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

const SPLIT_TEXT_ZONES: &[&str] = &[
    "standort_block",
    "headline_block",
    "subline_block",
    "benefits_block",
    "company_block",
    "cta_block",
    "stellentitel_block",
];

const STACK_TEXT_ZONES: &[&str] = &[
    "headline_block",
    "subline_block",
    "benefits_block",
    "company_block",
    "cta_block",
];

/// Narrows the named text zones to `min(column − margin, current width)` and
/// stamps the container transparency. x, y and height are left alone.
fn fit_text_zones(
    doc: &mut LayoutDocument,
    names: &[&str],
    column_width: i32,
    margin: i32,
    transparency: i32,
) {
    for name in names {
        if let Some(zone) = doc.zones.get_mut(*name) {
            zone.width = (column_width - margin).min(zone.width);
            zone.transparency = Some(transparency as f64 / 100.0);
        }
    }
}

/// Sets the text zones' widths to a fraction of the canvas width, capped so
/// the zone stays on the canvas.
fn fit_text_zones_fractional(
    doc: &mut LayoutDocument,
    fractions: &[(&str, f64)],
    transparency: i32,
) {
    let canvas_width = doc.canvas.width;
    for (name, fraction) in fractions {
        if let Some(zone) = doc.zones.get_mut(*name) {
            let target = (fraction * canvas_width as f64) as i32;
            zone.width = target.min(canvas_width - zone.x);
            zone.transparency = Some(transparency as f64 / 100.0);
        }
    }
}

fn place_image(doc: &mut LayoutDocument, name: &str, x: i32, width: i32) {
    if let Some(zone) = doc.zones.get_mut(name) {
        zone.x = x;
        zone.width = width;
    }
}

fn columns(input: &GeometryInput) -> RoutineOutput {
    RoutineOutput {
        text_width: input.text_width,
        image_width: input.image_width,
        motif_band_height: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Routines
// ────────────────────────────────────────────────────────────────────────────

/// Text column left, image column right of the gutter.
fn vertical_split(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(doc, SPLIT_TEXT_ZONES, input.text_width, WIDE_MARGIN, input.transparency);
    place_image(
        doc,
        "image_motiv",
        input.text_width + GUTTER_PX,
        input.image_width,
    );
    columns(input)
}

/// Image column left, text column right.
fn vertical_split_left(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(
        doc,
        &SPLIT_TEXT_ZONES[..6],
        input.text_width,
        WIDE_MARGIN,
        input.transparency,
    );
    place_image(doc, "motiv_area", 0, input.image_width);
    columns(input)
}

/// The image band width follows the transparency slider inversely
/// ((100 − t) % of the canvas) rather than the ratio slider.
fn horizontal_split(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    let canvas_width = input.canvas.width;
    let image_width = ((100 - input.transparency) as f64 / 100.0 * canvas_width as f64) as i32;
    let text_width = canvas_width - image_width - HORIZONTAL_GUTTER_PX;

    let text_width = text_width.clamp(MIN_TEXT_WIDTH, MAX_TEXT_WIDTH);
    let image_width = image_width.clamp(MIN_IMAGE_WIDTH, MAX_IMAGE_WIDTH);

    if let Some(zone) = doc.zones.get_mut("image_motiv") {
        zone.width = image_width.min(canvas_width - zone.x);
    }
    fit_text_zones(doc, STACK_TEXT_ZONES, text_width, NARROW_MARGIN, input.transparency);

    RoutineOutput {
        text_width,
        image_width,
        motif_band_height: None,
    }
}

fn modern_split(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(
        doc,
        &SPLIT_TEXT_ZONES[..6],
        input.text_width,
        WIDE_MARGIN,
        input.transparency,
    );
    place_image(
        doc,
        "image_motiv",
        input.text_width + GUTTER_PX,
        input.image_width,
    );
    columns(input)
}

fn minimalist(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(doc, STACK_TEXT_ZONES, input.text_width, NARROW_MARGIN, input.transparency);
    columns(input)
}

const HERO_WIDTHS: &[(&str, f64)] = &[
    ("standort_block", 0.37),
    ("logo_block", 0.37),
    ("headline_block", 0.25),
    ("subline_block", 0.37),
    ("benefits_block", 0.37),
    ("stellentitel_block", 0.37),
    ("cta_block", 0.20),
];

const HERO_BAND_MIN: f64 = 340.0;
const HERO_BAND_MAX: f64 = 740.0;

/// Image band across the top, copy underneath. A higher ratio gives the
/// band more height; the height is reported, not applied to the zone.
fn hero(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones_fractional(doc, HERO_WIDTHS, input.transparency);

    if let Some(zone) = doc.zones.get_mut("motiv_area") {
        zone.x = 0;
    }

    let band = HERO_BAND_MIN
        + (input.ratio - MIN_RATIO) as f64 * (HERO_BAND_MAX - HERO_BAND_MIN)
            / (MAX_RATIO - MIN_RATIO) as f64;
    let band = band.clamp(HERO_BAND_MIN, HERO_BAND_MAX) as i32;

    RoutineOutput {
        text_width: input.text_width,
        image_width: input.image_width,
        motif_band_height: Some(band.min(input.canvas.height)),
    }
}

fn portfolio(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(doc, STACK_TEXT_ZONES, input.text_width, NARROW_MARGIN, input.transparency);
    columns(input)
}

const STORYTELLING_WIDTHS: &[(&str, f64)] = &[
    ("standort_block", 0.45),
    ("headline_1_block", 0.45),
    ("headline_2_block", 0.45),
    ("subline_block", 0.45),
    ("stellentitel_block", 0.45),
    ("cta_block", 0.45),
];

/// Full-canvas background motif with stacked copy containers.
fn storytelling(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones_fractional(doc, STORYTELLING_WIDTHS, input.transparency);
    if let Some(zone) = doc.zones.get_mut("motiv_area") {
        zone.x = 0;
    }
    columns(input)
}

fn infographic(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(
        doc,
        &["headline_block", "subline_block", "infographic_block", "cta_block"],
        input.text_width,
        NARROW_MARGIN,
        input.transparency,
    );
    columns(input)
}

fn magazine(doc: &mut LayoutDocument, input: &GeometryInput) -> RoutineOutput {
    fit_text_zones(
        doc,
        &["headline_block", "subline_block", "content_block", "cta_block"],
        input.text_width,
        NARROW_MARGIN,
        input.transparency,
    );
    columns(input)
}
