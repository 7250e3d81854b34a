//! Adaptive font sizing.
//!
//! A zone's font size starts from its height, is capped per role, scaled by
//! how wide the zone is relative to the text column, and then shrunk until an
//! estimate of the rendered copy fits the zone width. The result never leaves
//! the role's `[min, max]` band.

use serde::{Deserialize, Serialize};

use crate::style::options::TypographyScale;

/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Horizontal room reserved inside the zone before copy is measured.
pub const FIT_PADDING_PX: i32 = 20;
const FIT_SAFETY: f64 = 0.9;

const MIN_REFERENCE_WIDTH: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRole {
    Headline,
    Subline,
    Benefits,
    Cta,
}

impl TypeRole {
    fn multiplier(&self, scale: TypographyScale) -> f64 {
        match (scale, self) {
            (TypographyScale::Sm, TypeRole::Headline) => 0.45,
            (TypographyScale::Sm, TypeRole::Subline) => 0.55,
            (TypographyScale::Sm, TypeRole::Benefits) => 0.35,
            (TypographyScale::Sm, TypeRole::Cta) => 0.40,
            (TypographyScale::Md, TypeRole::Headline) => 0.55,
            (TypographyScale::Md, TypeRole::Subline) => 0.60,
            (TypographyScale::Md, TypeRole::Benefits) => 0.40,
            (TypographyScale::Md, TypeRole::Cta) => 0.45,
            (TypographyScale::Lg, TypeRole::Headline) => 0.65,
            (TypographyScale::Lg, TypeRole::Subline) => 0.65,
            (TypographyScale::Lg, TypeRole::Benefits) => 0.45,
            (TypographyScale::Lg, TypeRole::Cta) => 0.50,
        }
    }

    pub fn max_size(&self) -> i32 {
        match self {
            TypeRole::Headline => 80,
            TypeRole::Subline => 64,
            TypeRole::Benefits => 48,
            TypeRole::Cta => 56,
        }
    }

    pub fn min_size(&self) -> i32 {
        match self {
            TypeRole::Headline => 28,
            TypeRole::Subline => 22,
            TypeRole::Benefits => 16,
            TypeRole::Cta => 18,
        }
    }

    pub fn weight(&self) -> u16 {
        match self {
            TypeRole::Headline | TypeRole::Cta => 700,
            TypeRole::Subline | TypeRole::Benefits => 500,
        }
    }

    /// Copy measured when no real copy is bound to the zone.
    pub fn sample_text(&self) -> &'static str {
        match self {
            TypeRole::Headline => "Dein Rhythmus. Dein Job.",
            TypeRole::Subline => "Entdecke deine Karriere in der Pflege",
            TypeRole::Benefits => "Attraktive Vergutung",
            TypeRole::Cta => "Jetzt Bewerben!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub role: TypeRole,
    pub font_size_px: i32,
    pub base_size_px: i32,
    pub line_height: f64,
    pub line_height_px: i32,
    pub weight: u16,
    pub width_ratio: f64,
    pub estimated_text_width: f64,
    pub fits_container: bool,
    pub used_sample_text: bool,
}

/// How wide a zone is compared to 80% of the text column, capped at 1.
pub fn width_ratio(zone_width: i32, reference_text_width: i32) -> f64 {
    let reference = (reference_text_width as f64 * 0.8).max(MIN_REFERENCE_WIDTH);
    (zone_width as f64 / reference).min(1.0)
}

/// Longest rendered line; multi-line copy (benefits) wraps per entry.
fn measured_chars(text: &str) -> usize {
    text.lines().map(|l| l.trim().chars().count()).max().unwrap_or(0)
}

pub fn fit_font(
    role: TypeRole,
    scale: TypographyScale,
    zone_width: i32,
    zone_height: i32,
    reference_text_width: i32,
    copy: Option<&str>,
) -> Typography {
    let (text, used_sample_text) = match copy.filter(|c| !c.trim().is_empty()) {
        Some(copy) => (copy, false),
        None => (role.sample_text(), true),
    };

    let base = (zone_height as f64 * role.multiplier(scale)) as i32;
    let size = base.min(role.max_size());
    let ratio = width_ratio(zone_width, reference_text_width);
    let mut adaptive = ((size as f64 * ratio) as i32).max(role.min_size());

    let chars = measured_chars(text);
    let available = (zone_width - FIT_PADDING_PX) as f64;
    let mut estimated = chars as f64 * adaptive as f64 * CHAR_WIDTH_FACTOR;

    if chars > 0 && estimated > available {
        let fitting = (available * FIT_SAFETY / (chars as f64 * CHAR_WIDTH_FACTOR)).floor() as i32;
        adaptive = adaptive.min(fitting).max(role.min_size());
        estimated = chars as f64 * adaptive as f64 * CHAR_WIDTH_FACTOR;
    }

    let line_height = (adaptive as f64 / 20.0).clamp(1.1, 1.6);

    Typography {
        role,
        font_size_px: adaptive,
        base_size_px: base,
        line_height,
        line_height_px: (adaptive as f64 * line_height) as i32,
        weight: role.weight(),
        width_ratio: ratio,
        estimated_text_width: estimated,
        fits_container: estimated <= available,
        used_sample_text,
    }
}
