//! Pixel geometry expressed as relative proportions for prose.

use serde::Serialize;

use crate::layout::engine::LayoutFamily;
use crate::layout::model::{Canvas, LayoutDocument};

pub const SAFE_MARGIN_PCT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelativeProportions {
    pub text: i32,
    pub image: i32,
    pub gutter: i32,
    pub safe: i32,
}

fn pct(value: i32, canvas_width: i32) -> i32 {
    (100.0 * value as f64 / canvas_width as f64).round() as i32
}

pub fn derive_relative(doc: &LayoutDocument) -> RelativeProportions {
    let width = doc.canvas.width.max(1);
    let (text, image) = doc
        .calculated_values
        .as_ref()
        .map(|cv| (cv.text_width, cv.image_width))
        .unwrap_or((0, 0));
    let gutter = (width - (text + image)).max(0);

    RelativeProportions {
        text: pct(text, width),
        image: pct(image, width),
        gutter: pct(gutter, width),
        safe: SAFE_MARGIN_PCT,
    }
}

/// Tolerance band around a percentage, e.g. `43–45%`.
pub fn tol(p: i32) -> String {
    format!("{}–{}%", p - 1, p + 1)
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

pub fn aspect_ratio(canvas: &Canvas) -> String {
    let divisor = gcd(canvas.width, canvas.height).max(1);
    format!("{}:{}", canvas.width / divisor, canvas.height / divisor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    TextLeft,
    ImageLeft,
    ImageTop,
}

fn family_of(doc: &LayoutDocument) -> Option<LayoutFamily> {
    doc.calculated_values
        .as_ref()
        .and_then(|cv| LayoutFamily::from_tag(&cv.family))
        .or_else(|| LayoutFamily::from_tag(&doc.layout_type))
}

/// Orientation from the layout family, else from where text and image zones
/// start horizontally.
pub fn orientation(doc: &LayoutDocument) -> Orientation {
    match family_of(doc) {
        Some(LayoutFamily::VerticalSplit | LayoutFamily::ModernSplit) => Orientation::TextLeft,
        Some(LayoutFamily::VerticalSplitLeft | LayoutFamily::HorizontalSplit) => {
            Orientation::ImageLeft
        }
        Some(LayoutFamily::Hero) => Orientation::ImageTop,
        _ => {
            let min_text = doc.text_zones().map(|(_, z)| z.x).min();
            let min_image = doc.image_zones().map(|(_, z)| z.x).min();
            match (min_text, min_image) {
                (Some(text), Some(image)) if image < text => Orientation::ImageLeft,
                _ => Orientation::TextLeft,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    Split,
    HeroBand,
    Band,
}

pub fn composition_kind(doc: &LayoutDocument) -> CompositionKind {
    match family_of(doc) {
        Some(LayoutFamily::Hero) => CompositionKind::HeroBand,
        Some(family) if family.is_split() => CompositionKind::Split,
        _ => CompositionKind::Band,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::catalogue::Catalogue;
    use crate::layout::engine::compute;

    fn computed(layout_id: &str) -> LayoutDocument {
        let template = Catalogue::builtin().unwrap().get(layout_id).unwrap().clone();
        compute(&template, &50.into(), &80.into())
    }

    #[test]
    fn test_default_split_percentages() {
        let rel = derive_relative(&computed("vertical-split"));
        assert_eq!((rel.text, rel.image, rel.gutter, rel.safe), (44, 50, 6, 3));
        assert_eq!(tol(rel.text), "43–45%");
    }

    #[test]
    fn test_missing_calculated_values() {
        let template = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let rel = derive_relative(&template);
        assert_eq!((rel.text, rel.image, rel.gutter), (0, 0, 100));
    }

    #[test]
    fn test_aspect_ratio_reduced() {
        assert_eq!(aspect_ratio(&Canvas { width: 1080, height: 1080 }), "1:1");
        assert_eq!(aspect_ratio(&Canvas { width: 1080, height: 1350 }), "4:5");
        assert_eq!(aspect_ratio(&Canvas { width: 1920, height: 1080 }), "16:9");
    }

    #[test]
    fn test_orientation_by_family() {
        assert_eq!(orientation(&computed("vertical-split")), Orientation::TextLeft);
        assert_eq!(orientation(&computed("vertical-split-left")), Orientation::ImageLeft);
        assert_eq!(orientation(&computed("hero")), Orientation::ImageTop);
        assert_eq!(composition_kind(&computed("hero")), CompositionKind::HeroBand);
        assert_eq!(composition_kind(&computed("modern-split")), CompositionKind::Split);
        assert_eq!(composition_kind(&computed("magazine")), CompositionKind::Band);
    }

    #[test]
    fn test_orientation_falls_back_to_zone_positions() {
        let mut doc = computed("storytelling");
        // Full-canvas motif at x = 0, text at x = 54.
        assert_eq!(orientation(&doc), Orientation::ImageLeft);
        doc.zones.retain(|_, z| !z.is_image());
        assert_eq!(orientation(&doc), Orientation::TextLeft);
    }
}
