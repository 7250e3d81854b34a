//! Container padding and the global narrow-column simplification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::model::LayoutDocument;
use crate::style::options::{BorderStyle, ContainerShape, StyleOptions, TextureStyle};
use crate::style::typography::width_ratio;

/// Text columns narrower than this get plain containers.
pub const SIMPLIFY_BELOW_TEXT_WIDTH: i32 = 400;

const MIN_PADDING_X: i32 = 5;
const MIN_PADDING_Y: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub x: i32,
    pub y: i32,
    pub width_ratio: f64,
}

pub fn padding_for(zone_width: i32, reference_text_width: i32) -> Padding {
    let base_x = ((zone_width as f64 * 0.05) as i32).clamp(5, 32);
    let base_y = ((zone_width as f64 * 0.03) as i32).clamp(4, 20);
    let ratio = width_ratio(zone_width, reference_text_width);

    Padding {
        x: ((base_x as f64 * ratio) as i32).max(MIN_PADDING_X),
        y: ((base_y as f64 * ratio) as i32).max(MIN_PADDING_Y),
        width_ratio: ratio,
    }
}

/// Container choices in effect for the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    pub shape: ContainerShape,
    pub border_style: BorderStyle,
    pub texture: TextureStyle,
    pub corner_radius_px: u32,
    pub simplified: bool,
    pub padding: BTreeMap<String, Padding>,
}

pub fn container_settings(doc: &LayoutDocument, options: &StyleOptions) -> ContainerSettings {
    let reference = doc.reference_text_width();
    let simplified = reference < SIMPLIFY_BELOW_TEXT_WIDTH;

    let padding = doc
        .zones
        .iter()
        .filter(|(_, zone)| !zone.is_image())
        .map(|(name, zone)| (name.clone(), padding_for(zone.width, reference)))
        .collect();

    if simplified {
        ContainerSettings {
            shape: ContainerShape::RoundedRectangle,
            border_style: BorderStyle::SoftShadow,
            texture: TextureStyle::Solid,
            corner_radius_px: options.corner_radius_px,
            simplified,
            padding,
        }
    } else {
        ContainerSettings {
            shape: options.container_shape,
            border_style: options.border_style,
            texture: options.texture_style,
            corner_radius_px: options.corner_radius_px,
            simplified,
            padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::catalogue::Catalogue;
    use crate::layout::engine::compute;

    #[test]
    fn test_padding_full_width_zone() {
        // 400 * 0.05 = 20, 400 * 0.03 = 12; ratio = 400 / 384 → 1
        let p = padding_for(400, 480);
        assert_eq!((p.x, p.y), (20, 12));
    }

    #[test]
    fn test_padding_caps_and_floors() {
        let wide = padding_for(2000, 2000);
        assert_eq!((wide.x, wide.y), (32, 20));
        let tiny = padding_for(20, 480);
        assert_eq!((tiny.x, tiny.y), (5, 4));
    }

    #[test]
    fn test_wide_column_keeps_options() {
        let template = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let doc = compute(&template, &50.into(), &80.into());
        let options = StyleOptions {
            container_shape: ContainerShape::Pill,
            texture_style: TextureStyle::Glass,
            ..StyleOptions::default()
        };
        let settings = container_settings(&doc, &options);
        assert!(!settings.simplified);
        assert_eq!(settings.shape, ContainerShape::Pill);
        assert_eq!(settings.texture, TextureStyle::Glass);
        assert!(!settings.padding.contains_key("image_motiv"));
        assert!(settings.padding.contains_key("headline_block"));
    }

    #[test]
    fn test_narrow_column_simplifies() {
        let template = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let doc = compute(&template, &70.into(), &80.into());
        assert_eq!(doc.reference_text_width(), 350);
        let options = StyleOptions {
            container_shape: ContainerShape::Ribbon,
            border_style: BorderStyle::Emboss,
            ..StyleOptions::default()
        };
        let settings = container_settings(&doc, &options);
        assert!(settings.simplified);
        assert_eq!(settings.shape, ContainerShape::RoundedRectangle);
        assert_eq!(settings.border_style, BorderStyle::SoftShadow);
        assert_eq!(settings.texture, TextureStyle::Solid);
    }
}
