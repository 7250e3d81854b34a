//! Accent element sizing, relative to the zones each accent decorates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::layout::model::LayoutDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentElement {
    Divider,
    Badge,
    Pin,
    Dot,
}

impl AccentElement {
    pub const ALL: &'static [AccentElement] = &[
        AccentElement::Divider,
        AccentElement::Badge,
        AccentElement::Pin,
        AccentElement::Dot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccentElement::Divider => "divider",
            AccentElement::Badge => "badge",
            AccentElement::Pin => "pin",
            AccentElement::Dot => "dot",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerSpec {
    pub width_px: u32,
    pub style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccentSpec {
    pub enabled: Vec<AccentElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divider: Option<DividerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_radius_px: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_size_px: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_size_px: Option<i32>,
}

fn zone_height(doc: &LayoutDocument, name: &str) -> Option<i32> {
    doc.zones.get(name).map(|z| z.height)
}

/// Accents whose anchor zone is absent are left unset.
pub fn accents_for(doc: &LayoutDocument, elements: &BTreeSet<AccentElement>) -> AccentSpec {
    let mut accents = AccentSpec {
        enabled: elements.iter().copied().collect(),
        ..AccentSpec::default()
    };

    for element in elements {
        match element {
            AccentElement::Divider => {
                if doc.zones.contains_key("headline_block") && doc.zones.contains_key("subline_block")
                {
                    accents.divider = Some(DividerSpec {
                        width_px: 2,
                        style: "solid".to_string(),
                    });
                }
            }
            AccentElement::Badge => {
                accents.badge_radius_px =
                    zone_height(doc, "standort_block").map(|h| (h / 4).clamp(8, 20));
            }
            AccentElement::Pin => {
                accents.pin_size_px = zone_height(doc, "cta_block").map(|h| (h / 6).clamp(12, 24));
            }
            AccentElement::Dot => {
                accents.dot_size_px =
                    zone_height(doc, "benefits_block").map(|h| (h / 8).clamp(6, 16));
            }
        }
    }

    accents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::catalogue::Catalogue;

    fn all() -> BTreeSet<AccentElement> {
        AccentElement::ALL.iter().copied().collect()
    }

    #[test]
    fn test_accents_scale_with_anchor_zones() {
        let doc = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let accents = accents_for(&doc, &all());
        assert_eq!(accents.enabled.len(), 4);
        assert_eq!(accents.divider.as_ref().unwrap().width_px, 2);

        let standort = doc.zones["standort_block"].height;
        assert_eq!(accents.badge_radius_px, Some((standort / 4).clamp(8, 20)));
        let cta = doc.zones["cta_block"].height;
        assert_eq!(accents.pin_size_px, Some((cta / 6).clamp(12, 24)));
    }

    #[test]
    fn test_missing_anchor_leaves_accent_unset() {
        let doc = Catalogue::builtin().unwrap().get("magazine").unwrap().clone();
        let accents = accents_for(&doc, &all());
        assert!(accents.badge_radius_px.is_none());
        assert!(accents.dot_size_px.is_none());
    }

    #[test]
    fn test_no_elements_no_accents() {
        let doc = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let accents = accents_for(&doc, &BTreeSet::new());
        assert_eq!(accents, AccentSpec::default());
    }

    #[test]
    fn test_element_names() {
        assert_eq!(AccentElement::from_name("pin"), Some(AccentElement::Pin));
        assert_eq!(AccentElement::from_name("star"), None);
    }
}
