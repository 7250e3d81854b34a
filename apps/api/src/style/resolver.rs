//! Style resolution for a certified layout.
//!
//! Runs in two passes over the same inputs. The first derives document-wide
//! values (typography per text zone, container settings, accents, contrast
//! warnings). The second assigns each non-image zone a container look by
//! role and merges any explicit template style into it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::PipelineError;
use crate::layout::model::LayoutDocument;
use crate::style::accents::{accents_for, AccentSpec};
use crate::style::containers::{container_settings, ContainerSettings};
use crate::style::contrast::{ContrastChecker, StyleWarning};
use crate::style::options::{
    validate_style_inputs, Palette, PaletteInput, StyleOptions, StyleOptionsInput,
};
use crate::style::roles::{
    merge_explicit, resolve_container_look, ContainerLook, LookInput, MergeOutcome, RoleTable,
    ZoneRole,
};
use crate::style::typography::{fit_font, Typography};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledDocument {
    pub certified: bool,
    pub layout_id: String,
    pub palette: Palette,
    pub options: StyleOptions,
    /// Keyed by zone name.
    pub typography: BTreeMap<String, Typography>,
    pub containers: ContainerSettings,
    pub accents: AccentSpec,
    /// Keyed by zone name; image zones have no entry.
    pub zone_styles: BTreeMap<String, ContainerLook>,
    pub warnings: Vec<StyleWarning>,
    /// Container opacity fraction: the layout's computed value, or the
    /// `transparency_pct` style option when the layout carries none.
    pub transparency: f64,
}

impl StyledDocument {
    /// Look used to describe containers in the prompt: the headline zone if
    /// present, else the first headline-role zone, else the first text zone.
    pub fn representative_look(&self, doc: &LayoutDocument) -> Option<&ContainerLook> {
        if let Some(look) = self.zone_styles.get("headline_block") {
            return Some(look);
        }
        let text_looks: Vec<&ContainerLook> = doc
            .text_zones()
            .filter_map(|(name, _)| self.zone_styles.get(name))
            .collect();
        text_looks
            .iter()
            .find(|look| look.role == ZoneRole::Headline)
            .or_else(|| text_looks.first())
            .copied()
    }
}

pub struct StyleResolver {
    roles: RoleTable,
    contrast: ContrastChecker,
}

impl StyleResolver {
    pub fn new(contrast_capacity: usize) -> Self {
        Self::with_roles(RoleTable::default(), contrast_capacity)
    }

    pub fn with_roles(roles: RoleTable, contrast_capacity: usize) -> Self {
        Self {
            roles,
            contrast: ContrastChecker::new(contrast_capacity),
        }
    }

    pub fn contrast(&self) -> &ContrastChecker {
        &self.contrast
    }

    /// Validates raw palette/options and resolves. The layout must be certified.
    pub fn resolve(
        &self,
        doc: &LayoutDocument,
        palette: &PaletteInput,
        options: &StyleOptionsInput,
    ) -> Result<StyledDocument, PipelineError> {
        ensure_certified(doc)?;
        let (palette, options) = validate_style_inputs(palette, options)?;
        self.resolve_validated(doc, palette, options)
    }

    pub fn resolve_validated(
        &self,
        doc: &LayoutDocument,
        palette: Palette,
        options: StyleOptions,
    ) -> Result<StyledDocument, PipelineError> {
        ensure_certified(doc)?;

        let reference = doc.reference_text_width();
        let transparency = doc
            .calculated_values
            .as_ref()
            .map(|cv| cv.container_transparency)
            .unwrap_or(options.transparency_pct as f64 / 100.0);

        // First pass: document-wide values.
        let typography: BTreeMap<String, Typography> = doc
            .text_zones()
            .filter_map(|(name, zone)| {
                let role = self.roles.role_of(name).type_role()?;
                let t = fit_font(
                    role,
                    options.typography_scale,
                    zone.width,
                    zone.height,
                    reference,
                    zone.bound_text.as_deref(),
                );
                Some((name.clone(), t))
            })
            .collect();

        let containers = container_settings(doc, &options);
        let accents = accents_for(doc, &options.accent_elements);
        let warnings = self.contrast.check(&palette);

        // Second pass: per-zone looks.
        let mut zone_styles = BTreeMap::new();
        let (mut overridden, mut merged, mut skipped) = (0usize, 0usize, 0usize);

        for (name, zone) in &doc.zones {
            if zone.is_image() {
                skipped += 1;
                continue;
            }

            let role = self.roles.role_of(name);
            if role == ZoneRole::Generic && zone.is_text() {
                warn!("Text zone '{}' in '{}' has no role; using generic look", name, doc.layout_id);
            }

            let look = resolve_container_look(&LookInput {
                role,
                shape: containers.shape.as_str(),
                border_style: containers.border_style,
                texture: containers.texture.as_str(),
                corner_radius_px: containers.corner_radius_px,
                palette: &palette,
                opacity: zone.transparency.unwrap_or(transparency),
            });

            let (look, outcome) = merge_explicit(look, zone.explicit_style.as_ref());
            match outcome {
                MergeOutcome::Overridden => overridden += 1,
                MergeOutcome::Merged => merged += 1,
                MergeOutcome::Resolved => {}
            }
            zone_styles.insert(name.clone(), look);
        }

        info!(
            "Styled '{}': {} zones, {} explicit overrides, {} merges, {} image zones skipped",
            doc.layout_id,
            zone_styles.len(),
            overridden,
            merged,
            skipped
        );
        if !warnings.is_empty() {
            debug!("Style warnings for '{}': {:?}", doc.layout_id, warnings);
        }

        Ok(StyledDocument {
            certified: true,
            layout_id: doc.layout_id.clone(),
            palette,
            options,
            typography,
            containers,
            accents,
            zone_styles,
            warnings,
            transparency,
        })
    }
}

fn ensure_certified(doc: &LayoutDocument) -> Result<(), PipelineError> {
    if doc.certified {
        Ok(())
    } else {
        Err(PipelineError::PreconditionNotCertified { stage: "Layout" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::catalogue::Catalogue;
    use crate::layout::engine::compute;
    use crate::layout::schema::{certify, ValidatorOptions};
    use crate::style::options::{ContainerShape, TypographyScale};
    use crate::style::typography::TypeRole;

    fn certified(layout_id: &str, ratio: i32) -> LayoutDocument {
        let template = Catalogue::builtin().unwrap().get(layout_id).unwrap().clone();
        certify(compute(&template, &ratio.into(), &80.into()), &ValidatorOptions::default()).unwrap()
    }

    fn palette_input() -> PaletteInput {
        let p = Palette::default();
        [
            ("primary", p.primary),
            ("secondary", p.secondary),
            ("accent", p.accent),
            ("background", p.background),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    // ── preconditions ──

    #[test]
    fn test_uncertified_layout_is_rejected() {
        let template = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let doc = compute(&template, &50.into(), &80.into());
        let err = StyleResolver::new(8)
            .resolve(&doc, &palette_input(), &StyleOptionsInput::from(&StyleOptions::default()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::PreconditionNotCertified { stage: "Layout" }));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let doc = certified("vertical-split", 50);
        let mut palette = palette_input();
        palette.remove("accent");
        let err = StyleResolver::new(8)
            .resolve(&doc, &palette, &StyleOptionsInput::from(&StyleOptions::default()))
            .unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
    }

    // ── first pass ──

    #[test]
    fn test_typography_for_each_typed_zone() {
        let doc = certified("vertical-split", 50);
        let options = StyleOptions {
            typography_scale: TypographyScale::Lg,
            ..StyleOptions::default()
        };
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), options)
            .unwrap();

        assert!(styled.certified);
        let keys: Vec<&str> = styled.typography.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["benefits_block", "cta_block", "headline_block", "subline_block"]);
        assert_eq!(styled.typography["cta_block"].role, TypeRole::Cta);
        for t in styled.typography.values() {
            assert!(t.font_size_px >= t.role.min_size());
            assert!(t.font_size_px <= t.role.max_size());
        }
        assert_eq!(styled.transparency, 0.8);
    }

    #[test]
    fn test_bound_copy_is_measured() {
        let mut doc = certified("vertical-split", 50);
        doc.zones.get_mut("headline_block").unwrap().bound_text = Some("Pflege mit Herz".to_string());
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), StyleOptions::default())
            .unwrap();
        assert!(!styled.typography["headline_block"].used_sample_text);
        assert!(styled.typography["subline_block"].used_sample_text);
    }

    #[test]
    fn test_option_transparency_used_without_geometry() {
        let template = Catalogue::builtin().unwrap().get("vertical-split").unwrap().clone();
        let doc = certify(template, &ValidatorOptions::default()).unwrap();
        assert!(doc.calculated_values.is_none());

        let options = StyleOptions {
            transparency_pct: 35,
            ..StyleOptions::default()
        };
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), options)
            .unwrap();
        assert_eq!(styled.transparency, 0.35);
        assert_eq!(styled.zone_styles["headline_block"].background.opacity, 0.35);
    }

    #[test]
    fn test_narrow_layout_simplified() {
        let doc = certified("vertical-split", 70);
        let options = StyleOptions {
            container_shape: ContainerShape::Ribbon,
            ..StyleOptions::default()
        };
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), options)
            .unwrap();
        assert!(styled.containers.simplified);
        assert_eq!(styled.zone_styles["headline_block"].shape, "rounded_rectangle");
        assert_eq!(styled.zone_styles["headline_block"].texture, "solid");
    }

    // ── second pass ──

    #[test]
    fn test_image_zones_have_no_look() {
        let doc = certified("vertical-split", 50);
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), StyleOptions::default())
            .unwrap();
        assert!(!styled.zone_styles.contains_key("image_motiv"));
        assert_eq!(styled.zone_styles["headline_block"].background.opacity, 0.8);
        assert!(styled.zone_styles["cta_block"].accent.is_some());
        assert_eq!(styled.zone_styles["company_block"].role, ZoneRole::Meta);
    }

    #[test]
    fn test_explicit_template_style_applied() {
        let doc = certified("storytelling", 50);
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), StyleOptions::default())
            .unwrap();
        let cta = &styled.zone_styles["cta_block"];
        assert_eq!(cta.border_radius, 16);
        assert_eq!(cta.shadow.as_ref().unwrap().blur, 8);
    }

    #[test]
    fn test_representative_look_prefers_headline() {
        let doc = certified("storytelling", 50);
        let styled = StyleResolver::new(8)
            .resolve_validated(&doc, Palette::default(), StyleOptions::default())
            .unwrap();
        let look = styled.representative_look(&doc).unwrap();
        assert_eq!(look.role, ZoneRole::Headline);
    }

    #[test]
    fn test_contrast_memo_reused_across_runs() {
        let doc = certified("vertical-split", 50);
        let resolver = StyleResolver::new(8);
        for _ in 0..3 {
            resolver
                .resolve_validated(&doc, Palette::default(), StyleOptions::default())
                .unwrap();
        }
        assert_eq!(resolver.contrast().stats().entries, 1);
    }
}
