//! The composed operation: layout id + sliders + palette + options + copy →
//! styled zones, calculated values and the generator prompt.
//!
//! Stages run in a fixed order (load → compute → certify → style → compose)
//! and each checks the certification flag of its input. Geometry results are
//! memoised per (layout id, clamped ratio, clamped transparency).

pub mod handlers;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{BoundedMemo, MemoStats};
use crate::config::Config;
use crate::errors::{FieldError, PipelineError};
use crate::layout::catalogue::Catalogue;
use crate::layout::engine::{
    clamp_ratio, clamp_transparency, compute, SliderValue, DEFAULT_RATIO, DEFAULT_TRANSPARENCY,
};
use crate::layout::model::{CalculatedValues, LayoutDocument, ValidationStatus, Zone};
use crate::layout::schema::{certify, ValidatorOptions};
use crate::prompt::{compose_or_fallback, AdCopy, MotifMeta, Prompt, PromptMode};
use crate::style::accents::AccentSpec;
use crate::style::containers::Padding;
use crate::style::contrast::StyleWarning;
use crate::style::options::{PaletteInput, StyleOptionsInput};
use crate::style::resolver::StyleResolver;
use crate::style::roles::ContainerLook;
use crate::style::typography::Typography;

// ────────────────────────────────────────────────────────────────────────────
// Request / response
// ────────────────────────────────────────────────────────────────────────────

fn default_ratio() -> SliderValue {
    DEFAULT_RATIO.into()
}

fn default_transparency() -> SliderValue {
    DEFAULT_TRANSPARENCY.into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeRequest {
    pub layout_id: String,
    #[serde(default = "default_ratio")]
    pub ratio: SliderValue,
    #[serde(default = "default_transparency")]
    pub transparency: SliderValue,
    #[serde(default, alias = "ci")]
    pub palette: PaletteInput,
    #[serde(default)]
    pub options: StyleOptionsInput,
    #[serde(default)]
    pub copy: AdCopy,
    #[serde(default)]
    pub motif: MotifMeta,
    #[serde(default)]
    pub mode: PromptMode,
}

/// A zone with everything resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledZone {
    #[serde(flatten)]
    pub zone: Zone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerLook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreativeResponse {
    pub layout_id: String,
    pub zones: BTreeMap<String, StyledZone>,
    pub calculated_values: Option<CalculatedValues>,
    pub status: Option<ValidationStatus>,
    pub warnings: Vec<FieldError>,
    pub style_warnings: Vec<StyleWarning>,
    pub accents: AccentSpec,
    pub simplified_containers: bool,
    pub prompt: Prompt,
    pub prompt_mode: PromptMode,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

type GeometryKey = (String, i32, i32);

pub struct Pipeline {
    catalogue: Catalogue,
    geometry: BoundedMemo<GeometryKey, LayoutDocument>,
    style: StyleResolver,
    validator: ValidatorOptions,
}

impl Pipeline {
    pub fn new(catalogue: Catalogue, config: &Config) -> Self {
        Self {
            catalogue,
            geometry: BoundedMemo::new(config.geometry_cache_capacity),
            style: StyleResolver::new(config.contrast_cache_capacity),
            validator: ValidatorOptions {
                enforce_zone_requirements: config.enforce_zone_requirements,
            },
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn geometry_stats(&self) -> MemoStats {
        self.geometry.stats()
    }

    pub fn contrast_stats(&self) -> MemoStats {
        self.style.contrast().stats()
    }

    /// Loads the template and computes geometry, through the memo.
    fn geometry(
        &self,
        layout_id: &str,
        ratio: &SliderValue,
        transparency: &SliderValue,
    ) -> Result<LayoutDocument, PipelineError> {
        let template = self.catalogue.get(layout_id)?;
        let ratio = clamp_ratio(ratio);
        let transparency = clamp_transparency(transparency);
        let key = (layout_id.to_string(), ratio, transparency);

        if self.geometry.contains(&key) {
            debug!("Geometry cache hit for {layout_id} ({ratio}, {transparency})");
        }
        Ok(self.geometry.get_or_insert_with(key, || {
            compute(template, &ratio.into(), &transparency.into())
        }))
    }

    /// Certified geometry without style or prompt.
    pub fn preview(
        &self,
        layout_id: &str,
        ratio: &SliderValue,
        transparency: &SliderValue,
    ) -> Result<LayoutDocument, PipelineError> {
        certify(self.geometry(layout_id, ratio, transparency)?, &self.validator)
    }

    pub fn run(&self, req: &CreativeRequest) -> Result<CreativeResponse, PipelineError> {
        let mut doc = self.geometry(&req.layout_id, &req.ratio, &req.transparency)?;
        bind_copy(&mut doc, &req.copy);

        let doc = certify(doc, &self.validator)?;
        let styled = self.style.resolve(&doc, &req.palette, &req.options)?;
        let prompt = compose_or_fallback(&doc, &styled, &req.copy, &req.motif, req.mode)?;

        info!(
            "Creative for '{}' ready: {} zones, {:?} prompt ({} chars{})",
            doc.layout_id,
            doc.zones.len(),
            req.mode,
            prompt.length,
            if prompt.fallback { ", fallback" } else { "" }
        );

        let zones = doc
            .zones
            .iter()
            .map(|(name, zone)| {
                let styled_zone = StyledZone {
                    zone: zone.clone(),
                    typography: styled.typography.get(name).cloned(),
                    container: styled.zone_styles.get(name).cloned(),
                    padding: styled.containers.padding.get(name).copied(),
                };
                (name.clone(), styled_zone)
            })
            .collect();

        Ok(CreativeResponse {
            layout_id: doc.layout_id.clone(),
            zones,
            calculated_values: doc.calculated_values.clone(),
            status: doc.status,
            warnings: doc.warnings.clone(),
            style_warnings: styled.warnings,
            accents: styled.accents,
            simplified_containers: styled.containers.simplified,
            prompt,
            prompt_mode: req.mode,
        })
    }
}

/// Writes the caller's copy onto zones that declare a copy field.
fn bind_copy(doc: &mut LayoutDocument, copy: &AdCopy) {
    for zone in doc.zones.values_mut() {
        zone.bound_text = zone.copy_field.and_then(|field| copy.text_for(field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(Catalogue::builtin().unwrap(), &Config::default())
    }

    fn palette() -> PaletteInput {
        [
            ("primary", "#005EA5"),
            ("secondary", "#B4D9F7"),
            ("accent", "#FFC20E"),
            ("background", "#FFFFFF"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn request(layout_id: &str) -> CreativeRequest {
        CreativeRequest {
            layout_id: layout_id.to_string(),
            ratio: 50.into(),
            transparency: 80.into(),
            palette: palette(),
            options: StyleOptionsInput::from(&crate::style::options::StyleOptions::default()),
            copy: AdCopy::default(),
            motif: MotifMeta::default(),
            mode: PromptMode::Placeholder,
        }
    }

    // ── end to end ──

    #[test]
    fn test_default_vertical_split_end_to_end() {
        let response = pipeline().run(&request("vertical-split")).unwrap();

        let cv = response.calculated_values.as_ref().unwrap();
        assert_eq!(cv.text_width, 480);
        assert_eq!(cv.image_width, 540);
        assert_eq!(cv.container_transparency, 0.8);

        let scene = &response.prompt.sections[0];
        assert_eq!(scene.title, "SCENE");
        assert!(scene.lines.contains(
            &"- CI palette: primary #005EA5, secondary #B4D9F7, accent #FFC20E, background #FFFFFF"
                .to_string()
        ));
        assert_eq!(response.status, Some(ValidationStatus::Valid));
        assert!(!response.prompt.fallback);
    }

    #[test]
    fn test_every_builtin_layout_runs() {
        let pipeline = pipeline();
        for summary in pipeline.catalogue().list() {
            for mode in [PromptMode::Placeholder, PromptMode::Embed] {
                let mut req = request(&summary.layout_id);
                req.mode = mode;
                let response = pipeline.run(&req).unwrap();
                assert!(!response.prompt.text.is_empty(), "{}", summary.layout_id);
                assert!(!response.prompt.fallback);
            }
        }
    }

    #[test]
    fn test_zones_carry_style_and_image_zones_do_not() {
        let response = pipeline().run(&request("vertical-split")).unwrap();
        let headline = &response.zones["headline_block"];
        assert!(headline.typography.is_some());
        assert!(headline.container.is_some());
        assert!(headline.padding.is_some());

        let image = &response.zones["image_motiv"];
        assert!(image.container.is_none());
        assert!(image.typography.is_none());
        assert_eq!(image.zone.x, 540);
    }

    #[test]
    fn test_copy_bound_to_zones() {
        let mut req = request("vertical-split");
        req.copy.headline = Some("Pflege mit Herz".to_string());
        let response = pipeline().run(&req).unwrap();
        let headline = &response.zones["headline_block"];
        assert_eq!(headline.zone.bound_text.as_deref(), Some("Pflege mit Herz"));
        assert!(!headline.typography.as_ref().unwrap().used_sample_text);
        assert!(response.zones["subline_block"].zone.bound_text.is_none());
    }

    #[test]
    fn test_runs_are_deterministic() {
        let pipeline = pipeline();
        let a = serde_json::to_string(&pipeline.run(&request("hero")).unwrap()).unwrap();
        let b = serde_json::to_string(&pipeline.run(&request("hero")).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    // ── errors ──

    #[test]
    fn test_unknown_layout() {
        let err = pipeline().run(&request("skizze99")).unwrap_err();
        assert!(matches!(err, PipelineError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_missing_palette_color() {
        let mut req = request("vertical-split");
        req.palette.remove("accent");
        let err = pipeline().run(&req).unwrap_err();
        assert!(matches!(err, PipelineError::PaletteOrOptionInvalid(ref e) if e.len() == 1));
    }

    #[test]
    fn test_enforced_requirements_fail_incomplete_layout() {
        let yaml = r#"
layouts:
  bare:
    layout_type: dynamic_vertical_split
    canvas: { width: 1080, height: 1080 }
    zones:
      headline_block: { x: 40, y: 40, width: 400, height: 100, content_type: text_elements }
"#;
        let catalogue = Catalogue::from_yaml(yaml).unwrap();
        let lenient = Pipeline::new(catalogue.clone(), &Config::default());
        let preview = lenient.preview("bare", &50.into(), &80.into()).unwrap();
        assert_eq!(preview.status, Some(ValidationStatus::Warnings));

        let strict = Pipeline::new(
            catalogue,
            &Config {
                enforce_zone_requirements: true,
                ..Config::default()
            },
        );
        let err = strict.preview("bare", &50.into(), &80.into()).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaViolation(_)));
    }

    // ── cache ──

    #[test]
    fn test_geometry_cache_keyed_by_clamped_values() {
        let pipeline = pipeline();
        pipeline.preview("vertical-split", &50.into(), &80.into()).unwrap();
        pipeline.preview("vertical-split", &"50".into(), &80.into()).unwrap();
        assert_eq!(pipeline.geometry_stats().entries, 1);

        // 95 and 120 both clamp to 70.
        pipeline.preview("vertical-split", &95.into(), &80.into()).unwrap();
        pipeline.preview("vertical-split", &120.into(), &80.into()).unwrap();
        assert_eq!(pipeline.geometry_stats().entries, 2);
    }

    #[test]
    fn test_unknown_layout_leaves_cache_empty() {
        let pipeline = pipeline();
        assert!(pipeline.preview("skizze99", &50.into(), &80.into()).is_err());
        assert_eq!(pipeline.geometry_stats().entries, 0);
    }

    #[test]
    fn test_cache_hit_matches_fresh_compute_and_keeps_template() {
        let pipeline = pipeline();
        let first = pipeline.preview("hero", &40.into(), &60.into()).unwrap();
        let second = pipeline.preview("hero", &40.into(), &60.into()).unwrap();
        assert_eq!(first, second);

        let template = pipeline.catalogue().get("hero").unwrap();
        assert!(!template.certified);
        assert!(template.calculated_values.is_none());
    }

    #[test]
    fn test_contrast_memo_reported() {
        let pipeline = pipeline();
        pipeline.run(&request("vertical-split")).unwrap();
        pipeline.run(&request("minimalist")).unwrap();
        assert_eq!(pipeline.contrast_stats().entries, 1);
    }

    #[test]
    fn test_cached_geometry_not_polluted_by_copy() {
        let pipeline = pipeline();
        let mut req = request("vertical-split");
        req.copy.headline = Some("Erster Lauf".to_string());
        pipeline.run(&req).unwrap();

        let second = pipeline.run(&request("vertical-split")).unwrap();
        assert!(second.zones["headline_block"].zone.bound_text.is_none());
    }
}
