//! Layout certification.
//!
//! `certify` checks every zone against the canvas and stamps the document as
//! certified; style resolution and prompt composition refuse anything else.
//! Coordinate presence/type problems are caught earlier, while templates are
//! read (`read_coordinate`), so that typed zones always carry integers.
//!
//! The per-layout-type zone requirement table is kept here but does not
//! reject layouts unless `ValidatorOptions::enforce_zone_requirements` is set.

use tracing::{debug, warn};

use crate::errors::{FieldError, PipelineError};
use crate::layout::engine::LayoutFamily;
use crate::layout::model::{Canvas, LayoutDocument, ValidationStatus, Zone};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorOptions {
    pub enforce_zone_requirements: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Raw coordinate parsing (template load time)
// ────────────────────────────────────────────────────────────────────────────

/// Reads one integer coordinate of a raw template zone, recording
/// `missing_coordinate` / `invalid_coordinate_type` instead of failing fast.
pub fn read_coordinate(
    zone_name: &str,
    coord: &str,
    value: Option<&serde_yaml::Value>,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    let path = format!("zones.{zone_name}.{coord}");
    match value {
        None | Some(serde_yaml::Value::Null) => {
            errors.push(FieldError::new(
                "missing_coordinate",
                path,
                format!("Zone '{zone_name}' missing coordinate '{coord}'"),
            ));
            None
        }
        Some(raw) => match as_int(raw) {
            Some(v) => Some(v),
            None => {
                errors.push(
                    FieldError::new(
                        "invalid_coordinate_type",
                        path,
                        format!("Zone '{zone_name}' coordinate '{coord}' must be integer"),
                    )
                    .with_value(render_value(raw)),
                );
                None
            }
        },
    }
}

/// Reads the optional z-index; absent means 0.
pub fn read_z_index(
    zone_name: &str,
    value: Option<&serde_yaml::Value>,
    errors: &mut Vec<FieldError>,
) -> i32 {
    match value {
        None | Some(serde_yaml::Value::Null) => 0,
        Some(raw) => as_int(raw).unwrap_or_else(|| {
            errors.push(
                FieldError::new(
                    "invalid_z_index",
                    format!("zones.{zone_name}.z"),
                    format!("Zone '{zone_name}' z-index must be integer"),
                )
                .with_value(render_value(raw)),
            );
            0
        }),
    }
}

fn as_int(value: &serde_yaml::Value) -> Option<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
}

fn render_value(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Certification
// ────────────────────────────────────────────────────────────────────────────

/// Numeric checks for one typed zone: non-negative origin, positive size,
/// full containment in the canvas.
pub fn check_zone(name: &str, zone: &Zone, canvas: &Canvas) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if zone.x < 0 {
        errors.push(
            FieldError::new(
                "negative_x_coordinate",
                format!("zones.{name}.x"),
                format!("Zone '{name}' x coordinate cannot be negative"),
            )
            .with_value(zone.x),
        );
    }
    if zone.y < 0 {
        errors.push(
            FieldError::new(
                "negative_y_coordinate",
                format!("zones.{name}.y"),
                format!("Zone '{name}' y coordinate cannot be negative"),
            )
            .with_value(zone.y),
        );
    }
    if zone.width <= 0 {
        errors.push(
            FieldError::new(
                "invalid_width",
                format!("zones.{name}.width"),
                format!("Zone '{name}' width must be positive"),
            )
            .with_value(zone.width),
        );
    }
    if zone.height <= 0 {
        errors.push(
            FieldError::new(
                "invalid_height",
                format!("zones.{name}.height"),
                format!("Zone '{name}' height must be positive"),
            )
            .with_value(zone.height),
        );
    }
    if zone.x + zone.width > canvas.width {
        errors.push(
            FieldError::new(
                "zone_outside_canvas_x",
                format!("zones.{name}"),
                format!("Zone '{name}' extends beyond canvas width"),
            )
            .with_value(format!(
                "x={}, width={}, canvas_width={}",
                zone.x, zone.width, canvas.width
            )),
        );
    }
    if zone.y + zone.height > canvas.height {
        errors.push(
            FieldError::new(
                "zone_outside_canvas_y",
                format!("zones.{name}"),
                format!("Zone '{name}' extends beyond canvas height"),
            )
            .with_value(format!(
                "y={}, height={}, canvas_height={}",
                zone.y, zone.height, canvas.height
            )),
        );
    }

    errors
}

/// Validates the document and marks it certified.
///
/// All zone errors are collected before failing. Non-blocking findings end up
/// in `warnings` and switch the status to `Warnings`.
pub fn certify(
    mut doc: LayoutDocument,
    options: &ValidatorOptions,
) -> Result<LayoutDocument, PipelineError> {
    let mut errors: Vec<FieldError> = doc
        .zones
        .iter()
        .flat_map(|(name, zone)| check_zone(name, zone, &doc.canvas))
        .collect();

    let mut warnings = Vec::new();

    if doc
        .calculated_values
        .as_ref()
        .is_some_and(|cv| cv.family_fallback)
    {
        warnings.push(
            FieldError::new(
                "layout_type_fallback",
                "layout_type",
                format!(
                    "Unknown layout type '{}', vertical split geometry was used",
                    doc.layout_type
                ),
            )
            .with_value(&doc.layout_type),
        );
    }

    for missing in missing_required_zones(&doc) {
        let finding = FieldError::new(
            "missing_required_zone",
            format!("zones.{missing}"),
            format!(
                "Zone '{missing}' is listed as required for layout type '{}'",
                doc.layout_type
            ),
        );
        if options.enforce_zone_requirements {
            errors.push(finding);
        } else {
            warnings.push(finding);
        }
    }

    if !errors.is_empty() {
        warn!(
            "Layout '{}' failed certification with {} errors",
            doc.layout_id,
            errors.len()
        );
        return Err(PipelineError::SchemaViolation(errors));
    }

    doc.status = Some(if warnings.is_empty() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Warnings
    });
    doc.warnings = warnings;
    doc.certified = true;

    debug!(
        "Layout '{}' certified ({:?}, {} warnings)",
        doc.layout_id,
        doc.status,
        doc.warnings.len()
    );
    Ok(doc)
}

// ────────────────────────────────────────────────────────────────────────────
// Zone requirement table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct ZoneRequirements {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const DEFAULT_REQUIREMENTS: ZoneRequirements = ZoneRequirements {
    required: &["headline_block", "subline_block"],
    optional: &[
        "logo_block",
        "cta_block",
        "benefits_block",
        "company_block",
        "standort_block",
        "image_motiv",
    ],
};

pub const LAYOUT_TYPE_REQUIREMENTS: &[(LayoutFamily, ZoneRequirements)] = &[
    (
        LayoutFamily::VerticalSplit,
        ZoneRequirements {
            required: &["headline_block", "subline_block", "benefits_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "company_block",
                "standort_block",
                "image_motiv",
                "stellentitel_block",
            ],
        },
    ),
    (
        LayoutFamily::VerticalSplitLeft,
        ZoneRequirements {
            required: &["headline_block", "subline_block", "benefits_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "company_block",
                "standort_block",
                "motiv_area",
            ],
        },
    ),
    (
        LayoutFamily::HorizontalSplit,
        ZoneRequirements {
            required: &["headline_block", "subline_block", "benefits_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "company_block",
                "standort_block",
                "image_motiv",
            ],
        },
    ),
    (
        LayoutFamily::ModernSplit,
        ZoneRequirements {
            required: &["headline_block", "benefits_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "standort_block",
                "image_motiv",
                "stellentitel_block",
            ],
        },
    ),
    (
        LayoutFamily::Minimalist,
        ZoneRequirements {
            required: &["headline_block", "subline_block"],
            optional: &["logo_block", "cta_block", "image_motiv"],
        },
    ),
    (
        LayoutFamily::Hero,
        ZoneRequirements {
            required: &["headline_block", "subline_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "motiv_area",
                "standort_block",
                "benefits_block",
                "stellentitel_block",
            ],
        },
    ),
    (
        LayoutFamily::Portfolio,
        ZoneRequirements {
            required: &["headline_block", "subline_block"],
            optional: &["logo_block", "cta_block", "benefits_block", "image_motiv"],
        },
    ),
    (
        LayoutFamily::Storytelling,
        ZoneRequirements {
            required: &["headline_1_block", "headline_2_block"],
            optional: &[
                "logo_block",
                "cta_block",
                "motiv_area",
                "subline_block",
                "standort_block",
                "stellentitel_block",
            ],
        },
    ),
    (
        LayoutFamily::Infographic,
        ZoneRequirements {
            required: &["headline_block", "infographic_block"],
            optional: &["logo_block", "cta_block", "subline_block", "image_motiv"],
        },
    ),
    (
        LayoutFamily::Magazine,
        ZoneRequirements {
            required: &["headline_block", "content_block"],
            optional: &["logo_block", "cta_block", "subline_block", "image_motiv"],
        },
    ),
];

/// Requirement entry for a raw layout-type tag; unknown tags get the defaults.
pub fn zone_requirements(layout_type: &str) -> &'static ZoneRequirements {
    LayoutFamily::from_tag(layout_type)
        .and_then(|family| {
            LAYOUT_TYPE_REQUIREMENTS
                .iter()
                .find(|(f, _)| *f == family)
                .map(|(_, req)| req)
        })
        .unwrap_or(&DEFAULT_REQUIREMENTS)
}

pub fn is_zone_required(layout_type: &str, zone_name: &str) -> bool {
    zone_requirements(layout_type).required.contains(&zone_name)
}

pub fn expected_zones(layout_type: &str) -> Vec<&'static str> {
    let req = zone_requirements(layout_type);
    req.required.iter().chain(req.optional).copied().collect()
}

fn missing_required_zones(doc: &LayoutDocument) -> Vec<&'static str> {
    zone_requirements(&doc.layout_type)
        .required
        .iter()
        .filter(|name| !doc.zones.contains_key(**name))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::catalogue::Catalogue;
    use crate::layout::model::ContentKind;

    fn make_zone(x: i32, y: i32, width: i32, height: i32) -> Zone {
        Zone {
            x,
            y,
            width,
            height,
            z: 1,
            content_kind: ContentKind::Text,
            copy_field: None,
            description: None,
            transparency: None,
            bound_text: None,
            explicit_style: None,
        }
    }

    fn canvas() -> Canvas {
        Canvas {
            width: 1080,
            height: 1080,
        }
    }

    fn default_layout() -> LayoutDocument {
        Catalogue::builtin()
            .unwrap()
            .get("vertical-split")
            .unwrap()
            .clone()
    }

    // ── zone checks ──

    #[test]
    fn test_valid_zone_has_no_errors() {
        assert!(check_zone("headline_block", &make_zone(40, 40, 400, 80), &canvas()).is_empty());
    }

    #[test]
    fn test_zone_touching_canvas_edge_is_valid() {
        assert!(check_zone("image_motiv", &make_zone(540, 0, 540, 1080), &canvas()).is_empty());
    }

    #[test]
    fn test_negative_origin_reported_per_axis() {
        let errors = check_zone("a", &make_zone(-1, -5, 100, 100), &canvas());
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["negative_x_coordinate", "negative_y_coordinate"]);
        assert_eq!(errors[0].path, "zones.a.x");
        assert_eq!(errors[0].value.as_deref(), Some("-1"));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let errors = check_zone("a", &make_zone(0, 0, 0, -3), &canvas());
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"invalid_width"));
        assert!(codes.contains(&"invalid_height"));
    }

    #[test]
    fn test_canvas_overflow_uses_zone_path() {
        let errors = check_zone("image_motiv", &make_zone(600, 500, 540, 680), &canvas());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, "zone_outside_canvas_x");
        assert_eq!(errors[0].path, "zones.image_motiv");
        assert_eq!(
            errors[0].value.as_deref(),
            Some("x=600, width=540, canvas_width=1080")
        );
        assert_eq!(errors[1].code, "zone_outside_canvas_y");
    }

    // ── raw coordinates ──

    #[test]
    fn test_read_coordinate_missing_and_wrong_type() {
        let mut errors = Vec::new();
        assert_eq!(read_coordinate("a", "x", None, &mut errors), None);
        let text = serde_yaml::Value::String("40".to_string());
        assert_eq!(read_coordinate("a", "y", Some(&text), &mut errors), None);
        let float: serde_yaml::Value = serde_yaml::from_str("40.5").unwrap();
        assert_eq!(read_coordinate("a", "width", Some(&float), &mut errors), None);
        let ok: serde_yaml::Value = serde_yaml::from_str("80").unwrap();
        assert_eq!(read_coordinate("a", "height", Some(&ok), &mut errors), Some(80));

        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "missing_coordinate",
                "invalid_coordinate_type",
                "invalid_coordinate_type"
            ]
        );
        assert_eq!(errors[1].path, "zones.a.y");
        assert_eq!(errors[1].value.as_deref(), Some("40"));
    }

    #[test]
    fn test_read_z_index_defaults_and_rejects_text() {
        let mut errors = Vec::new();
        assert_eq!(read_z_index("a", None, &mut errors), 0);
        let text = serde_yaml::Value::String("top".to_string());
        assert_eq!(read_z_index("a", Some(&text), &mut errors), 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "invalid_z_index");
        assert_eq!(errors[0].path, "zones.a.z");
    }

    // ── certify ──

    #[test]
    fn test_certify_sets_flag_and_status() {
        let doc = certify(default_layout(), &ValidatorOptions::default()).unwrap();
        assert!(doc.certified);
        assert_eq!(doc.status, Some(ValidationStatus::Valid));
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_certify_collects_all_zone_errors() {
        let mut doc = default_layout();
        doc.zones.get_mut("headline_block").unwrap().x = -10;
        doc.zones.get_mut("image_motiv").unwrap().width = 2000;

        match certify(doc, &ValidatorOptions::default()) {
            Err(PipelineError::SchemaViolation(errors)) => {
                assert!(errors.iter().any(|e| e.code == "negative_x_coordinate"));
                assert!(errors.iter().any(|e| e.code == "zone_outside_canvas_x"));
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_zone_is_warning_by_default() {
        let mut doc = default_layout();
        doc.zones.remove("benefits_block");

        let doc = certify(doc, &ValidatorOptions::default()).unwrap();
        assert!(doc.certified);
        assert_eq!(doc.status, Some(ValidationStatus::Warnings));
        assert_eq!(doc.warnings[0].code, "missing_required_zone");
        assert_eq!(doc.warnings[0].path, "zones.benefits_block");
    }

    #[test]
    fn test_missing_required_zone_rejected_when_enforced() {
        let mut doc = default_layout();
        doc.zones.remove("benefits_block");

        let options = ValidatorOptions {
            enforce_zone_requirements: true,
        };
        assert!(matches!(
            certify(doc, &options),
            Err(PipelineError::SchemaViolation(_))
        ));
    }

    // ── requirement table ──

    #[test]
    fn test_requirement_lookup_normalises_tags() {
        assert!(is_zone_required("dynamic_vertical_split", "benefits_block"));
        assert!(is_zone_required("vertical-split", "benefits_block"));
        assert!(!is_zone_required("dynamic_minimalist_layout", "benefits_block"));
        assert!(is_zone_required("dynamic_storytelling_layout", "headline_2_block"));
    }

    #[test]
    fn test_unknown_type_uses_default_requirements() {
        let expected = expected_zones("dynamic_carousel");
        assert_eq!(&expected[..2], &["headline_block", "subline_block"]);
        assert!(expected.contains(&"benefits_block"));
    }
}
