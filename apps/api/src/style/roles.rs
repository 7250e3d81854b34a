//! Zone roles and per-zone container looks.
//!
//! Roles decide two things: which typography rules apply to a zone, and how a
//! template's explicit container style is merged with the resolved look. Text
//! priority roles let every explicit value win; other roles only keep the
//! explicit border, shadow, texture and shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layout::model::ExplicitStyle;
use crate::style::options::{BorderStyle, Palette};
use crate::style::typography::TypeRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRole {
    Headline,
    Subline,
    Benefits,
    Cta,
    Title,
    Logo,
    Meta,
    Data,
    Content,
    Generic,
}

impl ZoneRole {
    pub fn is_text_priority(&self) -> bool {
        matches!(
            self,
            ZoneRole::Headline | ZoneRole::Subline | ZoneRole::Benefits | ZoneRole::Title | ZoneRole::Cta
        )
    }

    pub fn type_role(&self) -> Option<TypeRole> {
        match self {
            ZoneRole::Headline => Some(TypeRole::Headline),
            ZoneRole::Subline => Some(TypeRole::Subline),
            ZoneRole::Benefits => Some(TypeRole::Benefits),
            ZoneRole::Cta => Some(TypeRole::Cta),
            _ => None,
        }
    }
}

/// Zone name → role. Unlisted zones are `Generic`.
#[derive(Debug, Clone)]
pub struct RoleTable {
    entries: HashMap<String, ZoneRole>,
}

impl Default for RoleTable {
    fn default() -> Self {
        [
            ("headline_block", ZoneRole::Headline),
            ("headline_1_block", ZoneRole::Headline),
            ("headline_2_block", ZoneRole::Headline),
            ("subline_block", ZoneRole::Subline),
            ("benefits_block", ZoneRole::Benefits),
            ("cta_block", ZoneRole::Cta),
            ("stellentitel_block", ZoneRole::Title),
            ("logo_block", ZoneRole::Logo),
            ("standort_block", ZoneRole::Meta),
            ("company_block", ZoneRole::Meta),
            ("infographic_block", ZoneRole::Data),
            ("content_block", ZoneRole::Content),
        ]
        .into_iter()
        .fold(
            Self {
                entries: HashMap::new(),
            },
            |table, (name, role)| table.with_role(name, role),
        )
    }
}

impl RoleTable {
    /// Adds or replaces the role for one zone name.
    pub fn with_role(mut self, zone: impl Into<String>, role: ZoneRole) -> Self {
        self.entries.insert(zone.into(), role);
        self
    }

    pub fn role_of(&self, zone: &str) -> ZoneRole {
        self.entries.get(zone).copied().unwrap_or(ZoneRole::Generic)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Container look
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub style: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    pub blur: u32,
    pub opacity: f64,
    #[serde(default)]
    pub dx: i32,
    #[serde(default)]
    pub dy: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccentStroke {
    pub apply_to: String,
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerLook {
    pub role: ZoneRole,
    pub shape: String,
    pub background: Background,
    pub border_radius: u32,
    pub text_color: String,
    pub border: Option<BorderSpec>,
    pub shadow: Option<ShadowSpec>,
    pub texture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<AccentStroke>,
}

fn border(style: &str, width: u32) -> Option<BorderSpec> {
    Some(BorderSpec {
        style: style.to_string(),
        width,
    })
}

fn shadow(blur: u32, opacity: f64, dy: i32) -> Option<ShadowSpec> {
    Some(ShadowSpec {
        blur,
        opacity,
        dx: 0,
        dy,
    })
}

pub fn border_preset(style: BorderStyle) -> (Option<BorderSpec>, Option<ShadowSpec>) {
    match style {
        BorderStyle::None => (None, None),
        BorderStyle::SoftShadow => (None, shadow(16, 0.12, 4)),
        BorderStyle::HardOutline => (border("solid", 2), shadow(6, 0.20, 2)),
        BorderStyle::GradientEdge => (border("gradient", 2), shadow(10, 0.12, 3)),
        BorderStyle::DoubleLine => (border("double", 3), shadow(8, 0.15, 2)),
        BorderStyle::InnerLine => (border("inset", 1), shadow(4, 0.10, 1)),
        BorderStyle::Emboss => (border("ridge", 2), shadow(6, 0.25, 2)),
        BorderStyle::OutlineGlow => (border("solid", 1), shadow(12, 0.30, 0)),
    }
}

/// Fraction in [0.1, 1]; percentages are accepted and converted.
pub fn normalize_opacity(raw: f64) -> f64 {
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    fraction.clamp(0.1, 1.0)
}

pub struct LookInput<'a> {
    pub role: ZoneRole,
    pub shape: &'a str,
    pub border_style: BorderStyle,
    pub texture: &'a str,
    pub corner_radius_px: u32,
    pub palette: &'a Palette,
    pub opacity: f64,
}

pub fn resolve_container_look(input: &LookInput<'_>) -> ContainerLook {
    let (border, shadow) = border_preset(input.border_style);
    ContainerLook {
        role: input.role,
        shape: input.shape.to_string(),
        background: Background {
            color: input.palette.background.clone(),
            opacity: normalize_opacity(input.opacity),
        },
        border_radius: input.corner_radius_px,
        text_color: input.palette.primary.clone(),
        border,
        shadow,
        texture: input.texture.to_string(),
        accent: (input.role == ZoneRole::Cta).then(|| AccentStroke {
            apply_to: "border".to_string(),
            color: input.palette.accent.clone(),
            width: 2,
        }),
    }
}

/// Outcome of merging a template's explicit style into a resolved look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No explicit style on the zone.
    Resolved,
    /// Text priority role: explicit values replaced resolved ones.
    Overridden,
    /// Non-text role: only structural explicit values were kept.
    Merged,
}

pub fn merge_explicit(
    mut look: ContainerLook,
    explicit: Option<&ExplicitStyle>,
) -> (ContainerLook, MergeOutcome) {
    let Some(explicit) = explicit else {
        return (look, MergeOutcome::Resolved);
    };

    if let Some(border) = &explicit.border {
        look.border = Some(border.clone());
    }
    if let Some(shadow) = &explicit.shadow {
        look.shadow = Some(shadow.clone());
    }
    if let Some(texture) = &explicit.texture {
        look.texture = texture.clone();
    }
    if let Some(shape) = &explicit.shape {
        look.shape = shape.clone();
    }

    if !look.role.is_text_priority() {
        return (look, MergeOutcome::Merged);
    }

    if let Some(radius) = explicit.border_radius {
        look.border_radius = radius;
    }
    if let Some(color) = &explicit.text_color {
        look.text_color = color.clone();
    }
    (look, MergeOutcome::Overridden)
}
