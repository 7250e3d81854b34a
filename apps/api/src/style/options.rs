//! Palette and style option validation.
//!
//! Raw request values are checked field by field; every violation is collected
//! into one `PaletteOrOptionInvalid` payload so the control surface can flag
//! all offending inputs at once.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, PipelineError};
use crate::style::accents::AccentElement;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("Invalid hex color regex"));

pub fn is_valid_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Palette
// ────────────────────────────────────────────────────────────────────────────

pub const PALETTE_KEYS: [&str; 4] = ["primary", "secondary", "accent", "background"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            primary: "#005EA5".to_string(),
            secondary: "#B4D9F7".to_string(),
            accent: "#FFC20E".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

/// Palette as submitted: key → hex string.
pub type PaletteInput = BTreeMap<String, String>;

fn check_palette(input: &PaletteInput, errors: &mut Vec<FieldError>) -> Option<Palette> {
    let mut values = Vec::with_capacity(PALETTE_KEYS.len());
    for key in PALETTE_KEYS {
        match input.get(key) {
            None => errors.push(FieldError::new(
                "missing_color",
                format!("ci.{key}"),
                format!("{key} color required"),
            )),
            Some(value) if !is_valid_hex_color(value) => errors.push(
                FieldError::new(
                    "invalid_hex_color",
                    format!("ci.{key}"),
                    format!("Invalid hex color format for {key}"),
                )
                .with_value(value),
            ),
            Some(value) => values.push(value.clone()),
        }
    }

    match <[String; 4]>::try_from(values) {
        Ok([primary, secondary, accent, background]) => Some(Palette {
            primary,
            secondary,
            accent,
            background,
        }),
        Err(_) => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Option vocabularies
// ────────────────────────────────────────────────────────────────────────────

macro_rules! option_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == name)
            }

            fn names() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    };
}

option_enum!(TypographyScale {
    Sm => "sm",
    Md => "md",
    Lg => "lg",
});

option_enum!(ContainerShape {
    RoundedRectangle => "rounded_rectangle",
    SharpRectangle => "sharp_rectangle",
    Pill => "pill",
    Organic => "organic",
    Geometric => "geometric",
    Capsule => "capsule",
    Ribbon => "ribbon",
    Tag => "tag",
});

option_enum!(BorderStyle {
    None => "none",
    SoftShadow => "soft_shadow",
    HardOutline => "hard_outline",
    GradientEdge => "gradient_edge",
    DoubleLine => "double_line",
    InnerLine => "inner_line",
    Emboss => "emboss",
    OutlineGlow => "outline_glow",
});

option_enum!(TextureStyle {
    Solid => "solid",
    Gradient => "gradient",
    Glass => "glass",
    Matte => "matte",
    Pattern => "pattern",
    PaperGrain => "paper_grain",
    FilmGrain => "film_grain",
    Noise => "noise",
});

// ────────────────────────────────────────────────────────────────────────────
// Style options
// ────────────────────────────────────────────────────────────────────────────

/// Options as submitted. Everything is optional here so that absence can be
/// reported as `missing_option` rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOptionsInput {
    #[serde(default)]
    pub typography_scale: Option<String>,
    #[serde(default)]
    pub container_shape: Option<String>,
    #[serde(default)]
    pub border_style: Option<String>,
    #[serde(default)]
    pub corner_radius_px: Option<i64>,
    #[serde(default)]
    pub transparency_pct: Option<i64>,
    #[serde(default)]
    pub accent_elements: Option<Vec<String>>,
    #[serde(default)]
    pub texture_style: Option<String>,
}

/// Validated style options, passed explicitly through the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleOptions {
    pub typography_scale: TypographyScale,
    pub container_shape: ContainerShape,
    pub border_style: BorderStyle,
    pub corner_radius_px: u32,
    pub transparency_pct: u8,
    pub accent_elements: BTreeSet<AccentElement>,
    pub texture_style: TextureStyle,
}

impl Default for StyleOptions {
    fn default() -> Self {
        StyleOptions {
            typography_scale: TypographyScale::Md,
            container_shape: ContainerShape::RoundedRectangle,
            border_style: BorderStyle::SoftShadow,
            corner_radius_px: 16,
            transparency_pct: 80,
            accent_elements: [AccentElement::Badge, AccentElement::Divider]
                .into_iter()
                .collect(),
            texture_style: TextureStyle::Gradient,
        }
    }
}

impl From<&StyleOptions> for StyleOptionsInput {
    fn from(options: &StyleOptions) -> Self {
        StyleOptionsInput {
            typography_scale: Some(options.typography_scale.as_str().to_string()),
            container_shape: Some(options.container_shape.as_str().to_string()),
            border_style: Some(options.border_style.as_str().to_string()),
            corner_radius_px: Some(options.corner_radius_px as i64),
            transparency_pct: Some(options.transparency_pct as i64),
            accent_elements: Some(
                options
                    .accent_elements
                    .iter()
                    .map(|e| e.as_str().to_string())
                    .collect(),
            ),
            texture_style: Some(options.texture_style.as_str().to_string()),
        }
    }
}

fn missing(field: &str, errors: &mut Vec<FieldError>) {
    errors.push(FieldError::new(
        "missing_option",
        format!("options.{field}"),
        format!("{field} option required"),
    ));
}

fn invalid(field: &str, value: impl ToString, msg: String, errors: &mut Vec<FieldError>) {
    errors.push(FieldError::new("invalid_option", format!("options.{field}"), msg).with_value(value));
}

fn required_choice<T>(
    field: &str,
    value: Option<&String>,
    parse: fn(&str) -> Option<T>,
    names: fn() -> String,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let Some(raw) = value else {
        missing(field, errors);
        return None;
    };
    let parsed = parse(raw);
    if parsed.is_none() {
        invalid(field, raw, format!("{field} must be one of [{}]", names()), errors);
    }
    parsed
}

fn required_range(
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let Some(raw) = value else {
        missing(field, errors);
        return None;
    };
    if (min..=max).contains(&raw) {
        Some(raw)
    } else {
        invalid(field, raw, format!("{field} must be between {min} and {max}"), errors);
        None
    }
}

fn check_options(input: &StyleOptionsInput, errors: &mut Vec<FieldError>) -> Option<StyleOptions> {
    let typography_scale = required_choice(
        "typography_scale",
        input.typography_scale.as_ref(),
        TypographyScale::from_name,
        TypographyScale::names,
        errors,
    );
    let container_shape = required_choice(
        "container_shape",
        input.container_shape.as_ref(),
        ContainerShape::from_name,
        ContainerShape::names,
        errors,
    );
    let border_style = required_choice(
        "border_style",
        input.border_style.as_ref(),
        BorderStyle::from_name,
        BorderStyle::names,
        errors,
    );
    let corner_radius = required_range(
        "corner_radius_px",
        input.corner_radius_px,
        0,
        u32::MAX as i64,
        errors,
    );
    let transparency = required_range("transparency_pct", input.transparency_pct, 0, 100, errors);

    let mut accent_elements = BTreeSet::new();
    for (idx, raw) in input.accent_elements.iter().flatten().enumerate() {
        match AccentElement::from_name(raw) {
            Some(element) => {
                accent_elements.insert(element);
            }
            None => invalid(
                &format!("accent_elements[{idx}]"),
                raw,
                format!(
                    "accent element must be one of [{}]",
                    AccentElement::ALL
                        .iter()
                        .map(|e| e.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                errors,
            ),
        }
    }

    let texture_style = match input.texture_style.as_deref() {
        None => Some(TextureStyle::Gradient),
        Some(raw) => {
            let parsed = TextureStyle::from_name(raw);
            if parsed.is_none() {
                invalid(
                    "texture_style",
                    raw,
                    format!("texture_style must be one of [{}]", TextureStyle::names()),
                    errors,
                );
            }
            parsed
        }
    };

    Some(StyleOptions {
        typography_scale: typography_scale?,
        container_shape: container_shape?,
        border_style: border_style?,
        corner_radius_px: corner_radius? as u32,
        transparency_pct: transparency? as u8,
        accent_elements,
        texture_style: texture_style?,
    })
}

/// Validates palette and options together. Either both come back typed, or
/// every violation found in either is reported.
pub fn validate_style_inputs(
    palette: &PaletteInput,
    options: &StyleOptionsInput,
) -> Result<(Palette, StyleOptions), PipelineError> {
    let mut errors = Vec::new();
    let palette = check_palette(palette, &mut errors);
    let options = check_options(options, &mut errors);

    match (palette, options) {
        (Some(palette), Some(options)) if errors.is_empty() => Ok((palette, options)),
        _ => Err(PipelineError::PaletteOrOptionInvalid(errors)),
    }
}
