//! Prompt composition.
//!
//! Placeholder mode emits SCENE, VISUAL, STYLE and TECH & NEGATIVE. Embed mode
//! inserts a TEXT OVERLAY section with the sanitised copy before TECH &
//! NEGATIVE and swaps the text directives and negative list.

use tracing::{debug, error};

use crate::errors::PipelineError;
use crate::layout::model::LayoutDocument;
use crate::prompt::copy::{AdCopy, MotifMeta, SanitizedCopy};
use crate::prompt::relative::{
    aspect_ratio, composition_kind, derive_relative, orientation, tol, CompositionKind, Orientation,
};
use crate::prompt::templates::*;
use crate::prompt::{Prompt, PromptMode, PromptSection};
use crate::style::options::{ContainerShape, Palette, TextureStyle};
use crate::style::resolver::StyledDocument;
use crate::style::typography::TypeRole;

const DEFAULT_SHADOW_BLUR: u32 = 12;

fn section(title: &str, lines: Vec<String>) -> PromptSection {
    PromptSection {
        title: title.to_string(),
        lines,
    }
}

/// Palette with empty entries replaced by the default CI colors.
fn effective_palette(styled: &StyledDocument) -> Palette {
    let defaults = Palette::default();
    let pick = |value: &String, fallback: String| {
        if value.trim().is_empty() {
            fallback
        } else {
            value.clone()
        }
    };
    Palette {
        primary: pick(&styled.palette.primary, defaults.primary),
        secondary: pick(&styled.palette.secondary, defaults.secondary),
        accent: pick(&styled.palette.accent, defaults.accent),
        background: pick(&styled.palette.background, defaults.background),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SCENE
// ────────────────────────────────────────────────────────────────────────────

fn scene_section(
    doc: &LayoutDocument,
    styled: &StyledDocument,
    palette: &Palette,
    mode: PromptMode,
) -> PromptSection {
    let rel = derive_relative(doc);
    let intent = match orientation(doc) {
        Orientation::TextLeft => INTENT_TEXT_LEFT_TEMPLATE,
        Orientation::ImageLeft => INTENT_IMAGE_LEFT_TEMPLATE,
        Orientation::ImageTop => INTENT_IMAGE_TOP_TEMPLATE,
    }
    .replace("{text}", &tol(rel.text))
    .replace("{image}", &tol(rel.image))
    .replace("{gutter}", &tol(rel.gutter))
    .replace("{safe}", &rel.safe.to_string());

    let composition = match composition_kind(doc) {
        CompositionKind::Split => COMPOSITION_SPLIT,
        CompositionKind::HeroBand => COMPOSITION_HERO,
        CompositionKind::Band => COMPOSITION_BAND,
    };

    let mut lines = vec![
        ASPECT_RATIO_TEMPLATE.replace("{aspect_ratio}", &aspect_ratio(&doc.canvas)),
        intent,
        format!("{COMPOSITION_BASE}{composition}"),
        PALETTE_TEMPLATE
            .replace("{primary}", &palette.primary)
            .replace("{secondary}", &palette.secondary)
            .replace("{accent}", &palette.accent)
            .replace("{background}", &palette.background),
    ];

    if let Some(look) = styled.representative_look(doc) {
        let blur = look
            .shadow
            .as_ref()
            .map(|s| s.blur)
            .unwrap_or(DEFAULT_SHADOW_BLUR);
        lines.push(
            CONTAINER_LOOK_TEMPLATE
                .replace("{opacity}", &format!("{:.2}", look.background.opacity))
                .replace("{radius}", &look.border_radius.to_string())
                .replace("{blur}", &blur.to_string()),
        );
    }

    lines.push(match mode {
        PromptMode::Placeholder => NO_TEXT_DIRECTIVE.to_string(),
        PromptMode::Embed => EMBED_TEXT_DIRECTIVE.to_string(),
    });
    lines.push(CONFLICT_RULE.to_string());

    section(SCENE_TITLE, lines)
}

// ────────────────────────────────────────────────────────────────────────────
// VISUAL / STYLE
// ────────────────────────────────────────────────────────────────────────────

fn visual_section() -> PromptSection {
    section(
        VISUAL_TITLE,
        VISUAL_LINES.iter().map(|l| l.to_string()).collect(),
    )
}

fn texture_phrase(texture: TextureStyle) -> &'static str {
    match texture {
        TextureStyle::Solid => "flat solid fills",
        TextureStyle::Gradient => "soft tonal gradients",
        TextureStyle::Glass => "frosted glass panels with gentle translucency",
        TextureStyle::Matte => "matte paper-like finish",
        TextureStyle::Pattern => "subtle geometric pattern accents",
        TextureStyle::PaperGrain => "fine paper grain",
        TextureStyle::FilmGrain => "light film grain",
        TextureStyle::Noise => "fine monochrome noise texture",
    }
}

fn shape_phrase(shape: ContainerShape) -> &'static str {
    match shape {
        ContainerShape::RoundedRectangle => "rounded-corner",
        ContainerShape::SharpRectangle => "sharp-cornered",
        ContainerShape::Pill => "pill-shaped",
        ContainerShape::Organic => "soft organic",
        ContainerShape::Geometric => "crisp geometric",
        ContainerShape::Capsule => "capsule",
        ContainerShape::Ribbon => "ribbon-like",
        ContainerShape::Tag => "tag-shaped",
    }
}

fn style_section(styled: &StyledDocument, palette: &Palette, motif: &MotifMeta) -> PromptSection {
    let mut lines = vec![
        MATERIALS_TEMPLATE
            .replace("{texture}", texture_phrase(styled.containers.texture))
            .replace("{shape}", shape_phrase(styled.containers.shape)),
        RENDERING_LINE.to_string(),
        HARMONY_TEMPLATE
            .replace("{accent}", &palette.accent)
            .replace("{background}", &palette.background),
    ];

    let supplied = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    if let Some(m) = supplied(&motif.motif) {
        lines.push(MOTIF_TEMPLATE.replace("{motif}", &m));
    }
    if let Some(v) = supplied(&motif.visual_style) {
        lines.push(VISUAL_STYLE_TEMPLATE.replace("{visual_style}", &v));
    }
    if let Some(l) = supplied(&motif.lighting_mood) {
        lines.push(LIGHTING_MOOD_TEMPLATE.replace("{lighting_mood}", &l));
    }

    section(STYLE_TITLE, lines)
}

// ────────────────────────────────────────────────────────────────────────────
// TEXT OVERLAY / TECH & NEGATIVE
// ────────────────────────────────────────────────────────────────────────────

/// One line per present field. Headline and CTA are always emitted.
fn overlay_section(copy: &AdCopy) -> PromptSection {
    let clean = SanitizedCopy::from(copy);
    let quoted = |template: &str, text: &str| template.replace("{text}", text);
    let mut lines = Vec::new();

    if let Some(location) = &clean.location {
        lines.push(quoted(OVERLAY_LOCATION_TEMPLATE, location));
    }
    lines.push(quoted(
        OVERLAY_HEADLINE_TEMPLATE,
        clean
            .headline
            .as_deref()
            .unwrap_or(TypeRole::Headline.sample_text()),
    ));
    if let Some(subline) = &clean.subline {
        lines.push(quoted(OVERLAY_SUBHEAD_TEMPLATE, subline));
    }
    if !clean.benefits.is_empty() {
        let items = clean
            .benefits
            .iter()
            .map(|b| format!("\"{b}\""))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(OVERLAY_BENEFITS_TEMPLATE.replace("{items}", &items));
    }
    if let Some(job_title) = &clean.job_title {
        lines.push(quoted(OVERLAY_JOB_TITLE_TEMPLATE, job_title));
    }
    lines.push(quoted(
        OVERLAY_CTA_TEMPLATE,
        clean.cta.as_deref().unwrap_or(TypeRole::Cta.sample_text()),
    ));

    section(OVERLAY_TITLE, lines)
}

fn tech_section(mode: PromptMode) -> PromptSection {
    let lines = match mode {
        PromptMode::Placeholder => vec![SEPARATE_LAYERS_DIRECTIVE, PLACEHOLDER_NEGATIVE],
        PromptMode::Embed => vec![EMBED_RENDER_DIRECTIVE, EMBED_NEGATIVE],
    };
    section(TECH_TITLE, lines.into_iter().map(str::to_string).collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Composes the generator prompt. Both documents must be certified; anything
/// else that goes wrong is `InternalComposeFailure`.
pub fn compose(
    doc: &LayoutDocument,
    styled: &StyledDocument,
    copy: &AdCopy,
    motif: &MotifMeta,
    mode: PromptMode,
) -> Result<Prompt, PipelineError> {
    if !doc.certified {
        return Err(PipelineError::PreconditionNotCertified { stage: "Layout" });
    }
    if !styled.certified {
        return Err(PipelineError::PreconditionNotCertified { stage: "Style" });
    }
    if doc.calculated_values.is_none() {
        return Err(PipelineError::InternalComposeFailure(format!(
            "Layout '{}' carries no calculated values",
            doc.layout_id
        )));
    }
    if doc.canvas.width <= 0 || doc.canvas.height <= 0 {
        return Err(PipelineError::InternalComposeFailure(format!(
            "Layout '{}' has an empty canvas",
            doc.layout_id
        )));
    }

    let palette = effective_palette(styled);
    let mut sections = vec![
        scene_section(doc, styled, &palette, mode),
        visual_section(),
        style_section(styled, &palette, motif),
    ];
    if mode == PromptMode::Embed {
        sections.push(overlay_section(copy));
    }
    sections.push(tech_section(mode));

    let prompt = Prompt::from_sections(mode, sections);
    debug!(
        "Composed {:?} prompt for '{}': {} sections, {} chars",
        mode,
        doc.layout_id,
        prompt.sections.len(),
        prompt.length
    );
    Ok(prompt)
}

/// Like `compose`, but an internal failure yields `FALLBACK_PROMPT` instead
/// of an error. Precondition failures still propagate.
pub fn compose_or_fallback(
    doc: &LayoutDocument,
    styled: &StyledDocument,
    copy: &AdCopy,
    motif: &MotifMeta,
    mode: PromptMode,
) -> Result<Prompt, PipelineError> {
    match compose(doc, styled, copy, motif, mode) {
        Err(PipelineError::InternalComposeFailure(reason)) => {
            error!(
                "Prompt composition for '{}' failed, using fallback prompt: {}",
                doc.layout_id, reason
            );
            Ok(Prompt::fallback(mode))
        }
        other => other,
    }
}
