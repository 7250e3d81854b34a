//! Prompt text building blocks.
//!
//! Line templates use `{name}` slots filled with `.replace`. Literal
//! `{HEADLINE}` / `{SUBHEAD}` / `{CTA}` placeholders are part of the output and
//! are never substituted.
//!
//! Wording is motif-agnostic on purpose: nothing here may describe people,
//! their looks or their expressions, since the image generator must only
//! produce scenery for the container layout.

// ────────────────────────────────────────────────────────────────────────────
// SCENE
// ────────────────────────────────────────────────────────────────────────────

pub const SCENE_TITLE: &str = "SCENE";

pub const ASPECT_RATIO_TEMPLATE: &str = "- Aspect ratio: {aspect_ratio}";

pub const INTENT_TEXT_LEFT_TEMPLATE: &str =
    "- Layout intent: text-left {text}, image-right {image}, gutter {gutter}, safe margins {safe}%";
pub const INTENT_IMAGE_LEFT_TEMPLATE: &str =
    "- Layout intent: image-left {image}, text-right {text}, gutter {gutter}, safe margins {safe}%";
pub const INTENT_IMAGE_TOP_TEMPLATE: &str =
    "- Layout intent: image-top {image}, text-bottom {text}, gutter {gutter}, safe margins {safe}%";

pub const COMPOSITION_BASE: &str =
    "- Composition: rule-of-thirds, clear negative space, consistent vertical rhythm, ";
pub const COMPOSITION_SPLIT: &str = "gutter continuity, unobstructed gutter from top to bottom";
pub const COMPOSITION_HERO: &str = "band anchoring, pin the top image band to the top edge";
pub const COMPOSITION_BAND: &str = "band anchoring";

pub const PALETTE_TEMPLATE: &str = "- CI palette: primary {primary}, secondary {secondary}, accent {accent}, background {background}";

pub const CONTAINER_LOOK_TEMPLATE: &str =
    "- Container look: background_opacity {opacity}, corner_radius {radius}, soft shadow (blur {blur})";

pub const NO_TEXT_DIRECTIVE: &str =
    "- NO TEXT IN IMAGE. Use placeholders only: {HEADLINE}, {SUBHEAD}, {CTA}.";

pub const EMBED_TEXT_DIRECTIVE: &str =
    "- Text appears only inside the containers listed under TEXT OVERLAY";

pub const CONFLICT_RULE: &str = "- Conflict rule: SCENE overrides VISUAL";

// ────────────────────────────────────────────────────────────────────────────
// VISUAL
// ────────────────────────────────────────────────────────────────────────────

pub const VISUAL_TITLE: &str = "VISUAL";

pub const VISUAL_LINES: [&str; 4] = [
    "- Camera/Optics: 35–50mm, shallow–mid DoF, low distortion, clean micro-contrast, controlled vignetting",
    "- Lighting: soft daylight, broad bounce fill, controlled highlights, 5200–5600 K",
    "- Grading: cinematic neutral, midtone separation, highlight roll-off",
    "- Artefacts: anti-banding/aliasing/moire, no halos/bloom, minimal noise",
];

// ────────────────────────────────────────────────────────────────────────────
// STYLE
// ────────────────────────────────────────────────────────────────────────────

pub const STYLE_TITLE: &str = "STYLE";

pub const MATERIALS_TEMPLATE: &str = "- Materials: {texture}, {shape} container silhouettes";

pub const RENDERING_LINE: &str =
    "- Rendering: photographic realism in the image area, crisp edges, calm backdrop behind containers";

pub const HARMONY_TEMPLATE: &str =
    "- Color harmony: palette-led, accent {accent} used sparingly, background {background} kept calm";

pub const MOTIF_TEMPLATE: &str = "- Motif: {motif}";
pub const VISUAL_STYLE_TEMPLATE: &str = "- Visual style: {visual_style}";
pub const LIGHTING_MOOD_TEMPLATE: &str = "- Lighting mood: {lighting_mood}";

// ────────────────────────────────────────────────────────────────────────────
// TEXT OVERLAY (embed mode)
// ────────────────────────────────────────────────────────────────────────────

pub const OVERLAY_TITLE: &str = "TEXT OVERLAY";

pub const OVERLAY_LOCATION_TEMPLATE: &str =
    "• LOCATION: \"{text}\" (small label at the top of the text column)";
pub const OVERLAY_HEADLINE_TEMPLATE: &str =
    "• HEADLINE: \"{text}\" (top of the text column, largest size, bold)";
pub const OVERLAY_SUBHEAD_TEMPLATE: &str =
    "• SUBHEAD: \"{text}\" (below the headline, medium size)";
pub const OVERLAY_BENEFITS_TEMPLATE: &str =
    "• BENEFITS (bulleted, up to 4): {items} (middle of the text column, regular weight)";
pub const OVERLAY_JOB_TITLE_TEMPLATE: &str =
    "• JOB TITLE: \"{text}\" (above the call to action, semibold)";
pub const OVERLAY_CTA_TEMPLATE: &str =
    "• CTA: \"{text}\" (bottom of the text column, button container with accent border)";

// ────────────────────────────────────────────────────────────────────────────
// TECH & NEGATIVE
// ────────────────────────────────────────────────────────────────────────────

pub const TECH_TITLE: &str = "TECH & NEGATIVE";

pub const SEPARATE_LAYERS_DIRECTIVE: &str =
    "- text_rendering: separate_layers (outside the image)";

pub const EMBED_RENDER_DIRECTIVE: &str =
    "- text_rendering: embedded. Render exactly and only these text strings, spelled as given";

pub const PLACEHOLDER_NEGATIVE: &str = "- Negative: no text, no words, no letters, no typography, \
no text-like patterns, no signage, no logo, no watermark, no signature, no UI overlays, \
no charts/graphs, no frames, no borders, no captions, blurry, lowres, pixelated, noisy, \
distorted, deformed, duplicate, cropped, cut off, cartoon, anime, illustration, painting, \
sketch, 3d render, cgi, plastic, toy, oversaturated colors, neon, abstract, messy background, \
cluttered";

pub const EMBED_NEGATIVE: &str = "- Negative: no extra text, no additional words, no misspellings, \
no distorted letters, no text-like patterns, no signage, no logo, no watermark, no signature, \
no UI overlays, no charts/graphs, no captions outside containers, blurry, lowres, pixelated, \
noisy, distorted, deformed, duplicate, cropped, cut off, cartoon, anime, oversaturated colors, \
neon, messy background, cluttered";

// ────────────────────────────────────────────────────────────────────────────
// Fallback
// ────────────────────────────────────────────────────────────────────────────

/// Returned when composition fails internally, so the image generator never
/// receives an empty prompt.
pub const FALLBACK_PROMPT: &str = "\
SCENE\n\
- Aspect ratio: 1:1\n\
- Layout intent: text-left 43–45%, image-right 49–51%, gutter 5–7%, safe margins 3%\n\
- NO TEXT IN IMAGE. Use placeholders only: {HEADLINE}, {SUBHEAD}, {CTA}.\n\
VISUAL\n\
- Lighting: soft daylight, broad bounce fill, controlled highlights, 5200–5600 K\n\
TECH & NEGATIVE\n\
- text_rendering: separate_layers (outside the image)\n\
- Negative: no text, no words, no letters, no typography, no text-like patterns, no signage, \
no logo, no watermark, no UI overlays, no charts/graphs";
