//! Ad copy and motif metadata supplied by the caller.

use serde::{Deserialize, Deserializer, Serialize};

use crate::layout::model::CopyField;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdCopy {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subline: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    /// Accepts a list or a newline-separated string.
    #[serde(default, deserialize_with = "deserialize_benefits")]
    pub benefits: Vec<String>,
    #[serde(default, alias = "stellentitel")]
    pub job_title: Option<String>,
    #[serde(default, alias = "standort")]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BenefitsInput {
    List(Vec<String>),
    Text(String),
}

fn deserialize_benefits<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BenefitsInput>::deserialize(deserializer)?;
    let items = match raw {
        None => Vec::new(),
        Some(BenefitsInput::List(items)) => items,
        Some(BenefitsInput::Text(text)) => text.lines().map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|b| b.trim().trim_start_matches(['-', '•', '*']).trim().to_string())
        .filter(|b| !b.is_empty())
        .collect())
}

impl AdCopy {
    /// Text bound to a zone with the given copy field, if any was supplied.
    pub fn text_for(&self, field: CopyField) -> Option<String> {
        let text = match field {
            CopyField::Headline => self.headline.clone(),
            CopyField::Subline => self.subline.clone(),
            CopyField::Cta => self.cta.clone(),
            CopyField::Benefits => (!self.benefits.is_empty()).then(|| self.benefits.join("\n")),
            CopyField::JobTitle => self.job_title.clone(),
            CopyField::Location => self.location.clone(),
            CopyField::Company => self.company.clone(),
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifMeta {
    #[serde(default)]
    pub motif: Option<String>,
    #[serde(default)]
    pub visual_style: Option<String>,
    #[serde(default)]
    pub lighting_mood: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Sanitising for embed mode
// ────────────────────────────────────────────────────────────────────────────

pub const MAX_HEADLINE_CHARS: usize = 30;
pub const MAX_SUBLINE_CHARS: usize = 50;
pub const MAX_CTA_CHARS: usize = 25;
pub const MAX_BENEFIT_CHARS: usize = 48;
pub const MAX_BENEFITS: usize = 4;
pub const MAX_JOB_TITLE_CHARS: usize = 38;
pub const MAX_LOCATION_CHARS: usize = 30;

/// Collapses whitespace runs, strips double quotes and cuts to `max` chars.
/// Empty results are `None`.
pub fn sanitize(text: &str, max: usize) -> Option<String> {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'");
    let cut: String = collapsed.chars().take(max).collect();
    let cut = cut.trim_end().to_string();
    (!cut.is_empty()).then_some(cut)
}

/// Copy after sanitising, ready to be quoted into the prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedCopy {
    pub headline: Option<String>,
    pub subline: Option<String>,
    pub cta: Option<String>,
    pub benefits: Vec<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
}

impl From<&AdCopy> for SanitizedCopy {
    fn from(copy: &AdCopy) -> Self {
        let field = |value: &Option<String>, max| value.as_deref().and_then(|v| sanitize(v, max));
        SanitizedCopy {
            headline: field(&copy.headline, MAX_HEADLINE_CHARS),
            subline: field(&copy.subline, MAX_SUBLINE_CHARS),
            cta: field(&copy.cta, MAX_CTA_CHARS),
            benefits: copy
                .benefits
                .iter()
                .filter_map(|b| sanitize(b, MAX_BENEFIT_CHARS))
                .take(MAX_BENEFITS)
                .collect(),
            job_title: field(&copy.job_title, MAX_JOB_TITLE_CHARS),
            location: field(&copy.location, MAX_LOCATION_CHARS),
        }
    }
}
