// Prompt stage: certified geometry + style + copy -> structured generator prompt.

pub mod composer;
pub mod copy;
pub mod relative;
pub mod templates;

use serde::{Deserialize, Serialize};

pub use composer::compose_or_fallback;
pub use copy::{AdCopy, MotifMeta};

/// Whether copy is rendered by the image generator or left to placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    #[default]
    Placeholder,
    Embed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl PromptSection {
    fn render(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub mode: PromptMode,
    pub sections: Vec<PromptSection>,
    pub text: String,
    pub length: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl Prompt {
    pub fn from_sections(mode: PromptMode, sections: Vec<PromptSection>) -> Self {
        let text = sections
            .iter()
            .map(PromptSection::render)
            .collect::<Vec<_>>()
            .join("\n");
        let length = text.chars().count();
        Prompt {
            mode,
            sections,
            text,
            length,
            fallback: false,
        }
    }

    pub fn fallback(mode: PromptMode) -> Self {
        let text = templates::FALLBACK_PROMPT.to_string();
        Prompt {
            mode,
            sections: Vec::new(),
            length: text.chars().count(),
            text,
            fallback: true,
        }
    }
}
