//! WCAG 2.x contrast between palette colors.

use serde::{Deserialize, Serialize};

use crate::cache::{BoundedMemo, MemoStats};
use crate::style::options::Palette;

/// Body text minimum (WCAG AA).
pub const MIN_TEXT_CONTRAST: f64 = 4.5;
/// Large text / CTA minimum.
pub const MIN_CTA_CONTRAST: f64 = 3.0;

pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// Symmetric contrast ratio in `[1, 21]`, or `None` for unparseable colors.
pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let la = relative_luminance(parse_hex(a)?);
    let lb = relative_luminance(parse_hex(b)?);
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((light + 0.05) / (dark + 0.05))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleWarning {
    pub code: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<f64>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Memoized contrast checks, keyed by the normalized color pair.
pub struct ContrastChecker {
    memo: BoundedMemo<(String, String), Option<f64>>,
}

impl ContrastChecker {
    pub fn new(capacity: usize) -> Self {
        Self {
            memo: BoundedMemo::new(capacity),
        }
    }

    pub fn ratio(&self, fg: &str, bg: &str) -> Option<f64> {
        let key = (fg.to_ascii_uppercase(), bg.to_ascii_uppercase());
        self.memo.get_or_insert_with(key, || contrast_ratio(fg, bg))
    }

    /// Checks primary against secondary for body text and CTA thresholds.
    pub fn check(&self, palette: &Palette) -> Vec<StyleWarning> {
        let Some(ratio) = self.ratio(&palette.primary, &palette.secondary) else {
            return Vec::new();
        };

        let mut warnings = Vec::new();
        if ratio < MIN_TEXT_CONTRAST {
            warnings.push(StyleWarning {
                code: "low_contrast".to_string(),
                msg: format!(
                    "Primary/secondary contrast {:.1}:1 is below {MIN_TEXT_CONTRAST}:1",
                    ratio
                ),
                ratio: Some(round1(ratio)),
                required: Some(MIN_TEXT_CONTRAST),
            });
        }
        if ratio < MIN_CTA_CONTRAST {
            warnings.push(StyleWarning {
                code: "low_cta_contrast".to_string(),
                msg: format!(
                    "CTA contrast {:.1}:1 is below {MIN_CTA_CONTRAST}:1",
                    ratio
                ),
                ratio: Some(round1(ratio)),
                required: Some(MIN_CTA_CONTRAST),
            });
        }
        warnings
    }

    pub fn stats(&self) -> MemoStats {
        self.memo.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(primary: &str, secondary: &str) -> Palette {
        Palette {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            ..Palette::default()
        }
    }

    // ── math ──

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = contrast_ratio("#000000", "#FFFFFF").unwrap();
        assert!((ratio - 21.0).abs() < 1e-9);
        assert_eq!(contrast_ratio("#fff", "#000"), Some(ratio));
    }

    #[test]
    fn test_same_color_is_1() {
        assert_eq!(contrast_ratio("#336699", "#336699"), Some(1.0));
    }

    #[test]
    fn test_short_hex_expands() {
        assert_eq!(parse_hex("#0af"), Some((0x00, 0xAA, 0xFF)));
        assert_eq!(parse_hex("#12"), None);
        assert_eq!(parse_hex("00AAFF"), None);
    }

    // ── warnings ──

    #[test]
    fn test_default_palette_passes() {
        let checker = ContrastChecker::new(8);
        assert!(checker.check(&Palette::default()).is_empty());
    }

    #[test]
    fn test_mid_contrast_warns_low_contrast_only() {
        let checker = ContrastChecker::new(8);
        let warnings = checker.check(&palette("#005EA5", "#8AB8E6"));
        let codes: Vec<&str> = warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["low_contrast"]);
        assert_eq!(warnings[0].ratio, Some(3.2));
    }

    #[test]
    fn test_very_low_contrast_warns_twice() {
        let checker = ContrastChecker::new(8);
        let warnings = checker.check(&palette("#777777", "#888888"));
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].code, "low_cta_contrast");
    }

    #[test]
    fn test_good_contrast_no_warnings() {
        let checker = ContrastChecker::new(8);
        assert!(checker.check(&palette("#000000", "#FFFFFF")).is_empty());
    }

    #[test]
    fn test_memo_normalizes_case() {
        let checker = ContrastChecker::new(8);
        checker.ratio("#abcdef", "#000000");
        checker.ratio("#ABCDEF", "#000000");
        assert_eq!(checker.stats().entries, 1);
    }
}
