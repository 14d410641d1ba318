use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ScaleResult;

const VERY_TOKENS: &[&str] = &["muy", "very"];
const HIGH_TOKENS: &[&str] = &["alto", "high"];
const INTERMEDIATE_TOKENS: &[&str] = &["intermedio", "intermediate"];
// "limi" also catches the accent-stripped spelling "limitrofe".
const MODERATE_TOKENS: &[&str] = &["moderado", "moderate", "limítrofe", "limi", "borderline"];

/// Ordinal severity shared by the consensus engine and the chart renderer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    #[default]
    Low = 0,
    Moderate = 1,
    Intermediate = 2,
    High = 3,
    VeryHigh = 4,
}

impl SeverityLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SeverityLevel::Low),
            1 => Some(SeverityLevel::Moderate),
            2 => Some(SeverityLevel::Intermediate),
            3 => Some(SeverityLevel::High),
            4 => Some(SeverityLevel::VeryHigh),
            _ => None,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Es, SeverityLevel::Low) => "bajo",
            (Locale::Es, SeverityLevel::Moderate) => "moderado/limítrofe",
            (Locale::Es, SeverityLevel::Intermediate) => "intermedio",
            (Locale::Es, SeverityLevel::High) => "alto",
            (Locale::Es, SeverityLevel::VeryHigh) => "muy alto",
            (Locale::En, SeverityLevel::Low) => "low",
            (Locale::En, SeverityLevel::Moderate) => "moderate/borderline",
            (Locale::En, SeverityLevel::Intermediate) => "intermediate",
            (Locale::En, SeverityLevel::High) => "high",
            (Locale::En, SeverityLevel::VeryHigh) => "very high",
        }
    }

    pub fn color_class(self) -> ColorClass {
        match self {
            SeverityLevel::VeryHigh | SeverityLevel::High => ColorClass::Red,
            SeverityLevel::Intermediate | SeverityLevel::Moderate => ColorClass::Amber,
            SeverityLevel::Low => ColorClass::Green,
        }
    }
}

/// Three-bucket palette class used for chart bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Green,
    Amber,
    Red,
}

impl ColorClass {
    pub fn hex(self) -> &'static str {
        match self {
            ColorClass::Green => "#2E7D32",
            ColorClass::Amber => "#F9A825",
            ColorClass::Red => "#C62828",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => f.write_str("es"),
            Locale::En => f.write_str("en"),
        }
    }
}

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| text.contains(token))
}

/// Maps a free-text category label onto the ordinal scale. First match wins;
/// unrecognized text is treated as low.
pub fn level_of(category: &str) -> SeverityLevel {
    let lower = category.to_lowercase();
    if contains_any(&lower, VERY_TOKENS) {
        SeverityLevel::VeryHigh
    } else if contains_any(&lower, HIGH_TOKENS) {
        SeverityLevel::High
    } else if contains_any(&lower, INTERMEDIATE_TOKENS) {
        SeverityLevel::Intermediate
    } else if contains_any(&lower, MODERATE_TOKENS) {
        SeverityLevel::Moderate
    } else {
        SeverityLevel::Low
    }
}

impl ScaleResult {
    /// Prefers the service-provided severity and falls back to text matching.
    pub fn level(&self) -> SeverityLevel {
        self.severity.unwrap_or_else(|| level_of(&self.category))
    }

    pub fn color_class(&self) -> ColorClass {
        self.level().color_class()
    }
}
