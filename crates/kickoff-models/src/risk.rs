//! Project risks and their priority scoring.

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest and highest score for probability and impact.
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Priority band derived from a risk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPriority {
    Low,
    Medium,
    High,
}

impl RiskPriority {
    /// Band for a probability x impact product.
    pub fn from_value(value: u32) -> Self {
        match value {
            10.. => Self::High,
            6..=9 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Style class used by renderers.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Fill colour for the risk register cell (RGB hex, no `#`).
    pub fn color_hex(&self) -> &'static str {
        match self {
            Self::Low => "C6EFCE",
            Self::Medium => "FFEB9C",
            Self::High => "FFC7CE",
        }
    }
}

impl std::fmt::Display for RiskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A risk in the project's register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub cause: String,
    pub consequence: String,
    pub category: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub probability: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub impact: u8,
    /// Only selected risks are exported.
    pub selected: bool,
    pub owner: String,
    pub strategy: String,
    pub preventive: String,
    pub fallback: String,
    pub trigger: String,
}

impl Default for Risk {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            description: String::new(),
            cause: String::new(),
            consequence: String::new(),
            category: String::new(),
            probability: 1,
            impact: 3,
            selected: false,
            owner: "Project manager".to_string(),
            strategy: "Reduce".to_string(),
            preventive: String::new(),
            fallback: String::new(),
            trigger: String::new(),
        }
    }
}

impl Risk {
    /// Creates a risk with the given id and title.
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets probability and impact, clamped to 1..=5.
    pub fn with_scores(mut self, probability: u8, impact: u8) -> Self {
        self.probability = clamp_score(probability);
        self.impact = clamp_score(impact);
        self
    }

    /// Marks the risk for export.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Probability times impact.
    pub fn risk_value(&self) -> u32 {
        u32::from(self.probability) * u32::from(self.impact)
    }

    pub fn priority(&self) -> RiskPriority {
        RiskPriority::from_value(self.risk_value())
    }
}

fn clamp_score(score: u8) -> u8 {
    score.clamp(*SCORE_RANGE.start(), *SCORE_RANGE.end())
}

/// Reads a score from a project file, clamped to 1..=5.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u64::deserialize(deserializer)?;
    Ok(clamp_score(u8::try_from(raw).unwrap_or(u8::MAX)))
}
