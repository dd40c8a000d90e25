use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Analysis outcome (wire format shared with the AI response schema)
// ────────────────────────────────────────────────────────────────────────────

/// The full outcome of one resume analysis. Field names on the wire are
/// camelCase and match the JSON schema sent to the model.
///
/// Scores and label are produced independently by the model and are not
/// cross-validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(deserialize_with = "score_from_number")]
    pub overall_score: u32, // 0 – 100
    pub overall_label: OverallLabel,
    pub summary: String,
    #[serde(deserialize_with = "score_from_number")]
    pub match_percentage: u32, // 0 – 100
    #[serde(default)]
    pub section_scores: Vec<SectionScore>,
    /// Ordered by relevance, as returned by the model.
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub bangla_context: Vec<BanglaContextAdvice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallLabel {
    #[serde(rename = "Needs Work")]
    NeedsWork,
    Good,
    Strong,
}

impl OverallLabel {
    pub const ALL: [&'static str; 3] = ["Needs Work", "Good", "Strong"];

    pub fn as_str(self) -> &'static str {
        match self {
            OverallLabel::NeedsWork => "Needs Work",
            OverallLabel::Good => "Good",
            OverallLabel::Strong => "Strong",
        }
    }
}

impl fmt::Display for OverallLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-rating for one resume category. The set of categories is up to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub name: String,
    #[serde(deserialize_with = "score_from_number")]
    pub score: u32,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub text: String,
    pub impact: Impact,
    pub category: SuggestionCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub const ALL: [&'static str; 3] = ["High", "Medium", "Low"];

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionCategory {
    Content,
    Formatting,
    Skills,
    Grammar,
}

impl SuggestionCategory {
    pub const ALL: [&'static str; 4] = ["Content", "Formatting", "Skills", "Grammar"];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionCategory::Content => "Content",
            SuggestionCategory::Formatting => "Formatting",
            SuggestionCategory::Skills => "Skills",
            SuggestionCategory::Grammar => "Grammar",
        }
    }
}

/// Advice tailored to Bangladeshi students and freshers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanglaContextAdvice {
    pub topic: String,
    pub advice: String,
    /// `true` when this aspect needs no further action.
    pub is_optimized: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// What the user submits: raw resume text plus the role they are targeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub target_role: String,
}

impl ResumeData {
    pub fn new(text: impl Into<String>, target_role: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_role: target_role.into(),
        }
    }

    /// Returns the wire name of the first required field that is blank after trimming.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.target_role.trim().is_empty() {
            Some("targetRole")
        } else if self.text.trim().is_empty() {
            Some("text")
        } else {
            None
        }
    }
}

/// Gemini's schema type for scores is NUMBER, so `72.0` and `71.6` are both
/// legal on the wire. Rounds to the nearest integer; negatives floor at zero.
fn score_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(de::Error::custom("score must be a finite number"));
    }
    Ok(value.round().max(0.0) as u32)
}
