// CredScore Data Models
// Signals, verdict enums and the analysis records shared across services

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Pattern Signals ============

/// The nine lexical risk measurements taken over one article.
///
/// Missing keys deserialize as zero, so partial payloads from older callers
/// are accepted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatternSignals {
    pub sensational_phrases: u32,
    /// Fraction of whitespace tokens that are all-uppercase and longer than 2 chars.
    pub excessive_caps: f64,
    pub vague_sources: u32,
    pub conspiracy_framing: u32,
    pub emotional_manipulation: u32,
    /// 1 minus the normalized count of balance phrases.
    pub one_sided: f64,
    /// 1 minus the normalized count of evidence keywords.
    pub no_evidence: f64,
    pub extreme_adjectives: u32,
    pub clickbait: u32,
}

impl PatternSignals {
    /// Clamp ratio fields into [0, 1]; non-finite values collapse to 0.
    pub fn normalized(mut self) -> Self {
        self.excessive_caps = clamp_unit(self.excessive_caps);
        self.one_sided = clamp_unit(self.one_sided);
        self.no_evidence = clamp_unit(self.no_evidence);
        self
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ============ Verdict Labels ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Real,
    Fake,
    Misleading,
    Unverified,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Real,
        Classification::Fake,
        Classification::Misleading,
        Classification::Unverified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
            Self::Misleading => "MISLEADING",
            Self::Unverified => "UNVERIFIED",
        }
    }

    /// Parse the exact wire spelling.
    pub fn parse(val: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == val)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    pub fn parse(val: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == val)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Model Output ============

/// Binary label produced by the external classifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ModelLabel {
    NotCredible,
    Credible,
}

impl ModelLabel {
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Self::NotCredible),
            1 => Some(Self::Credible),
            _ => None,
        }
    }

    pub fn as_label(&self) -> i64 {
        match self {
            Self::NotCredible => 0,
            Self::Credible => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub label: ModelLabel,
    /// Confidence in [0, 1]; `None` when the model exposes neither
    /// probabilities nor a decision margin.
    pub confidence: Option<f64>,
}

// ============ Analysis Records ============

/// Working record assembled by the analyzer for one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub signals: PatternSignals,
    pub pattern_score: f64,
    pub classification: Classification,
    pub credibility_score: i32,
    pub risk_level: RiskLevel,
    pub confidence: i32,
    pub key_indicators: Vec<String>,
    pub emotional_tone: String,
    pub suspicious_claims: Vec<String>,
    pub recommended_action: String,
    pub explanation: String,
    pub analysis_summary: String,
}

impl AnalysisResult {
    /// Loosely typed view with exactly the ten externally visible fields,
    /// the shape accepted by the output schema validator.
    pub fn to_output_value(&self) -> serde_json::Value {
        serde_json::json!({
            "classification": self.classification.as_str(),
            "credibility_score": self.credibility_score,
            "risk_level": self.risk_level.as_str(),
            "confidence": self.confidence,
            "analysis_summary": self.analysis_summary,
            "key_indicators": self.key_indicators,
            "emotional_tone": self.emotional_tone,
            "suspicious_claims": self.suspicious_claims,
            "recommended_action": self.recommended_action,
            "explanation": self.explanation,
        })
    }
}

/// Validated ten-field payload returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredibilityReport {
    pub classification: Classification,
    pub credibility_score: i32,
    pub risk_level: RiskLevel,
    pub confidence: i32,
    pub analysis_summary: String,
    pub key_indicators: Vec<String>,
    pub emotional_tone: String,
    pub suspicious_claims: Vec<String>,
    pub recommended_action: String,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_missing_keys_default_to_zero() {
        let signals: PatternSignals =
            serde_json::from_value(serde_json::json!({ "vague_sources": 2 })).unwrap();
        assert_eq!(signals.vague_sources, 2);
        assert_eq!(signals.sensational_phrases, 0);
        assert_eq!(signals.one_sided, 0.0);
    }

    #[test]
    fn test_signals_normalized_clamps_ratios() {
        let signals = PatternSignals {
            excessive_caps: 1.7,
            one_sided: -0.2,
            no_evidence: f64::NAN,
            ..Default::default()
        }
        .normalized();
        assert_eq!(signals.excessive_caps, 1.0);
        assert_eq!(signals.one_sided, 0.0);
        assert_eq!(signals.no_evidence, 0.0);
    }

    #[test]
    fn test_label_wire_spellings() {
        assert_eq!(serde_json::to_string(&Classification::Misleading).unwrap(), "\"MISLEADING\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"Medium Risk\"");
        assert_eq!(Classification::parse("FAKE"), Some(Classification::Fake));
        assert_eq!(Classification::parse("fake"), None);
        assert_eq!(RiskLevel::parse("High Risk"), Some(RiskLevel::High));
    }

    #[test]
    fn test_model_label_from_label() {
        assert_eq!(ModelLabel::from_label(1), Some(ModelLabel::Credible));
        assert_eq!(ModelLabel::from_label(0), Some(ModelLabel::NotCredible));
        assert_eq!(ModelLabel::from_label(2), None);
    }
}
