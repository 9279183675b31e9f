// Narrative
// Deterministic summary, action and explanation templates

use crate::models::{Classification, PatternSignals, RiskLevel};
use crate::services::config_store::ScoringPolicy;

pub const DISCLAIMER: &str = "This assessment is probabilistic and based on linguistic patterns \
    and a statistical model; it does not verify the factual accuracy of individual claims.";

const SUMMARY_TOP_INDICATORS: usize = 2;

fn plural(count: u32, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

fn top_indicators(indicators: &[String], n: usize) -> String {
    indicators
        .iter()
        .take(n)
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Two or three sentences keyed by classification.
pub fn generate_analysis_summary(
    classification: Classification,
    credibility_score: i32,
    risk_level: RiskLevel,
    key_indicators: &[String],
) -> String {
    let top = top_indicators(key_indicators, SUMMARY_TOP_INDICATORS);
    let rated = |prefix: &str| {
        format!(
            "It received a {}credibility score of {}/100 and is rated {}.",
            prefix, credibility_score, risk_level
        )
    };

    let (opening, score_line, closing) = match classification {
        Classification::Fake => (
            "This article shows strong signs of misinformation and is classified as FAKE.",
            rated(""),
            (!top.is_empty()).then(|| format!("The most significant concerns are: {}.", top)),
        ),
        Classification::Misleading => (
            "This article contains potentially misleading content and is classified as MISLEADING.",
            rated(""),
            (!top.is_empty()).then(|| format!("Points to review include: {}.", top)),
        ),
        Classification::Real => (
            "This article appears credible and is classified as REAL.",
            rated(""),
            (!top.is_empty()).then(|| format!("Observed characteristics: {}.", top)),
        ),
        Classification::Unverified => (
            "The credibility of this article cannot be reliably assessed, so it is classified as UNVERIFIED.",
            rated("provisional "),
            Some("A longer excerpt or a more confident model prediction is needed.".to_string()),
        ),
    };

    let mut parts = vec![opening.to_string(), score_line];
    parts.extend(closing);
    parts.join(" ")
}

/// Keyed by risk; an unverified verdict gets its own advice so it never
/// reads as an endorsement.
pub fn generate_recommended_action(classification: Classification, risk_level: RiskLevel) -> String {
    match (classification, risk_level) {
        (Classification::Unverified, _) => "Treat this content as unverified. Approach with caution \
            and cross-reference its claims with reputable sources before relying on or sharing it."
            .to_string(),
        (_, RiskLevel::High) => "Exercise extreme caution. Verify all claims with multiple reputable, \
            independent sources before sharing or acting on this content."
            .to_string(),
        (_, RiskLevel::Medium) => "Approach with caution and cross-reference key claims with \
            established news outlets or fact-checking organizations."
            .to_string(),
        (_, RiskLevel::Low) => "Content appears credible, but it is still good practice to check the \
            original sources for important decisions."
            .to_string(),
    }
}

fn classification_reasoning(classification: Classification) -> &'static str {
    match classification {
        Classification::Fake => {
            "The model prediction and a high density of manipulation patterns both point to fabricated or deceptive content."
        }
        Classification::Misleading => {
            "The model prediction and the observed language patterns disagree or are only moderately concerning, which suggests content that may distort or omit context."
        }
        Classification::Real => {
            "The model prediction indicates credible content and few manipulation patterns were found."
        }
        Classification::Unverified => {
            "There was not enough evidence, either in text length or in model confidence, to reach a firm verdict."
        }
    }
}

fn signal_details(signals: &PatternSignals, policy: &ScoringPolicy) -> Vec<String> {
    let s = signals.normalized();
    let mut details = Vec::new();

    if s.sensational_phrases > 0 {
        details.push(format!(
            "The text uses {}.",
            plural(s.sensational_phrases, "sensational term", "sensational terms")
        ));
    }
    if s.excessive_caps > policy.caps_indicator_ratio {
        details.push(format!(
            "About {:.0}% of words are written entirely in capitals.",
            s.excessive_caps * 100.0
        ));
    }
    if s.vague_sources > 0 {
        details.push(format!(
            "It cites {} instead of named sources.",
            plural(s.vague_sources, "vague attribution", "vague attributions")
        ));
    }
    if s.conspiracy_framing > 0 {
        details.push(format!(
            "It contains {}.",
            plural(s.conspiracy_framing, "conspiracy-framing term", "conspiracy-framing terms")
        ));
    }
    if s.emotional_manipulation > 0 {
        details.push(format!(
            "It relies on {} to provoke a reaction.",
            plural(s.emotional_manipulation, "emotionally charged word", "emotionally charged words")
        ));
    }
    if s.one_sided > policy.one_sided_indicator {
        details.push("Few or no counterpoints or balancing perspectives are presented.".to_string());
    }
    if s.no_evidence > policy.no_evidence_indicator {
        details.push("Few or no citations, studies or data references support the claims.".to_string());
    }
    if s.extreme_adjectives > 0 {
        details.push(format!(
            "It uses {}.",
            plural(s.extreme_adjectives, "extreme or absolutist adjective", "extreme or absolutist adjectives")
        ));
    }
    if s.clickbait > 0 {
        details.push(format!(
            "It includes {}.",
            plural(s.clickbait, "clickbait phrase", "clickbait phrases")
        ));
    }

    if details.is_empty() {
        details.push("No individual pattern signal rose above its reporting threshold.".to_string());
    }
    details
}

/// Label, score, reasoning, pattern findings and the standing disclaimer.
pub fn generate_explanation(
    classification: Classification,
    credibility_score: i32,
    risk_level: RiskLevel,
    signals: &PatternSignals,
    key_indicators: &[String],
    policy: &ScoringPolicy,
) -> String {
    let mut parts = vec![
        format!(
            "This content was classified as {} with a credibility score of {}/100 ({}).",
            classification, credibility_score, risk_level
        ),
        classification_reasoning(classification).to_string(),
    ];
    if !key_indicators.is_empty() {
        parts.push(format!(
            "Pattern analysis highlighted: {}.",
            key_indicators.join(", ").to_lowercase()
        ));
    }
    parts.extend(signal_details(signals, policy));
    parts.push(DISCLAIMER.to_string());
    parts.join(" ")
}

pub fn insufficient_text_explanation(chars: usize, min_chars: usize) -> String {
    format!(
        "INSUFFICIENT INFORMATION: the provided text has {} characters, below the {} characters \
         needed for a reliable pattern and model assessment. The content is classified as \
         UNVERIFIED. {}",
        chars, min_chars, DISCLAIMER
    )
}
