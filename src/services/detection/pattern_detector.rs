// Pattern Detector
// Scans full article text for the nine lexical risk signals

use crate::models::PatternSignals;
use crate::services::config_store::Lexicons;
use crate::services::text_processor::{count_keyword_occurrences, count_phrase_occurrences};

const CAPS_MIN_CHARS: usize = 3;

#[derive(Debug, Clone)]
pub struct PatternDetector {
    lexicons: Lexicons,
    balance_cap: u32,
    evidence_cap: u32,
}

impl PatternDetector {
    pub fn new(lexicons: Lexicons, balance_cap: u32, evidence_cap: u32) -> Self {
        Self {
            lexicons,
            balance_cap: balance_cap.max(1),
            evidence_cap: evidence_cap.max(1),
        }
    }

    /// Compute every signal; empty input yields all zeros.
    pub fn detect_patterns(&self, text: &str) -> PatternSignals {
        if text.is_empty() {
            return PatternSignals::default();
        }

        let lex = &self.lexicons;
        let balance_count = count_phrase_occurrences(text, &lex.balance);
        let evidence_count = count_keyword_occurrences(text, &lex.evidence);

        PatternSignals {
            sensational_phrases: count_keyword_occurrences(text, &lex.sensational),
            excessive_caps: excessive_caps_ratio(text),
            vague_sources: count_phrase_occurrences(text, &lex.vague_sources),
            conspiracy_framing: count_keyword_occurrences(text, &lex.conspiracy),
            emotional_manipulation: count_keyword_occurrences(text, &lex.emotional),
            one_sided: inverse_saturation(balance_count, self.balance_cap),
            no_evidence: inverse_saturation(evidence_count, self.evidence_cap),
            extreme_adjectives: count_keyword_occurrences(text, &lex.extreme_adjectives),
            clickbait: count_phrase_occurrences(text, &lex.clickbait),
        }
        .normalized()
    }
}

/// `1 - min(1, count / cap)`
fn inverse_saturation(count: u32, cap: u32) -> f64 {
    (1.0 - (count as f64 / cap as f64).min(1.0)).max(0.0)
}

fn is_shouted(word: &str) -> bool {
    let has_upper = word.chars().any(char::is_uppercase);
    let has_lower = word.chars().any(char::is_lowercase);
    has_upper && !has_lower && word.chars().count() >= CAPS_MIN_CHARS
}

/// Share of whitespace tokens written entirely in capitals.
fn excessive_caps_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut shouted = 0usize;
    for word in text.split_whitespace() {
        total += 1;
        if is_shouted(word) {
            shouted += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    shouted as f64 / total as f64
}
