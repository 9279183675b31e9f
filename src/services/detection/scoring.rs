// Scoring Policy
// Pattern score, credibility verdict, numeric score, risk bucket and key indicators.
// Every function is monotone in the signals it reads; ScoringPolicy::validate
// keeps configured tables from breaking that.

use crate::models::{Classification, ModelLabel, PatternSignals, RiskLevel};
use crate::services::config_store::ScoringPolicy;

pub const DEFAULT_INDICATORS: [&str; 2] = [
    "Balanced language and structure",
    "No significant manipulation patterns detected",
];

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn saturate(count: u32, cap: u32) -> f64 {
    (count as f64 / cap.max(1) as f64).min(1.0)
}

/// Weighted sum of the nine normalized signals, clamped to [0, 1].
pub fn calculate_pattern_score(signals: &PatternSignals, policy: &ScoringPolicy) -> f64 {
    let w = &policy.weights;
    let caps = &policy.caps;
    let s = signals.normalized();

    let score = w.sensational_phrases * saturate(s.sensational_phrases, caps.sensational_phrases)
        + w.excessive_caps * s.excessive_caps
        + w.vague_sources * saturate(s.vague_sources, caps.vague_sources)
        + w.conspiracy_framing * saturate(s.conspiracy_framing, caps.conspiracy_framing)
        + w.emotional_manipulation * saturate(s.emotional_manipulation, caps.emotional_manipulation)
        + w.one_sided * s.one_sided
        + w.no_evidence * s.no_evidence
        + w.extreme_adjectives * saturate(s.extreme_adjectives, caps.extreme_adjectives)
        + w.clickbait * saturate(s.clickbait, caps.clickbait);

    clamp_unit(score)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PatternBand {
    Low,
    Elevated,
    High,
}

impl PatternBand {
    pub fn of(pattern_score: f64, policy: &ScoringPolicy) -> Self {
        match clamp_unit(pattern_score) {
            p if p >= policy.fake_cut => Self::High,
            p if p >= policy.real_cut => Self::Elevated,
            _ => Self::Low,
        }
    }
}

/// Whether the text is long enough to judge at all.
pub fn has_sufficient_text(text: &str, policy: &ScoringPolicy) -> bool {
    text.trim().chars().count() >= policy.min_text_chars
}

/// Decision table: short text, then weak or absent model confidence, then
/// model label gated by pattern band.
pub fn classify_credibility(
    text: &str,
    prediction: ModelLabel,
    confidence: Option<f64>,
    signals: &PatternSignals,
    policy: &ScoringPolicy,
) -> Classification {
    let band = PatternBand::of(calculate_pattern_score(signals, policy), policy);
    let confident = confidence
        .filter(|c| c.is_finite())
        .is_some_and(|c| c >= policy.confidence_threshold);

    match (prediction, band) {
        _ if !has_sufficient_text(text, policy) => Classification::Unverified,
        _ if !confident => Classification::Unverified,
        (ModelLabel::NotCredible, PatternBand::High) => Classification::Fake,
        (ModelLabel::NotCredible, _) => Classification::Misleading,
        (ModelLabel::Credible, PatternBand::Low) => Classification::Real,
        (ModelLabel::Credible, _) => Classification::Misleading,
    }
}

/// Base score from the model label and confidence, scaled down by the
/// pattern score. Bases stay positive, so the penalty always bites.
pub fn calculate_credibility_score(
    confidence: f64,
    prediction: ModelLabel,
    pattern_score: f64,
    policy: &ScoringPolicy,
) -> i32 {
    let confidence = clamp_unit(confidence);
    let pattern_score = clamp_unit(pattern_score);

    let base = match prediction {
        ModelLabel::Credible => policy.credible_base + policy.credible_confidence_gain * confidence,
        ModelLabel::NotCredible => {
            policy.not_credible_base - policy.not_credible_confidence_loss * confidence
        }
    };
    let score = base * (1.0 - policy.pattern_penalty * pattern_score);

    score.round().clamp(0.0, 100.0) as i32
}

pub fn determine_risk_level(credibility_score: i32, policy: &ScoringPolicy) -> RiskLevel {
    match credibility_score {
        s if s >= policy.low_risk_min_score => RiskLevel::Low,
        s if s >= policy.medium_risk_min_score => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// An unverified verdict never reports Low Risk.
pub fn reconcile_risk(classification: Classification, risk_level: RiskLevel) -> RiskLevel {
    match (classification, risk_level) {
        (Classification::Unverified, RiskLevel::Low) => RiskLevel::Medium,
        (_, risk) => risk,
    }
}

/// One phrase per triggered signal in field order; the positive defaults
/// when nothing triggers. Never empty.
pub fn extract_key_indicators(
    signals: &PatternSignals,
    _text: &str,
    policy: &ScoringPolicy,
) -> Vec<String> {
    let s = signals.normalized();
    let checks = [
        (s.sensational_phrases > 0, "High use of sensational language"),
        (s.excessive_caps > policy.caps_indicator_ratio, "Excessive capitalization detected"),
        (s.vague_sources > 0, "Vague source references"),
        (s.conspiracy_framing > 0, "Conspiracy framing detected"),
        (s.emotional_manipulation > 0, "Emotional manipulation tactics detected"),
        (s.one_sided > policy.one_sided_indicator, "One-sided narrative without counterpoints"),
        (s.no_evidence > policy.no_evidence_indicator, "Lack of supporting evidence or citations"),
        (s.extreme_adjectives > 0, "Frequent use of extreme or absolutist language"),
        (s.clickbait > 0, "Clickbait-style phrasing detected"),
    ];

    let indicators: Vec<String> = checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, phrase)| phrase.to_string())
        .collect();

    if indicators.is_empty() {
        DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect()
    } else {
        indicators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_TEXT: &str = "This is a long enough text for analysis with more than fifty characters.";

    fn policy() -> ScoringPolicy {
        ScoringPolicy::default()
    }

    fn high_signals() -> PatternSignals {
        PatternSignals {
            sensational_phrases: 10,
            excessive_caps: 0.5,
            vague_sources: 5,
            conspiracy_framing: 3,
            emotional_manipulation: 8,
            one_sided: 0.9,
            no_evidence: 0.8,
            extreme_adjectives: 12,
            clickbait: 4,
        }
    }

    fn moderate_signals() -> PatternSignals {
        PatternSignals {
            sensational_phrases: 2,
            excessive_caps: 0.1,
            vague_sources: 2,
            conspiracy_framing: 0,
            emotional_manipulation: 1,
            one_sided: 0.5,
            no_evidence: 0.5,
            extreme_adjectives: 3,
            clickbait: 1,
        }
    }

    fn low_signals() -> PatternSignals {
        PatternSignals {
            one_sided: 0.1,
            no_evidence: 0.2,
            ..Default::default()
        }
    }

    /// Each variant bumps exactly one field of `base`.
    fn bumped(base: PatternSignals) -> Vec<PatternSignals> {
        let mut out = Vec::new();
        let mut s = base;
        s.sensational_phrases += 1;
        out.push(s);
        let mut s = base;
        s.excessive_caps = (s.excessive_caps + 0.05).min(1.0);
        out.push(s);
        let mut s = base;
        s.vague_sources += 1;
        out.push(s);
        let mut s = base;
        s.conspiracy_framing += 1;
        out.push(s);
        let mut s = base;
        s.emotional_manipulation += 1;
        out.push(s);
        let mut s = base;
        s.one_sided = (s.one_sided + 0.05).min(1.0);
        out.push(s);
        let mut s = base;
        s.no_evidence = (s.no_evidence + 0.05).min(1.0);
        out.push(s);
        let mut s = base;
        s.extreme_adjectives += 1;
        out.push(s);
        let mut s = base;
        s.clickbait += 1;
        out.push(s);
        out
    }

    #[test]
    fn test_pattern_score_zero_for_empty_signals() {
        assert_eq!(calculate_pattern_score(&PatternSignals::default(), &policy()), 0.0);
    }

    #[test]
    fn test_pattern_score_high_signals() {
        let score = calculate_pattern_score(&high_signals(), &policy());
        assert!(score > 0.5 && score <= 1.0, "got {}", score);
    }

    #[test]
    fn test_pattern_score_monotone_in_every_field() {
        let p = policy();
        for base in [PatternSignals::default(), low_signals(), moderate_signals(), high_signals()] {
            let before = calculate_pattern_score(&base, &p);
            for raised in bumped(base) {
                let after = calculate_pattern_score(&raised, &p);
                assert!(after >= before, "{:?} lowered score {} -> {}", raised, before, after);
                assert!((0.0..=1.0).contains(&after));
            }
        }
    }

    #[test]
    fn test_pattern_score_clamps_out_of_range_ratios() {
        let s = PatternSignals {
            excessive_caps: 7.0,
            one_sided: 3.0,
            no_evidence: 2.0,
            ..high_signals()
        };
        assert!(calculate_pattern_score(&s, &policy()) <= 1.0);
    }

    #[test]
    fn test_classify_short_text_unverified() {
        let c = classify_credibility("Too short", ModelLabel::Credible, Some(0.99), &low_signals(), &policy());
        assert_eq!(c, Classification::Unverified);
        let padded = format!("   {}   ", "x".repeat(49));
        let c = classify_credibility(&padded, ModelLabel::NotCredible, Some(0.99), &high_signals(), &policy());
        assert_eq!(c, Classification::Unverified);
    }

    #[test]
    fn test_classify_exactly_minimum_length_is_analyzed() {
        let p = policy();
        let exact = format!("  \n{}\t ", "a".repeat(50));
        let c = classify_credibility(&exact, ModelLabel::Credible, Some(0.85), &low_signals(), &p);
        assert_eq!(c, Classification::Real);
        assert!(has_sufficient_text(&exact, &p));
        assert!(!has_sufficient_text(&"a".repeat(49), &p));
    }

    #[test]
    fn test_classify_low_or_missing_confidence_unverified() {
        let p = policy();
        let s = PatternSignals::default();
        assert_eq!(classify_credibility(LONG_TEXT, ModelLabel::Credible, Some(0.3), &s, &p), Classification::Unverified);
        assert_eq!(classify_credibility(LONG_TEXT, ModelLabel::Credible, None, &s, &p), Classification::Unverified);
        assert_eq!(
            classify_credibility(LONG_TEXT, ModelLabel::Credible, Some(f64::NAN), &s, &p),
            Classification::Unverified
        );
    }

    #[test]
    fn test_classify_decision_table() {
        let p = policy();
        let cases = [
            (ModelLabel::NotCredible, high_signals(), Classification::Fake),
            (ModelLabel::NotCredible, moderate_signals(), Classification::Misleading),
            (ModelLabel::NotCredible, PatternSignals::default(), Classification::Misleading),
            (ModelLabel::Credible, low_signals(), Classification::Real),
            (ModelLabel::Credible, PatternSignals::default(), Classification::Real),
            (ModelLabel::Credible, moderate_signals(), Classification::Misleading),
            (ModelLabel::Credible, high_signals(), Classification::Misleading),
        ];
        for (label, signals, expected) in cases {
            assert_eq!(
                classify_credibility(LONG_TEXT, label, Some(0.85), &signals, &p),
                expected,
                "{:?} / {:?}",
                label,
                signals
            );
        }
    }

    #[test]
    fn test_classify_band_is_monotone_step() {
        let p = policy();
        assert_eq!(PatternBand::of(0.0, &p), PatternBand::Low);
        assert_eq!(PatternBand::of(p.real_cut, &p), PatternBand::Elevated);
        assert_eq!(PatternBand::of(0.49, &p), PatternBand::Elevated);
        assert_eq!(PatternBand::of(0.51, &p), PatternBand::High);
        assert_eq!(PatternBand::of(1.0, &p), PatternBand::High);
    }

    #[test]
    fn test_credibility_score_examples() {
        let p = policy();
        assert!(calculate_credibility_score(0.9, ModelLabel::Credible, 0.2, &p) > 50);
        assert!(calculate_credibility_score(0.9, ModelLabel::NotCredible, 0.8, &p) < 50);
    }

    #[test]
    fn test_credibility_score_range_and_prediction_order() {
        let p = policy();
        for confidence in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for pattern_score in [0.0, 0.3, 0.5, 0.8, 1.0] {
                let real = calculate_credibility_score(confidence, ModelLabel::Credible, pattern_score, &p);
                let fake = calculate_credibility_score(confidence, ModelLabel::NotCredible, pattern_score, &p);
                assert!((0..=100).contains(&real));
                assert!((0..=100).contains(&fake));
                assert!(real > fake, "conf {} ps {}: {} <= {}", confidence, pattern_score, real, fake);
            }
        }
    }

    #[test]
    fn test_credibility_score_decreases_with_pattern_score() {
        let p = policy();
        for label in [ModelLabel::Credible, ModelLabel::NotCredible] {
            for confidence in [0.0, 0.5, 1.0] {
                let scores: Vec<i32> = [0.0, 0.25, 0.5, 0.75, 1.0]
                    .iter()
                    .map(|ps| calculate_credibility_score(confidence, label, *ps, &p))
                    .collect();
                assert!(
                    scores.windows(2).all(|w| w[0] > w[1]),
                    "{:?} conf {}: {:?}",
                    label,
                    confidence,
                    scores
                );
            }
        }
    }

    #[test]
    fn test_credibility_score_spans_wide_range_over_pattern_score() {
        let p = policy();
        for label in [ModelLabel::Credible, ModelLabel::NotCredible] {
            for confidence in [0.0, 0.5, 1.0] {
                let clean = calculate_credibility_score(confidence, label, 0.0, &p);
                let noisy = calculate_credibility_score(confidence, label, 1.0, &p);
                assert!(clean - noisy >= 10, "{:?} conf {}: {} -> {}", label, confidence, clean, noisy);
            }
        }
        let steps: Vec<i32> = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
            .iter()
            .map(|ps| calculate_credibility_score(1.0, ModelLabel::NotCredible, *ps, &p))
            .collect();
        assert!(steps.windows(2).all(|w| w[0] > w[1]), "{:?}", steps);
    }

    #[test]
    fn test_unverified_risk_capped_at_medium() {
        assert_eq!(reconcile_risk(Classification::Unverified, RiskLevel::Low), RiskLevel::Medium);
        assert_eq!(reconcile_risk(Classification::Unverified, RiskLevel::High), RiskLevel::High);
        assert_eq!(reconcile_risk(Classification::Real, RiskLevel::Low), RiskLevel::Low);
    }

    #[test]
    fn test_single_vague_source_indicator_wording() {
        let s = PatternSignals {
            vague_sources: 1,
            ..Default::default()
        };
        let indicators = extract_key_indicators(&s, "", &policy());
        assert_eq!(indicators, vec!["Vague source references".to_string()]);
    }

    #[test]
    fn test_risk_levels() {
        let p = policy();
        assert_eq!(determine_risk_level(100, &p), RiskLevel::Low);
        assert_eq!(determine_risk_level(70, &p), RiskLevel::Low);
        assert_eq!(determine_risk_level(69, &p), RiskLevel::Medium);
        assert_eq!(determine_risk_level(40, &p), RiskLevel::Medium);
        assert_eq!(determine_risk_level(39, &p), RiskLevel::High);
        assert_eq!(determine_risk_level(0, &p), RiskLevel::High);
    }

    #[test]
    fn test_key_indicators_high_signals() {
        let indicators = extract_key_indicators(&high_signals(), "test text", &policy());
        assert_eq!(indicators.len(), 9);
        assert_eq!(indicators[0], "High use of sensational language");
        assert_eq!(indicators[1], "Excessive capitalization detected");
        assert_eq!(indicators[8], "Clickbait-style phrasing detected");
    }

    #[test]
    fn test_key_indicators_never_empty() {
        let empty: PatternSignals = serde_json::from_str("{}").unwrap();
        let indicators = extract_key_indicators(&empty, "", &policy());
        assert_eq!(indicators, DEFAULT_INDICATORS.to_vec());

        let quiet = PatternSignals {
            excessive_caps: 0.1,
            one_sided: 0.5,
            no_evidence: 0.5,
            ..Default::default()
        };
        assert!(!extract_key_indicators(&quiet, "", &policy()).is_empty());
    }
}
