// Credibility Analyzer
// Orchestrates classifier, pattern detection, scoring and narrative for one article

use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::models::{
    AnalysisResult, Classification, CredibilityReport, ModelLabel, PatternSignals, RiskLevel,
};
use crate::services::classifier::{run_classifier, Classifier, ClassifierError, Vectorizer};
use crate::services::config_store::{AnalyzerConfig, ConfigError, ScoringPolicy};
use crate::services::detection::claim_highlighter::ClaimHighlighter;
use crate::services::detection::narrative::{
    generate_analysis_summary, generate_explanation, generate_recommended_action,
    insufficient_text_explanation,
};
use crate::services::detection::output_schema::{self, SchemaViolations};
use crate::services::detection::pattern_detector::PatternDetector;
use crate::services::detection::scoring::{
    calculate_credibility_score, calculate_pattern_score, classify_credibility,
    determine_risk_level, extract_key_indicators, has_sufficient_text, reconcile_risk,
};
use crate::services::detection::tone::{classify_tone, EmotionalTone};
use crate::services::text_processor::SentenceScreen;

const INSUFFICIENT_SCORE: i32 = 50;
const INSUFFICIENT_INDICATOR: &str = "Insufficient text for analysis";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Stateless per call; one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct CredibilityAnalyzer {
    policy: ScoringPolicy,
    detector: PatternDetector,
    highlighter: ClaimHighlighter,
}

impl CredibilityAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let AnalyzerConfig {
            lexicons, policy, ..
        } = config;

        let screen = SentenceScreen::new(
            &lexicons.vague_sources,
            &lexicons.extreme_language,
            &lexicons.evidence_markers,
            &lexicons.conspiracy,
        )
        .map_err(|e| ConfigError::InvalidLexicon {
            name: "extreme_language",
            reason: e.to_string(),
        })?;

        Ok(Self {
            highlighter: ClaimHighlighter::new(screen, policy.claim_threshold, policy.max_claims),
            detector: PatternDetector::new(lexicons, policy.balance_cap, policy.evidence_cap),
            policy,
        })
    }

    pub fn with_defaults() -> Result<Self, AnalysisError> {
        Self::new(AnalyzerConfig::default())
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn detect_patterns(&self, text: &str) -> PatternSignals {
        self.detector.detect_patterns(text)
    }

    pub fn identify_suspicious_claims(&self, text: &str) -> Vec<String> {
        self.highlighter.identify_suspicious_claims(text)
    }

    /// Full assessment of one article. Text shorter than the configured
    /// minimum is answered as UNVERIFIED without touching the model.
    pub fn analyze<V, C>(
        &self,
        text: &str,
        model: &C,
        vectorizer: &V,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        V: Vectorizer,
        C: Classifier<V::Features>,
    {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("analyze", run_id = %run_id);
        let _enter = span.enter();

        if !has_sufficient_text(text, &self.policy) {
            let chars = text.trim().chars().count();
            info!(chars, min_chars = self.policy.min_text_chars, "analysis.insufficient_text");
            return Ok(self.insufficient_result(text, chars));
        }

        let prediction = run_classifier(text, model, vectorizer).map_err(|e| {
            warn!(error = %e, "analysis.classifier_failed");
            e
        })?;
        let confidence = prediction.confidence.filter(|c| c.is_finite());

        let signals = self.detector.detect_patterns(text);
        let pattern_score = calculate_pattern_score(&signals, &self.policy);
        debug!(pattern_score, signals = ?signals, "analysis.patterns");

        let classification =
            classify_credibility(text, prediction.label, confidence, &signals, &self.policy);
        let credibility_score = calculate_credibility_score(
            confidence.unwrap_or(0.0),
            prediction.label,
            pattern_score,
            &self.policy,
        );
        let risk_level =
            reconcile_risk(classification, determine_risk_level(credibility_score, &self.policy));
        let key_indicators = extract_key_indicators(&signals, text, &self.policy);
        let emotional_tone = classify_tone(&signals, text);
        let suspicious_claims = self.highlighter.identify_suspicious_claims(text);

        let analysis_summary = generate_analysis_summary(
            classification,
            credibility_score,
            risk_level,
            &key_indicators,
        );
        let recommended_action = generate_recommended_action(classification, risk_level);
        let explanation = generate_explanation(
            classification,
            credibility_score,
            risk_level,
            &signals,
            &key_indicators,
            &self.policy,
        );

        info!(
            classification = classification.as_str(),
            credibility_score,
            risk = risk_level.as_str(),
            label = prediction.label.as_label(),
            claims = suspicious_claims.len(),
            "analysis.completed"
        );

        Ok(AnalysisResult {
            text: text.to_string(),
            signals,
            pattern_score,
            classification,
            credibility_score,
            risk_level,
            confidence: confidence_percent(confidence),
            key_indicators,
            emotional_tone: emotional_tone.as_str().to_string(),
            suspicious_claims,
            recommended_action,
            explanation,
            analysis_summary,
        })
    }

    /// Analyze and validate in one step.
    pub fn analyze_report<V, C>(
        &self,
        text: &str,
        model: &C,
        vectorizer: &V,
    ) -> Result<Result<CredibilityReport, SchemaViolations>, AnalysisError>
    where
        V: Vectorizer,
        C: Classifier<V::Features>,
    {
        let result = self.analyze(text, model, vectorizer)?;
        Ok(output_schema::format_json_output(&result))
    }

    fn insufficient_result(&self, text: &str, chars: usize) -> AnalysisResult {
        let classification = Classification::Unverified;
        let key_indicators = vec![INSUFFICIENT_INDICATOR.to_string()];
        AnalysisResult {
            text: text.to_string(),
            signals: PatternSignals::default(),
            pattern_score: 0.0,
            classification,
            credibility_score: INSUFFICIENT_SCORE,
            risk_level: RiskLevel::Medium,
            confidence: 0,
            analysis_summary: generate_analysis_summary(
                classification,
                INSUFFICIENT_SCORE,
                RiskLevel::Medium,
                &key_indicators,
            ),
            key_indicators,
            emotional_tone: EmotionalTone::Neutral.as_str().to_string(),
            suspicious_claims: Vec::new(),
            recommended_action: generate_recommended_action(classification, RiskLevel::Medium),
            explanation: insufficient_text_explanation(chars, self.policy.min_text_chars),
        }
    }
}

fn confidence_percent(confidence: Option<f64>) -> i32 {
    confidence
        .map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as i32)
        .unwrap_or(0)
}

/// Model label from a raw 0/1 prediction, as produced by exported models.
pub fn label_from_prediction(prediction: i64) -> Result<ModelLabel, ClassifierError> {
    ModelLabel::from_label(prediction).ok_or_else(|| {
        ClassifierError::Model(format!("prediction must be 0 or 1, got {}", prediction))
    })
}
