// Classifier Boundary
// Text cleaning, feature extraction and confidence derivation for the external model

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::models::{ModelLabel, ModelPrediction};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("vectorizer failed: {0}")]
    Vectorizer(String),
    #[error("model prediction failed: {0}")]
    Model(String),
    #[error("model not available: {0}")]
    Unavailable(String),
    #[error("invalid confidence signal: {0}")]
    InvalidConfidence(String),
}

/// Raw confidence capability exposed by a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceSignal {
    /// Per-class probability estimates.
    Probabilities(Vec<f64>),
    /// Signed distance from the decision boundary.
    Margin(f64),
}

/// Turns raw text into model features.
pub trait Vectorizer {
    type Features;

    fn transform(&self, cleaned_text: &str) -> Result<Self::Features, ClassifierError>;
}

/// Binary credibility model operating on vectorized features.
pub trait Classifier<F> {
    fn predict(&self, features: &F) -> Result<ModelLabel, ClassifierError>;

    /// Models without probabilities or a decision margin keep the default.
    fn confidence_signal(&self, _features: &F) -> Result<Option<ConfidenceSignal>, ClassifierError> {
        Ok(None)
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag regex"))
}

fn non_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z\s]").expect("non-letter regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Normalization applied to article text before vectorization: lowercase,
/// drop markup tags, keep only ASCII letters and whitespace.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let s = tag_re().replace_all(&lower, " ");
    let s = non_letter_re().replace_all(&s, " ");
    let s = whitespace_re().replace_all(&s, " ");
    s.trim().to_string()
}

/// Max class probability, or `0.5 + |margin| / 10` capped at 1.0.
pub fn derive_confidence(signal: &ConfidenceSignal) -> Result<f64, ClassifierError> {
    match signal {
        ConfidenceSignal::Probabilities(probs) => {
            if probs.is_empty() {
                return Err(ClassifierError::InvalidConfidence(
                    "empty probability vector".to_string(),
                ));
            }
            if probs.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
                return Err(ClassifierError::InvalidConfidence(format!(
                    "probabilities outside [0, 1]: {:?}",
                    probs
                )));
            }
            Ok(probs.iter().cloned().fold(0.0, f64::max))
        }
        ConfidenceSignal::Margin(margin) => {
            if !margin.is_finite() {
                return Err(ClassifierError::InvalidConfidence(format!(
                    "non-finite decision margin {}",
                    margin
                )));
            }
            Ok((0.5 + margin.abs() / 10.0).min(1.0))
        }
    }
}

/// Clean, vectorize and classify one article.
pub fn run_classifier<V, C>(
    text: &str,
    model: &C,
    vectorizer: &V,
) -> Result<ModelPrediction, ClassifierError>
where
    V: Vectorizer,
    C: Classifier<V::Features>,
{
    let cleaned = clean_text(text);
    let features = vectorizer.transform(&cleaned)?;
    let label = model.predict(&features)?;
    let confidence = match model.confidence_signal(&features)? {
        Some(signal) => Some(derive_confidence(&signal)?),
        None => None,
    };

    debug!(
        label = label.as_label(),
        confidence = confidence.unwrap_or(-1.0),
        cleaned_chars = cleaned.len(),
        "classifier.prediction"
    );

    Ok(ModelPrediction { label, confidence })
}

/// Replays a prediction computed outside this process, for example by a
/// model server whose output was stored alongside the article.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedPrediction {
    pub label: ModelLabel,
    pub signal: Option<ConfidenceSignal>,
}

impl PrecomputedPrediction {
    pub fn with_probability(label: ModelLabel, confidence: f64) -> Self {
        Self {
            label,
            signal: Some(ConfidenceSignal::Probabilities(vec![confidence])),
        }
    }
}

impl Vectorizer for PrecomputedPrediction {
    type Features = ();

    fn transform(&self, _cleaned_text: &str) -> Result<(), ClassifierError> {
        Ok(())
    }
}

impl Classifier<()> for PrecomputedPrediction {
    fn predict(&self, _features: &()) -> Result<ModelLabel, ClassifierError> {
        Ok(self.label)
    }

    fn confidence_signal(&self, _features: &()) -> Result<Option<ConfidenceSignal>, ClassifierError> {
        Ok(self.signal.clone())
    }
}
