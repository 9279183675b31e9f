// Detection Module
// Credibility assessment core logic organized into specialized submodules:
// - pattern_detector: Counts lexical risk signals over the full article
// - scoring: Pattern score, verdict, credibility score, risk and indicators
// - tone: Emotional tone label
// - claim_highlighter: Picks sentences worth fact-checking
// - narrative: Summary, action and explanation templates
// - output_schema: Validates the public ten-field report
// - analyzer: Orchestrates one analysis run

pub mod pattern_detector;
pub mod scoring;
pub mod tone;
pub mod claim_highlighter;
pub mod narrative;
pub mod output_schema;
pub mod analyzer;

// Re-export commonly used functions
pub use pattern_detector::PatternDetector;
pub use scoring::{
    calculate_credibility_score,
    calculate_pattern_score,
    classify_credibility,
    determine_risk_level,
    extract_key_indicators,
    PatternBand,
};
pub use tone::{classify_tone, EmotionalTone};
pub use claim_highlighter::ClaimHighlighter;
pub use narrative::{generate_analysis_summary, generate_explanation, generate_recommended_action};
pub use output_schema::{
    format_json_output,
    validate_output,
    SchemaViolation,
    SchemaViolations,
    ViolationKind,
};
pub use analyzer::{label_from_prediction, AnalysisError, CredibilityAnalyzer};
