// CredScore Core Services
// Text utilities, configuration, model boundary and detection pipeline

pub mod text_processor;
pub mod config_store;
pub mod classifier;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use classifier::*;

// Re-export detection entry points
pub use detection::{
    format_json_output,
    label_from_prediction,
    validate_output,
    AnalysisError,
    CredibilityAnalyzer,
    SchemaViolation,
    SchemaViolations,
    ViolationKind,
};
