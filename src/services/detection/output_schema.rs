// Output Schema
// Validates the ten-field credibility report before it leaves the engine

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::models::{AnalysisResult, Classification, CredibilityReport, RiskLevel};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ViolationKind {
    MissingField,
    UnexpectedField,
    WrongType,
    OutOfRange,
    InvalidValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub detail: String,
}

impl SchemaViolation {
    fn new(field: &str, kind: ViolationKind, detail: String) -> Self {
        Self {
            field: field.to_string(),
            kind,
            detail,
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Every violation found in one payload. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid credibility report: {}", join_details(.0))]
pub struct SchemaViolations(pub Vec<SchemaViolation>);

impl SchemaViolations {
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.0
    }

    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.field == field && v.kind == kind)
    }
}

fn join_details(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| v.detail.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============ Field Table ============

#[derive(Debug, Copy, Clone)]
enum FieldKind {
    Classification,
    RiskLevel,
    Score,
    Text,
    TextList,
}

const REPORT_FIELDS: [(&str, FieldKind); 10] = [
    ("classification", FieldKind::Classification),
    ("credibility_score", FieldKind::Score),
    ("risk_level", FieldKind::RiskLevel),
    ("confidence", FieldKind::Score),
    ("analysis_summary", FieldKind::Text),
    ("key_indicators", FieldKind::TextList),
    ("emotional_tone", FieldKind::Text),
    ("suspicious_claims", FieldKind::TextList),
    ("recommended_action", FieldKind::Text),
    ("explanation", FieldKind::Text),
];

const SCORE_MIN: i64 = 0;
const SCORE_MAX: i64 = 100;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(field: &str, expected: &str, value: &Value) -> SchemaViolation {
    SchemaViolation::new(
        field,
        ViolationKind::WrongType,
        format!(
            "Field '{}' has incorrect type: expected {}, got {}",
            field,
            expected,
            type_name(value)
        ),
    )
}

fn check_label(field: &str, value: &Value, valid: &[&str]) -> Option<SchemaViolation> {
    let Some(s) = value.as_str() else {
        return Some(wrong_type(field, "string", value));
    };
    if valid.contains(&s) {
        return None;
    }
    let label = field.replace('_', " ");
    Some(SchemaViolation::new(
        field,
        ViolationKind::InvalidValue,
        format!(
            "Invalid {} value '{}': must be one of {}",
            label,
            s,
            valid.join(", ")
        ),
    ))
}

fn check_score(field: &str, value: &Value) -> Option<SchemaViolation> {
    let Value::Number(n) = value else {
        return Some(wrong_type(field, "integer", value));
    };
    let in_range = match (n.as_i64(), n.as_u64()) {
        (Some(i), _) => (SCORE_MIN..=SCORE_MAX).contains(&i),
        (None, Some(_)) => false,
        (None, None) => return Some(wrong_type(field, "integer", value)),
    };
    if in_range {
        return None;
    }
    Some(SchemaViolation::new(
        field,
        ViolationKind::OutOfRange,
        format!(
            "Field '{}' must be in range [{}, {}], got {}",
            field, SCORE_MIN, SCORE_MAX, n
        ),
    ))
}

fn check_text_list(field: &str, value: &Value) -> Option<SchemaViolation> {
    let Some(items) = value.as_array() else {
        return Some(wrong_type(field, "array of strings", value));
    };
    let bad: Vec<String> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_string())
        .map(|(i, item)| format!("item {} is {}", i, type_name(item)))
        .collect();
    if bad.is_empty() {
        return None;
    }
    Some(SchemaViolation::new(
        field,
        ViolationKind::WrongType,
        format!("All items in '{}' must be strings ({})", field, bad.join(", ")),
    ))
}

fn check_field(field: &str, kind: FieldKind, value: &Value) -> Option<SchemaViolation> {
    match kind {
        FieldKind::Classification => {
            let valid: Vec<&str> = Classification::ALL.iter().map(|c| c.as_str()).collect();
            check_label(field, value, &valid)
        }
        FieldKind::RiskLevel => {
            let valid: Vec<&str> = RiskLevel::ALL.iter().map(|r| r.as_str()).collect();
            check_label(field, value, &valid)
        }
        FieldKind::Score => check_score(field, value),
        FieldKind::Text if value.is_string() => None,
        FieldKind::Text => Some(wrong_type(field, "string", value)),
        FieldKind::TextList => check_text_list(field, value),
    }
}

fn collect_violations(obj: &Map<String, Value>) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    for (field, kind) in REPORT_FIELDS {
        match obj.get(field) {
            None => violations.push(SchemaViolation::new(
                field,
                ViolationKind::MissingField,
                format!("Missing required fields: {}", field),
            )),
            Some(value) => violations.extend(check_field(field, kind, value)),
        }
    }

    for key in obj.keys() {
        if !REPORT_FIELDS.iter().any(|(name, _)| *name == key.as_str()) {
            violations.push(SchemaViolation::new(
                key,
                ViolationKind::UnexpectedField,
                format!("Unexpected field '{}' is not part of the report", key),
            ));
        }
    }

    violations
}

// ============ Public API ============

/// Check a loosely typed payload against the report schema and convert it.
/// All problems are reported together.
pub fn validate_output(value: &Value) -> Result<CredibilityReport, SchemaViolations> {
    let Some(obj) = value.as_object() else {
        return Err(SchemaViolations(vec![wrong_type("$", "object", value)]));
    };

    let violations = collect_violations(obj);
    if !violations.is_empty() {
        return Err(SchemaViolations(violations));
    }

    serde_json::from_value(value.clone()).map_err(|e| {
        SchemaViolations(vec![SchemaViolation::new(
            "$",
            ViolationKind::InvalidValue,
            format!("Report could not be decoded: {}", e),
        )])
    })
}

/// Project an analysis result onto the public report and validate it.
pub fn format_json_output(result: &AnalysisResult) -> Result<CredibilityReport, SchemaViolations> {
    validate_output(&result.to_output_value()).map_err(|e| {
        warn!(violations = e.0.len(), error = %e, "output_schema.rejected");
        e
    })
}
