//! Structural validation of candidate analysis documents.
//!
//! Every rule runs on every document; issues accumulate instead of
//! short-circuiting so one retry prompt can name all of them.

use serde_json::Value;
use thiserror::Error;

use super::model::{
    Analysis, MAX_VALIDATION_SCORE, MIN_VALIDATION_SCORE, REQUIRED_SOURCE_COUNT,
};
use super::reports::ValidationReport;

/// Top-level fields every analysis must carry, in check order.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "validationScore",
    "competitors",
    "priceSuggestions",
    "forecasts",
    "timeline",
    "goToMarket",
    "clients",
    "sources",
    "summary",
    "scoreAnalysis",
    "currency",
];

/// Fields that must be JSON arrays.
pub const ARRAY_FIELDS: [&str; 4] = ["competitors", "priceSuggestions", "clients", "sources"];

/// A single violated structural rule.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StructuralIssue {
    #[error("Document is not a JSON object, got {actual}")]
    NotAnObject { actual: &'static str },

    #[error("Missing required field: {field}")]
    MissingRequired { field: &'static str },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Field {field} must have exactly {expected} entries, got {actual}")]
    WrongCount {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: i64,
        max: i64,
    },

    #[error("Document does not match the analysis schema: {0}")]
    Undecodable(String),
}

/// Checks candidate documents against the analysis schema.
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }

    /// Runs every structural rule against `candidate`.
    pub fn validate(&self, candidate: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();

        let Some(obj) = candidate.as_object() else {
            report.push(
                StructuralIssue::NotAnObject {
                    actual: type_name(candidate),
                }
                .to_string(),
            );
            return report;
        };

        // 1. Presence (null counts as missing)
        for field in REQUIRED_FIELDS {
            if obj.get(field).map_or(true, Value::is_null) {
                report.push(StructuralIssue::MissingRequired { field }.to_string());
            }
        }

        // 2. Array types
        for field in ARRAY_FIELDS {
            if let Some(value) = obj.get(field).filter(|v| !v.is_null()) {
                if !value.is_array() {
                    report.push(
                        StructuralIssue::InvalidType {
                            field,
                            expected: "array",
                            actual: type_name(value),
                        }
                        .to_string(),
                    );
                }
            }
        }

        // 3. Source cardinality
        if let Some(sources) = obj.get("sources").and_then(Value::as_array) {
            if sources.len() != REQUIRED_SOURCE_COUNT {
                report.push(
                    StructuralIssue::WrongCount {
                        field: "sources",
                        expected: REQUIRED_SOURCE_COUNT,
                        actual: sources.len(),
                    }
                    .to_string(),
                );
            }
        }

        // 4. Score range
        if let Some(score) = obj.get("validationScore").filter(|v| !v.is_null()) {
            match score.as_f64() {
                Some(n) if (MIN_VALIDATION_SCORE as f64..=MAX_VALIDATION_SCORE as f64)
                    .contains(&n) => {}
                Some(_) => report.push(
                    StructuralIssue::OutOfRange {
                        field: "validationScore",
                        value: score.to_string(),
                        min: MIN_VALIDATION_SCORE,
                        max: MAX_VALIDATION_SCORE,
                    }
                    .to_string(),
                ),
                None => report.push(
                    StructuralIssue::InvalidType {
                        field: "validationScore",
                        expected: "number",
                        actual: type_name(score),
                    }
                    .to_string(),
                ),
            }
        }

        // 5. Currency type
        if let Some(currency) = obj.get("currency").filter(|v| !v.is_null()) {
            if !currency.is_string() {
                report.push(
                    StructuralIssue::InvalidType {
                        field: "currency",
                        expected: "string",
                        actual: type_name(currency),
                    }
                    .to_string(),
                );
            }
        }

        report
    }

    /// Validates `candidate` and decodes it into the typed model.
    ///
    /// A document that passes every rule but still does not decode yields a
    /// report carrying the decode error as its single issue.
    pub fn validate_and_decode(&self, candidate: Value) -> Result<Analysis, ValidationReport> {
        let report = self.validate(&candidate);
        if !report.is_valid() {
            return Err(report);
        }

        Analysis::from_value(candidate).map_err(|e| {
            let mut report = ValidationReport::new();
            report.push(StructuralIssue::Undecodable(e.to_string()).to_string());
            report
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::fixtures::{analysis_json, analysis_json_with_sources};
    use proptest::prelude::*;
    use serde_json::json;

    fn validate(doc: &Value) -> ValidationReport {
        StructuralValidator::new().validate(doc)
    }

    #[test]
    fn complete_document_is_valid() {
        assert!(validate(&analysis_json()).is_valid());
    }

    #[test]
    fn non_object_document_is_rejected() {
        let report = validate(&json!([1, 2, 3]));
        assert_eq!(report.issues, vec!["Document is not a JSON object, got array"]);
    }

    #[test]
    fn every_missing_field_is_reported() {
        let report = validate(&json!({}));
        assert_eq!(report.issues.len(), REQUIRED_FIELDS.len());
        assert!(report
            .issues
            .iter()
            .all(|issue| issue.starts_with("Missing required field")));
    }

    #[test]
    fn null_field_counts_as_missing() {
        let mut doc = analysis_json();
        doc["clients"] = Value::Null;

        let report = validate(&doc);
        assert_eq!(report.issues, vec!["Missing required field: clients"]);
    }

    #[test]
    fn non_array_list_field_is_reported() {
        let mut doc = analysis_json();
        doc["competitors"] = json!("none");

        let report = validate(&doc);
        assert_eq!(
            report.issues,
            vec!["Invalid type for field competitors: expected array, got string"]
        );
    }

    #[test]
    fn issues_accumulate_across_rules() {
        let mut doc = analysis_json_with_sources(3);
        doc["validationScore"] = json!(140);
        doc["currency"] = json!(840);
        doc.as_object_mut().unwrap().remove("summary");

        let report = validate(&doc);
        assert_eq!(report.issues.len(), 4);
    }

    #[test]
    fn non_numeric_score_is_a_type_issue() {
        let mut doc = analysis_json();
        doc["validationScore"] = json!("high");

        let report = validate(&doc);
        assert_eq!(
            report.issues,
            vec!["Invalid type for field validationScore: expected number, got string"]
        );
    }

    #[test]
    fn non_string_currency_is_reported() {
        let mut doc = analysis_json();
        doc["currency"] = json!({"code": "USD"});

        let report = validate(&doc);
        assert_eq!(
            report.issues,
            vec!["Invalid type for field currency: expected string, got object"]
        );
    }

    #[test]
    fn validate_and_decode_returns_typed_analysis() {
        let analysis = StructuralValidator::new()
            .validate_and_decode(analysis_json())
            .unwrap();
        assert_eq!(analysis.validation_score, 72);
    }

    #[test]
    fn undecodable_nested_shape_becomes_single_issue() {
        let mut doc = analysis_json();
        doc["forecasts"] = json!({"bestCase": "great"});

        let report = StructuralValidator::new()
            .validate_and_decode(doc)
            .unwrap_err();
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].starts_with("Document does not match the analysis schema"));
    }

    proptest! {
        #[test]
        fn wrong_source_count_yields_one_issue_naming_count(count in 0usize..40) {
            prop_assume!(count != REQUIRED_SOURCE_COUNT);
            let report = validate(&analysis_json_with_sources(count));

            prop_assert_eq!(report.issues.len(), 1);
            let expected_suffix = format!("got {}", count);
            prop_assert!(report.issues[0].ends_with(&expected_suffix));
            prop_assert!(report.issues[0].contains("sources"));
        }

        #[test]
        fn score_passes_iff_within_bounds(n in -1000i64..1000) {
            let mut doc = analysis_json();
            doc["validationScore"] = json!(n);

            let valid = validate(&doc).is_valid();
            prop_assert_eq!(valid, (0..=100).contains(&n));
        }
    }
}
