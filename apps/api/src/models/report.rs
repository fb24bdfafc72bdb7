//! Contract-summary report as it arrives over the wire.
//!
//! Every field is optional and loosely typed. A value of the wrong shape is
//! treated as absent rather than rejected: non-array where a list is expected
//! becomes an empty list, non-object where a record is expected becomes `None`,
//! and numbers/booleans where text is expected use their string form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub clauses: Vec<Clause>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub financials: Option<Financials>,
    #[serde(default, deserialize_with = "lenient_texts")]
    pub key_compliance_notes: Vec<String>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub final_assessment: Option<FinalAssessment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub risk: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub improvement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    #[serde(default, deserialize_with = "lenient_text")]
    pub total_fee: Option<String>,
    #[serde(default, deserialize_with = "lenient_texts")]
    pub payment_milestones: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub late_fee: Option<String>,
}

impl Financials {
    pub fn is_empty(&self) -> bool {
        self.total_fee.is_none() && self.payment_milestones.is_empty() && self.late_fee.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAssessment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub overall_risk: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: Option<String>,
}

impl FinalAssessment {
    pub fn is_empty(&self) -> bool {
        self.overall_risk.is_none() && self.comment.is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ────────────────────────────────────────────────────────────────────────────

/// Text view of a JSON scalar. Empty strings, nulls, arrays and objects are absent.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

fn lenient_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        _ => Vec::new(),
    })
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_report_parses_camel_case_fields() {
        let report = parse(json!({
            "title": "Service Agreement",
            "about": "A services contract.",
            "clauses": [{"title": "Term", "explanation": "12 months", "risk": "Auto-renewal"}],
            "financials": {"totalFee": "$12,000", "paymentMilestones": ["50% upfront"], "lateFee": "2%"},
            "keyComplianceNotes": ["GDPR applies"],
            "finalAssessment": {"overallRisk": "Medium", "comment": "Negotiate renewal."}
        }));

        assert_eq!(report.title.as_deref(), Some("Service Agreement"));
        assert_eq!(report.clauses.len(), 1);
        assert_eq!(report.clauses[0].risk.as_deref(), Some("Auto-renewal"));
        assert_eq!(report.clauses[0].improvement, None);
        let financials = report.financials.unwrap();
        assert_eq!(financials.total_fee.as_deref(), Some("$12,000"));
        assert_eq!(financials.payment_milestones, vec!["50% upfront"]);
        assert_eq!(report.key_compliance_notes, vec!["GDPR applies"]);
        assert_eq!(
            report.final_assessment.unwrap().overall_risk.as_deref(),
            Some("Medium")
        );
    }

    #[test]
    fn test_missing_fields_default_to_absent() {
        let report = parse(json!({"title": "Only a title"}));
        assert_eq!(report.about, None);
        assert!(report.clauses.is_empty());
        assert!(report.financials.is_none());
        assert!(report.key_compliance_notes.is_empty());
        assert!(report.final_assessment.is_none());
    }

    #[test]
    fn test_non_sequence_values_treated_as_empty() {
        let report = parse(json!({
            "title": "T",
            "clauses": "not a list",
            "keyComplianceNotes": {"oops": true},
            "financials": {"paymentMilestones": 42}
        }));
        assert!(report.clauses.is_empty());
        assert!(report.key_compliance_notes.is_empty());
        assert!(report.financials.unwrap().payment_milestones.is_empty());
    }

    #[test]
    fn test_non_object_records_treated_as_absent() {
        let report = parse(json!({
            "title": "T",
            "financials": "lots",
            "finalAssessment": [1, 2],
            "clauses": ["bare string", null, {"title": "Real"}]
        }));
        assert!(report.financials.is_none());
        assert!(report.final_assessment.is_none());
        assert_eq!(report.clauses.len(), 1);
        assert_eq!(report.clauses[0].title.as_deref(), Some("Real"));
    }

    #[test]
    fn test_scalars_coerced_to_text_and_blanks_dropped() {
        let report = parse(json!({
            "title": 2024,
            "about": "   ",
            "keyComplianceNotes": ["ok", 7, true, null, "", {"x": 1}]
        }));
        assert_eq!(report.title.as_deref(), Some("2024"));
        assert_eq!(report.about, None);
        assert_eq!(report.key_compliance_notes, vec!["ok", "7", "true"]);
    }

    #[test]
    fn test_empty_records_report_empty() {
        assert!(Financials::default().is_empty());
        assert!(FinalAssessment::default().is_empty());
    }
}
