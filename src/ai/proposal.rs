//! Structural validation of the proposal source's response.
//!
//! The response is untrusted: fields may be missing, have the wrong type, or
//! be empty. Every entry is checked and all malformed entries are reported
//! together, before any `RenamePlan` is built.

use serde_json::Value;

use super::json_parser::extract_json_array;
use crate::error::{MalformedEntry, ProposalError};
use crate::plan::{RenameOperation, RenamePlan};

/// Parse model output text into a rename plan
pub fn parse_proposal(text: &str) -> Result<RenamePlan, ProposalError> {
    let json = extract_json_array(text).ok_or(ProposalError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;
    plan_from_value(&value)
}

/// Build a rename plan from an already-parsed JSON value
pub fn plan_from_value(value: &Value) -> Result<RenamePlan, ProposalError> {
    let entries = value.as_array().ok_or(ProposalError::NotAList)?;

    let mut operations = Vec::with_capacity(entries.len());
    let mut malformed = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match operation_from_entry(entry) {
            Ok(op) => operations.push(op),
            Err(reason) => malformed.push(MalformedEntry { index, reason }),
        }
    }

    if !malformed.is_empty() {
        tracing::warn!(
            entries = entries.len(),
            malformed = malformed.len(),
            "Rejected malformed proposal"
        );
        return Err(ProposalError::Malformed(malformed));
    }

    Ok(RenamePlan::new(operations))
}

fn operation_from_entry(entry: &Value) -> Result<RenameOperation, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "not an object".to_string())?;

    let original = required_name(obj, "original")?;
    let new = required_name(obj, "new")?;

    let reason = match obj.get("reason") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err("`reason` is not a string".to_string()),
    };

    Ok(RenameOperation {
        original,
        new,
        reason,
    })
}

fn required_name(obj: &serde_json::Map<String, Value>, field: &str) -> Result<String, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(format!("missing `{}`", field)),
        Some(Value::String(s)) if s.is_empty() => Err(format!("`{}` is empty", field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("`{}` is not a string", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fenced_response() {
        let text = r#"Sure:
```json
[
  {"original": "IMG_001.jpg", "new": "beach-2024.jpg", "reason": "describes the photo"},
  {"original": "notes.txt", "new": "meeting-notes.txt"}
]
```"#;
        let plan = parse_proposal(text).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.operations()[0].new, "beach-2024.jpg");
        assert_eq!(
            plan.operations()[0].reason.as_deref(),
            Some("describes the photo")
        );
        assert!(plan.operations()[1].reason.is_none());
    }

    #[test]
    fn test_every_malformed_entry_reported() {
        let value = json!([
            {"original": "a.txt", "new": "b.txt"},
            {"original": "c.txt"},
            "d.txt",
            {"original": "", "new": "e.txt"},
            {"original": "f.txt", "new": 7},
            {"original": "g.txt", "new": "h.txt", "reason": ["x"]}
        ]);

        let err = plan_from_value(&value).unwrap_err();
        let ProposalError::Malformed(entries) = err else {
            panic!("expected malformed error");
        };

        let indices: Vec<_> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert_eq!(entries[0].reason, "missing `new`");
        assert_eq!(entries[1].reason, "not an object");
        assert_eq!(entries[2].reason, "`original` is empty");
        assert_eq!(entries[3].reason, "`new` is not a string");
    }

    #[test]
    fn test_not_a_list() {
        let err = plan_from_value(&json!({"original": "a", "new": "b"})).unwrap_err();
        assert!(matches!(err, ProposalError::NotAList));
    }

    #[test]
    fn test_no_json_in_response() {
        let err = parse_proposal("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ProposalError::NoJson));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_proposal("[{\"original\": }]").unwrap_err();
        assert!(matches!(err, ProposalError::Parse(_)));
    }

    #[test]
    fn test_empty_list_is_empty_plan() {
        let plan = parse_proposal("[]").unwrap();
        assert!(plan.is_empty());
    }
}
