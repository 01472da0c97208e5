/*!
 * Redaction Engine
 * Wildcard field matching and recursive deep redaction over nested data
 *
 * Payloads are `serde_json::Value` trees (object / array / scalar), so the
 * walker is a typed visitor rather than a cast over untyped maps.
 */

use crate::roles::Role;
use crate::rules::{any_match, AuditRuleSet, FieldPattern};
use log::warn;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Sentinel written over redacted fields
pub const REDACTED_SENTINEL: &str = "[REDACTED]";

/// Whether `path` is redacted for `role` under the rule set
///
/// Roles without an audit rule have no redacted fields.
pub fn is_field_redacted(rules: &AuditRuleSet, role: Role, path: &str) -> bool {
    rules
        .rule(role)
        .is_some_and(|rule| any_match(&rule.redacted_fields, path))
}

/// Deep-redact a payload with an explicit pattern list
///
/// Object keys whose dot-path matches a pattern are replaced wholesale with
/// the sentinel; matching arrays and scalars are not descended into.
/// Nested objects extend the path and recurse. Arrays are never redacted
/// element-by-element; redaction acts on the field that contains them.
pub fn redact(value: &Value, patterns: &[FieldPattern]) -> Value {
    redact_at(value, "", patterns)
}

fn redact_at(value: &Value, prefix: &str, patterns: &[FieldPattern]) -> Value {
    let Value::Object(fields) = value else {
        return value.clone();
    };
    let mut out = Map::with_capacity(fields.len());
    for (key, field) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if any_match(patterns, &path) {
            out.insert(key.clone(), Value::String(REDACTED_SENTINEL.to_string()));
        } else if field.is_object() {
            out.insert(key.clone(), redact_at(field, &path, patterns));
        } else {
            out.insert(key.clone(), field.clone());
        }
    }
    Value::Object(out)
}

/// Redact a payload for a restricted role
///
/// The role's rule patterns are applied together with the floor rules;
/// roles absent from the rule set get the payload unchanged (they are
/// internal viewers, not subject to default redaction).
pub fn redact_for_role(
    rules: &AuditRuleSet,
    floor: &[FieldPattern],
    role: Role,
    value: &Value,
) -> Value {
    match rules.rule(role) {
        None => value.clone(),
        Some(rule) => {
            let mut patterns = rule.redacted_fields.clone();
            for pattern in floor {
                if !patterns.contains(pattern) {
                    patterns.push(pattern.clone());
                }
            }
            redact(value, &patterns)
        }
    }
}

/// Union floor rules with positive session overrides
///
/// Overrides can only add restrictions: a `true` entry contributes its
/// pattern, a `false` entry is ignored, and floor rules are always kept.
/// Malformed override keys are skipped with a warning (session creation
/// validates them, so this only fires on rows written by older code).
pub fn merge_overrides(
    floor: &[FieldPattern],
    overrides: &HashMap<String, bool>,
) -> Vec<FieldPattern> {
    let mut merged: Vec<FieldPattern> = floor.to_vec();
    for (raw, enabled) in overrides {
        if !enabled {
            continue;
        }
        match FieldPattern::parse(raw) {
            Ok(pattern) => {
                if !merged.contains(&pattern) {
                    merged.push(pattern);
                }
            }
            Err(err) => warn!("skipping malformed redaction override: {err}"),
        }
    }
    merged
}

/// Deterministic display pseudonym for an anonymized crew member
///
/// One-way: the engine keeps no index↔identity table.
pub fn anonymize_name(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Crew Member {letter}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patterns(raw: &[&str]) -> Vec<FieldPattern> {
        raw.iter().map(|p| FieldPattern::parse(p).unwrap()).collect()
    }

    #[test]
    fn test_redact_exact_and_wildcard() {
        let patterns = patterns(&["crew.salary", "maintenance.*"]);
        let payload = json!({
            "crew": { "name": "J. Silver", "salary": 4200 },
            "maintenance": { "cost": 1200, "jobs": [1, 2, 3] },
            "vessel": "MV Walrus"
        });

        let redacted = redact(&payload, &patterns);
        assert_eq!(redacted["crew"]["name"], "J. Silver");
        assert_eq!(redacted["crew"]["salary"], REDACTED_SENTINEL);
        assert_eq!(redacted["maintenance"]["cost"], REDACTED_SENTINEL);
        assert_eq!(redacted["maintenance"]["jobs"], REDACTED_SENTINEL);
        assert_eq!(redacted["vessel"], "MV Walrus");
    }

    #[test]
    fn test_redacted_object_replaced_wholesale() {
        let patterns = patterns(&["crew.bank_details"]);
        let payload = json!({
            "crew": { "bank_details": { "iban": "GB00", "bic": "XXXX" } }
        });

        let redacted = redact(&payload, &patterns);
        assert_eq!(redacted["crew"]["bank_details"], REDACTED_SENTINEL);
    }

    #[test]
    fn test_arrays_not_redacted_per_element() {
        let patterns = patterns(&["salary"]);
        let payload = json!({
            "entries": [ { "salary": 100 }, { "salary": 200 } ]
        });

        // The patterns target top-level "salary"; array elements keep
        // their own fields untouched
        let redacted = redact(&payload, &patterns);
        assert_eq!(redacted["entries"][0]["salary"], 100);
    }

    #[test]
    fn test_redact_idempotent() {
        let patterns = patterns(&["crew.salary", "payroll.*"]);
        let payload = json!({
            "crew": { "salary": 4200, "rank": "AB" },
            "payroll": { "net": 1, "gross": 2 }
        });

        let once = redact(&payload, &patterns);
        let twice = redact(&once, &patterns);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_absent_field_is_not_an_error() {
        let patterns = patterns(&["crew.salary"]);
        let payload = json!({ "vessel": "MV Walrus" });
        assert_eq!(redact(&payload, &patterns), payload);
    }

    #[test]
    fn test_merge_overrides_cannot_lift_floor() {
        let floor = patterns(&["crew.medical.*"]);
        let mut overrides = HashMap::new();
        overrides.insert("crew.medical.*".to_string(), false);
        overrides.insert("crew.salary".to_string(), true);
        overrides.insert("crew.rank".to_string(), false);

        let merged = merge_overrides(&floor, &overrides);
        assert!(any_match(&merged, "crew.medical.fitness"));
        assert!(any_match(&merged, "crew.salary"));
        assert!(!any_match(&merged, "crew.rank"));
    }

    #[test]
    fn test_anonymize_name_wraps_alphabet() {
        assert_eq!(anonymize_name(0), "Crew Member A");
        assert_eq!(anonymize_name(25), "Crew Member Z");
        assert_eq!(anonymize_name(26), "Crew Member A");
        assert_eq!(anonymize_name(27), "Crew Member B");
    }
}
