//! Request body validation
//!
//! The body is checked field by field against the accepted shape and every
//! violation is collected, so a caller sees all problems in one response.

use std::collections::BTreeMap;

use migrate_types::{MigrateRequest, RuleId, RuleToggle, SourceLanguage, TargetLanguage};
use serde::Serialize;
use serde_json::{Map, Value};

/// One validation failure, located by a dotted path into the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Parse and validate a `POST /api/migrate` body
pub fn parse_migrate_request(body: &Value) -> Result<MigrateRequest, Vec<Issue>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![Issue::new("", "Expected an object")]);
    };

    let mut issues = Vec::new();

    let source_language = required_str(obj, "sourceLanguage", &mut issues).and_then(|s| {
        s.parse::<SourceLanguage>()
            .map_err(|_| issues.push(Issue::new("sourceLanguage", "Expected one of COBOL, DELPHI")))
            .ok()
    });

    let target_language = required_str(obj, "targetLanguage", &mut issues).and_then(|s| {
        s.parse::<TargetLanguage>()
            .map_err(|_| issues.push(Issue::new("targetLanguage", "Expected NODE")))
            .ok()
    });

    let code = required_str(obj, "code", &mut issues).and_then(|s| {
        if s.is_empty() {
            issues.push(Issue::new("code", "Must not be empty"));
            None
        } else {
            Some(s.to_string())
        }
    });

    let rules = match obj.get("rules") {
        None => Some(None),
        Some(value) => parse_rules(value, &mut issues).map(Some),
    };

    match (source_language, target_language, code, rules) {
        (Some(source_language), Some(target_language), Some(code), Some(rules))
            if issues.is_empty() =>
        {
            Ok(MigrateRequest {
                source_language,
                target_language,
                code,
                rules,
            })
        }
        _ => Err(issues),
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    issues: &mut Vec<Issue>,
) -> Option<&'a str> {
    match obj.get(field) {
        None => {
            issues.push(Issue::new(field, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            issues.push(Issue::new(field, "Expected a string"));
            None
        }
    }
}

fn parse_rules(value: &Value, issues: &mut Vec<Issue>) -> Option<RuleToggle> {
    let before = issues.len();

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                issues.push(Issue::new("rules", "Must contain at least one rule id"));
                return None;
            }

            let ids: Vec<RuleId> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let id = item.as_str().and_then(|s| s.parse::<RuleId>().ok());
                    if id.is_none() {
                        issues.push(Issue::new(format!("rules.{}", i), "Unknown rule id"));
                    }
                    id
                })
                .collect();

            (issues.len() == before).then_some(RuleToggle::AllowList(ids))
        }
        Value::Object(entries) => {
            let mut switches = BTreeMap::new();
            for (key, enabled) in entries {
                let path = format!("rules.{}", key);
                let Ok(id) = key.parse::<RuleId>() else {
                    issues.push(Issue::new(path, "Unknown rule id"));
                    continue;
                };
                match enabled {
                    Value::Bool(b) => {
                        switches.insert(id, *b);
                    }
                    _ => issues.push(Issue::new(path, "Expected a boolean")),
                }
            }

            (issues.len() == before).then_some(RuleToggle::Switches(switches))
        }
        _ => {
            issues.push(Issue::new(
                "rules",
                "Expected an array of rule ids or an object of rule id to boolean",
            ));
            None
        }
    }
}
