use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Legacy language a fragment is written in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceLanguage {
    Cobol,
    Delphi,
}

/// Language the migrated output is written for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetLanguage {
    Node,
}

/// Identifier of a rule in the catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum RuleId {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl RuleId {
    pub const ALL: [RuleId; 8] = [
        RuleId::R1,
        RuleId::R2,
        RuleId::R3,
        RuleId::R4,
        RuleId::R5,
        RuleId::R6,
        RuleId::R7,
        RuleId::R8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::R1 => "R1",
            RuleId::R2 => "R2",
            RuleId::R3 => "R3",
            RuleId::R4 => "R4",
            RuleId::R5 => "R5",
            RuleId::R6 => "R6",
            RuleId::R7 => "R7",
            RuleId::R8 => "R8",
        }
    }
}

impl SourceLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Cobol => "COBOL",
            SourceLanguage::Delphi => "DELPHI",
        }
    }
}

impl TargetLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Node => "NODE",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to parse one of the closed enumerations from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown rule id '{0}'")]
    UnknownRuleId(String),

    #[error("unsupported source language '{0}'")]
    UnknownSourceLanguage(String),

    #[error("unsupported target language '{0}'")]
    UnknownTargetLanguage(String),
}

impl FromStr for RuleId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseError::UnknownRuleId(s.to_string()))
    }
}

impl FromStr for SourceLanguage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COBOL" => Ok(SourceLanguage::Cobol),
            "DELPHI" => Ok(SourceLanguage::Delphi),
            other => Err(ParseError::UnknownSourceLanguage(other.to_string())),
        }
    }
}

impl FromStr for TargetLanguage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NODE" => Ok(TargetLanguage::Node),
            other => Err(ParseError::UnknownTargetLanguage(other.to_string())),
        }
    }
}

/// Caller selection of which rules run.
///
/// A JSON array decodes as an allow-list, a JSON object as per-rule switches.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RuleToggle {
    AllowList(Vec<RuleId>),
    Switches(BTreeMap<RuleId, bool>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateRequest {
    pub source_language: SourceLanguage,
    pub target_language: TargetLanguage,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleToggle>,
}

/// One transformed line, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RuleEvidence {
    pub line: usize, // 1-based, in the text the rule received
    pub original: String,
    pub generated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Warning {
    pub code: String, // e.g., "W012"
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>, // None for whole-input issues
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppliedRuleReport {
    pub id: RuleId,
    pub name: String,
    pub hits: usize,
    pub evidence: Vec<RuleEvidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub lines_in: usize,
    pub lines_out: usize,
    pub rules_applied: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateReport {
    pub source_language: SourceLanguage,
    pub target_language: TargetLanguage,
    pub summary: Summary,
    pub applied_rules: Vec<AppliedRuleReport>,
    pub warnings_detected: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MigrateResponse {
    pub output: String,
    pub report: MigrateReport,
}
