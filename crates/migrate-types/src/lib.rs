pub mod types;

pub use types::{
    AppliedRuleReport, MigrateReport, MigrateRequest, MigrateResponse, ParseError, RuleEvidence,
    RuleId, RuleToggle, Severity, SourceLanguage, Summary, TargetLanguage, Warning,
};
