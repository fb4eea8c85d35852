//! Construct rules
//!
//! Each rule scans its input line by line and rewrites one legacy construct.
//! Rules are stateless: all per-run state (block stack, indentation, evidence)
//! lives inside `run`, so one instance is shared by every request.

pub mod assignment;
pub mod comments;
pub mod display;
pub mod evaluate;
pub mod if_else;
pub mod perform;

use migrate_types::{AppliedRuleReport, RuleId, SourceLanguage, Warning};

pub use assignment::{AddRule, MoveRule, SubtractRule};
pub use comments::CommentRule;
pub use display::DisplayRule;
pub use evaluate::EvaluateRule;
pub use if_else::IfElseRule;
pub use perform::PerformRule;

/// Result of one rule invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub output: String,
    pub report: AppliedRuleReport,
    pub warnings: Vec<Warning>,
}

pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;
    fn name(&self) -> &'static str;
    fn applies_to(&self) -> SourceLanguage;
    fn run(&self, input: &str) -> RuleOutcome;
}
