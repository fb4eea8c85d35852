//! Ordered registry of migration rules

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use migrate_types::{RuleId, RuleToggle, SourceLanguage};
use serde::Serialize;

use crate::rules::{
    AddRule, CommentRule, DisplayRule, EvaluateRule, IfElseRule, MoveRule, PerformRule, Rule,
    SubtractRule,
};

lazy_static! {
    static ref BUILTIN: RuleCatalog = RuleCatalog::builtin();
}

/// Public description of a registered rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: RuleId,
    pub name: String,
    pub applies_to: SourceLanguage,
}

/// Immutable, ordered rule list. Registration order is execution order.
pub struct RuleCatalog {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleCatalog {
    /// The built-in COBOL rule set.
    ///
    /// Comments run first so later rules never see comment text.
    pub fn builtin() -> Self {
        Self::from_rules(vec![
            Box::new(CommentRule),
            Box::new(IfElseRule),
            Box::new(DisplayRule),
            Box::new(MoveRule),
            Box::new(AddRule),
            Box::new(SubtractRule),
            Box::new(PerformRule),
            Box::new(EvaluateRule),
        ])
    }

    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        debug_assert!(
            {
                let ids: BTreeSet<RuleId> = rules.iter().map(|r| r.id()).collect();
                ids.len() == rules.len()
            },
            "rule ids must be unique within a catalog"
        );
        Self { rules }
    }

    /// Process-wide built-in catalog
    pub fn global() -> &'static RuleCatalog {
        &BUILTIN
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for one source language, in registration order
    pub fn rules_for(&self, source: SourceLanguage) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| r.applies_to() == source)
            .collect()
    }

    pub fn describe(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|r| RuleInfo {
                id: r.id(),
                name: r.name().to_string(),
                applies_to: r.applies_to(),
            })
            .collect()
    }
}

/// Resolve which of `rules` are enabled by the caller's toggle.
///
/// - no toggle: all enabled
/// - allow-list: only listed ids; ids not in `rules` are ignored
/// - switches: all enabled except ids explicitly set to `false`
pub fn resolve_enabled_rule_ids(
    rules: &[&dyn Rule],
    toggle: Option<&RuleToggle>,
) -> BTreeSet<RuleId> {
    let known = rules.iter().map(|r| r.id());

    match toggle {
        None => known.collect(),
        Some(RuleToggle::AllowList(allowed)) => known.filter(|id| allowed.contains(id)).collect(),
        Some(RuleToggle::Switches(switches)) => known
            .filter(|id| switches.get(id).copied().unwrap_or(true))
            .collect(),
    }
}
