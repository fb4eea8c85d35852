//! Single-line arithmetic statements
//!
//! - `MOVE a TO b` -> `b = a;`
//! - `ADD a TO b` -> `b += a;`
//! - `SUBTRACT a FROM b` -> `b -= a;`
//!
//! Operands go through [`translate_operand`]. MOVE and ADD flag operands they
//! cannot translate; SUBTRACT passes them through without a warning.

use lazy_static::lazy_static;
use migrate_types::{RuleId, Severity, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::patterns::translate_operand;
use crate::scan::Scan;

lazy_static! {
    static ref MOVE: Regex = Regex::new(r"(?i)^(\s*)MOVE\s+(\S+?)\s+TO\s+(\S+?)\.?\s*$").unwrap();
    static ref ADD: Regex = Regex::new(r"(?i)^(\s*)ADD\s+(\S+?)\s+TO\s+(\S+?)\.?\s*$").unwrap();
    static ref SUBTRACT: Regex =
        Regex::new(r"(?i)^(\s*)SUBTRACT\s+(\S+?)\s+FROM\s+(\S+?)\.?\s*$").unwrap();
}

/// How one statement form is recognized and rendered
struct Statement {
    verb: &'static str,
    pattern: &'static Regex,
    operator: &'static str,
    /// Warning code for untranslatable operands; `None` keeps them silently
    unknown_token_code: Option<&'static str>,
}

impl Statement {
    fn operand(&self, token: &str, line_no: usize, scan: &mut Scan) -> String {
        match translate_operand(token) {
            Some(translated) => translated,
            None => {
                if let Some(code) = self.unknown_token_code {
                    scan.warn(
                        code,
                        Severity::Low,
                        Some(line_no),
                        format!(
                            "{} token \"{}\" not recognized; left as-is.",
                            self.verb,
                            token.trim()
                        ),
                    );
                }
                token.trim().to_string()
            }
        }
    }

    fn rewrite(&self, input: &str) -> Scan {
        let mut scan = Scan::new();

        for (idx, line) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            let Some(caps) = self.pattern.captures(line) else {
                scan.emit(line);
                continue;
            };

            let source = self.operand(&caps[2], line_no, &mut scan);
            let target = self.operand(&caps[3], line_no, &mut scan);
            let generated = format!("{}{} {} {};", &caps[1], target, self.operator, source);
            scan.matched(line_no, line, generated);
        }

        scan
    }
}

pub struct MoveRule;

impl Rule for MoveRule {
    fn id(&self) -> RuleId {
        RuleId::R3
    }

    fn name(&self) -> &'static str {
        "MOVE A TO B -> b = a;"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        Statement {
            verb: "MOVE",
            pattern: &MOVE,
            operator: "=",
            unknown_token_code: Some("W020"),
        }
        .rewrite(input)
        .finish(self.id(), self.name())
    }
}

pub struct AddRule;

impl Rule for AddRule {
    fn id(&self) -> RuleId {
        RuleId::R4
    }

    fn name(&self) -> &'static str {
        "ADD A TO B -> b += a;"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        Statement {
            verb: "ADD",
            pattern: &ADD,
            operator: "+=",
            unknown_token_code: Some("W021"),
        }
        .rewrite(input)
        .finish(self.id(), self.name())
    }
}

pub struct SubtractRule;

impl Rule for SubtractRule {
    fn id(&self) -> RuleId {
        RuleId::R5
    }

    fn name(&self) -> &'static str {
        "SUBTRACT A FROM B -> b -= a;"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        // No warning for unrecognized operands, unlike MOVE and ADD
        Statement {
            verb: "SUBTRACT",
            pattern: &SUBTRACT,
            operator: "-=",
            unknown_token_code: None,
        }
        .rewrite(input)
        .finish(self.id(), self.name())
    }
}
