// EVALUATE / WHEN / END-EVALUATE -> switch / case / default
//
// COBOL arms never fall through. Every arm that is still open when the next
// WHEN or the END-EVALUATE arrives gets a synthesized `break;`.
use lazy_static::lazy_static;
use migrate_types::{RuleId, Severity, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::patterns::{camelize_words, is_complex_branch_arm, translate_branch_value};
use crate::scan::{leading_ws, Scan};

lazy_static! {
    static ref EVALUATE: Regex = Regex::new(r"(?i)^\s*EVALUATE\s+(.+?)\s*$").unwrap();
    static ref WHEN: Regex = Regex::new(r"(?i)^\s*WHEN\s+(.+?)\s*$").unwrap();
    static ref WHEN_OTHER: Regex = Regex::new(r"(?i)^OTHER$").unwrap();
    static ref END_EVALUATE: Regex = Regex::new(r"(?i)^\s*END-EVALUATE\.?\s*$").unwrap();
}

struct OpenSwitch {
    start_line: usize,
    indent: String,
    arm_open: bool,
}

pub struct EvaluateRule;

impl EvaluateRule {
    /// Close the innermost switch's open arm with a `break;`, if any
    fn close_open_arm(stack: &mut [OpenSwitch], line_no: usize, scan: &mut Scan) {
        let Some(block) = stack.last_mut() else {
            return;
        };
        if !block.arm_open {
            return;
        }

        scan.emit(format!("{}  break;", block.indent));
        scan.record(line_no, "(implicit)", "break; // inserted");
        scan.warn(
            "W043",
            Severity::Low,
            Some(line_no),
            "Inserted break; to prevent switch fall-through.",
        );
        block.arm_open = false;
    }
}

impl Rule for EvaluateRule {
    fn id(&self) -> RuleId {
        RuleId::R7
    }

    fn name(&self) -> &'static str {
        "EVALUATE/WHEN/END-EVALUATE -> switch/case (with break)"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        let mut scan = Scan::new();
        let mut stack: Vec<OpenSwitch> = Vec::new();

        for (idx, original) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = EVALUATE.captures(original) {
                let indent = leading_ws(original).to_string();
                let generated = format!("{}switch ({}) {{", indent, camelize_words(&caps[1]));
                scan.matched(line_no, original, generated);
                stack.push(OpenSwitch {
                    start_line: line_no,
                    indent,
                    arm_open: false,
                });
                scan.warn(
                    "W040",
                    Severity::Low,
                    Some(line_no),
                    "EVALUATE translated to switch/case; complex conditions may need if/else.",
                );
                continue;
            }

            if !stack.is_empty() {
                if let Some(caps) = WHEN.captures(original) {
                    Self::close_open_arm(&mut stack, line_no, &mut scan);

                    let raw = caps[1].trim();
                    if is_complex_branch_arm(raw) {
                        scan.warn(
                            "W044",
                            Severity::Medium,
                            Some(line_no),
                            "Complex WHEN (THRU/operators) mapped to a case; may need if/else.",
                        );
                    }

                    let label = if WHEN_OTHER.is_match(raw) {
                        "default:".to_string()
                    } else {
                        format!("case {}:", translate_branch_value(raw))
                    };

                    if let Some(block) = stack.last_mut() {
                        block.arm_open = true;
                        let generated = format!("{}{}", block.indent, label);
                        scan.matched(line_no, original, generated);
                    }
                    continue;
                }
            }

            if END_EVALUATE.is_match(original) {
                if stack.is_empty() {
                    scan.orphan_closer(
                        line_no,
                        original,
                        "",
                        "W041",
                        "END-EVALUATE without a preceding EVALUATE; kept as a comment.",
                    );
                    continue;
                }

                Self::close_open_arm(&mut stack, line_no, &mut scan);
                if let Some(block) = stack.pop() {
                    scan.matched(line_no, original, format!("{}}}", block.indent));
                }
                continue;
            }

            if stack.is_empty() {
                scan.emit(original);
            } else {
                let body = original.trim_end();
                if body.is_empty() {
                    scan.emit("");
                } else {
                    scan.emit(format!("  {}", body));
                }
            }
        }

        let opened_at: Vec<usize> = stack.iter().map(|b| b.start_line).collect();
        scan.unclosed_blocks(&opened_at, "W042", "EVALUATE", "END-EVALUATE");

        scan.finish(self.id(), self.name())
    }
}
