// PERFORM UNTIL / PERFORM VARYING ... END-PERFORM -> while / for loops
//
// COBOL repeats *until* the condition holds, so the generated guard is the
// negated condition: `PERFORM UNTIL I > 10` runs while `!(i > 10)`.
use lazy_static::lazy_static;
use migrate_types::{RuleId, Severity, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::patterns::{to_js_identifier, translate_condition, translate_operand};
use crate::scan::{leading_ws, Scan};

lazy_static! {
    static ref PERFORM_VARYING: Regex = Regex::new(
        r"(?i)^\s*PERFORM\s+VARYING\s+(\S+)\s+FROM\s+(\S+)\s+BY\s+(\S+)\s+UNTIL\s+(.+?)\s*$"
    )
    .unwrap();
    static ref PERFORM_UNTIL: Regex = Regex::new(r"(?i)^\s*PERFORM\s+UNTIL\s+(.+?)\s*$").unwrap();
    static ref END_PERFORM: Regex = Regex::new(r"(?i)^\s*END-PERFORM\.?\s*$").unwrap();
}

enum OpenLoop {
    Until { start_line: usize },
    Varying { start_line: usize },
}

impl OpenLoop {
    fn start_line(&self) -> usize {
        match self {
            OpenLoop::Until { start_line } | OpenLoop::Varying { start_line } => *start_line,
        }
    }
}

pub struct PerformRule;

impl PerformRule {
    /// Loop bounds: like statement operands, but unknown tokens are flagged
    fn loop_value(token: &str, line_no: usize, scan: &mut Scan) -> String {
        translate_operand(token).unwrap_or_else(|| {
            scan.warn(
                "W034",
                Severity::Low,
                Some(line_no),
                format!("PERFORM value \"{}\" not recognized; left as-is.", token.trim()),
            );
            token.trim().to_string()
        })
    }
}

impl Rule for PerformRule {
    fn id(&self) -> RuleId {
        RuleId::R6
    }

    fn name(&self) -> &'static str {
        "PERFORM (UNTIL/VARYING) -> while/for (heuristic)"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        let mut scan = Scan::new();
        let mut stack: Vec<OpenLoop> = Vec::new();

        for (idx, original) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = PERFORM_VARYING.captures(original) {
                let counter = to_js_identifier(&caps[1]);
                let from = Self::loop_value(&caps[2], line_no, &mut scan);
                let step = Self::loop_value(&caps[3], line_no, &mut scan);
                let guard = translate_condition(&caps[4]);

                let generated = format!(
                    "{}for (let {c} = {}; !({}); {c} += {}) {{",
                    leading_ws(original),
                    from,
                    guard,
                    step,
                    c = counter
                );
                scan.matched(line_no, original, generated);
                stack.push(OpenLoop::Varying {
                    start_line: line_no,
                });
                scan.warn(
                    "W033",
                    Severity::Low,
                    Some(line_no),
                    "PERFORM VARYING translated to a for-loop heuristically; \
                     check the guard and step.",
                );
                continue;
            }

            if let Some(caps) = PERFORM_UNTIL.captures(original) {
                let guard = translate_condition(&caps[1]);
                let generated = format!("{}while (!({})) {{", leading_ws(original), guard);
                scan.matched(line_no, original, generated);
                stack.push(OpenLoop::Until {
                    start_line: line_no,
                });
                scan.warn(
                    "W030",
                    Severity::Low,
                    Some(line_no),
                    "PERFORM UNTIL translated to while(!cond) heuristically; check the semantics.",
                );
                continue;
            }

            if END_PERFORM.is_match(original) {
                if stack.pop().is_none() {
                    scan.orphan_closer(
                        line_no,
                        original,
                        "",
                        "W031",
                        "END-PERFORM without a preceding PERFORM; kept as a comment.",
                    );
                    continue;
                }

                scan.matched(line_no, original, format!("{}}}", leading_ws(original)));
                continue;
            }

            scan.emit(original);
        }

        let opened_at: Vec<usize> = stack.iter().map(OpenLoop::start_line).collect();
        scan.unclosed_blocks(&opened_at, "W032", "PERFORM", "END-PERFORM");

        scan.finish(self.id(), self.name())
    }
}
