// IF / ELSE / END-IF -> if (...) { } else { }
use lazy_static::lazy_static;
use migrate_types::{RuleId, Severity, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::patterns::{contains_negation, translate_condition};
use crate::scan::{indent, Scan};

lazy_static! {
    static ref IF_OPEN: Regex = Regex::new(r"(?i)^\s*IF\s+(.+?)\s*$").unwrap();
    static ref ELSE: Regex = Regex::new(r"(?i)^\s*ELSE\.?\s*$").unwrap();
    static ref END_IF: Regex = Regex::new(r"(?i)^\s*END-IF\.?\s*$").unwrap();
}

struct OpenIf {
    start_line: usize,
}

pub struct IfElseRule;

impl Rule for IfElseRule {
    fn id(&self) -> RuleId {
        RuleId::R1
    }

    fn name(&self) -> &'static str {
        "IF/ELSE/END-IF -> if/else { }"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        let mut scan = Scan::new();
        let mut stack: Vec<OpenIf> = Vec::new();
        let mut depth = 0usize;

        for (idx, original) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = IF_OPEN.captures(original) {
                let raw = &caps[1];
                if contains_negation(raw) {
                    scan.warn(
                        "W013",
                        Severity::Medium,
                        Some(line_no),
                        "Condition contains NOT; translation is partial (review output).",
                    );
                }

                let generated = format!("{}if ({}) {{", indent(depth), translate_condition(raw));
                scan.matched(line_no, original, generated);
                stack.push(OpenIf {
                    start_line: line_no,
                });
                depth += 1;
                continue;
            }

            if ELSE.is_match(original) {
                if stack.is_empty() {
                    scan.orphan_closer(
                        line_no,
                        original,
                        &indent(depth),
                        "W010",
                        "ELSE without a preceding IF; kept as a comment.",
                    );
                    continue;
                }

                // Close the current branch and open the alternate one
                let generated = format!("{}}} else {{", indent(depth.saturating_sub(1)));
                scan.matched(line_no, original, generated);
                continue;
            }

            if END_IF.is_match(original) {
                if stack.pop().is_none() {
                    scan.orphan_closer(
                        line_no,
                        original,
                        &indent(depth),
                        "W011",
                        "END-IF without a preceding IF; kept as a comment.",
                    );
                    continue;
                }

                depth = depth.saturating_sub(1);
                scan.matched(line_no, original, format!("{}}}", indent(depth)));
                continue;
            }

            let body = original.trim_end();
            if body.is_empty() {
                scan.emit("");
            } else {
                scan.emit(format!("{}{}", indent(depth), body));
            }
        }

        let opened_at: Vec<usize> = stack.iter().map(|b| b.start_line).collect();
        scan.unclosed_blocks(&opened_at, "W012", "IF", "END-IF");

        scan.finish(self.id(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn high_warnings(outcome: &RuleOutcome) -> usize {
        outcome
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::High)
            .count()
    }

    #[test]
    fn test_if_end_if_with_sentence_period() {
        let outcome = IfElseRule.run("IF WS-A = 1\n  DISPLAY 'A'\nEND-IF.");

        assert_eq!(outcome.output, "if (wsA === 1) {\n    DISPLAY 'A'\n}");
        assert_eq!(outcome.report.hits, 2);
        assert_eq!(high_warnings(&outcome), 0);
    }

    #[test]
    fn test_if_else_end_if() {
        let input = [
            "IF WS-A <> WS-B AND WS-C = 2",
            "DISPLAY 'A'",
            "ELSE",
            "DISPLAY 'B'",
            "END-IF",
        ]
        .join("\n");
        let outcome = IfElseRule.run(&input);

        assert_eq!(
            outcome.output,
            [
                "if (wsA !== wsB && wsC === 2) {",
                "  DISPLAY 'A'",
                "} else {",
                "  DISPLAY 'B'",
                "}",
            ]
            .join("\n")
        );
        assert_eq!(outcome.report.hits, 3);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.report.evidence[1].generated, "} else {");
        assert_eq!(outcome.report.evidence[1].line, 3);
    }

    #[test]
    fn test_nested_ifs_indent_per_level() {
        let input = "IF A = 1\nIF B = 2\nMOVE 1 TO C\nEND-IF\nEND-IF";
        let outcome = IfElseRule.run(input);

        assert_eq!(
            outcome.output,
            "if (a === 1) {\n  if (b === 2) {\n    MOVE 1 TO C\n  }\n}"
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_not_condition_warns_medium() {
        let outcome = IfElseRule.run("IF NOT WS-A = 1\nEND-IF");

        assert!(outcome.output.starts_with("if (not wsA === 1) {"));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, "W013");
        assert_eq!(outcome.warnings[0].severity, Severity::Medium);
        assert_eq!(outcome.warnings[0].line, Some(1));
    }

    #[test]
    fn test_orphan_else_and_end_if() {
        let outcome = IfElseRule.run("ELSE\nEND-IF\nMOVE 1 TO A");

        assert_eq!(
            outcome.output,
            "// TODO: ELSE\n// TODO: END-IF\nMOVE 1 TO A"
        );
        assert_eq!(outcome.report.hits, 0);
        let codes: Vec<_> = outcome.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["W010", "W011"]);
        assert_eq!(high_warnings(&outcome), 2);
    }

    #[test]
    fn test_orphan_end_if_leaves_open_block_intact() {
        // The second END-IF is an orphan; the first IF is still closed correctly
        let outcome = IfElseRule.run("IF A = 1\nEND-IF\nEND-IF");

        assert_eq!(outcome.output, "if (a === 1) {\n}\n// TODO: END-IF");
        assert_eq!(outcome.report.hits, 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].line, Some(3));
    }

    #[test]
    fn test_unclosed_ifs_produce_single_warning() {
        let outcome = IfElseRule.run("IF A = 1\nIF B = 2\nDISPLAY 'A'");

        let unclosed: Vec<_> = outcome
            .warnings
            .iter()
            .filter(|w| w.code == "W012")
            .collect();
        assert_eq!(unclosed.len(), 1);
        assert_eq!(unclosed[0].line, None);
        assert!(unclosed[0].message.starts_with("2 IF block(s)"));
        assert_eq!(outcome.output.split('\n').count(), 3);
    }

    #[test]
    fn test_lines_outside_blocks_are_right_trimmed() {
        let outcome = IfElseRule.run("MOVE 1 TO A   \n\n   DISPLAY 'X'");
        assert_eq!(outcome.output, "MOVE 1 TO A\n\n   DISPLAY 'X'");
        assert_eq!(outcome.report.hits, 0);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let input = "if WS-A = 1\n  display 'A'\nelse.\n  display 'B'\nend-if.";
        let outcome = IfElseRule.run(input);

        assert_eq!(
            outcome.output,
            "if (wsA === 1) {\n    display 'A'\n} else {\n    display 'B'\n}"
        );
        assert_eq!(outcome.report.hits, 3);
        assert!(outcome.warnings.is_empty());
    }
}
