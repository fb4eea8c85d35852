// DISPLAY "literal" -> logger.info("literal");
use lazy_static::lazy_static;
use migrate_types::{RuleId, Severity, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::scan::{leading_ws, Scan};

lazy_static! {
    static ref DISPLAY_LITERAL: Regex =
        Regex::new(r#"(?i)^\s*DISPLAY\s+(?:"([^"]*)"|'([^']*)')\.?\s*$"#).unwrap();
    static ref DISPLAY_ANY: Regex = Regex::new(r"(?i)^\s*DISPLAY\s+").unwrap();
}

pub struct DisplayRule;

impl Rule for DisplayRule {
    fn id(&self) -> RuleId {
        RuleId::R2
    }

    fn name(&self) -> &'static str {
        "DISPLAY \"...\" -> logger.info(\"...\");"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        let mut scan = Scan::new();

        for (idx, line) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = DISPLAY_LITERAL.captures(line) {
                let literal = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                let escaped =
                    serde_json::to_string(literal).unwrap_or_else(|_| format!("\"{}\"", literal));
                let generated = format!("{}logger.info({});", leading_ws(line), escaped);
                scan.matched(line_no, line, generated);
                continue;
            }

            if DISPLAY_ANY.is_match(line) {
                scan.warn(
                    "W001",
                    Severity::Medium,
                    Some(line_no),
                    "DISPLAY of a non-literal is not supported yet; kept as a comment.",
                );
                scan.emit(format!("{}// TODO: {}", leading_ws(line), line.trim()));
                continue;
            }

            scan.emit(line);
        }

        scan.finish(self.id(), self.name())
    }
}
