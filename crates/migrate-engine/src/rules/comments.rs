// COBOL comments: `* text` / `*> text` lines and trailing `code *> text`
use lazy_static::lazy_static;
use migrate_types::{RuleId, SourceLanguage};
use regex::Regex;

use super::{Rule, RuleOutcome};
use crate::scan::{leading_ws, Scan};

lazy_static! {
    static ref FULL_LINE: Regex = Regex::new(r"^\s*\*>?\s?(.*)$").unwrap();
    static ref INLINE: Regex = Regex::new(r"^(.*?)\*>(.*)$").unwrap();
}

pub struct CommentRule;

impl Rule for CommentRule {
    fn id(&self) -> RuleId {
        RuleId::R8
    }

    fn name(&self) -> &'static str {
        "COBOL comments (*, *>) -> //"
    }

    fn applies_to(&self) -> SourceLanguage {
        SourceLanguage::Cobol
    }

    fn run(&self, input: &str) -> RuleOutcome {
        let mut scan = Scan::new();

        for (idx, line) in input.split('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(caps) = FULL_LINE.captures(line) {
                let generated = format!("{}// {}", leading_ws(line), &caps[1]);
                scan.matched(line_no, line, generated.trim_end().to_string());
                continue;
            }

            if let Some(caps) = INLINE.captures(line) {
                let code = caps[1].trim_end();
                let comment = caps[2].trim();
                let generated = format!("{} // {}", code, comment);
                scan.matched(line_no, line, generated.trim_end().to_string());
                continue;
            }

            scan.emit(line);
        }

        scan.finish(self.id(), self.name())
    }
}
