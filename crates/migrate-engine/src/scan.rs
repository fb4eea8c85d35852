//! Per-run accumulator shared by the line-scanning rules

use migrate_types::{AppliedRuleReport, RuleEvidence, RuleId, Severity, Warning};

use crate::rules::RuleOutcome;

pub(crate) fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Leading whitespace of a line
pub(crate) fn leading_ws(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Output lines, evidence, warnings and hit count for one rule invocation
#[derive(Debug, Default)]
pub(crate) struct Scan {
    out: Vec<String>,
    evidence: Vec<RuleEvidence>,
    warnings: Vec<Warning>,
    hits: usize,
}

impl Scan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, line: impl Into<String>) {
        self.out.push(line.into());
    }

    /// Record evidence without counting a hit
    pub fn record(&mut self, line_no: usize, original: &str, generated: &str) {
        self.evidence.push(RuleEvidence {
            line: line_no,
            original: original.to_string(),
            generated: generated.trim().to_string(),
        });
    }

    /// Emit a generated line and count it as a hit
    pub fn matched(&mut self, line_no: usize, original: &str, generated: String) {
        self.hits += 1;
        self.record(line_no, original, &generated);
        self.out.push(generated);
    }

    pub fn warn(
        &mut self,
        code: &str,
        severity: Severity,
        line: Option<usize>,
        message: impl Into<String>,
    ) {
        self.warnings.push(Warning {
            code: code.to_string(),
            severity,
            line,
            message: message.into(),
        });
    }

    /// Closer with no open block: keep it as a TODO comment and flag it.
    /// The block stack is not touched and no hit is counted.
    pub fn orphan_closer(
        &mut self,
        line_no: usize,
        original: &str,
        prefix: &str,
        code: &str,
        message: impl Into<String>,
    ) {
        self.warn(code, Severity::High, Some(line_no), message);
        self.out.push(format!("{}// TODO: {}", prefix, original.trim()));
    }

    /// One aggregate warning for blocks still open at end of input
    pub fn unclosed_blocks(
        &mut self,
        opened_at: &[usize],
        code: &str,
        construct: &str,
        closer: &str,
    ) {
        if opened_at.is_empty() {
            return;
        }
        let lines = opened_at
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.warn(
            code,
            Severity::High,
            None,
            format!(
                "{} {} block(s) left unclosed (missing {}); opened at line(s) {}.",
                opened_at.len(),
                construct,
                closer,
                lines
            ),
        );
    }

    pub fn finish(self, id: RuleId, name: &str) -> RuleOutcome {
        RuleOutcome {
            output: self.out.join("\n"),
            report: AppliedRuleReport {
                id,
                name: name.to_string(),
                hits: self.hits,
                evidence: self.evidence,
            },
            warnings: self.warnings,
        }
    }
}
