pub mod catalog;
pub mod normalize;
pub mod patterns;
pub mod rules;
mod scan;

use migrate_types::{MigrateReport, MigrateRequest, MigrateResponse, Summary};
use tracing::debug;

pub use catalog::{resolve_enabled_rule_ids, RuleCatalog, RuleInfo};
pub use normalize::{count_lines, normalize};
pub use rules::{Rule, RuleOutcome};

/// MigrationEngine entry point
pub struct MigrationEngine<'c> {
    catalog: &'c RuleCatalog,
}

impl MigrationEngine<'static> {
    /// Engine over the built-in rule catalog
    pub fn new() -> Self {
        Self::with_catalog(RuleCatalog::global())
    }
}

impl Default for MigrationEngine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> MigrationEngine<'c> {
    pub fn with_catalog(catalog: &'c RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    /// Run every enabled rule over the normalized code and aggregate the report.
    ///
    /// Never fails: unrecognized or malformed constructs surface as warnings.
    pub fn migrate(&self, request: &MigrateRequest) -> MigrateResponse {
        let rules = self.catalog.rules_for(request.source_language);
        let enabled = resolve_enabled_rule_ids(&rules, request.rules.as_ref());

        let lines_in = count_lines(&request.code);
        let mut current = normalize(&request.code);

        let mut applied_rules = Vec::new();
        let mut warnings_detected = Vec::new();

        for rule in rules {
            if !enabled.contains(&rule.id()) {
                debug!(rule = %rule.id(), "rule disabled, skipping");
                continue;
            }

            debug!(rule = %rule.id(), "applying rule");
            let outcome = rule.run(&current);

            // Output replaces the text even without hits
            current = outcome.output;

            if outcome.report.hits > 0 {
                applied_rules.push(outcome.report);
            }
            warnings_detected.extend(outcome.warnings);
        }

        let lines_out = count_lines(&current);
        let summary = Summary {
            lines_in,
            lines_out,
            rules_applied: applied_rules.len(),
            warnings: warnings_detected.len(),
        };

        debug!(
            source = %request.source_language,
            lines_in,
            lines_out,
            rules_applied = summary.rules_applied,
            warnings = summary.warnings,
            "migration finished"
        );

        MigrateResponse {
            output: current,
            report: MigrateReport {
                source_language: request.source_language,
                target_language: request.target_language,
                summary,
                applied_rules,
                warnings_detected,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrate_types::{
        AppliedRuleReport, RuleId, RuleToggle, Severity, SourceLanguage, TargetLanguage, Warning,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn request(code: &str, rules: Option<RuleToggle>) -> MigrateRequest {
        MigrateRequest {
            source_language: SourceLanguage::Cobol,
            target_language: TargetLanguage::Node,
            code: code.to_string(),
            rules,
        }
    }

    fn only(ids: &[RuleId]) -> Option<RuleToggle> {
        Some(RuleToggle::AllowList(ids.to_vec()))
    }

    fn warning(code: &str) -> Warning {
        Warning {
            code: code.to_string(),
            severity: Severity::Low,
            line: None,
            message: code.to_string(),
        }
    }

    /// Appends a marker line and reports fixed hits and warnings
    struct MarkerRule {
        id: RuleId,
        hits: usize,
        warnings: Vec<&'static str>,
        calls: Arc<AtomicUsize>,
        seen: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl MarkerRule {
        fn new(id: RuleId, hits: usize, warnings: Vec<&'static str>) -> Self {
            Self {
                id,
                hits,
                warnings,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }
    }

    impl Rule for MarkerRule {
        fn id(&self) -> RuleId {
            self.id
        }

        fn name(&self) -> &'static str {
            "marker"
        }

        fn applies_to(&self) -> SourceLanguage {
            SourceLanguage::Cobol
        }

        fn run(&self, input: &str) -> RuleOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(input.to_string());
            RuleOutcome {
                output: format!("{}\n// {}", input, self.id),
                report: AppliedRuleReport {
                    id: self.id,
                    name: self.name().to_string(),
                    hits: self.hits,
                    evidence: vec![],
                },
                warnings: self.warnings.iter().map(|c| warning(c)).collect(),
            }
        }
    }

    #[test]
    fn test_only_enabled_rules_run_and_reports_aggregate() {
        let r1 = MarkerRule::new(RuleId::R1, 2, vec!["w1"]);
        let r2 = MarkerRule::new(RuleId::R2, 0, vec!["w2", "w3"]);
        let r3 = MarkerRule::new(RuleId::R3, 10, vec!["w999"]);
        let calls = [r1.calls.clone(), r2.calls.clone(), r3.calls.clone()];

        let catalog = RuleCatalog::from_rules(vec![Box::new(r1), Box::new(r2), Box::new(r3)]);
        let engine = MigrationEngine::with_catalog(&catalog);
        let response = engine.migrate(&request("a\nb\nc", only(&[RuleId::R1, RuleId::R2])));

        assert_eq!(calls[0].load(Ordering::SeqCst), 1);
        assert_eq!(calls[1].load(Ordering::SeqCst), 1);
        assert_eq!(calls[2].load(Ordering::SeqCst), 0);
        assert_eq!(response.output, "a\nb\nc\n// R1\n// R2");

        let summary = response.report.summary;
        assert_eq!(summary.lines_in, 3);
        assert_eq!(summary.lines_out, 5);
        assert_eq!(summary.rules_applied, 1);
        assert_eq!(summary.warnings, 3);

        assert_eq!(response.report.applied_rules.len(), 1);
        assert_eq!(response.report.applied_rules[0].id, RuleId::R1);
        assert_eq!(
            response.report.warnings_detected,
            vec![warning("w1"), warning("w2"), warning("w3")]
        );
    }

    #[test]
    fn test_rules_receive_normalized_code() {
        let rule = MarkerRule::new(RuleId::R1, 0, vec![]);
        let seen = rule.seen.clone();
        let catalog = RuleCatalog::from_rules(vec![Box::new(rule)]);

        MigrationEngine::with_catalog(&catalog)
            .migrate(&request("line1\\nline2\r\n\tline3   \r\n", None));

        assert_eq!(*seen.lock().unwrap(), vec!["line1\nline2\n  line3".to_string()]);
    }

    #[test]
    fn test_switch_toggle_disables_rule() {
        let r1 = MarkerRule::new(RuleId::R1, 1, vec!["w1"]);
        let r2 = MarkerRule::new(RuleId::R2, 1, vec!["w2"]);
        let r2_calls = r2.calls.clone();
        let catalog = RuleCatalog::from_rules(vec![Box::new(r1), Box::new(r2)]);

        let mut switches = BTreeMap::new();
        switches.insert(RuleId::R2, false);
        let response = MigrationEngine::with_catalog(&catalog)
            .migrate(&request("x", Some(RuleToggle::Switches(switches))));

        assert_eq!(r2_calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.report.warnings_detected, vec![warning("w1")]);
        assert!(response
            .report
            .applied_rules
            .iter()
            .all(|r| r.id != RuleId::R2));
    }

    #[test]
    fn test_no_enabled_rules_returns_normalized_code() {
        let response = MigrationEngine::new().migrate(&request("a\tb  \r\n", only(&[])));

        assert_eq!(response.output, "a  b");
        assert_eq!(response.report.summary.rules_applied, 0);
        assert_eq!(response.report.summary.warnings, 0);
        assert_eq!(response.report.summary.lines_in, 2);
        assert_eq!(response.report.summary.lines_out, 1);
    }

    #[test]
    fn test_scenario_normalization_only() {
        let response =
            MigrationEngine::new().migrate(&request("line1\\nline2\r\n\tline3   \r\n", only(&[])));
        assert_eq!(response.output, "line1\nline2\n  line3");
        assert_eq!(response.report.summary.lines_in, 3);
        assert_eq!(response.report.summary.lines_out, 3);
    }

    #[test]
    fn test_scenario_conditional_only() {
        let response = MigrationEngine::new().migrate(&request(
            "IF WS-A = 1\n  DISPLAY 'A'\nEND-IF.",
            only(&[RuleId::R1]),
        ));

        assert!(response.output.contains("if (wsA === 1) {"));
        assert!(response.output.lines().any(|l| l.trim() == "}"));
        assert!(response
            .report
            .warnings_detected
            .iter()
            .all(|w| w.severity != Severity::High));
    }

    #[test]
    fn test_scenario_unclosed_loop() {
        let response = MigrationEngine::new().migrate(&request(
            "PERFORM UNTIL WS-A = 10\n  ADD 1 TO WS-A\n",
            only(&[RuleId::R6]),
        ));

        assert!(response.output.contains("while (!(wsA === 10)) {"));
        let high: Vec<_> = response
            .report
            .warnings_detected
            .iter()
            .filter(|w| w.severity == Severity::High)
            .collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].line, None);
    }

    #[test]
    fn test_scenario_two_arm_switch() {
        let code = "EVALUATE WS-A\nWHEN 1\nDISPLAY 'ONE'\nWHEN 2\nDISPLAY 'TWO'\nEND-EVALUATE";
        let response = MigrationEngine::new().migrate(&request(code, only(&[RuleId::R7])));

        assert!(response.output.contains("case 1:"));
        assert!(response.output.contains("case 2:"));
        let breaks = response
            .output
            .lines()
            .filter(|l| l.trim() == "break;")
            .count();
        assert!(breaks >= 2);
    }

    #[test]
    fn test_delphi_runs_no_rules() {
        let mut req = request("writeln('hi');\n", None);
        req.source_language = SourceLanguage::Delphi;
        let response = MigrationEngine::new().migrate(&req);

        assert_eq!(response.output, "writeln('hi');");
        assert_eq!(response.report.source_language, SourceLanguage::Delphi);
        assert_eq!(response.report.summary.rules_applied, 0);
        assert_eq!(response.report.summary.lines_in, 2);
        assert_eq!(response.report.summary.lines_out, 1);
    }

    #[test]
    fn test_full_catalog_on_small_program() {
        let code = [
            "      * Pay calc",
            "       IF WS-A = 1",
            "           MOVE ZERO TO WS-TOTAL",
            "           DISPLAY \"DONE\"",
            "       END-IF.",
        ]
        .join("\n");
        let response = MigrationEngine::new().migrate(&request(&code, None));

        assert_eq!(
            response.output,
            [
                "      // Pay calc",
                "if (wsA === 1) {",
                "             wsTotal = 0;",
                "             logger.info(\"DONE\");",
                "}",
            ]
            .join("\n")
        );

        let applied: Vec<(RuleId, usize)> = response
            .report
            .applied_rules
            .iter()
            .map(|r| (r.id, r.hits))
            .collect();
        assert_eq!(
            applied,
            vec![
                (RuleId::R8, 1),
                (RuleId::R1, 2),
                (RuleId::R2, 1),
                (RuleId::R3, 1)
            ]
        );
        assert!(response.report.warnings_detected.is_empty());
    }

    #[test]
    fn test_warnings_follow_rule_order_not_line_order() {
        let code = "END-PERFORM\nMOVE 'X' TO WS-A";
        let response = MigrationEngine::new().migrate(&request(code, None));

        let codes: Vec<_> = response
            .report
            .warnings_detected
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        // R3 runs before R6
        assert_eq!(codes, vec!["W020", "W031"]);
        assert_eq!(response.output, "// TODO: END-PERFORM\nwsA = 'X';");
    }

    proptest! {
        #[test]
        fn migrate_is_total(code in "[ -~\t\n]{0,200}") {
            let response = MigrationEngine::new().migrate(&request(&code, None));
            prop_assert_eq!(response.report.summary.lines_in, count_lines(&code));
            prop_assert_eq!(response.report.summary.lines_out, count_lines(&response.output));
            prop_assert_eq!(
                response.report.summary.rules_applied,
                response.report.applied_rules.len()
            );
            prop_assert!(response.report.applied_rules.iter().all(|r| r.hits > 0));
        }

        #[test]
        fn balanced_switch_gets_one_break_per_arm(arms in 1usize..8) {
            let mut lines = vec!["EVALUATE WS-A".to_string()];
            for n in 0..arms {
                lines.push(format!("WHEN {}", n));
                lines.push("DISPLAY 'X'".to_string());
            }
            lines.push("END-EVALUATE".to_string());

            let response = MigrationEngine::new()
                .migrate(&request(&lines.join("\n"), only(&[RuleId::R7])));
            let breaks = response.output.lines().filter(|l| l.trim() == "break;").count();
            prop_assert_eq!(breaks, arms);
            prop_assert!(response
                .report
                .warnings_detected
                .iter()
                .all(|w| w.severity != Severity::High));
        }

        #[test]
        fn unmatched_openers_reported_once(open in 0usize..6) {
            let code = vec!["IF WS-A = 1"; open].join("\n");
            let response = MigrationEngine::new().migrate(&request(&code, only(&[RuleId::R1])));
            let unclosed: Vec<_> = response
                .report
                .warnings_detected
                .iter()
                .filter(|w| w.code == "W012")
                .collect();
            if open == 0 {
                prop_assert!(unclosed.is_empty());
            } else {
                prop_assert_eq!(unclosed.len(), 1);
                let prefix = format!("{} IF", open);
                prop_assert!(unclosed[0].message.starts_with(&prefix));
            }
        }
    }
}
