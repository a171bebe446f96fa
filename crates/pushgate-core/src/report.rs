//! Verdict aggregation, the gate decision, and the human-readable report.
//!
//! Rendering functions return strings; the caller decides where they go
//! (stderr in hook mode, so stdout stays clean for the JSON payload).

use crate::pipeline::{CheckOutcome, PipelineRun};
use crate::types::{CheckName, CheckStatus};
use serde::{Deserialize, Serialize};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Shown in place of a branch name that could not be resolved.
pub const UNKNOWN_BRANCH: &str = "unknown";

// ---------------------------------------------------------------------------
// GateDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    Block { reason: String },
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

/// Block iff at least one check failed. Skips never block.
pub fn decide(run: &PipelineRun) -> GateDecision {
    if !run.outcomes.iter().any(|o| o.result.is_fail()) {
        GateDecision::Allow
    } else {
        GateDecision::Block {
            reason: block_reason(run),
        }
    }
}

/// Every failed check's label and full message.
pub fn block_reason(run: &PipelineRun) -> String {
    let failed: Vec<&CheckOutcome> = run.with_status(CheckStatus::Fail).collect();
    let mut reason = format!(
        "Push blocked: {} pre-push check{} failed.",
        failed.len(),
        if failed.len() == 1 { "" } else { "s" }
    );
    for outcome in failed {
        reason.push_str(&format!("\n\n[{}]\n{}", outcome.check.label(), outcome.result.message));
    }
    reason
}

/// One-line confirmation for an allowed push.
pub fn allow_context(run: &PipelineRun) -> String {
    let summary = Summary::of(run);
    if summary.skipped.is_empty() {
        "All pre-push checks passed.".to_string()
    } else {
        format!(
            "Pre-push checks passed ({} passed, {} skipped: {}).",
            summary.passed.len(),
            summary.skipped.len(),
            labels(&summary.skipped)
        )
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Checks partitioned by verdict, each list in fixed check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub passed: Vec<CheckName>,
    pub skipped: Vec<CheckName>,
    pub failed: Vec<CheckName>,
}

impl Summary {
    pub fn of(run: &PipelineRun) -> Self {
        let mut summary = Summary::default();
        for outcome in &run.outcomes {
            match outcome.result.status {
                CheckStatus::Pass => summary.passed.push(outcome.check),
                CheckStatus::Fail => summary.failed.push(outcome.check),
                // The pipeline never hands back a pending result.
                CheckStatus::Skip | CheckStatus::Pending => summary.skipped.push(outcome.check),
            }
        }
        summary
    }
}

fn labels(names: &[CheckName]) -> String {
    names.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// RunReport (JSON)
// ---------------------------------------------------------------------------

/// Machine-readable form of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub run: PipelineRun,
    pub summary: Summary,
    pub gate: GateDecision,
}

impl RunReport {
    pub fn new(run: PipelineRun) -> Self {
        let summary = Summary::of(&run);
        let gate = decide(&run);
        Self { run, summary, gate }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

pub fn render_header(branch: Option<&str>) -> String {
    let branch = branch.unwrap_or(UNKNOWN_BRANCH);
    format!("{RULE}\n Pre-push verification\n Branch: {branch}\n{RULE}")
}

fn marker(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "✓",
        CheckStatus::Fail => "✗",
        CheckStatus::Skip => "○",
        CheckStatus::Pending => "…",
    }
}

/// Progress marker printed as each check finishes.
pub fn progress_line(outcome: &CheckOutcome) -> String {
    let label = outcome.check.label();
    match outcome.result.status {
        CheckStatus::Skip => format!(
            "  {} {label} (skipped: {})",
            marker(CheckStatus::Skip),
            first_line(&outcome.result.message)
        ),
        status => format!("  {} {label}", marker(status)),
    }
}

/// Summary grouping followed by either the blocked or the authorized section.
pub fn render_summary(run: &PipelineRun) -> String {
    let summary = Summary::of(run);
    let mut out = String::new();
    out.push_str(&format!("{RULE}\n Summary\n"));
    for (title, names) in [
        ("Passed", &summary.passed),
        ("Skipped", &summary.skipped),
        ("Failed", &summary.failed),
    ] {
        if names.is_empty() {
            out.push_str(&format!("  {title:<8} 0\n"));
        } else {
            out.push_str(&format!("  {title:<8} {} ({})\n", names.len(), labels(names)));
        }
    }
    out.push_str(RULE);
    out.push('\n');

    match decide(run) {
        GateDecision::Allow => out.push_str("✓ Push authorized."),
        GateDecision::Block { .. } => {
            out.push_str("✗ Push blocked. Fix the following and push again:");
            for outcome in run.with_status(CheckStatus::Fail) {
                out.push_str(&format!(
                    "\n\n[{}]\n{}",
                    outcome.check.label(),
                    outcome.result.message
                ));
            }
        }
    }
    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckResult;
    use chrono::Utc;

    fn run_with(results: &[(CheckName, CheckResult)]) -> PipelineRun {
        PipelineRun {
            branch: Some("feature/x".to_string()),
            started_at: Utc::now(),
            outcomes: results
                .iter()
                .map(|(check, result)| CheckOutcome {
                    check: *check,
                    result: result.clone(),
                    duration_ms: 1,
                })
                .collect(),
        }
    }

    fn scenario() -> PipelineRun {
        run_with(&[
            (CheckName::BranchNaming, CheckResult::pass()),
            (CheckName::CommitLint, CheckResult::pass()),
            (CheckName::Lint, CheckResult::skip("No lint script or eslint dependency")),
            (CheckName::Typecheck, CheckResult::skip("No tsconfig.json found")),
            (CheckName::Tests, CheckResult::skip("No test script configured")),
            (CheckName::Security, CheckResult::skip("npm not found on PATH")),
        ])
    }

    #[test]
    fn skips_never_block() {
        assert_eq!(decide(&scenario()), GateDecision::Allow);
        let all_skipped = run_with(
            &CheckName::all()
                .iter()
                .map(|c| (*c, CheckResult::skip("n/a")))
                .collect::<Vec<_>>(),
        );
        assert!(decide(&all_skipped).is_allow());
    }

    #[test]
    fn any_failure_blocks_with_every_failure_listed() {
        let run = run_with(&[
            (CheckName::BranchNaming, CheckResult::fail("Invalid branch name 'x'")),
            (CheckName::CommitLint, CheckResult::pass()),
            (CheckName::Lint, CheckResult::skip("n/a")),
            (CheckName::Typecheck, CheckResult::pass()),
            (CheckName::Tests, CheckResult::fail("1 failing")),
            (CheckName::Security, CheckResult::pass()),
        ]);
        match decide(&run) {
            GateDecision::Block { reason } => {
                assert!(reason.starts_with("Push blocked: 2 pre-push checks failed."));
                assert!(reason.contains("[Branch naming]\nInvalid branch name 'x'"));
                assert!(reason.contains("[Tests]\n1 failing"));
                assert!(!reason.contains("[Lint]"));
            }
            GateDecision::Allow => panic!("expected block"),
        }
    }

    #[test]
    fn summary_partitions_in_check_order() {
        let summary = Summary::of(&scenario());
        assert_eq!(summary.passed, [CheckName::BranchNaming, CheckName::CommitLint]);
        assert_eq!(
            summary.skipped,
            [
                CheckName::Lint,
                CheckName::Typecheck,
                CheckName::Tests,
                CheckName::Security
            ]
        );
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn progress_line_shows_skip_reason() {
        let outcome = CheckOutcome {
            check: CheckName::Lint,
            result: CheckResult::skip("No lint script or eslint dependency"),
            duration_ms: 0,
        };
        assert_eq!(
            progress_line(&outcome),
            "  ○ Lint (skipped: No lint script or eslint dependency)"
        );
        let pass = CheckOutcome {
            check: CheckName::Tests,
            result: CheckResult::pass(),
            duration_ms: 0,
        };
        assert_eq!(progress_line(&pass), "  ✓ Tests");
    }

    #[test]
    fn authorized_summary() {
        let text = render_summary(&scenario());
        assert!(text.contains("Passed   2 (Branch naming, Commit messages)"));
        assert!(text.contains("Failed   0"));
        assert!(text.ends_with("✓ Push authorized."));
    }

    #[test]
    fn blocked_summary_includes_full_messages() {
        let run = run_with(&[
            (CheckName::BranchNaming, CheckResult::pass()),
            (
                CheckName::CommitLint,
                CheckResult::fail("Invalid commit messages:\n  - oops fix typo"),
            ),
        ]);
        let text = render_summary(&run);
        assert!(text.contains("Push blocked"));
        assert!(text.contains("[Commit messages]\nInvalid commit messages:\n  - oops fix typo"));
    }

    #[test]
    fn allow_context_mentions_skips() {
        assert_eq!(
            allow_context(&scenario()),
            "Pre-push checks passed (2 passed, 4 skipped: Lint, Type check, Tests, Security audit)."
        );
        let clean = run_with(&[(CheckName::Lint, CheckResult::pass())]);
        assert_eq!(allow_context(&clean), "All pre-push checks passed.");
    }

    #[test]
    fn run_report_json_shape() {
        let report = RunReport::new(scenario());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["branch"], "feature/x");
        assert_eq!(json["gate"]["decision"], "allow");
        assert_eq!(json["summary"]["passed"][0], "branchNaming");
        assert_eq!(json["outcomes"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn header_names_branch() {
        assert!(render_header(Some("feature/x")).contains("Branch: feature/x"));
        assert!(render_header(None).contains("Branch: unknown"));
    }
}
