use super::{fault_to_skip, RepoContext};
use crate::process::{truncate_output, InvocationOutcome};
use crate::types::CheckResult;
use regex::Regex;
use std::sync::OnceLock;

static SEVERE_RE: OnceLock<Regex> = OnceLock::new();
static REPORT_RE: OnceLock<Regex> = OnceLock::new();

fn severe_re() -> &'static Regex {
    SEVERE_RE.get_or_init(|| Regex::new(r"(?i)\b(high|critical)\b").unwrap())
}

/// Wording every supported audit tool uses when it actually produced a report.
fn report_re() -> &'static Regex {
    REPORT_RE.get_or_init(|| Regex::new(r"(?i)\b(vulnerabilit(y|ies)|advisor(y|ies)|severity)\b").unwrap())
}

/// True if audit output mentions high or critical severity findings.
pub fn has_severe_findings(output: &str) -> bool {
    severe_re().is_match(output)
}

pub fn check_security(ctx: &RepoContext) -> CheckResult {
    if let Err(skip) = ctx.require_manifest() {
        return skip;
    }

    let inv = ctx.invocation(ctx.package_manager.audit(), ctx.config.timeouts.security());
    let outcome = ctx.runner.run(&inv);
    if let Some(skip) = fault_to_skip("Security audit", &outcome) {
        return skip;
    }

    let InvocationOutcome::Completed {
        success, output, ..
    } = outcome
    else {
        return CheckResult::skip("Security audit could not run");
    };

    if success {
        return CheckResult::pass();
    }
    if has_severe_findings(&output) {
        let body = truncate_output(&output, ctx.config.security_output_chars);
        return CheckResult::fail(format!("High or critical vulnerabilities found:\n{body}"));
    }
    if report_re().is_match(&output) {
        return CheckResult::pass_with("Audit reported no high or critical vulnerabilities");
    }
    // Nonzero exit without an audit report: the tool itself errored
    // (no lockfile, registry unreachable, ...). That is not a clean audit.
    let first_line = output.lines().next().unwrap_or("").trim();
    CheckResult::skip(format!(
        "Security audit could not complete: {}",
        if first_line.is_empty() { "no output" } else { first_line }
    ))
}
