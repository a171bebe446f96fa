//! Sequential execution of the check table.
//!
//! All checks always run, in fixed order, even after a failure, so a single
//! report shows everything that is wrong.

use crate::checks::{all_checks, Check, RepoContext};
use crate::types::{CheckName, CheckResult, CheckStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

// ---------------------------------------------------------------------------
// CheckOutcome / PipelineRun
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: CheckName,
    #[serde(flatten)]
    pub result: CheckResult,
    pub duration_ms: u64,
}

/// One push attempt. Built once, consumed by the report, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// `None` when the current branch could not be resolved.
    pub branch: Option<String>,
    pub started_at: DateTime<Utc>,
    /// One entry per check, in [`CheckName::all`] order.
    pub outcomes: Vec<CheckOutcome>,
}

impl PipelineRun {
    pub fn result(&self, check: CheckName) -> Option<&CheckResult> {
        self.outcomes
            .iter()
            .find(|o| o.check == check)
            .map(|o| &o.result)
    }

    pub fn with_status(&self, status: CheckStatus) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(move |o| o.result.status == status)
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run every check against `ctx`, calling `on_result` as each one finishes.
pub fn run(ctx: &RepoContext, on_result: impl FnMut(&CheckOutcome)) -> PipelineRun {
    run_checks(ctx, &all_checks(), on_result)
}

pub(crate) fn run_checks(
    ctx: &RepoContext,
    checks: &[Check],
    mut on_result: impl FnMut(&CheckOutcome),
) -> PipelineRun {
    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(checks.len());

    for check in checks {
        let start = Instant::now();
        let result = if ctx.config.is_disabled(check.name) {
            CheckResult::skip("Disabled in configuration")
        } else {
            run_one(ctx, check)
        };
        let outcome = CheckOutcome {
            check: check.name,
            result,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            check = %outcome.check,
            status = %outcome.result.status,
            duration_ms = outcome.duration_ms,
            "check finished"
        );
        on_result(&outcome);
        outcomes.push(outcome);
    }

    PipelineRun {
        branch: ctx.branch.clone(),
        started_at,
        outcomes,
    }
}

/// Run a single check, containing panics and normalizing `pending`.
fn run_one(ctx: &RepoContext, check: &Check) -> CheckResult {
    let result = match catch_unwind(AssertUnwindSafe(|| (check.run)(ctx))) {
        Ok(r) => r,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(check = %check.name, %reason, "check panicked");
            return CheckResult::skip(format!("Check crashed: {reason}"));
        }
    };
    if result.status.is_final() {
        result
    } else {
        CheckResult::skip("Check did not produce a verdict")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
