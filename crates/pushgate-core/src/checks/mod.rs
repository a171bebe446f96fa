//! The six pre-push checks.
//!
//! Each check is a total function from [`RepoContext`] to [`CheckResult`].
//! Missing configuration and broken toolchains resolve to `skip`; only a
//! real verification failure resolves to `fail`.

mod branch;
mod commits;
mod lint;
mod security;
mod test_suite;
mod typecheck;

pub use branch::check_branch_naming;
pub use commits::{check_commit_messages, invalid_subjects};
pub use lint::check_lint;
pub use security::{check_security, has_severe_findings};
pub use test_suite::check_tests;
pub use typecheck::check_typecheck;

use crate::config::GateConfig;
use crate::manifest::{Manifest, PackageManager};
use crate::process::{truncate_output, CommandRunner, Invocation, InvocationOutcome};
use crate::types::{CheckName, CheckResult};
use crate::vcs::Vcs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// RepoContext
// ---------------------------------------------------------------------------

/// Everything a check may look at. Built once per run; read-only.
pub struct RepoContext<'a> {
    pub root: PathBuf,
    /// `None` when HEAD is detached or git could not be asked.
    pub branch: Option<String>,
    pub config: &'a GateConfig,
    pub manifest: ManifestState,
    pub package_manager: PackageManager,
    pub vcs: &'a dyn Vcs,
    pub runner: &'a dyn CommandRunner,
}

/// Outcome of reading `package.json`.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestState {
    Missing,
    Invalid(String),
    Loaded(Manifest),
}

impl ManifestState {
    pub fn load(root: &Path) -> Self {
        match Manifest::load(root) {
            Ok(Some(m)) => ManifestState::Loaded(m),
            Ok(None) => ManifestState::Missing,
            Err(e) => ManifestState::Invalid(e.to_string()),
        }
    }

    pub fn get(&self) -> Option<&Manifest> {
        match self {
            ManifestState::Loaded(m) => Some(m),
            _ => None,
        }
    }
}

impl<'a> RepoContext<'a> {
    /// Resolve the branch, manifest and package manager for `root` once,
    /// up front. Nothing here fails: unknowns degrade to `None` or defaults.
    pub fn resolve(
        root: &Path,
        config: &'a GateConfig,
        vcs: &'a dyn Vcs,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        let branch = vcs.current_branch();
        let package_manager = config
            .package_manager
            .unwrap_or_else(|| PackageManager::detect(root));
        tracing::debug!(?branch, %package_manager, root = %root.display(), "resolved context");
        Self {
            root: root.to_path_buf(),
            branch,
            config,
            manifest: ManifestState::load(root),
            package_manager,
            vcs,
            runner,
        }
    }

    /// The loaded manifest, or the `skip` result a manifest-dependent check
    /// should return.
    pub fn require_manifest(&self) -> Result<&Manifest, CheckResult> {
        match &self.manifest {
            ManifestState::Loaded(m) => Ok(m),
            ManifestState::Missing => Err(CheckResult::skip("No package.json found")),
            ManifestState::Invalid(e) => {
                Err(CheckResult::skip(format!("Could not read package.json: {e}")))
            }
        }
    }

    pub fn invocation(&self, (program, args): (String, Vec<String>), timeout: Duration) -> Invocation {
        Invocation::new(program, &self.root, timeout).args(args)
    }
}

// ---------------------------------------------------------------------------
// Check table
// ---------------------------------------------------------------------------

/// A fn-pointer check.
pub struct Check {
    pub name: CheckName,
    pub run: fn(&RepoContext) -> CheckResult,
}

/// All checks in fixed execution order.
pub fn all_checks() -> [Check; 6] {
    [
        Check {
            name: CheckName::BranchNaming,
            run: check_branch_naming,
        },
        Check {
            name: CheckName::CommitLint,
            run: check_commit_messages,
        },
        Check {
            name: CheckName::Lint,
            run: check_lint,
        },
        Check {
            name: CheckName::Typecheck,
            run: check_typecheck,
        },
        Check {
            name: CheckName::Tests,
            run: check_tests,
        },
        Check {
            name: CheckName::Security,
            run: check_security,
        },
    ]
}

// ---------------------------------------------------------------------------
// Shared outcome mapping
// ---------------------------------------------------------------------------

/// Map an execution fault to a `skip`, or `None` if the command completed.
pub(crate) fn fault_to_skip(tool: &str, outcome: &InvocationOutcome) -> Option<CheckResult> {
    match outcome {
        InvocationOutcome::Completed { .. } => None,
        InvocationOutcome::NotFound { program } => Some(CheckResult::skip(format!(
            "{tool} could not run: {program} not found on PATH"
        ))),
        InvocationOutcome::TimedOut { after } => Some(CheckResult::skip(format!(
            "{tool} timed out after {}s",
            after.as_secs()
        ))),
        InvocationOutcome::Failed { error } => {
            Some(CheckResult::skip(format!("{tool} could not run: {error}")))
        }
    }
}

/// Run `inv` and judge it by exit code: zero passes, nonzero fails with the
/// captured output. Execution faults skip.
pub(crate) fn run_and_judge(ctx: &RepoContext, tool: &str, inv: &Invocation) -> CheckResult {
    let outcome = ctx.runner.run(inv);
    if let Some(skip) = fault_to_skip(tool, &outcome) {
        return skip;
    }
    match outcome {
        InvocationOutcome::Completed { success: true, .. } => CheckResult::pass(),
        InvocationOutcome::Completed { code, output, .. } => {
            let header = match code {
                Some(c) => format!("`{}` exited with code {c}", inv.display()),
                None => format!("`{}` was terminated by a signal", inv.display()),
            };
            let body = truncate_output(&output, ctx.config.max_output_chars);
            if body.is_empty() {
                CheckResult::fail(header)
            } else {
                CheckResult::fail(format!("{header}\n{body}"))
            }
        }
        _ => CheckResult::skip(format!("{tool} could not run")),
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::types::CheckStatus;
    use tempfile::TempDir;

    #[test]
    fn check_table_matches_fixed_order() {
        let names: Vec<CheckName> = all_checks().iter().map(|c| c.name).collect();
        assert_eq!(names, CheckName::all());
    }

    #[test]
    fn fault_mapping_keeps_causes_distinct() {
        let missing = fault_to_skip("Lint", &InvocationOutcome::NotFound { program: "npm".into() })
            .unwrap();
        let hung = fault_to_skip(
            "Lint",
            &InvocationOutcome::TimedOut {
                after: Duration::from_secs(60),
            },
        )
        .unwrap();
        assert_eq!(missing.status, CheckStatus::Skip);
        assert_eq!(hung.status, CheckStatus::Skip);
        assert!(missing.message.contains("not found"));
        assert!(hung.message.contains("timed out after 60s"));
        assert_ne!(missing.message, hung.message);
        assert!(fault_to_skip("Lint", &ok("")).is_none());
    }

    #[test]
    fn run_and_judge_truncates_failure_output() {
        let dir = TempDir::new().unwrap();
        let config = GateConfig {
            max_output_chars: 10,
            ..GateConfig::default()
        };
        let vcs = FakeVcs::on_branch("feature/x");
        let runner = FakeRunner::new().on("npm run lint", exit(1, &"e".repeat(100)));
        let ctx = context(dir.path(), &config, Some("{}"), &vcs, &runner);
        let inv = ctx.invocation(
            ("npm".into(), vec!["run".into(), "lint".into()]),
            Duration::from_secs(1),
        );
        let result = run_and_judge(&ctx, "Lint", &inv);
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.starts_with("`npm run lint` exited with code 1"));
        assert!(result.message.contains(&"e".repeat(10)));
        assert!(!result.message.contains(&"e".repeat(11)));
    }

    #[test]
    fn resolve_leaves_branch_unset_and_detects_manager() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("yarn.lock"), "").unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"scripts":{"lint":"x"}}"#).unwrap();
        let config = GateConfig::default();
        let vcs = FakeVcs::default();
        let runner = FakeRunner::new();
        let ctx = RepoContext::resolve(dir.path(), &config, &vcs, &runner);
        assert_eq!(ctx.branch, None);
        assert_eq!(ctx.package_manager, PackageManager::Yarn);
        assert!(ctx.manifest.get().unwrap().has_script("lint"));
    }

    #[test]
    fn resolve_honors_configured_package_manager() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("yarn.lock"), "").unwrap();
        let config = GateConfig {
            package_manager: Some(PackageManager::Bun),
            ..GateConfig::default()
        };
        let vcs = FakeVcs::on_branch("feature/x");
        let runner = FakeRunner::new();
        let ctx = RepoContext::resolve(dir.path(), &config, &vcs, &runner);
        assert_eq!(ctx.package_manager, PackageManager::Bun);
        assert_eq!(ctx.manifest, ManifestState::Missing);
    }

    #[test]
    fn require_manifest_skips_on_missing_and_invalid() {
        let dir = TempDir::new().unwrap();
        let config = GateConfig::default();
        let vcs = FakeVcs::on_branch("feature/x");
        let runner = FakeRunner::new();

        let ctx = context(dir.path(), &config, None, &vcs, &runner);
        let skip = ctx.require_manifest().unwrap_err();
        assert_eq!(skip.status, CheckStatus::Skip);
        assert_eq!(skip.message, "No package.json found");

        let ctx = context(dir.path(), &config, Some("{ broken"), &vcs, &runner);
        let skip = ctx.require_manifest().unwrap_err();
        assert!(skip.message.starts_with("Could not read package.json"));
    }
}
