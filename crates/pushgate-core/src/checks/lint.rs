use super::{run_and_judge, RepoContext};
use crate::paths;
use crate::probe::probe_lint;
use crate::types::{CheckResult, ToolAvailability};

const ZERO_WARNINGS: &str = "--max-warnings=0";

pub fn check_lint(ctx: &RepoContext) -> CheckResult {
    let manifest = match ctx.require_manifest() {
        Ok(m) => m,
        Err(skip) => return skip,
    };

    let command = match probe_lint(manifest) {
        ToolAvailability::NotConfigured => {
            return CheckResult::skip("No lint script or eslint dependency")
        }
        ToolAvailability::ConfiguredVia(script) => {
            ctx.package_manager.run_script(&script, &[ZERO_WARNINGS])
        }
        // A declared linter that was never installed has nothing to run.
        ToolAvailability::DependencyDetected(tool) if !paths::has_local_bin(&ctx.root, &tool) => {
            return CheckResult::skip(format!("{tool} not installed"))
        }
        ToolAvailability::DependencyDetected(tool) => {
            ctx.package_manager.exec(&tool, &[".", ZERO_WARNINGS])
        }
    };

    let inv = ctx.invocation(command, ctx.config.timeouts.lint());
    run_and_judge(ctx, "Lint", &inv)
}
