use super::{run_and_judge, RepoContext};
use crate::probe::probe_tests;
use crate::types::{CheckResult, ToolAvailability};

pub fn check_tests(ctx: &RepoContext) -> CheckResult {
    let manifest = match ctx.require_manifest() {
        Ok(m) => m,
        Err(skip) => return skip,
    };

    let script = match probe_tests(manifest) {
        ToolAvailability::ConfiguredVia(script) => script,
        _ => return CheckResult::skip("No test script configured"),
    };

    let inv = ctx
        .invocation(
            ctx.package_manager.run_script(&script, &[]),
            ctx.config.timeouts.tests(),
        )
        .env("CI", "true");
    run_and_judge(ctx, "Tests", &inv)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::config::GateConfig;
    use crate::types::CheckStatus;
    use std::time::Duration;
    use tempfile::TempDir;

    fn run(manifest: Option<&str>, runner: &FakeRunner) -> CheckResult {
        let dir = TempDir::new().unwrap();
        let config = GateConfig::default();
        let vcs = FakeVcs::on_branch("feature/x");
        let ctx = context(dir.path(), &config, manifest, &vcs, runner);
        check_tests(&ctx)
    }

    #[test]
    fn placeholder_script_skips() {
        let runner = FakeRunner::new();
        let r = run(
            Some(r#"{"scripts":{"test":"echo \"Error: no test specified\" && exit 1"}}"#),
            &runner,
        );
        assert_eq!(r.status, CheckStatus::Skip);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn no_manifest_skips() {
        let runner = FakeRunner::new();
        assert_eq!(run(None, &runner).status, CheckStatus::Skip);
    }

    #[test]
    fn runs_in_ci_mode_with_five_minute_timeout() {
        let runner = FakeRunner::new().on("npm run test", ok("42 passing"));
        let r = run(Some(r#"{"scripts":{"test":"mocha"}}"#), &runner);
        assert_eq!(r.status, CheckStatus::Pass);
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].timeout, Duration::from_secs(300));
        assert!(calls[0].env.contains(&("CI".to_string(), "true".to_string())));
    }

    #[test]
    fn failing_tests_fail_with_output() {
        let runner = FakeRunner::new().on("npm run test", exit(1, "1 failing\n  AssertionError"));
        let r = run(Some(r#"{"scripts":{"test":"mocha"}}"#), &runner);
        assert_eq!(r.status, CheckStatus::Fail);
        assert!(r.message.contains("AssertionError"));
    }
}
