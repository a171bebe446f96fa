use super::{run_and_judge, RepoContext};
use crate::paths;
use crate::probe::probe_typecheck;
use crate::types::{CheckResult, ToolAvailability};

pub fn check_typecheck(ctx: &RepoContext) -> CheckResult {
    if !paths::tsconfig_path(&ctx.root).is_file() {
        return CheckResult::skip(format!("No {} found", paths::TSCONFIG_FILE));
    }
    if let super::ManifestState::Invalid(e) = &ctx.manifest {
        return CheckResult::skip(format!("Could not read package.json: {e}"));
    }

    let availability = probe_typecheck(
        &ctx.root,
        ctx.manifest.get(),
        &ctx.config.typecheck_scripts,
    );
    let command = match availability {
        ToolAvailability::NotConfigured => return CheckResult::skip("TypeScript not installed"),
        ToolAvailability::ConfiguredVia(script) => ctx.package_manager.run_script(&script, &[]),
        ToolAvailability::DependencyDetected(tool) => {
            ctx.package_manager.exec(&tool, &["--noEmit"])
        }
    };

    let inv = ctx.invocation(command, ctx.config.timeouts.typecheck());
    run_and_judge(ctx, "Type check", &inv)
}
