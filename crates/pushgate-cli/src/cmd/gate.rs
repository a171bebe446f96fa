use pushgate_core::checks::RepoContext;
use pushgate_core::config::GateConfig;
use pushgate_core::pipeline::{self, PipelineRun};
use pushgate_core::process::SystemRunner;
use pushgate_core::report;
use pushgate_core::vcs::GitCli;
use std::path::Path;

/// Run every check against `root`, writing the report to stderr as it goes.
///
/// A broken `.pushgate.yaml` falls back to defaults rather than blocking.
pub fn execute(root: &Path) -> PipelineRun {
    let config = GateConfig::load_or_default(root);
    let runner = SystemRunner;
    let vcs = GitCli::new(&runner, root, config.timeouts.git());
    let ctx = RepoContext::resolve(root, &config, &vcs, &runner);

    eprintln!("{}", report::render_header(ctx.branch.as_deref()));
    let run = pipeline::run(&ctx, |outcome| {
        eprintln!("{}", report::progress_line(outcome));
    });
    eprintln!("{}", report::render_summary(&run));
    run
}
