use crate::output::print_json;
use crate::root::resolve_root;
use pushgate_core::hook::{EXIT_ALLOW, EXIT_BLOCK};
use pushgate_core::report::RunReport;
use std::path::Path;

/// Run the pipeline directly, e.g. from a git `pre-push` hook.
pub fn run(explicit_root: Option<&Path>, json: bool) -> anyhow::Result<i32> {
    let root = resolve_root(explicit_root, None);
    let report = RunReport::new(super::gate::execute(&root));

    if json {
        print_json(&report)?;
    }

    Ok(if report.gate.is_allow() {
        EXIT_ALLOW
    } else {
        EXIT_BLOCK
    })
}
