use crate::root::resolve_root;
use pushgate_core::hook::{parse_input, HookOutput, DEFAULT_EVENT};
use pushgate_core::report;
use pushgate_core::trigger::is_push_command;
use std::io::{Read, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Read the host payload from stdin, gate it, print the JSON answer, and
/// return the exit code. Never fails: anything unexpected allows.
pub fn run(explicit_root: Option<&Path>) -> i32 {
    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        tracing::warn!(error = %e, "could not read hook input; allowing");
        raw.clear();
    }

    let output = match catch_unwind(AssertUnwindSafe(|| evaluate(&raw, explicit_root))) {
        Ok(out) => out,
        Err(_) => {
            tracing::warn!("pre-push gate crashed; allowing");
            HookOutput::allow(DEFAULT_EVENT, "")
        }
    };

    emit(&mut std::io::stdout().lock(), &output);
    output.exit_code()
}

/// Write the answer; a host that already closed our stdout still gets the exit code.
fn emit(out: &mut impl Write, output: &HookOutput) {
    if let Err(e) = writeln!(out, "{}", output.to_json()).and_then(|()| out.flush()) {
        tracing::warn!(error = %e, "could not write hook output");
    }
}

fn evaluate(raw: &str, explicit_root: Option<&Path>) -> HookOutput {
    let Some(input) = parse_input(raw) else {
        return HookOutput::allow(DEFAULT_EVENT, "");
    };
    let event = input.event_name().to_string();

    if !is_push_command(&input.tool_input.command) {
        tracing::debug!(command = %input.tool_input.command, "not a push; passing through");
        return HookOutput::allow(&event, "");
    }

    let root = resolve_root(explicit_root, input.cwd.as_deref().map(Path::new));
    tracing::info!(root = %root.display(), "gating git push");

    let run = super::gate::execute(&root);
    let decision = report::decide(&run);
    HookOutput::from_decision(&event, &decision, &report::allow_context(&run))
}
