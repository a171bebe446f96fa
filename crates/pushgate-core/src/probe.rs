//! Capability probes: is a check's tool configured for this project, and how?
//!
//! Probes only inspect the manifest and the filesystem. They never run
//! anything, so "does this check apply" can be tested apart from "did it pass".

use crate::manifest::Manifest;
use crate::paths;
use crate::types::ToolAvailability;
use std::path::Path;

pub const LINT_SCRIPT: &str = "lint";
pub const LINT_TOOL: &str = "eslint";
pub const TEST_SCRIPT: &str = "test";
pub const TYPESCRIPT_BIN: &str = "tsc";

/// A `lint` script wins over a bare `eslint` dependency.
pub fn probe_lint(manifest: &Manifest) -> ToolAvailability {
    if manifest.has_script(LINT_SCRIPT) {
        ToolAvailability::ConfiguredVia(LINT_SCRIPT.to_string())
    } else if manifest.has_dependency(LINT_TOOL) {
        ToolAvailability::DependencyDetected(LINT_TOOL.to_string())
    } else {
        ToolAvailability::NotConfigured
    }
}

/// The first of `scripts` present in the manifest wins; otherwise a
/// TypeScript compiler reachable from `root` counts as a detected dependency.
/// A `typescript` entry in the manifest alone does not: on a fresh clone
/// without `node_modules` there is nothing to run.
pub fn probe_typecheck(
    root: &Path,
    manifest: Option<&Manifest>,
    scripts: &[String],
) -> ToolAvailability {
    if let Some(m) = manifest {
        if let Some(script) = scripts.iter().find(|s| m.has_script(s)) {
            return ToolAvailability::ConfiguredVia(script.clone());
        }
    }
    if typescript_installed(root) {
        ToolAvailability::DependencyDetected(TYPESCRIPT_BIN.to_string())
    } else {
        ToolAvailability::NotConfigured
    }
}

/// The `test` script, unless it is npm's placeholder.
pub fn probe_tests(manifest: &Manifest) -> ToolAvailability {
    match manifest.script(TEST_SCRIPT) {
        Some(script) if !Manifest::is_placeholder_test(script) => {
            ToolAvailability::ConfiguredVia(TEST_SCRIPT.to_string())
        }
        _ => ToolAvailability::NotConfigured,
    }
}

fn typescript_installed(root: &Path) -> bool {
    paths::has_local_bin(root, TYPESCRIPT_BIN) || which::which(TYPESCRIPT_BIN).is_ok()
}
