use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = ".pushgate.yaml";
pub const MANIFEST_FILE: &str = "package.json";
pub const TSCONFIG_FILE: &str = "tsconfig.json";
pub const NODE_BIN_DIR: &str = "node_modules/.bin";

pub const PNPM_LOCK: &str = "pnpm-lock.yaml";
pub const YARN_LOCK: &str = "yarn.lock";
pub const BUN_LOCKS: &[&str] = &["bun.lockb", "bun.lock"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

pub fn tsconfig_path(root: &Path) -> PathBuf {
    root.join(TSCONFIG_FILE)
}

/// Location of a locally installed node tool (`node_modules/.bin/<tool>`).
pub fn local_bin(root: &Path, tool: &str) -> PathBuf {
    root.join(NODE_BIN_DIR).join(tool)
}

/// True if `node_modules/.bin` holds `tool` (or its `.cmd` shim on Windows).
pub fn has_local_bin(root: &Path, tool: &str) -> bool {
    local_bin(root, tool).exists()
        || (cfg!(windows) && root.join(NODE_BIN_DIR).join(format!("{tool}.cmd")).exists())
}

/// Walk upward from `start` to the nearest directory containing `.git`.
///
/// `.git` may be a directory or, in worktrees and submodules, a file.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
