use pushgate_core::paths::find_repo_root;
use std::path::{Path, PathBuf};

/// Resolve the repository root.
///
/// Priority:
/// 1. `--root` flag / `PUSHGATE_ROOT` env var (passed in as `explicit`)
/// 2. Nearest `.git` at or above `hint` (the hook payload's `cwd`), if it is a directory
/// 3. Nearest `.git` at or above the current directory
/// 4. The starting directory itself
pub fn resolve_root(explicit: Option<&Path>, hint: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let start = hint
        .filter(|p| p.is_dir())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    find_repo_root(&start).unwrap_or(start)
}
