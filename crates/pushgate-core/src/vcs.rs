//! Read-only version-control queries.

use crate::error::{PushgateError, Result};
use crate::process::{CommandRunner, Invocation, InvocationOutcome};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CommitRange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRange {
    /// Commits reachable from HEAD but not from `base`.
    Since { base: String },
    /// The most recent `count` commits on HEAD.
    Recent { count: u32 },
}

impl CommitRange {
    pub fn describe(&self) -> String {
        match self {
            CommitRange::Since { base } => format!("{base}..HEAD"),
            CommitRange::Recent { count } => format!("last {count} commits"),
        }
    }
}

// ---------------------------------------------------------------------------
// Vcs
// ---------------------------------------------------------------------------

pub trait Vcs {
    /// Current branch name, or `None` when it cannot be determined.
    fn current_branch(&self) -> Option<String>;

    /// Whether a local branch called `name` exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// Subjects (first lines) of non-merge commits in `range`, newest first.
    fn commit_subjects(&self, range: &CommitRange) -> Result<Vec<String>>;
}

/// Pick the commit range to lint: everything since the first main-line
/// candidate that exists, else the most recent `fallback` commits.
pub fn commit_range(vcs: &dyn Vcs, mainline_candidates: &[String], fallback: u32) -> CommitRange {
    mainline_candidates
        .iter()
        .find(|name| vcs.branch_exists(name))
        .map(|base| CommitRange::Since { base: base.clone() })
        .unwrap_or(CommitRange::Recent { count: fallback })
}

// ---------------------------------------------------------------------------
// GitCli
// ---------------------------------------------------------------------------

/// [`Vcs`] backed by the `git` binary.
pub struct GitCli<'a> {
    runner: &'a dyn CommandRunner,
    root: PathBuf,
    timeout: Duration,
}

impl<'a> GitCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, root: &Path, timeout: Duration) -> Self {
        Self {
            runner,
            root: root.to_path_buf(),
            timeout,
        }
    }

    fn git(&self, args: &[&str]) -> InvocationOutcome {
        let inv = Invocation::new("git", &self.root, self.timeout)
            .args(args.iter().copied())
            .env("GIT_TERMINAL_PROMPT", "0");
        self.runner.run(&inv)
    }
}

impl Vcs for GitCli<'_> {
    fn current_branch(&self) -> Option<String> {
        let outcome = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]);
        if let Some(out) = outcome.success_output() {
            let name = out.trim();
            if !name.is_empty() && name != "HEAD" {
                return Some(name.to_string());
            }
        }
        // Unborn branch (no commits yet): rev-parse fails but symbolic-ref works.
        let outcome = self.git(&["symbolic-ref", "--short", "-q", "HEAD"]);
        outcome
            .success_output()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn branch_exists(&self, name: &str) -> bool {
        let refname = format!("refs/heads/{name}");
        self.git(&["rev-parse", "--verify", "--quiet", &refname])
            .success_output()
            .is_some()
    }

    fn commit_subjects(&self, range: &CommitRange) -> Result<Vec<String>> {
        let mut args = vec!["log".to_string(), "--no-merges".to_string(), "--format=%s".to_string()];
        match range {
            CommitRange::Since { base } => args.push(format!("{base}..HEAD")),
            CommitRange::Recent { count } => args.push(format!("-{count}")),
        }
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        match self.git(&refs) {
            InvocationOutcome::Completed {
                success: true,
                output,
                ..
            } => Ok(output
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            // `git log` on an unborn branch has nothing to lint.
            InvocationOutcome::Completed { output, .. }
                if output.contains("does not have any commits yet") =>
            {
                Ok(Vec::new())
            }
            other => Err(PushgateError::Git {
                command: format!("log {}", range.describe()),
                reason: describe_failure(&other),
            }),
        }
    }
}

fn describe_failure(outcome: &InvocationOutcome) -> String {
    match outcome {
        InvocationOutcome::Completed { code, output, .. } => {
            let first = output.lines().next().unwrap_or("").trim();
            match code {
                Some(c) => format!("exit {c}: {first}"),
                None => format!("terminated by signal: {first}"),
            }
        }
        InvocationOutcome::NotFound { .. } => "git not found on PATH".to_string(),
        InvocationOutcome::TimedOut { after } => format!("timed out after {}s", after.as_secs()),
        InvocationOutcome::Failed { error } => error.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SystemRunner;
    use std::collections::HashSet;
    use tempfile::TempDir;

    struct Branches(HashSet<String>);

    impl Vcs for Branches {
        fn current_branch(&self) -> Option<String> {
            None
        }
        fn branch_exists(&self, name: &str) -> bool {
            self.0.contains(name)
        }
        fn commit_subjects(&self, _range: &CommitRange) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn branches(names: &[&str]) -> Branches {
        Branches(names.iter().map(|s| s.to_string()).collect())
    }

    fn candidates() -> Vec<String> {
        vec!["main".to_string(), "master".to_string()]
    }

    #[test]
    fn range_prefers_main() {
        let range = commit_range(&branches(&["main", "master"]), &candidates(), 10);
        assert_eq!(range, CommitRange::Since { base: "main".into() });
    }

    #[test]
    fn range_falls_back_to_master() {
        let range = commit_range(&branches(&["master"]), &candidates(), 10);
        assert_eq!(range, CommitRange::Since { base: "master".into() });
    }

    #[test]
    fn range_falls_back_to_recent_commits() {
        let range = commit_range(&branches(&["develop"]), &candidates(), 10);
        assert_eq!(range, CommitRange::Recent { count: 10 });
        assert_eq!(range.describe(), "last 10 commits");
    }

    // -----------------------------------------------------------------------
    // Against a real repository
    // -----------------------------------------------------------------------

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args([
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "init.defaultBranch=main",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {args:?} failed: {status:?}");
    }

    fn commit(dir: &Path, subject: &str) {
        git(dir, &["commit", "--allow-empty", "-q", "-m", subject]);
    }

    #[test]
    fn git_cli_reads_branch_and_range() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["checkout", "-q", "-b", "main"]);
        commit(dir.path(), "chore: initial");
        git(dir.path(), &["checkout", "-q", "-b", "feature/login"]);
        commit(dir.path(), "feat(auth): add login");
        commit(dir.path(), "oops fix typo");

        let runner = SystemRunner;
        let vcs = GitCli::new(&runner, dir.path(), Duration::from_secs(10));
        assert_eq!(vcs.current_branch().as_deref(), Some("feature/login"));
        assert!(vcs.branch_exists("main"));
        assert!(!vcs.branch_exists("master"));

        let range = commit_range(&vcs, &candidates(), 10);
        assert_eq!(range, CommitRange::Since { base: "main".into() });
        let subjects = vcs.commit_subjects(&range).unwrap();
        assert_eq!(subjects, vec!["oops fix typo", "feat(auth): add login"]);
    }

    #[test]
    fn git_cli_recent_range_limits_count() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["checkout", "-q", "-b", "feature/x"]);
        for i in 0..3 {
            commit(dir.path(), &format!("feat: change {i}"));
        }
        let runner = SystemRunner;
        let vcs = GitCli::new(&runner, dir.path(), Duration::from_secs(10));
        let subjects = vcs.commit_subjects(&CommitRange::Recent { count: 2 }).unwrap();
        assert_eq!(subjects, vec!["feat: change 2", "feat: change 1"]);
    }

    #[test]
    fn git_cli_unborn_branch() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["checkout", "-q", "-b", "feature/empty"]);
        let runner = SystemRunner;
        let vcs = GitCli::new(&runner, dir.path(), Duration::from_secs(10));
        assert_eq!(vcs.current_branch().as_deref(), Some("feature/empty"));
        let subjects = vcs.commit_subjects(&CommitRange::Recent { count: 10 }).unwrap();
        assert!(subjects.is_empty());
    }

    #[test]
    fn git_cli_outside_repository() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let runner = SystemRunner;
        let vcs = GitCli::new(&runner, dir.path(), Duration::from_secs(10));
        assert_eq!(vcs.current_branch(), None);
        assert!(vcs.commit_subjects(&CommitRange::Recent { count: 10 }).is_err());
    }
}
