use super::RepoContext;
use crate::types::CheckResult;
use crate::vcs::commit_range;
use regex::Regex;

/// Subjects that do not match `pattern`, in the order given.
pub fn invalid_subjects<'s>(subjects: &'s [String], pattern: &Regex) -> Vec<&'s str> {
    subjects
        .iter()
        .map(String::as_str)
        .filter(|s| !pattern.is_match(s))
        .collect()
}

pub fn check_commit_messages(ctx: &RepoContext) -> CheckResult {
    let cfg = ctx.config;
    let range = commit_range(ctx.vcs, &cfg.mainline_candidates, cfg.fallback_commit_count);

    let subjects = match ctx.vcs.commit_subjects(&range) {
        Ok(s) => s,
        Err(e) => return CheckResult::skip(format!("Could not list commits: {e}")),
    };
    if subjects.is_empty() {
        return CheckResult::skip(format!("No commits to check ({})", range.describe()));
    }

    let pattern = cfg.commit_pattern();
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => return CheckResult::skip(format!("Invalid commit pattern '{pattern}': {e}")),
    };

    let invalid = invalid_subjects(&subjects, &re);
    if invalid.is_empty() {
        return CheckResult::pass();
    }

    let mut message = String::from("Invalid commit messages:");
    for subject in &invalid {
        message.push_str("\n  - ");
        message.push_str(subject);
    }
    message.push_str("\nExpected format: type(scope): description");
    message.push_str(&format!("\nAllowed types: {}", cfg.commit_types.join(", ")));
    CheckResult::fail(message)
}
