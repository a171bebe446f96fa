use super::RepoContext;
use crate::types::CheckResult;
use regex::Regex;

pub fn check_branch_naming(ctx: &RepoContext) -> CheckResult {
    let Some(branch) = ctx.branch.as_deref() else {
        return CheckResult::skip("Could not determine the current branch");
    };
    if ctx.config.protected_branches.iter().any(|b| b == branch) {
        return CheckResult::skip(format!("Protected branch: {branch}"));
    }

    let pattern = ctx.config.branch_pattern();
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => return CheckResult::skip(format!("Invalid branch pattern '{pattern}': {e}")),
    };
    if re.is_match(branch) {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!(
            "Invalid branch name '{branch}'. Expected pattern: {pattern}"
        ))
    }
}
