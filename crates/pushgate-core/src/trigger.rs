//! Decides whether a shell command is a `git push` that needs gating.
//!
//! This is a syntactic filter, not a shell parser. It looks for the word
//! `git`, optionally followed by global options (`-C dir`, `--no-pager`,
//! `-c key=value`), followed by the word `push`.

use regex::Regex;
use std::sync::OnceLock;

static PUSH_RE: OnceLock<Regex> = OnceLock::new();

fn push_re() -> &'static Regex {
    PUSH_RE.get_or_init(|| {
        // Each global option is a dash-prefixed word with at most one value word.
        // Quotes count as boundaries so `sh -c 'git push'` is gated too.
        Regex::new(
            r#"(?i)(?:^|[\s;&|(`/"'])git(?:\s+-{1,2}\S+(?:\s+[^\s-]\S*)?)*\s+push(?:$|[\s;&|)`"'])"#,
        )
        .unwrap()
    })
}

/// True if `command` invokes `git push` anywhere.
pub fn is_push_command(command: &str) -> bool {
    push_re().is_match(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_push_triggers() {
        assert!(is_push_command("git push"));
    }

    #[test]
    fn push_with_arguments_triggers() {
        assert!(is_push_command("git push origin feature/x --force"));
        assert!(is_push_command("git push -u origin HEAD"));
    }

    #[test]
    fn case_insensitive() {
        assert!(is_push_command("GIT PUSH origin main"));
        assert!(is_push_command("Git Push"));
    }

    #[test]
    fn chained_commands_trigger() {
        assert!(is_push_command("npm test && git push"));
        assert!(is_push_command("git add . ; git commit -m 'x'; git push origin main"));
        assert!(is_push_command("cd repo && (git push)"));
    }

    #[test]
    fn quoted_pushes_trigger() {
        assert!(is_push_command(r#"bash -c "git push origin main""#));
        assert!(is_push_command("sh -c 'git push'"));
        assert!(is_push_command(r#"eval "git push""#));
        assert!(is_push_command(r#"ssh host "cd repo && git push --tags""#));
    }

    #[test]
    fn global_options_before_push_trigger() {
        assert!(is_push_command("git -C ../repo push"));
        assert!(is_push_command("git --no-pager push origin"));
        assert!(is_push_command("git -c core.hooksPath=/dev/null push"));
    }

    #[test]
    fn absolute_git_path_triggers() {
        assert!(is_push_command("/usr/bin/git push origin main"));
    }

    #[test]
    fn unrelated_push_substrings_do_not_trigger() {
        assert!(!is_push_command("./pushit.sh"));
        assert!(!is_push_command("bash scripts/push.sh"));
        assert!(!is_push_command("docker push my/image"));
        assert!(!is_push_command(r#"bash -c "./pushit.sh""#));
        assert!(!is_push_command("git commit -m 'push'"));
    }

    #[test]
    fn other_git_commands_do_not_trigger() {
        assert!(!is_push_command("git status"));
        assert!(!is_push_command("git commit -m push"));
        assert!(!is_push_command("git pushed"));
        assert!(!is_push_command("git log --grep push"));
    }

    #[test]
    fn git_as_part_of_a_word_does_not_trigger() {
        assert!(!is_push_command("legit push"));
        assert!(!is_push_command("mygit push"));
    }

    #[test]
    fn empty_command_does_not_trigger() {
        assert!(!is_push_command(""));
        assert!(!is_push_command("   "));
    }
}
