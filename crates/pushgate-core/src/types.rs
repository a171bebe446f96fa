use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CheckName
// ---------------------------------------------------------------------------

/// The fixed set of pre-push checks, in execution and report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckName {
    BranchNaming,
    CommitLint,
    Lint,
    Typecheck,
    Tests,
    Security,
}

impl CheckName {
    pub fn all() -> &'static [CheckName] {
        &[
            CheckName::BranchNaming,
            CheckName::CommitLint,
            CheckName::Lint,
            CheckName::Typecheck,
            CheckName::Tests,
            CheckName::Security,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckName::BranchNaming => "branchNaming",
            CheckName::CommitLint => "commitLint",
            CheckName::Lint => "lint",
            CheckName::Typecheck => "typecheck",
            CheckName::Tests => "tests",
            CheckName::Security => "security",
        }
    }

    /// Human label used in the report.
    pub fn label(self) -> &'static str {
        match self {
            CheckName::BranchNaming => "Branch naming",
            CheckName::CommitLint => "Commit messages",
            CheckName::Lint => "Lint",
            CheckName::Typecheck => "Type check",
            CheckName::Tests => "Tests",
            CheckName::Security => "Security audit",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckName {
    type Err = crate::error::PushgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckName::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::error::PushgateError::UnknownCheck(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Initial state only; never appears in a finished report.
    Pending,
    Pass,
    Fail,
    Skip,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pending => "pending",
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Skip => "skip",
        }
    }

    pub fn is_final(self) -> bool {
        !matches!(self, CheckStatus::Pending)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// Empty or informational for pass, diagnostic text for fail, reason for skip.
    #[serde(default)]
    pub message: String,
}

impl CheckResult {
    pub fn pending() -> Self {
        Self {
            status: CheckStatus::Pending,
            message: String::new(),
        }
    }

    pub fn pass() -> Self {
        Self {
            status: CheckStatus::Pass,
            message: String::new(),
        }
    }

    pub fn pass_with(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }

    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skip,
            message: message.into(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }
}

// ---------------------------------------------------------------------------
// ToolAvailability
// ---------------------------------------------------------------------------

/// Whether a check's tool is set up for this project, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "via", rename_all = "snake_case")]
pub enum ToolAvailability {
    NotConfigured,
    /// A manifest script with this name runs the tool.
    ConfiguredVia(String),
    /// No script, but the tool itself is a declared dependency.
    DependencyDetected(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_order_is_fixed() {
        let names: Vec<&str> = CheckName::all().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            ["branchNaming", "commitLint", "lint", "typecheck", "tests", "security"]
        );
    }

    #[test]
    fn check_name_serializes_camel_case() {
        let json = serde_json::to_string(&CheckName::BranchNaming).unwrap();
        assert_eq!(json, "\"branchNaming\"");
        let parsed: CheckName = serde_json::from_str("\"commitLint\"").unwrap();
        assert_eq!(parsed, CheckName::CommitLint);
    }

    #[test]
    fn check_name_from_str_matches_serde() {
        for name in CheckName::all() {
            let parsed: CheckName = name.as_str().parse().unwrap();
            assert_eq!(parsed, *name);
        }
        assert!("bogus".parse::<CheckName>().is_err());
    }

    #[test]
    fn pending_is_not_final() {
        assert!(!CheckStatus::Pending.is_final());
        assert!(CheckStatus::Pass.is_final());
        assert!(CheckStatus::Fail.is_final());
        assert!(CheckStatus::Skip.is_final());
    }

    #[test]
    fn tool_availability_json_tagged() {
        let json = serde_json::to_string(&ToolAvailability::ConfiguredVia("lint".into())).unwrap();
        assert!(json.contains("\"type\":\"configured_via\""));
        assert!(json.contains("\"via\":\"lint\""));
    }
}
