use crate::error::Result;
use crate::manifest::PackageManager;
use crate::paths;
use crate::types::CheckName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

/// Per-invocation timeouts, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_git_timeout")]
    pub git: u64,
    #[serde(default = "default_lint_timeout")]
    pub lint: u64,
    #[serde(default = "default_typecheck_timeout")]
    pub typecheck: u64,
    #[serde(default = "default_tests_timeout")]
    pub tests: u64,
    #[serde(default = "default_security_timeout")]
    pub security: u64,
}

fn default_git_timeout() -> u64 {
    10
}

fn default_lint_timeout() -> u64 {
    60
}

fn default_typecheck_timeout() -> u64 {
    120
}

fn default_tests_timeout() -> u64 {
    300
}

fn default_security_timeout() -> u64 {
    60
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            git: default_git_timeout(),
            lint: default_lint_timeout(),
            typecheck: default_typecheck_timeout(),
            tests: default_tests_timeout(),
            security: default_security_timeout(),
        }
    }
}

impl Timeouts {
    pub fn git(&self) -> Duration {
        Duration::from_secs(self.git)
    }

    pub fn lint(&self) -> Duration {
        Duration::from_secs(self.lint)
    }

    pub fn typecheck(&self) -> Duration {
        Duration::from_secs(self.typecheck)
    }

    pub fn tests(&self) -> Duration {
        Duration::from_secs(self.tests)
    }

    pub fn security(&self) -> Duration {
        Duration::from_secs(self.security)
    }
}

// ---------------------------------------------------------------------------
// GateConfig (top-level)
// ---------------------------------------------------------------------------

/// Contents of `.pushgate.yaml`. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_protected_branches")]
    pub protected_branches: Vec<String>,
    #[serde(default = "default_branch_prefixes")]
    pub branch_prefixes: Vec<String>,
    #[serde(default = "default_commit_types")]
    pub commit_types: Vec<String>,
    /// Main-line branch names tried in order when computing the commit range.
    #[serde(default = "default_mainline_candidates")]
    pub mainline_candidates: Vec<String>,
    /// How many recent commits to lint when no main-line branch exists.
    #[serde(default = "default_fallback_commit_count")]
    pub fallback_commit_count: u32,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
    #[serde(default = "default_security_output_chars")]
    pub security_output_chars: usize,
    /// Checks listed here report as skipped without running.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_checks: Vec<CheckName>,
    /// Overrides lockfile-based package manager detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
    #[serde(default = "default_typecheck_scripts")]
    pub typecheck_scripts: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_protected_branches() -> Vec<String> {
    strings(&["main", "master", "develop"])
}

fn default_branch_prefixes() -> Vec<String> {
    strings(&[
        "feature", "bugfix", "hotfix", "release", "chore", "docs", "refactor", "test",
    ])
}

fn default_commit_types() -> Vec<String> {
    strings(&[
        "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore",
        "revert",
    ])
}

fn default_mainline_candidates() -> Vec<String> {
    strings(&["main", "master"])
}

fn default_fallback_commit_count() -> u32 {
    10
}

fn default_max_output_chars() -> usize {
    2000
}

fn default_security_output_chars() -> usize {
    500
}

fn default_typecheck_scripts() -> Vec<String> {
    strings(&["typecheck", "type-check"])
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            protected_branches: default_protected_branches(),
            branch_prefixes: default_branch_prefixes(),
            commit_types: default_commit_types(),
            mainline_candidates: default_mainline_candidates(),
            fallback_commit_count: default_fallback_commit_count(),
            timeouts: Timeouts::default(),
            max_output_chars: default_max_output_chars(),
            security_output_chars: default_security_output_chars(),
            disabled_checks: Vec::new(),
            package_manager: None,
            typecheck_scripts: default_typecheck_scripts(),
        }
    }
}

impl GateConfig {
    /// Load `.pushgate.yaml` from `root`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: GateConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`GateConfig::load`], but a broken file degrades to defaults.
    pub fn load_or_default(root: &Path) -> Self {
        match Self::load(root) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable {}", paths::CONFIG_FILE);
                Self::default()
            }
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn is_disabled(&self, check: CheckName) -> bool {
        self.disabled_checks.contains(&check)
    }

    /// `^(feature|bugfix|...)/[a-z0-9._-]+$`
    pub fn branch_pattern(&self) -> String {
        format!(r"^({})/[a-z0-9._-]+$", alternation(&self.branch_prefixes))
    }

    /// `^(feat|fix|...)(\(scope\))?!?: .+$`
    pub fn commit_pattern(&self) -> String {
        format!(r"^({})(\([^()]+\))?!?: .+$", alternation(&self.commit_types))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.branch_prefixes.is_empty() {
            warnings.push(error("branch_prefixes is empty; every branch would fail naming"));
        }
        for prefix in &self.branch_prefixes {
            if prefix.contains('/') || prefix.trim().is_empty() {
                warnings.push(error(format!(
                    "branch prefix '{prefix}' must be a single non-empty path segment"
                )));
            }
        }

        if self.commit_types.is_empty() {
            warnings.push(error("commit_types is empty; every commit would fail linting"));
        }

        // A protected branch that also matches the naming pattern is never linted by name.
        if let Ok(re) = Regex::new(&self.branch_pattern()) {
            for branch in &self.protected_branches {
                if re.is_match(branch) {
                    warnings.push(warning(format!(
                        "protected branch '{branch}' also matches the branch naming pattern"
                    )));
                }
            }
        }

        let t = &self.timeouts;
        for (name, secs) in [
            ("git", t.git),
            ("lint", t.lint),
            ("typecheck", t.typecheck),
            ("tests", t.tests),
            ("security", t.security),
        ] {
            if secs == 0 {
                warnings.push(warning(format!(
                    "timeouts.{name} is 0; every {name} invocation will time out immediately"
                )));
            }
        }

        if self.fallback_commit_count == 0 {
            warnings.push(warning(
                "fallback_commit_count is 0; commit lint is skipped when no main-line branch exists",
            ));
        }

        if self.mainline_candidates.is_empty() {
            warnings.push(warning(
                "mainline_candidates is empty; commit lint always uses the fallback range",
            ));
        }

        warnings
    }
}

fn alternation(items: &[String]) -> String {
    items
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}

fn warning(message: impl Into<String>) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Warning,
        message: message.into(),
    }
}

fn error(message: impl Into<String>) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Error,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
