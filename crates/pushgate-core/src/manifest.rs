use crate::error::{PushgateError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Placeholder test script written by `npm init`.
const NPM_TEST_PLACEHOLDER: &str = "no test specified";

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// The parts of `package.json` the checks care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    /// Read `package.json` from `root`. `Ok(None)` when there is none.
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = paths::manifest_path(root);
        if !path.is_file() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        let manifest: Manifest = serde_json::from_str(&data)?;
        Ok(Some(manifest))
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Declared in either `dependencies` or `devDependencies`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// True for the `echo "Error: no test specified" && exit 1` stub.
    pub fn is_placeholder_test(script: &str) -> bool {
        script.contains(NPM_TEST_PLACEHOLDER)
    }
}

// ---------------------------------------------------------------------------
// PackageManager
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Detect from lockfiles, defaulting to npm.
    pub fn detect(root: &Path) -> Self {
        if root.join(paths::PNPM_LOCK).exists() {
            PackageManager::Pnpm
        } else if root.join(paths::YARN_LOCK).exists() {
            PackageManager::Yarn
        } else if paths::BUN_LOCKS.iter().any(|f| root.join(f).exists()) {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Program and arguments that run the manifest script `script`,
    /// forwarding `extra` to it.
    pub fn run_script(self, script: &str, extra: &[&str]) -> (String, Vec<String>) {
        let mut args = vec!["run".to_string(), script.to_string()];
        if !extra.is_empty() {
            // npm swallows flags meant for the script unless they follow `--`.
            if self == PackageManager::Npm {
                args.push("--".to_string());
            }
            args.extend(extra.iter().map(|s| s.to_string()));
        }
        (self.as_str().to_string(), args)
    }

    /// Program and arguments that execute a locally installed tool binary.
    pub fn exec(self, tool: &str, args: &[&str]) -> (String, Vec<String>) {
        let (program, mut prefix) = match self {
            PackageManager::Npm => ("npx", vec!["--no-install".to_string()]),
            PackageManager::Pnpm => ("pnpm", vec!["exec".to_string()]),
            PackageManager::Yarn => ("yarn", Vec::new()),
            PackageManager::Bun => ("bunx", Vec::new()),
        };
        prefix.push(tool.to_string());
        prefix.extend(args.iter().map(|s| s.to_string()));
        (program.to_string(), prefix)
    }

    /// Program and arguments for a dependency audit limited to high/critical.
    pub fn audit(self) -> (String, Vec<String>) {
        let args: &[&str] = match self {
            PackageManager::Npm => &["audit", "--audit-level=high"],
            PackageManager::Pnpm => &["audit", "--audit-level", "high"],
            PackageManager::Yarn => &["audit", "--level", "high"],
            PackageManager::Bun => &["audit", "--audit-level=high"],
        };
        (
            self.as_str().to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageManager {
    type Err = PushgateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            _ => Err(PushgateError::UnknownPackageManager(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
