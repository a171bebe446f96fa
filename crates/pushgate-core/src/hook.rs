//! The `PreToolUse` hook contract with the invoking host.
//!
//! Input is one JSON object on stdin carrying `tool_input.command`. Output is
//! one JSON object on stdout plus an exit code: `0` allows, `2` blocks.
//! Anything that cannot be parsed fails open.

use crate::report::GateDecision;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT: &str = "PreToolUse";
pub const EXIT_ALLOW: i32 = 0;
pub const EXIT_BLOCK: i32 = 2;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Working directory of the host session.
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub tool_input: ToolInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    pub command: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl HookInput {
    pub fn event_name(&self) -> &str {
        self.hook_event_name.as_deref().unwrap_or(DEFAULT_EVENT)
    }
}

/// Parse the host payload. Empty, malformed, or command-less input is `None`,
/// which callers treat as allow.
pub fn parse_input(raw: &str) -> Option<HookInput> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str::<HookInput>(raw) {
        Ok(input) => Some(input),
        Err(e) => {
            tracing::warn!(error = %e, "unparseable hook input; allowing");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    #[serde(rename = "continue")]
    pub continue_: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

impl HookOutput {
    pub fn allow(event: &str, context: impl Into<String>) -> Self {
        Self {
            continue_: true,
            stop_reason: None,
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event.to_string(),
                additional_context: context.into(),
            },
        }
    }

    pub fn block(event: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            continue_: false,
            stop_reason: Some(reason.clone()),
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event.to_string(),
                additional_context: reason,
            },
        }
    }

    /// `allow_context` is used only when the decision is to allow.
    pub fn from_decision(event: &str, decision: &GateDecision, allow_context: &str) -> Self {
        match decision {
            GateDecision::Allow => Self::allow(event, allow_context),
            GateDecision::Block { reason } => Self::block(event, reason.as_str()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.continue_ {
            EXIT_ALLOW
        } else {
            EXIT_BLOCK
        }
    }

    pub fn to_json(&self) -> String {
        // A struct of strings and bools always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"continue":true}"#.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
