use serde::{Deserialize, Serialize};

/// Capability surface of the attached bridge object, mirrored into state so
/// guard decisions stay independent of the JS handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCapabilities {
    pub has_expand: bool,
    pub has_close: bool,
}

/// How the bridge handle was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachRoute {
    FreshLoad,
    AlreadyPresent,
}

impl AttachRoute {
    pub fn label(self) -> &'static str {
        match self {
            AttachRoute::FreshLoad => "fresh_load",
            AttachRoute::AlreadyPresent => "already_present",
        }
    }
}

/// The two ways bridge acquisition can fail. Both are surfaced as display
/// text and leave the page in its degraded no-bridge mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeLoadFailure {
    #[error("Failed to load Telegram Web App SDK script.")]
    ScriptLoadFailed,
    #[error("Telegram Web App SDK not found after loading.")]
    EntryPointMissing,
}

/// Next move for the loader given what is already in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    /// No script tag yet: insert it and wait for load or error.
    InsertScript,
    /// Script tag and global entry point both present: capture immediately.
    AttachExisting,
    /// Script tag present but the entry point has not appeared, so a load is
    /// still in flight. Its callbacks will finish the job.
    AwaitPendingLoad,
}

pub fn plan_bridge_load(script_present: bool, entry_point_present: bool) -> LoadStep {
    if !script_present {
        LoadStep::InsertScript
    } else if entry_point_present {
        LoadStep::AttachExisting
    } else {
        LoadStep::AwaitPendingLoad
    }
}
