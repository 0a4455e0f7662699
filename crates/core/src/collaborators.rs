// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interface-only traits for the external collaborators named in spec §1/§6.
//! NTM invokes these but does not define them: production wiring lives in
//! the CLI crate (or is absent entirely when a feature is not needed), and
//! every trait here exists solely so the core engines can be tested without
//! the real collaborator present.

use crate::error::NtmError;

/// Resolves the executable path and launch arguments for an agent CLI
/// (spec 4.F: "CLI paths are resolved from config"). Backed by the TOML
/// config loader collaborator in production.
pub trait AgentLauncherConfig: Send + Sync {
    fn binary_path(&self, agent_type: crate::model::AgentType) -> Option<String>;
    fn launch_args(&self, agent_type: crate::model::AgentType, safety: bool) -> Vec<String>;
}

/// Validates that a restart-bead payload names a real task before any pane
/// is touched (spec 4.F). The bead issue tracker itself is opaque to the
/// core (GLOSSARY: "Bead").
pub trait BeadStore: Send + Sync {
    fn exists(&self, bead_id: &str) -> Result<bool, NtmError>;
}

/// Session-Agent registry (spec 6): translates a session name to its bound
/// `AgentName` for Reservation Service calls.
pub trait SessionAgentDirectory: Send + Sync {
    fn register_session_agent(&self, session: &str, project_dir: &str) -> Result<String, NtmError>;
    fn load_session_agent_registry(&self, session: &str, project_dir: &str) -> Result<Vec<(String, String)>, NtmError>;
}

/// Content-addressable-search indexer consuming the Archiver's JSONL
/// output (GLOSSARY: "CASS"). The core never calls into this directly; the
/// trait exists only to document the seam for CLI-layer wiring.
pub trait ArchiveConsumer: Send + Sync {
    fn notify_appended(&self, session: &str, path: &str);
}

/// Git-checkpoint snapshotter invoked around Lifecycle Manager operations.
pub trait CheckpointSnapshotter: Send + Sync {
    fn snapshot(&self, project_dir: &str, label: &str) -> Result<(), NtmError>;
}

/// Clipboard backend used by the `copy` CLI subcommand.
pub trait ClipboardBackend: Send + Sync {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), NtmError>;
}

/// Ensemble/reasoning-mode preset registry: named bundles of launch flags
/// a `spawn` call may reference instead of spelling out `safety`/CLI args
/// directly.
pub trait ReasoningPresetRegistry: Send + Sync {
    fn resolve(&self, preset_name: &str) -> Option<Vec<String>>;
}
