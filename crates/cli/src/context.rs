// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide collaborator wiring: the concrete implementations the CLI
//! supplies for `ntm-core`'s interface-only traits, plus the shared
//! `Arc`-wrapped engines every command dispatches against.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ntmcore::adapter::tmux::TmuxAdapter;
use ntmcore::adapter::MultiplexerAdapter;
use ntmcore::change_tracker::ChangeTracker;
use ntmcore::collaborators::{AgentLauncherConfig, BeadStore, ClipboardBackend};
use ntmcore::error::NtmError;
use ntmcore::lifecycle::LifecycleManager;
use ntmcore::model::AgentType;
use ntmcore::pipeline::Pipeline;
use ntmcore::registry::PaneRegistry;
use ntmcore::reservation::ReservationService;
use ntmcore::timing::TimingConfig;

use crate::config::Config;

/// Resolves agent CLI binaries by name from `PATH`, mirroring the teacher's
/// convention of looking up external tool binaries by bare name rather than
/// a configured absolute path. A TOML-backed override (spec 4.F: "CLI paths
/// are resolved from config") is a natural follow-up once that config
/// format is needed for something beyond this.
struct PathLauncherConfig;

impl AgentLauncherConfig for PathLauncherConfig {
    fn binary_path(&self, agent_type: AgentType) -> Option<String> {
        match agent_type {
            AgentType::Claude => Some("claude".to_string()),
            AgentType::Codex => Some("codex".to_string()),
            AgentType::Gemini => Some("gemini".to_string()),
            AgentType::User | AgentType::Unknown => None,
        }
    }

    fn launch_args(&self, agent_type: AgentType, safety: bool) -> Vec<String> {
        if safety {
            return Vec::new();
        }
        match agent_type {
            AgentType::Claude => vec!["--dangerously-skip-permissions".to_string()],
            AgentType::Codex => vec!["--dangerously-bypass-approvals-and-sandbox".to_string()],
            AgentType::Gemini => vec!["--yolo".to_string()],
            AgentType::User | AgentType::Unknown => Vec::new(),
        }
    }
}

/// The bead/issue tracker is an opaque external system (GLOSSARY: "Bead");
/// no production backend is wired here. Any non-empty bead id is accepted
/// so `restart --restart-bead` remains usable without that integration.
struct PermissiveBeadStore;

impl BeadStore for PermissiveBeadStore {
    fn exists(&self, bead_id: &str) -> Result<bool, NtmError> {
        Ok(!bead_id.trim().is_empty())
    }
}

/// Shells out to whichever clipboard utility the platform provides, the
/// same "probe a short list of known binaries" shape the teacher uses for
/// optional external tools.
struct SystemClipboard;

const CLIPBOARD_CANDIDATES: &[(&str, &[&str])] =
    &[("pbcopy", &[]), ("wl-copy", &[]), ("xclip", &["-selection", "clipboard"]), ("xsel", &["--clipboard", "--input"])];

impl ClipboardBackend for SystemClipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), NtmError> {
        let mut last_err = None;
        for (bin, args) in CLIPBOARD_CANDIDATES {
            match Command::new(bin).args(*args).stdin(Stdio::piped()).spawn() {
                Ok(mut child) => {
                    if let Some(stdin) = child.stdin.as_mut() {
                        if let Err(e) = stdin.write_all(text.as_bytes()) {
                            last_err = Some(e.to_string());
                            continue;
                        }
                    }
                    match child.wait() {
                        Ok(status) if status.success() => return Ok(()),
                        Ok(status) => last_err = Some(format!("{bin} exited with {status}")),
                        Err(e) => last_err = Some(e.to_string()),
                    }
                }
                Err(e) => last_err = Some(e.to_string()),
            }
        }
        Err(NtmError::BinaryMissing { binary: last_err.unwrap_or_else(|| "no clipboard utility found on PATH".to_string()) })
    }
}

/// Everything a command needs to run, assembled once at process start and
/// shared behind `Arc`s for the lifetime of the process.
pub struct AppContext {
    pub adapter: Arc<dyn MultiplexerAdapter>,
    pub registry: Arc<PaneRegistry>,
    pub timing: TimingConfig,
    pub change_tracker: Arc<ChangeTracker>,
    pub launcher_config: Arc<dyn AgentLauncherConfig>,
    pub bead_store: Arc<dyn BeadStore>,
    pub clipboard: Arc<dyn ClipboardBackend>,
    pub archive_dir: PathBuf,
    pub archive_interval: Duration,
    pub archive_lines_per_capture: u32,
    reservations: Mutex<HashMap<String, Arc<ReservationService>>>,
}

impl AppContext {
    pub fn new(config: &Config) -> Self {
        let timing = config.timing();
        let adapter: Arc<dyn MultiplexerAdapter> = Arc::new(TmuxAdapter::new(config.tmux_bin.clone(), timing.adapter_timeout()));
        let registry = Arc::new(PaneRegistry::new(adapter.clone()));

        Self {
            adapter,
            registry,
            timing,
            // A day's worth of history at a generous event rate; spec 4.I
            // leaves the exact bound to the implementation.
            change_tracker: ChangeTracker::new(10_000, 24 * 60 * 60 * 1000),
            launcher_config: Arc::new(PathLauncherConfig),
            bead_store: Arc::new(PermissiveBeadStore),
            clipboard: Arc::new(SystemClipboard),
            archive_dir: config.archive_dir.clone(),
            archive_interval: Duration::from_secs(config.archive_interval_secs),
            archive_lines_per_capture: config.archive_lines_per_capture,
            reservations: Mutex::new(HashMap::new()),
        }
    }

    pub fn lifecycle_manager(&self) -> LifecycleManager {
        LifecycleManager::new(
            self.adapter.clone(),
            self.registry.clone(),
            self.timing.clone(),
            self.launcher_config.clone(),
            Some(self.bead_store.clone()),
        )
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.adapter.clone(), self.registry.clone(), self.timing.clone())
    }

    /// One `ReservationService` per project root, created lazily (spec 3:
    /// "one Reservation service per project root").
    pub fn reservation_service(&self, project_root: &str) -> Result<Arc<ReservationService>, NtmError> {
        let mut table = self.reservations.lock().map_err(|_| NtmError::Internal { detail: "reservation table lock poisoned".to_string() })?;
        Ok(table.entry(project_root.to_string()).or_insert_with(|| ReservationService::new(project_root)).clone())
    }

    /// Build a context around an already-constructed adapter, bypassing the
    /// `tmux` binary lookup entirely. Used by integration tests exercising
    /// the CLI surface against `ntmcore::adapter::fake::FakeAdapter`.
    pub fn with_adapter(adapter: Arc<dyn MultiplexerAdapter>, timing: TimingConfig) -> Self {
        let registry = Arc::new(PaneRegistry::new(adapter.clone()));
        Self {
            adapter,
            registry,
            timing,
            change_tracker: ChangeTracker::new(10_000, 24 * 60 * 60 * 1000),
            launcher_config: Arc::new(PathLauncherConfig),
            bead_store: Arc::new(PermissiveBeadStore),
            clipboard: Arc::new(SystemClipboard),
            archive_dir: PathBuf::from("."),
            archive_interval: Duration::from_secs(30),
            archive_lines_per_capture: 500,
            reservations: Mutex::new(HashMap::new()),
        }
    }
}
