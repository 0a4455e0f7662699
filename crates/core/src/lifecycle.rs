// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Lifecycle Manager (spec 4.F): spawn, restart, and kill whole
//! sessions. Built from the same [`MultiplexerAdapter`] and
//! [`TargetFilter::resolve`] primitives the Pipeline uses, rather than a
//! separate path to the same operations (SPEC_FULL.md "Supplemented
//! features" #2).

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::{MultiplexerAdapter, SplitDirection, Target};
use crate::collaborators::{AgentLauncherConfig, BeadStore};
use crate::error::NtmError;
use crate::model::{self, AgentType};
use crate::pipeline::protocol;
use crate::registry::{PaneRegistry, TargetFilter};
use crate::timing::TimingConfig;

/// How many of each agent type to launch in a new session (spec 4.F).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnCounts {
    pub claude: u32,
    pub codex: u32,
    pub gemini: u32,
}

impl SpawnCounts {
    fn total(&self) -> u32 {
        self.claude + self.codex + self.gemini
    }

    fn ordered_types(&self) -> Vec<AgentType> {
        let mut types = Vec::with_capacity(self.total() as usize);
        types.extend(std::iter::repeat(AgentType::Claude).take(self.claude as usize));
        types.extend(std::iter::repeat(AgentType::Codex).take(self.codex as usize));
        types.extend(std::iter::repeat(AgentType::Gemini).take(self.gemini as usize));
        types
    }
}

#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub counts: SpawnCounts,
    /// Suppresses auto-approve flags passed to agent CLIs.
    pub safety: bool,
    /// Stagger between each pane's initial prompt, if any was supplied.
    pub initial_prompt: Option<String>,
}

/// One entry in the spawn telemetry exposed via the robot envelope (spec
/// 4.F: "Staggered spawn telemetry").
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnProgress {
    pub pane: u32,
    pub agent_type: AgentType,
    pub scheduled_at_epoch_ms: u64,
    pub sent_at_epoch_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SpawnReport {
    pub session: String,
    pub control_pane: u32,
    pub agent_panes: Vec<u32>,
    pub progress: Vec<SpawnProgress>,
    pub ready: bool,
}

pub struct LifecycleManager {
    adapter: Arc<dyn MultiplexerAdapter>,
    registry: Arc<PaneRegistry>,
    timing: TimingConfig,
    launcher_config: Arc<dyn AgentLauncherConfig>,
    bead_store: Option<Arc<dyn BeadStore>>,
}

impl LifecycleManager {
    pub fn new(
        adapter: Arc<dyn MultiplexerAdapter>,
        registry: Arc<PaneRegistry>,
        timing: TimingConfig,
        launcher_config: Arc<dyn AgentLauncherConfig>,
        bead_store: Option<Arc<dyn BeadStore>>,
    ) -> Self {
        Self { adapter, registry, timing, launcher_config, bead_store }
    }

    /// Create a session with `1 + N+M+K` panes (control + agents), title
    /// them canonically, select a tiled layout, launch each agent CLI, and
    /// wait `CCInitWaitMs` before declaring the session `Ready`.
    pub async fn spawn(&self, session: &str, project_dir: &str, options: SpawnOptions, now_epoch_ms: u64) -> Result<SpawnReport, NtmError> {
        if !model::is_valid_session_name(session) {
            return Err(NtmError::InvalidArgument { detail: format!("invalid session name: {session}") });
        }

        self.adapter.create_session(session, project_dir).await?;
        let control_target = Target::new(session, 1).ok_or_else(|| NtmError::InvalidArgument { detail: "control pane target".into() })?;
        self.adapter.set_pane_title(&control_target, &model::format_title(session, AgentType::User, 1)).await?;

        let mut agent_panes = Vec::new();
        let mut progress = Vec::new();
        let types = options.counts.ordered_types();
        let stagger = self.timing.default_stagger();

        for (i, agent_type) in types.iter().enumerate() {
            let pane_index = self.adapter.split_window(session, SplitDirection::Horizontal, project_dir).await?;
            let ordinal = (i + 1) as u32;
            let title = model::format_title(session, *agent_type, ordinal);
            let target = Target::new(session, pane_index).ok_or_else(|| NtmError::InvalidArgument { detail: "pane target".into() })?;
            self.adapter.set_pane_title(&target, &title).await?;

            self.launch_agent(&target, *agent_type, options.safety).await?;
            agent_panes.push(pane_index);

            let scheduled_at = now_epoch_ms + (i as u64) * stagger.as_millis() as u64;
            let mut sent_at = None;
            if let Some(prompt) = &options.initial_prompt {
                protocol::submit(self.adapter.as_ref(), &target, *agent_type, prompt, &self.timing).await?;
                sent_at = Some(now_epoch_ms);
                if i + 1 < types.len() {
                    tokio::time::sleep(stagger).await;
                }
            }
            progress.push(SpawnProgress { pane: pane_index, agent_type: *agent_type, scheduled_at_epoch_ms: scheduled_at, sent_at_epoch_ms: sent_at });
        }

        self.adapter.select_layout(session, "tiled").await?;
        self.registry.refresh(session).await?;

        tokio::time::sleep(self.timing.cc_init_wait()).await;
        info!(session, agents = agent_panes.len(), "session spawned and ready");

        Ok(SpawnReport { session: session.to_string(), control_pane: 1, agent_panes, progress, ready: true })
    }

    async fn launch_agent(&self, target: &Target, agent_type: AgentType, safety: bool) -> Result<(), NtmError> {
        let Some(binary) = self.launcher_config.binary_path(agent_type) else {
            return Err(NtmError::BinaryMissing { binary: format!("{agent_type} CLI") });
        };
        let args = self.launcher_config.launch_args(agent_type, safety);
        let command = if args.is_empty() { binary } else { format!("{binary} {}", args.join(" ")) };
        self.adapter.send_keys(target, &command, crate::adapter::SendKeysOptions { literal: true, press_enter: true }).await
    }

    /// Interrupt, wait for the agent to stop, and relaunch it in place.
    /// When `restart_bead` is set, it is validated against the bead store
    /// before any pane is touched (spec 4.F).
    pub async fn restart(&self, session: &str, filter: TargetFilter, safety: bool, restart_bead: Option<&str>) -> Result<Vec<u32>, NtmError> {
        if let (Some(bead_id), Some(store)) = (restart_bead, &self.bead_store) {
            if !store.exists(bead_id)? {
                return Err(NtmError::InvalidArgument { detail: format!("unknown restart bead: {bead_id}") });
            }
        }

        self.registry.refresh(session).await?;
        let panes = filter.resolve(&self.registry, session)?;
        let mut restarted = Vec::new();

        for pane in panes {
            let target = Target::new(session, pane.index).ok_or_else(|| NtmError::InvalidArgument { detail: "pane target".into() })?;
            if let Err(e) = protocol::send_ctrl_c(self.adapter.as_ref(), &target, &self.timing).await {
                warn!(session, pane = pane.index, error = %e, "restart: interrupt failed, continuing anyway");
            }
            tokio::time::sleep(self.timing.post_exit_wait()).await;

            self.launch_agent(&target, pane.agent_type, safety).await?;

            if let Some(bead_id) = restart_bead {
                protocol::submit(self.adapter.as_ref(), &target, pane.agent_type, bead_id, &self.timing).await?;
            }
            restarted.push(pane.index);
        }

        Ok(restarted)
    }

    /// Graceful: interrupt every agent pane, wait `PostExitWaitMs`, then
    /// `kill_session`. Force: skip the graceful interrupt entirely.
    pub async fn kill(&self, session: &str, force: bool) -> Result<(), NtmError> {
        if !force {
            self.registry.refresh(session).await?;
            let panes = TargetFilter::All.resolve(&self.registry, session)?;
            for pane in panes {
                if let Some(target) = Target::new(session, pane.index) {
                    if let Err(e) = protocol::send_ctrl_c(self.adapter.as_ref(), &target, &self.timing).await {
                        warn!(session, pane = pane.index, error = %e, "kill: graceful interrupt failed");
                    }
                }
            }
            tokio::time::sleep(self.timing.post_exit_wait()).await;
        }

        self.adapter.kill_session(session).await?;
        self.registry.forget(session);
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
