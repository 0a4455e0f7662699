// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm spawn`: create a new session and launch its agent panes (spec 4.F).

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use ntmcore::lifecycle::{SpawnCounts, SpawnOptions};
use serde_json::json;

use crate::commands::{now_epoch_ms, now_rfc3339};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct SpawnArgs {
    pub session: String,
    #[arg(long)]
    pub project_dir: String,
    #[arg(long, default_value_t = 1)]
    pub claude: u32,
    #[arg(long, default_value_t = 0)]
    pub codex: u32,
    #[arg(long, default_value_t = 0)]
    pub gemini: u32,
    /// Launch agent CLIs without their auto-approve flags.
    #[arg(long)]
    pub safety: bool,
    #[arg(long)]
    pub initial_prompt: Option<String>,
}

pub async fn run(args: &SpawnArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let manager = ctx.lifecycle_manager();
    let counts = SpawnCounts { claude: args.claude, codex: args.codex, gemini: args.gemini };
    let options = SpawnOptions { counts, safety: args.safety, initial_prompt: args.initial_prompt.clone() };
    let report = manager.spawn(&args.session, &args.project_dir, options, now_epoch_ms()).await?;

    let progress: Vec<serde_json::Value> = report
        .progress
        .iter()
        .map(|p| {
            json!({
                "pane": p.pane,
                "agent_type": p.agent_type.type_code(),
                "scheduled_at_epoch_ms": p.scheduled_at_epoch_ms,
                "sent_at_epoch_ms": p.sent_at_epoch_ms,
            })
        })
        .collect();

    Ok(RobotEnvelope::success(&now_rfc3339())
        .with_session(report.session)
        .with_field("control_pane", json!(report.control_pane))
        .with_list("agent_panes", report.agent_panes.into_iter().map(|p| json!(p)).collect())
        .with_list("progress", progress)
        .with_field("ready", json!(report.ready)))
}
