// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm restart`: interrupt and relaunch matched agent panes in place (spec
//! 4.F). The bead validation ahead of any pane mutation lives in
//! `LifecycleManager::restart`.

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::{now_rfc3339, TargetArgs};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct RestartArgs {
    pub session: String,
    #[command(flatten)]
    pub target: TargetArgs,
    /// Launch the relaunched agent CLIs without their auto-approve flags.
    #[arg(long)]
    pub safety: bool,
    /// A bead id submitted as the relaunched pane's first prompt, validated
    /// against the bead store before any pane is touched.
    #[arg(long)]
    pub restart_bead: Option<String>,
}

pub async fn run(args: &RestartArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let filter = args.target.resolve()?;
    let manager = ctx.lifecycle_manager();
    let restarted = manager.restart(&args.session, filter, args.safety, args.restart_bead.as_deref()).await?;

    Ok(RobotEnvelope::success(&now_rfc3339())
        .with_session(args.session.clone())
        .with_list("restarted", restarted.into_iter().map(|p| json!(p)).collect()))
}
