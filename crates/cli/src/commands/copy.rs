// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm copy`: capture one pane's scrollback and copy it to the system
//! clipboard.

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::{now_rfc3339, target_for};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct CopyArgs {
    pub session: String,
    #[arg(long)]
    pub pane: u32,
    #[arg(long, default_value_t = 500)]
    pub lines: u32,
}

pub async fn run(args: &CopyArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let target = target_for(&args.session, args.pane)?;
    let capture = ctx.adapter.capture_pane(&target, args.lines).await?;
    let copied_lines = capture.lines().count();
    ctx.clipboard.copy_to_clipboard(&capture)?;

    Ok(RobotEnvelope::success(&now_rfc3339())
        .with_session(args.session.clone())
        .with_field("pane", json!(args.pane))
        .with_field("copied_lines", json!(copied_lines)))
}
