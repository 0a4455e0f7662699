// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm resume`: reattach this process's Pane Registry to a multiplexer
//! session that was created by an earlier, now-exited `ntm` process. The
//! session itself outlives the CLI invocation that spawned it (spec 3); this
//! command is the seam that lets a fresh process pick its bookkeeping back
//! up instead of requiring a long-lived daemon.

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::now_rfc3339;
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct ResumeArgs {
    pub session: String,
}

pub async fn run(args: &ResumeArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    if !ctx.adapter.has_session(&args.session).await? {
        return Err(NtmError::SessionNotFound { session: args.session.clone() });
    }

    let panes = ctx.registry.refresh(&args.session).await?;
    let pane_summaries: Vec<serde_json::Value> = panes
        .iter()
        .map(|p| {
            json!({
                "index": p.index,
                "agent_type": p.agent_type.type_code(),
                "title": p.title,
            })
        })
        .collect();

    Ok(RobotEnvelope::success(&now_rfc3339())
        .with_session(args.session.clone())
        .with_field("resumed", json!(true))
        .with_list("panes", pane_summaries))
}
