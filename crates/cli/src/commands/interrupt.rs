// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm interrupt`: send the Ctrl-C protocol to one or more agent panes
//! without relaunching them, the non-destructive half of `restart` (spec
//! 4.E).

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use ntmcore::pipeline::protocol;
use serde_json::json;

use crate::commands::{now_rfc3339, target_for, TargetArgs};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct InterruptArgs {
    pub session: String,
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn run(args: &InterruptArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    ctx.registry.refresh(&args.session).await?;
    let filter = args.target.resolve()?;
    let panes = filter.resolve(&ctx.registry, &args.session)?;

    let mut interrupted = Vec::new();
    let mut failed = Vec::new();

    for pane in &panes {
        let outcome = match target_for(&args.session, pane.index) {
            Ok(target) => protocol::send_ctrl_c(ctx.adapter.as_ref(), &target, &ctx.timing).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => interrupted.push(pane.index),
            Err(e) => failed.push(json!({"pane": pane.index, "reason": e.to_string()})),
        }
    }

    Ok(RobotEnvelope::success(&now_rfc3339())
        .with_session(args.session.clone())
        .with_list("interrupted", interrupted.into_iter().map(|p| json!(p)).collect())
        .with_list("failed", failed))
}
