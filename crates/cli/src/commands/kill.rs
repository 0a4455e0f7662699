// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm kill`: tear down a session, gracefully by default (spec 4.F).

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::now_rfc3339;
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct KillArgs {
    pub session: String,
    /// Skip the graceful interrupt-and-wait and kill the session outright.
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: &KillArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let manager = ctx.lifecycle_manager();
    manager.kill(&args.session, args.force).await?;

    Ok(RobotEnvelope::success(&now_rfc3339()).with_session(args.session.clone()).with_field("killed", json!(true)))
}
