// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm lock`: acquire TTL-bounded cross-session file reservations (spec
//! 4.G).

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::now_rfc3339;
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct LockArgs {
    #[arg(long)]
    pub project_root: String,
    #[arg(long)]
    pub agent: String,
    #[arg(long, value_delimiter = ',')]
    pub paths: Vec<String>,
    #[arg(long, default_value_t = 3600)]
    pub ttl_secs: u64,
    #[arg(long)]
    pub reason: Option<String>,
}

pub async fn run(args: &LockArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let service = ctx.reservation_service(&args.project_root)?;
    let granted = service.lock(&args.agent, &args.paths, args.ttl_secs, args.reason.clone(), crate::commands::now_epoch_ms())?;

    let reservations: Vec<serde_json::Value> = granted
        .iter()
        .map(|r| {
            json!({
                "path": r.path_pattern,
                "agent_name": r.agent_name,
                "acquired_epoch_ms": r.acquired_epoch_ms,
                "expires_epoch_ms": r.expires_epoch_ms,
            })
        })
        .collect();

    Ok(RobotEnvelope::success(&now_rfc3339()).with_list("reservations", reservations))
}
