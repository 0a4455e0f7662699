// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm unlock`: release specific paths, or every active reservation for an
//! agent, within a project root (spec 4.G).

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::{now_epoch_ms, now_rfc3339};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct UnlockArgs {
    #[arg(long)]
    pub project_root: String,
    #[arg(long)]
    pub agent: String,
    /// Release only these paths. Omit to release every active reservation
    /// this agent holds in the project root.
    #[arg(long, value_delimiter = ',')]
    pub paths: Option<Vec<String>>,
}

pub async fn run(args: &UnlockArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let service = ctx.reservation_service(&args.project_root)?;
    let now = now_epoch_ms();

    let released = match &args.paths {
        Some(paths) => service.unlock_paths(&args.agent, paths, now),
        None => service.unlock_all(&args.agent, now),
    };

    Ok(RobotEnvelope::success(&now_rfc3339()).with_field("released", json!(released)))
}
