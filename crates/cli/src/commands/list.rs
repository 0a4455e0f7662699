// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm list`: every session the multiplexer currently knows about.

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::Value;

use crate::commands::now_rfc3339;
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct ListArgs {}

pub async fn run(_args: &ListArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let sessions = ctx.adapter.list_sessions().await?;
    Ok(RobotEnvelope::success(&now_rfc3339()).with_list("sessions", sessions.into_iter().map(Value::String).collect()))
}
