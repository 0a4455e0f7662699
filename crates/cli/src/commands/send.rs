// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm send`: deliver a prompt to one or more agent panes (spec 4.E).

use std::time::Duration;

use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use ntmcore::pipeline::{SendOptions, SendRequest};
use serde_json::json;

use crate::commands::{now_epoch_ms, now_rfc3339, TargetArgs};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct SendArgs {
    pub session: String,
    pub message: String,
    #[command(flatten)]
    pub target: TargetArgs,
    #[arg(long)]
    pub track_acknowledgment: bool,
    #[arg(long)]
    pub delay_ms: Option<u64>,
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub literal: bool,
}

pub async fn run(args: &SendArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let filter = args.target.resolve()?;
    let pipeline = ctx.pipeline();

    let req = SendRequest {
        session: args.session.clone(),
        filter,
        message: args.message.clone(),
        options: SendOptions {
            track_acknowledgment: args.track_acknowledgment,
            delay_ms: args.delay_ms,
            timeout: Duration::from_millis(args.timeout_ms),
            dry_run: args.dry_run,
            literal: args.literal,
        },
    };

    let outcome = pipeline.send(req, now_epoch_ms()).await?;

    let failed: Vec<serde_json::Value> =
        outcome.failed.iter().map(|f| json!({"pane": f.pane, "reason": f.reason})).collect();

    let mut envelope = RobotEnvelope::success(&now_rfc3339())
        .with_session(args.session.clone())
        .with_list("targets", outcome.targets.iter().map(|t| json!(t)).collect())
        .with_list("successful", outcome.successful.iter().map(|t| json!(t)).collect())
        .with_list("failed", failed)
        .with_list("pending", outcome.pending.iter().map(|t| json!(t)).collect());

    if let Some(would_send_to) = outcome.would_send_to {
        envelope = envelope.with_list("would_send_to", would_send_to.into_iter().map(|t| json!(t)).collect());
    }

    Ok(envelope)
}
