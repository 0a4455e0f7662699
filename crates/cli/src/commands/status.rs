// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm status`: classify every agent pane in a session via the State
//! Detector and report each pane's current lifecycle state (spec 4.C).

use std::time::Duration;

use ntmcore::detector::{self, ClassifyInput};
use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use serde_json::json;

use crate::commands::{now_epoch_ms, now_rfc3339, target_for};
use crate::context::AppContext;

#[derive(Debug, clap::Args)]
pub struct StatusArgs {
    pub session: String,
}

pub async fn run(args: &StatusArgs, ctx: &AppContext) -> Result<RobotEnvelope, NtmError> {
    let panes = ctx.registry.refresh(&args.session).await?;
    let now = now_epoch_ms();
    let mut pane_reports = Vec::with_capacity(panes.len());

    for pane in &panes {
        if pane.is_control() {
            pane_reports.push(json!({
                "index": pane.index,
                "agent_type": pane.agent_type.type_code(),
                "title": pane.title,
                "state": "unknown",
            }));
            continue;
        }

        let target = target_for(&args.session, pane.index)?;
        let capture = ctx.adapter.capture_pane(&target, 200).await.unwrap_or_default();
        let (state, markers) = detector::classify(ClassifyInput {
            agent_id: &format!("{}:{}", args.session, pane.index),
            agent_type: pane.agent_type,
            scrollback: &capture,
            time_since_last_capture: Duration::from_secs(5),
            previous_state: Some(&pane.state),
            now_epoch_ms: now,
        });

        ctx.registry.set_pane_state(&args.session, pane.index, state.clone());
        for marker in &markers {
            ctx.change_tracker.record_marker(Some(args.session.clone()), Some(pane.index.to_string()), marker, now);
        }

        pane_reports.push(json!({
            "index": pane.index,
            "agent_type": pane.agent_type.type_code(),
            "title": pane.title,
            "state": state.as_str(),
        }));
    }

    Ok(RobotEnvelope::success(&now_rfc3339()).with_session(args.session.clone()).with_list("panes", pane_reports))
}
