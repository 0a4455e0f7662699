// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end coverage of the CLI surface against `FakeAdapter`, exercising
//! spawn -> send -> status -> interrupt -> restart -> kill and the robot
//! envelope's error/totality guarantees (spec 4.H, testable property 6).

use std::sync::Arc;

use ntm::commands::interrupt::InterruptArgs;
use ntm::commands::kill::KillArgs;
use ntm::commands::lock::LockArgs;
use ntm::commands::send::SendArgs;
use ntm::commands::spawn::SpawnArgs;
use ntm::commands::status::StatusArgs;
use ntm::commands::unlock::UnlockArgs;
use ntm::commands::{self, TargetArgs};
use ntm::config::Command;
use ntm::context::AppContext;
use ntmcore::adapter::fake::FakeAdapter;
use ntmcore::timing::TimingConfig;

fn fast_timing() -> TimingConfig {
    TimingConfig {
        prompt_submit_delay_ms: 1,
        gemini_submit_delay_ms: 1,
        cc_init_wait_ms: 1,
        ctrl_c_gap_ms: 1,
        post_exit_wait_ms: 1,
        default_stagger_ms: 1,
        ack_poll_interval_ms: 100,
        adapter_timeout_ms: 1000,
    }
}

fn all_targets() -> TargetArgs {
    TargetArgs { panes: None, agent_type: None, all: true, all_except: None }
}

#[tokio::test]
async fn spawn_send_and_status_round_trip() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeAdapter::new());
    let ctx = AppContext::with_adapter(adapter, fast_timing());

    let spawn_args =
        SpawnArgs { session: "mysess".into(), project_dir: "/tmp".into(), claude: 1, codex: 1, gemini: 0, safety: true, initial_prompt: None };
    let spawn_envelope = commands::spawn::run(&spawn_args, &ctx).await?;
    assert!(spawn_envelope.success);
    let agent_panes = spawn_envelope
        .fields
        .get("agent_panes")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("missing agent_panes field"))?;
    assert_eq!(agent_panes.len(), 2);

    let send_args = SendArgs {
        session: "mysess".into(),
        message: "hello fleet".into(),
        target: all_targets(),
        track_acknowledgment: false,
        delay_ms: Some(1),
        timeout_ms: 1000,
        dry_run: false,
        literal: false,
    };
    let send_envelope = commands::send::run(&send_args, &ctx).await?;
    assert!(send_envelope.success);
    let successful = send_envelope
        .fields
        .get("successful")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("missing successful field"))?;
    assert_eq!(successful.len(), 2);

    let status_envelope = commands::status::run(&StatusArgs { session: "mysess".into() }, &ctx).await?;
    assert!(status_envelope.success);
    let panes = status_envelope
        .fields
        .get("panes")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("missing panes field"))?;
    assert_eq!(panes.len(), 3); // control + 2 agents

    Ok(())
}

#[tokio::test]
async fn dry_run_send_reports_would_send_to_without_delivering() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeAdapter::new());
    let ctx = AppContext::with_adapter(adapter.clone(), fast_timing());

    commands::spawn::run(
        &SpawnArgs { session: "mysess".into(), project_dir: "/tmp".into(), claude: 1, codex: 0, gemini: 0, safety: true, initial_prompt: None },
        &ctx,
    )
    .await?;

    let calls_before = adapter.calls().len();
    let send_args = SendArgs {
        session: "mysess".into(),
        message: "should not land".into(),
        target: all_targets(),
        track_acknowledgment: false,
        delay_ms: None,
        timeout_ms: 1000,
        dry_run: true,
        literal: false,
    };
    let envelope = commands::send::run(&send_args, &ctx).await?;
    assert!(envelope.success);
    assert!(envelope.fields.contains_key("would_send_to"));
    assert_eq!(adapter.calls().len(), calls_before, "dry run must not touch the adapter beyond the registry refresh already counted");

    Ok(())
}

#[tokio::test]
async fn interrupt_then_kill_tears_down_the_session() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeAdapter::new());
    let ctx = AppContext::with_adapter(adapter.clone(), fast_timing());

    commands::spawn::run(
        &SpawnArgs { session: "mysess".into(), project_dir: "/tmp".into(), claude: 1, codex: 0, gemini: 0, safety: true, initial_prompt: None },
        &ctx,
    )
    .await?;

    let interrupt_envelope = commands::interrupt::run(&InterruptArgs { session: "mysess".into(), target: all_targets() }, &ctx).await?;
    assert!(interrupt_envelope.success);

    let kill_envelope = commands::kill::run(&KillArgs { session: "mysess".into(), force: false }, &ctx).await?;
    assert!(kill_envelope.success);
    assert!(!adapter.has_session("mysess").await?);

    Ok(())
}

#[tokio::test]
async fn lock_conflict_surfaces_as_a_failure_envelope_through_dispatch() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeAdapter::new());
    let ctx = Arc::new(AppContext::with_adapter(adapter, fast_timing()));

    let first_lock = Command::Lock(LockArgs {
        project_root: "/repo".into(),
        agent: "agent-a".into(),
        paths: vec!["src/lib.rs".into()],
        ttl_secs: 120,
        reason: None,
    });
    let envelope = commands::dispatch(ctx.clone(), first_lock).await;
    assert!(envelope.success);

    let conflicting_lock = Command::Lock(LockArgs {
        project_root: "/repo".into(),
        agent: "agent-b".into(),
        paths: vec!["src/lib.rs".into()],
        ttl_secs: 120,
        reason: None,
    });
    let envelope = commands::dispatch(ctx.clone(), conflicting_lock).await;
    assert!(!envelope.success);
    assert_eq!(envelope.error_code.as_deref(), Some("LOCK_CONFLICT"));

    let unlock = Command::Unlock(UnlockArgs { project_root: "/repo".into(), agent: "agent-a".into(), paths: None });
    let envelope = commands::dispatch(ctx, unlock).await;
    assert!(envelope.success);
    assert_eq!(envelope.fields.get("released").and_then(|v| v.as_u64()), Some(1));

    Ok(())
}

#[tokio::test]
async fn dispatch_wraps_an_unknown_session_as_a_failure_envelope() -> anyhow::Result<()> {
    let adapter = Arc::new(FakeAdapter::new());
    let ctx = Arc::new(AppContext::with_adapter(adapter, fast_timing()));

    let envelope = commands::dispatch(ctx, Command::Status(StatusArgs { session: "does-not-exist".into() })).await;
    assert!(!envelope.success);
    assert_eq!(envelope.error_code.as_deref(), Some("SESSION_NOT_FOUND"));

    Ok(())
}
