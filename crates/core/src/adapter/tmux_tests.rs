// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exercises [`TmuxAdapter`] against a real, isolated `tmux` server. Skips
//! itself when `tmux` is not on `PATH` rather than failing the suite, the
//! way the teacher's socket-isolated harness did.

use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::adapter::target::Target;

fn tmux_available() -> bool {
    std::process::Command::new("tmux").arg("-V").output().map(|o| o.status.success()).unwrap_or(false)
}

struct TmuxHarness {
    adapter: TmuxAdapter,
    _socket_dir: TempDir,
}

impl TmuxHarness {
    fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let socket = dir.path().join("tmux.sock");
        let adapter = TmuxAdapter::new("tmux", Duration::from_secs(5)).with_socket(socket);
        Ok(Self { adapter, _socket_dir: dir })
    }
}

#[tokio::test]
async fn create_list_and_kill_session_round_trip() -> anyhow::Result<()> {
    if !tmux_available() {
        return Ok(());
    }
    let harness = TmuxHarness::new()?;
    harness.adapter.create_session("harness", "/tmp").await?;
    assert!(harness.adapter.has_session("harness").await?);

    let sessions = harness.adapter.list_sessions().await?;
    assert!(sessions.contains(&"harness".to_string()));

    harness.adapter.kill_session("harness").await?;
    assert!(!harness.adapter.has_session("harness").await?);
    Ok(())
}

#[tokio::test]
async fn send_keys_and_capture_pane_observes_output() -> anyhow::Result<()> {
    if !tmux_available() {
        return Ok(());
    }
    let harness = TmuxHarness::new()?;
    harness.adapter.create_session("harness", "/tmp").await?;
    let target = Target::new("harness", 1).ok_or_else(|| anyhow::anyhow!("target"))?;

    harness
        .adapter
        .send_keys(&target, "echo ntm_marker_1", SendKeysOptions { literal: true, press_enter: true })
        .await?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    let screen = harness.adapter.capture_pane(&target, 50).await?;
    assert!(screen.contains("ntm_marker_1"));

    harness.adapter.kill_session("harness").await?;
    Ok(())
}

#[tokio::test]
async fn split_window_grows_pane_list() -> anyhow::Result<()> {
    if !tmux_available() {
        return Ok(());
    }
    let harness = TmuxHarness::new()?;
    harness.adapter.create_session("harness", "/tmp").await?;
    let before = harness.adapter.list_panes("harness").await?;
    let new_index = harness.adapter.split_window("harness", SplitDirection::Vertical, "/tmp").await?;
    let after = harness.adapter.list_panes("harness").await?;

    assert_eq!(after.len(), before.len() + 1);
    assert!(after.iter().any(|p| p.index == new_index));

    harness.adapter.kill_session("harness").await?;
    Ok(())
}

#[tokio::test]
async fn has_session_is_false_for_unknown_name() -> anyhow::Result<()> {
    if !tmux_available() {
        return Ok(());
    }
    let harness = TmuxHarness::new()?;
    assert!(!harness.adapter.has_session("does-not-exist").await?);
    Ok(())
}
