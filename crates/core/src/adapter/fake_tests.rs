// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_session_seeds_control_pane() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    let panes = adapter.list_panes("sess").await?;
    assert_eq!(panes.len(), 1);
    assert_eq!(panes[0].index, 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_create_session_fails() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    assert!(adapter.create_session("sess", "/tmp").await.is_err());
    Ok(())
}

#[tokio::test]
async fn split_window_allocates_increasing_indices() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    let a = adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?;
    let b = adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?;
    assert_eq!(a, 2);
    assert_eq!(b, 3);
    Ok(())
}

#[tokio::test]
async fn send_keys_records_payload_and_enter() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    let target = Target::new("sess", 1).ok_or_else(|| anyhow::anyhow!("target"))?;
    adapter
        .send_keys(&target, "hello", SendKeysOptions { literal: true, press_enter: true })
        .await?;
    let calls = adapter.calls();
    assert!(calls.iter().any(|c| c.contains("hello") && c.contains("enter=true")));
    Ok(())
}

#[tokio::test]
async fn capture_pane_reflects_set_screen() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    adapter.set_screen("sess", 1, "> ready");
    let target = Target::new("sess", 1).ok_or_else(|| anyhow::anyhow!("target"))?;
    let screen = adapter.capture_pane(&target, 200).await?;
    assert_eq!(screen, "> ready");
    Ok(())
}

#[tokio::test]
async fn kill_session_removes_it() -> anyhow::Result<()> {
    let adapter = FakeAdapter::new();
    adapter.create_session("sess", "/tmp").await?;
    adapter.kill_session("sess").await?;
    assert!(!adapter.has_session("sess").await?);
    Ok(())
}

#[tokio::test]
async fn operations_on_unknown_session_fail() {
    let adapter = FakeAdapter::new();
    assert!(adapter.list_panes("ghost").await.is_err());
    assert!(adapter.kill_session("ghost").await.is_err());
}
