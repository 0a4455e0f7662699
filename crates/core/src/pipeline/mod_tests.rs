// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::*;
use crate::adapter::fake::FakeAdapter;
use crate::adapter::target::Target as AdapterTarget;
use crate::adapter::SplitDirection;

async fn spawn_fixture() -> anyhow::Result<(Arc<FakeAdapter>, Arc<PaneRegistry>)> {
    let adapter = Arc::new(FakeAdapter::new());
    adapter.create_session("sess", "/tmp").await?;
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?; // pane 2
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?; // pane 3

    let t2 = AdapterTarget::new("sess", 2).ok_or_else(|| anyhow::anyhow!("t"))?;
    let t3 = AdapterTarget::new("sess", 3).ok_or_else(|| anyhow::anyhow!("t"))?;
    adapter.set_pane_title(&t2, "sess__cc_2").await?;
    adapter.set_pane_title(&t3, "sess__cod_3").await?;

    let registry = Arc::new(PaneRegistry::new(adapter.clone() as Arc<dyn MultiplexerAdapter>));
    Ok((adapter, registry))
}

#[tokio::test]
async fn empty_resolution_is_a_success_with_no_targets() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    let pipeline = Pipeline::new(adapter, registry, TimingConfig::default());
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::Indices(vec![99]),
        message: "hi".into(),
        options: SendOptions::default(),
    };
    let outcome = pipeline.send(req, 1000).await?;
    assert!(outcome.targets.is_empty());
    assert!(outcome.successful.is_empty());
    Ok(())
}

#[tokio::test]
async fn dry_run_reports_would_send_to_without_touching_adapter() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    let pipeline = Pipeline::new(adapter.clone(), registry, TimingConfig::default());
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::All,
        message: "hi".into(),
        options: SendOptions { dry_run: true, ..Default::default() },
    };
    let before = adapter.calls().len();
    let outcome = pipeline.send(req, 1000).await?;
    assert_eq!(outcome.would_send_to, Some(vec![2, 3]));
    assert_eq!(adapter.calls().len(), before, "dry run must not call send_keys");
    Ok(())
}

#[tokio::test]
async fn all_send_delivers_in_order_with_stagger() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    let pipeline = Pipeline::new(adapter.clone(), registry, TimingConfig::default());
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::All,
        message: "go".into(),
        options: SendOptions { delay_ms: Some(1), ..Default::default() },
    };
    let outcome = pipeline.send(req, 1000).await?;
    assert_eq!(outcome.successful, vec![2, 3]);
    assert!(outcome.failed.is_empty());
    Ok(())
}

#[tokio::test]
async fn one_failing_target_does_not_abort_the_batch() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    adapter.fail_sends("sess", 3);
    let pipeline = Pipeline::new(adapter.clone(), registry, TimingConfig::default());
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::Indices(vec![2, 3]),
        message: "go".into(),
        options: SendOptions { delay_ms: Some(1), ..Default::default() },
    };
    let outcome = pipeline.send(req, 1000).await?;
    assert_eq!(outcome.successful, vec![2]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].pane, 3);
    Ok(())
}

#[tokio::test]
async fn acknowledgment_tracking_observes_working_transition() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    adapter.set_screen("sess", 2, "Thinking…");
    let pipeline = Pipeline::new(adapter, registry, TimingConfig { ack_poll_interval_ms: 100, ..Default::default() });
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::Indices(vec![2]),
        message: "go".into(),
        options: SendOptions {
            track_acknowledgment: true,
            timeout: std::time::Duration::from_millis(500),
            delay_ms: Some(1),
            ..Default::default()
        },
    };
    let outcome = pipeline.send(req, 1000).await?;
    assert_eq!(outcome.successful, vec![2]);
    Ok(())
}

#[tokio::test]
async fn acknowledgment_tracking_times_out_to_pending() -> anyhow::Result<()> {
    let (adapter, registry) = spawn_fixture().await?;
    adapter.set_screen("sess", 2, ">");
    let pipeline = Pipeline::new(adapter, registry, TimingConfig { ack_poll_interval_ms: 50, ..Default::default() });
    let req = SendRequest {
        session: "sess".into(),
        filter: TargetFilter::Indices(vec![2]),
        message: "go".into(),
        options: SendOptions {
            track_acknowledgment: true,
            timeout: std::time::Duration::from_millis(150),
            delay_ms: Some(1),
            ..Default::default()
        },
    };
    let outcome = pipeline.send(req, 1000).await?;
    assert_eq!(outcome.pending, vec![2]);
    Ok(())
}
