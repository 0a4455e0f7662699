// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::*;
use crate::adapter::fake::FakeAdapter;
use crate::adapter::SplitDirection;

async fn seeded_session() -> anyhow::Result<(PaneRegistry, String)> {
    let adapter = Arc::new(FakeAdapter::new());
    adapter.create_session("sess", "/tmp").await?;
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?; // pane 2
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?; // pane 3
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?; // pane 4

    let registry_adapter: Arc<dyn crate::adapter::MultiplexerAdapter> = adapter.clone();
    let t1 = crate::adapter::target::Target::new("sess", 1).ok_or_else(|| anyhow::anyhow!("t"))?;
    let t2 = crate::adapter::target::Target::new("sess", 2).ok_or_else(|| anyhow::anyhow!("t"))?;
    let t3 = crate::adapter::target::Target::new("sess", 3).ok_or_else(|| anyhow::anyhow!("t"))?;
    let t4 = crate::adapter::target::Target::new("sess", 4).ok_or_else(|| anyhow::anyhow!("t"))?;
    adapter.set_pane_title(&t1, "sess__user_1").await?;
    adapter.set_pane_title(&t2, "sess__cc_2").await?;
    adapter.set_pane_title(&t3, "sess__cod_3").await?;
    adapter.set_pane_title(&t4, "garbage title").await?;

    let registry = PaneRegistry::new(registry_adapter);
    registry.refresh("sess").await?;
    Ok((registry, "sess".to_string()))
}

#[tokio::test]
async fn refresh_parses_titles_and_keeps_unknown() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    let panes = registry.panes(&sess)?;
    assert_eq!(panes.len(), 4);
    assert_eq!(panes[3].agent_type, AgentType::Unknown);
    assert_eq!(panes[3].title, "garbage title");
    Ok(())
}

#[tokio::test]
async fn all_filter_excludes_control_and_user() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    let targets = TargetFilter::All.resolve(&registry, &sess)?;
    let indices: Vec<u32> = targets.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn agent_type_filter_matches_only_that_type() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    let targets = TargetFilter::AgentType(AgentType::Codex).resolve(&registry, &sess)?;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].index, 3);
    Ok(())
}

#[tokio::test]
async fn all_except_drops_named_indices() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    let targets = TargetFilter::AllExcept(vec![3]).resolve(&registry, &sess)?;
    let indices: Vec<u32> = targets.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![2, 4]);
    Ok(())
}

#[tokio::test]
async fn indices_filter_never_admits_control_pane() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    let targets = TargetFilter::Indices(vec![1, 2]).resolve(&registry, &sess)?;
    let indices: Vec<u32> = targets.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![2]);
    Ok(())
}

#[tokio::test]
async fn unknown_session_is_session_not_found() {
    let adapter: Arc<dyn crate::adapter::MultiplexerAdapter> = Arc::new(FakeAdapter::new());
    let registry = PaneRegistry::new(adapter);
    assert!(registry.panes("ghost").is_err());
    assert!(TargetFilter::All.resolve(&registry, "ghost").is_err());
}

#[tokio::test]
async fn forget_drops_the_cached_session() -> anyhow::Result<()> {
    let (registry, sess) = seeded_session().await?;
    registry.forget(&sess);
    assert!(registry.panes(&sess).is_err());
    Ok(())
}
