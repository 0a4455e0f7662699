// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;
use crate::adapter::fake::FakeAdapter;
use crate::adapter::SplitDirection;

#[test]
fn diff_scrolling_buffer_overlap() {
    // S3: scrolling buffer where the tail of `previous` is a prefix of
    // `current`.
    let previous = "line1\nline2\nline3\nline4\nline5";
    let current = "line4\nline5\nline6\nline7";
    assert_eq!(diff_new_content(previous, current), "line6\nline7");
}

#[test]
fn diff_falls_back_to_last_line_match_when_no_prefix_overlap() {
    let previous = "a\nb\nc";
    // `current` does not have a proper prefix equal to any suffix of
    // `previous`, but contains `c` (the last line of `previous`) mid-buffer.
    let current = "x\nc\nnew1\nnew2";
    assert_eq!(diff_new_content(previous, current), "new1\nnew2");
}

#[test]
fn diff_treats_everything_as_new_with_no_overlap_at_all() {
    let previous = "a\nb\nc";
    let current = "totally\ndifferent\ncontent";
    assert_eq!(diff_new_content(previous, current), current);
}

#[test]
fn diff_with_empty_previous_is_entirely_new() {
    assert_eq!(diff_new_content("", "fresh content"), "fresh content");
}

#[test]
fn unchanged_capture_has_no_new_content() {
    let text = "same\nsame\nsame";
    assert_eq!(diff_new_content(text, text), "");
}

async fn fixture() -> anyhow::Result<(Arc<FakeAdapter>, Arc<PaneRegistry>)> {
    let adapter = Arc::new(FakeAdapter::new());
    adapter.create_session("sess", "/tmp").await?;
    adapter.split_window("sess", SplitDirection::Vertical, "/tmp").await?;
    let target = crate::adapter::target::Target::new("sess", 2).ok_or_else(|| anyhow::anyhow!("t"))?;
    adapter.set_pane_title(&target, "sess__cc_2").await?;
    let registry = Arc::new(PaneRegistry::new(adapter.clone() as Arc<dyn MultiplexerAdapter>));
    Ok((adapter, registry))
}

#[tokio::test]
async fn tick_writes_one_whole_line_record_when_content_changes() -> anyhow::Result<()> {
    let (adapter, registry) = fixture().await?;
    adapter.set_screen("sess", 2, "hello world");

    let dir = tempfile::tempdir()?;
    let archiver = Archiver::new(
        "sess",
        adapter.clone() as Arc<dyn MultiplexerAdapter>,
        registry,
        ArchiverConfig { output_dir: dir.path().to_path_buf(), interval: Duration::from_millis(10), lines_per_capture: 100 },
    );

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(async move { archiver.run(cancel_clone, "2026-07-30").await });

    tokio::time::sleep(Duration::from_millis(40)).await;
    cancel.cancel();
    handle.await.map_err(|e| anyhow::anyhow!(e))??;

    let contents = tokio::fs::read_to_string(dir.path().join("sess_2026-07-30.jsonl")).await?;
    let lines: Vec<&str> = contents.lines().collect();
    assert!(!lines.is_empty());
    let record: serde_json::Value = serde_json::from_str(lines[0])?;
    assert_eq!(record["content"], "hello world");
    assert_eq!(record["sequence"], 1);
    Ok(())
}

#[tokio::test]
async fn cancellation_flushes_and_returns_promptly() -> anyhow::Result<()> {
    let (adapter, registry) = fixture().await?;
    let dir = tempfile::tempdir()?;
    let archiver = Archiver::new(
        "sess",
        adapter as Arc<dyn MultiplexerAdapter>,
        registry,
        ArchiverConfig { output_dir: dir.path().to_path_buf(), interval: Duration::from_millis(100), lines_per_capture: 100 },
    );

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(async move { archiver.run(cancel_clone, "2026-07-30").await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let start = std::time::Instant::now();
    cancel.cancel();
    handle.await.map_err(|e| anyhow::anyhow!(e))??;
    assert!(start.elapsed() < Duration::from_millis(200));

    let path = dir.path().join("sess_2026-07-30.jsonl");
    assert!(path.exists());
    Ok(())
}
