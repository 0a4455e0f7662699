// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental Output Archiver (spec 4.D): one instance per session, ticking
//! on an interval, capturing each agent pane's scrollback, diffing against
//! the previous capture, and appending only the new content to a JSONL
//! file. Cancellation performs a final flush and returns promptly (spec 5).

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::adapter::MultiplexerAdapter;
use crate::error::NtmError;
use crate::model::ArchiveRecord;
use crate::registry::PaneRegistry;

/// Archiver tuning (spec 4.D).
#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    pub output_dir: PathBuf,
    pub interval: std::time::Duration,
    pub lines_per_capture: u32,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            interval: std::time::Duration::from_secs(30),
            lines_per_capture: 500,
        }
    }
}

/// Longest-suffix-of-previous-as-prefix-of-current diff used by each tick
/// (spec 4.D, spec 9 Open Question: priority order is load-bearing and
/// preserved exactly as specified).
///
/// 1. Scan candidate overlap lengths from `min(prev.len(), 50)` down to 1;
///    the first length where that many trailing lines of `previous` equal
///    the leading lines of `current` wins. The remainder of `current`
///    after the overlap is the new content.
/// 2. If no such overlap exists, but some line of `current` equals the
///    last line of `previous`, take everything in `current` after that
///    occurrence (last occurrence wins).
/// 3. Otherwise the entire current capture is new.
pub fn diff_new_content(previous: &str, current: &str) -> String {
    let prev_lines: Vec<&str> = previous.lines().collect();
    let cur_lines: Vec<&str> = current.lines().collect();

    if prev_lines.is_empty() {
        return current.to_string();
    }

    let max_overlap = prev_lines.len().min(50);
    for len in (1..=max_overlap).rev() {
        if len > cur_lines.len() {
            continue;
        }
        let prev_suffix = &prev_lines[prev_lines.len() - len..];
        let cur_prefix = &cur_lines[..len];
        if prev_suffix == cur_prefix {
            return cur_lines[len..].join("\n");
        }
    }

    if let Some(last_prev_line) = prev_lines.last() {
        if let Some(pos) = cur_lines.iter().rposition(|l| l == last_prev_line) {
            return cur_lines[pos + 1..].join("\n");
        }
    }

    current.to_string()
}

fn fast_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

#[derive(Default)]
struct PaneCaptureState {
    last_hash: Option<u64>,
    last_capture: String,
    last_capture_instant: Option<std::time::Instant>,
    sequence: u64,
}

/// Runs the per-session capture loop. Owns the JSONL file handle exclusively
/// for the lifetime of `run` (spec 5: "exclusive writer per session").
pub struct Archiver {
    session: String,
    adapter: Arc<dyn MultiplexerAdapter>,
    registry: Arc<PaneRegistry>,
    config: ArchiverConfig,
}

impl Archiver {
    pub fn new(session: impl Into<String>, adapter: Arc<dyn MultiplexerAdapter>, registry: Arc<PaneRegistry>, config: ArchiverConfig) -> Self {
        Self { session: session.into(), adapter, registry, config }
    }

    fn file_path(&self, today: &str) -> PathBuf {
        self.config.output_dir.join(format!("{}_{today}.jsonl", self.session))
    }

    /// Blocks until `cancel` fires, then flushes and returns. `today` is
    /// supplied by the caller (rather than computed with a wall-clock call
    /// here) so the archiver never needs `Utc::now` internally; callers
    /// re-invoke across day boundaries.
    pub async fn run(&self, cancel: CancellationToken, today: &str) -> Result<(), NtmError> {
        let path = self.file_path(today);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| NtmError::IoError { detail: format!("open archive {}: {e}", path.display()) })?;

        let mut states: HashMap<u32, PaneCaptureState> = HashMap::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    file.flush().await.map_err(|e| NtmError::IoError { detail: e.to_string() })?;
                    file.sync_all().await.map_err(|e| NtmError::IoError { detail: e.to_string() })?;
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.interval) => {
                    self.tick(&mut file, &mut states).await;
                }
            }
        }
    }

    async fn tick(&self, file: &mut tokio::fs::File, states: &mut HashMap<u32, PaneCaptureState>) {
        let panes = match self.registry.refresh(&self.session).await {
            Ok(p) => p,
            Err(e) => {
                warn!(session = %self.session, error = %e, "archiver tick: pane list unreachable, skipping");
                return;
            }
        };

        for pane in panes.iter().filter(|p| !p.is_control() && p.agent_type.is_prompt_target()) {
            let target = match crate::adapter::Target::new(&self.session, pane.index) {
                Some(t) => t,
                None => continue,
            };
            let capture = match self.adapter.capture_pane(&target, self.config.lines_per_capture).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(session = %self.session, pane = pane.index, error = %e, "archiver tick: capture failed, skipping pane");
                    continue;
                }
            };

            let state = states.entry(pane.index).or_default();
            let hash = fast_hash(&capture);
            let now = std::time::Instant::now();
            let unchanged = state.last_hash == Some(hash)
                && state.last_capture_instant.is_some_and(|t| now.duration_since(t) < 2 * self.config.interval);

            if unchanged {
                continue;
            }

            let new_content = diff_new_content(&state.last_capture, &capture);

            state.last_hash = Some(hash);
            state.last_capture = capture;
            state.last_capture_instant = Some(now);

            if new_content.is_empty() {
                continue;
            }

            state.sequence += 1;
            let lines = new_content.lines().count();
            let record = ArchiveRecord {
                session: self.session.clone(),
                pane: pane.title.clone(),
                pane_index: pane.index,
                agent: pane.agent_type.type_code().to_string(),
                variant: pane.variant.clone(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                content: new_content,
                lines,
                sequence: state.sequence,
            };

            match serde_json::to_string(&record) {
                Ok(mut line) => {
                    line.push('\n');
                    if let Err(e) = file.write_all(line.as_bytes()).await {
                        warn!(session = %self.session, pane = pane.index, error = %e, "archiver: write failed, record lost");
                        continue;
                    }
                    debug!(session = %self.session, pane = pane.index, sequence = state.sequence, "archived record");
                }
                Err(e) => warn!(session = %self.session, pane = pane.index, error = %e, "archiver: serialize failed, record lost"),
            }
        }
    }
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;
