// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single timing config operators retune as upstream agent clients
//! change (spec 9: "Paste-then-Enter timing is load-bearing").

use std::time::Duration;

/// Tunable timing constants shared by the Prompt Delivery Pipeline and the
/// Session Lifecycle Manager. Every field has the default named in spec
/// 4.E/4.F/9.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingConfig {
    /// Pause between pasting a Claude prompt body and sending Return.
    pub prompt_submit_delay_ms: u64,
    /// Pause between pasting a Gemini prompt body and sending Return.
    pub gemini_submit_delay_ms: u64,
    /// Wait after spawning agent panes before declaring them `Ready`.
    pub cc_init_wait_ms: u64,
    /// Pause between the first and second Ctrl-C in the interrupt protocol.
    pub ctrl_c_gap_ms: u64,
    /// Wait after sending an exit/interrupt before escalating.
    pub post_exit_wait_ms: u64,
    /// Default stagger between consecutive targets in a batch send.
    pub default_stagger_ms: u64,
    /// Poll interval for acknowledgment tracking, clamped to [100ms, 30s].
    pub ack_poll_interval_ms: u64,
    /// Timeout budget for every Multiplexer Adapter call.
    pub adapter_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prompt_submit_delay_ms: 1500,
            gemini_submit_delay_ms: 400,
            cc_init_wait_ms: 6000,
            ctrl_c_gap_ms: 150,
            post_exit_wait_ms: 3000,
            default_stagger_ms: 500,
            ack_poll_interval_ms: 1000,
            adapter_timeout_ms: 10_000,
        }
    }
}

impl TimingConfig {
    pub fn prompt_submit_delay(&self) -> Duration {
        Duration::from_millis(self.prompt_submit_delay_ms)
    }

    pub fn gemini_submit_delay(&self) -> Duration {
        Duration::from_millis(self.gemini_submit_delay_ms)
    }

    pub fn cc_init_wait(&self) -> Duration {
        Duration::from_millis(self.cc_init_wait_ms)
    }

    pub fn ctrl_c_gap(&self) -> Duration {
        Duration::from_millis(self.ctrl_c_gap_ms)
    }

    pub fn post_exit_wait(&self) -> Duration {
        Duration::from_millis(self.post_exit_wait_ms)
    }

    pub fn default_stagger(&self) -> Duration {
        Duration::from_millis(self.default_stagger_ms)
    }

    /// Poll interval for acknowledgment tracking, clamped to [100ms, 30s]
    /// regardless of what was configured (spec 5).
    pub fn ack_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ack_poll_interval_ms.clamp(100, 30_000))
    }

    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter_timeout_ms)
    }
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
