// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[test]
fn defaults_match_spec_constants() {
    let t = TimingConfig::default();
    assert_eq!(t.prompt_submit_delay(), Duration::from_millis(1500));
    assert_eq!(t.cc_init_wait(), Duration::from_millis(6000));
    assert_eq!(t.ctrl_c_gap(), Duration::from_millis(150));
    assert_eq!(t.post_exit_wait(), Duration::from_millis(3000));
    assert_eq!(t.default_stagger(), Duration::from_millis(500));
}

#[test]
fn ack_poll_interval_is_clamped() {
    let mut t = TimingConfig::default();
    t.ack_poll_interval_ms = 1;
    assert_eq!(t.ack_poll_interval(), Duration::from_millis(100));

    t.ack_poll_interval_ms = 60_000;
    assert_eq!(t.ack_poll_interval(), Duration::from_millis(30_000));

    t.ack_poll_interval_ms = 5_000;
    assert_eq!(t.ack_poll_interval(), Duration::from_millis(5_000));
}
