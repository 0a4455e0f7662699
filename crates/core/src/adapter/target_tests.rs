// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple = { "mysess:1.2" },
    underscored = { "my_sess-1:1.0" },
)]
fn valid_targets_parse(raw: &str) {
    assert!(Target::parse(raw).is_some());
}

#[yare::parameterized(
    bad_window = { "mysess:2.2" },
    non_numeric_pane = { "mysess:1.abc" },
    missing_window_sep = { "mysess:1,2" },
    missing_session_sep = { "mysess1.2" },
    bad_session_chars = { "my sess:1.2" },
    negative_pane = { "mysess:1.-1" },
    shell_injection_attempt = { "mysess; rm -rf /:1.2" },
    empty = { "" },
)]
fn invalid_targets_are_rejected(raw: &str) {
    assert!(Target::parse(raw).is_none(), "{raw:?} must not parse");
}

#[test]
fn round_trips_through_as_tmux_arg() -> anyhow::Result<()> {
    let t = Target::parse("mysess:1.3").ok_or_else(|| anyhow::anyhow!("should parse"))?;
    assert_eq!(t.as_tmux_arg(), "mysess:1.3");
    assert_eq!(t.session(), "mysess");
    assert_eq!(t.pane_index(), 3);
    Ok(())
}

#[test]
fn new_rejects_invalid_session_name() {
    assert!(Target::new("bad session", 2).is_none());
    assert!(Target::new("ok-session", 2).is_some());
}
