// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent-type submission and interrupt protocols (spec 4.E, spec 9
//! "Paste-then-Enter timing is load-bearing"). Each protocol is built only
//! from [`MultiplexerAdapter`] primitives so it can be exercised against
//! the in-memory fake in tests.

use crate::adapter::{MultiplexerAdapter, SendKeysOptions, Target};
use crate::error::NtmError;
use crate::model::AgentType;
use crate::timing::TimingConfig;

/// Deliver `message` to `target` using the protocol appropriate for
/// `agent_type`. Non-agent panes (`User`, `Unknown`) use the same
/// paste+Enter shape as Gemini, since nothing in the spec defines a
/// dedicated protocol for them and a plain paste is the safest default.
pub async fn submit(
    adapter: &dyn MultiplexerAdapter,
    target: &Target,
    agent_type: AgentType,
    message: &str,
    timing: &TimingConfig,
) -> Result<(), NtmError> {
    match agent_type {
        AgentType::Claude => submit_claude(adapter, target, message, timing).await,
        AgentType::Codex => submit_codex(adapter, target, message).await,
        AgentType::Gemini | AgentType::User | AgentType::Unknown => {
            submit_gemini(adapter, target, message, timing).await
        }
    }
}

/// Claude protocol: paste the body literally, wait for the TUI to render
/// it, then send Return as a separate keystroke. Sending body+Enter as one
/// keystroke is interpreted as a newline within the input, not submit.
async fn submit_claude(
    adapter: &dyn MultiplexerAdapter,
    target: &Target,
    message: &str,
    timing: &TimingConfig,
) -> Result<(), NtmError> {
    adapter.send_paste_buffer(target, message).await?;
    tokio::time::sleep(timing.prompt_submit_delay()).await;
    adapter.send_keys(target, "", SendKeysOptions { literal: false, press_enter: true }).await
}

/// Codex protocol: body and Return in a single keystroke sequence.
async fn submit_codex(adapter: &dyn MultiplexerAdapter, target: &Target, message: &str) -> Result<(), NtmError> {
    adapter.send_keys(target, message, SendKeysOptions { literal: true, press_enter: true }).await
}

/// Gemini protocol: paste, a short delay, then Return — the same shape as
/// Claude but with a shorter default delay.
async fn submit_gemini(
    adapter: &dyn MultiplexerAdapter,
    target: &Target,
    message: &str,
    timing: &TimingConfig,
) -> Result<(), NtmError> {
    adapter.send_paste_buffer(target, message).await?;
    tokio::time::sleep(timing.gemini_submit_delay()).await;
    adapter.send_keys(target, "", SendKeysOptions { literal: false, press_enter: true }).await
}

/// Interrupt protocol (spec 4.E), shared by `interrupt` and `restart`:
/// send Ctrl-C, wait a short gap, and report whether the pane still looks
/// busy afterward so the caller can decide whether to escalate.
pub async fn send_ctrl_c(adapter: &dyn MultiplexerAdapter, target: &Target, timing: &TimingConfig) -> Result<(), NtmError> {
    adapter.send_keys(target, "C-c", SendKeysOptions { literal: false, press_enter: false }).await?;
    tokio::time::sleep(timing.ctrl_c_gap()).await;
    Ok(())
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
