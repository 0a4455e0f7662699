// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface (spec 8): one module per subcommand, each exposing a
//! `clap::Args` struct and an async `run` returning a fully-built
//! [`RobotEnvelope`]. [`dispatch`] owns the totality guarantee (testable
//! property 6): every path out of it, including a panicking command body,
//! becomes an envelope.

pub mod copy;
pub mod interrupt;
pub mod kill;
pub mod list;
pub mod lock;
pub mod restart;
pub mod resume;
pub mod send;
pub mod spawn;
pub mod status;
pub mod unlock;

use std::sync::Arc;

use ntmcore::adapter::Target;
use ntmcore::envelope::RobotEnvelope;
use ntmcore::error::NtmError;
use ntmcore::model::AgentType;
use ntmcore::registry::TargetFilter;
use ntmcore::theme::{self, IconSet};

use crate::config::Command;
use crate::context::AppContext;

/// Shared pane-selection flags for subcommands that act on a `TargetFilter`
/// (spec 4.E). Exactly one selector must be given; `resolve` enforces that
/// rather than leaving the ambiguity to whichever field clap happened to
/// fill in.
#[derive(Debug, clap::Args)]
pub struct TargetArgs {
    /// Explicit pane indices, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub panes: Option<Vec<u32>>,
    /// Restrict to one agent type: claude, codex, or gemini.
    #[arg(long)]
    pub agent_type: Option<String>,
    /// Every eligible pane.
    #[arg(long)]
    pub all: bool,
    /// Every eligible pane except these indices, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub all_except: Option<Vec<u32>>,
}

impl TargetArgs {
    pub fn resolve(&self) -> Result<TargetFilter, NtmError> {
        if let Some(indices) = &self.panes {
            return Ok(TargetFilter::Indices(indices.clone()));
        }
        if let Some(excluded) = &self.all_except {
            return Ok(TargetFilter::AllExcept(excluded.clone()));
        }
        if let Some(raw) = &self.agent_type {
            let agent_type = parse_agent_type(raw)
                .ok_or_else(|| NtmError::InvalidArgument { detail: format!("unknown agent type: {raw}") })?;
            return Ok(TargetFilter::AgentType(agent_type));
        }
        if self.all {
            return Ok(TargetFilter::All);
        }
        Err(NtmError::InvalidArgument { detail: "one of --panes, --agent-type, --all, --all-except is required".to_string() })
    }
}

pub fn parse_agent_type(raw: &str) -> Option<AgentType> {
    match raw.to_ascii_lowercase().as_str() {
        "claude" | "cc" => Some(AgentType::Claude),
        "codex" | "cod" => Some(AgentType::Codex),
        "gemini" | "gmi" => Some(AgentType::Gemini),
        _ => None,
    }
}

pub fn target_for(session: &str, pane_index: u32) -> Result<Target, NtmError> {
    Target::new(session, pane_index).ok_or_else(|| NtmError::InvalidArgument { detail: format!("invalid target: {session}:{pane_index}") })
}

pub fn now_epoch_ms() -> u64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

async fn run_command(ctx: &AppContext, command: &Command) -> Result<RobotEnvelope, NtmError> {
    match command {
        Command::Spawn(args) => spawn::run(args, ctx).await,
        Command::Send(args) => send::run(args, ctx).await,
        Command::Interrupt(args) => interrupt::run(args, ctx).await,
        Command::Restart(args) => restart::run(args, ctx).await,
        Command::Kill(args) => kill::run(args, ctx).await,
        Command::List(args) => list::run(args, ctx).await,
        Command::Status(args) => status::run(args, ctx).await,
        Command::Copy(args) => copy::run(args, ctx).await,
        Command::Lock(args) => lock::run(args, ctx).await,
        Command::Unlock(args) => unlock::run(args, ctx).await,
        Command::Resume(args) => resume::run(args, ctx).await,
    }
}

/// Run `command` to completion and fold every outcome — success, a
/// returned [`NtmError`], or a panic inside the command body — into a
/// [`RobotEnvelope`]. A panic is caught by running the command on its own
/// task and inspecting the `JoinError`, since `std::panic::catch_unwind`
/// does not cross an `.await` point.
pub async fn dispatch(ctx: Arc<AppContext>, command: Command) -> RobotEnvelope {
    let task = tokio::spawn(async move { run_command(&ctx, &command).await });

    match task.await {
        Ok(Ok(envelope)) => envelope,
        Ok(Err(err)) => RobotEnvelope::failure(&now_rfc3339(), &err),
        Err(join_err) => {
            let detail = if join_err.is_panic() {
                "command panicked".to_string()
            } else {
                format!("command task did not complete: {join_err}")
            };
            RobotEnvelope::failure(&now_rfc3339(), &NtmError::Internal { detail })
        }
    }
}

fn state_icon(icons: IconSet, state: &str) -> &'static str {
    match state {
        "idle" => icons.idle(),
        "working" => icons.working(),
        "waiting" => icons.waiting(),
        "error" => icons.error(),
        "stopped" => icons.stopped(),
        _ => "",
    }
}

/// Minimal human-readable rendering of an envelope for non-`--json`
/// invocations. The JSON form remains the source of truth; this is a
/// convenience view over the same fields. Pane state, where present, is
/// prefixed with the process-wide icon set (spec 6/9).
pub fn print_human(envelope: &RobotEnvelope) {
    if envelope.success {
        print!("ok");
        if let Some(session) = &envelope.session {
            print!(" session={session}");
        }
        println!();
        let icons = theme::icon_set();
        for (key, value) in &envelope.fields {
            if key == "panes" {
                if let Some(panes) = value.as_array() {
                    println!("  panes:");
                    for pane in panes {
                        let index = pane.get("index").and_then(|v| v.as_u64()).unwrap_or_default();
                        let state = pane.get("state").and_then(|v| v.as_str()).unwrap_or("unknown");
                        let agent_type = pane.get("agent_type").and_then(|v| v.as_str()).unwrap_or("unknown");
                        println!("    {} {index} [{agent_type}] {state}", state_icon(icons, state));
                    }
                    continue;
                }
            }
            println!("  {key}: {value}");
        }
    } else {
        eprint!("error");
        if let Some(code) = &envelope.error_code {
            eprint!(" [{code}]");
        }
        if let Some(msg) = &envelope.error {
            eprint!(": {msg}");
        }
        eprintln!();
        if let Some(hint) = &envelope.hint {
            eprintln!("hint: {hint}");
        }
    }
}
