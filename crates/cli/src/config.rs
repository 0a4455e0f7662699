// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration: a `clap::Parser` struct with `NTM_*` environment
//! fallbacks on every flag, following the teacher's `Config` (long flags +
//! `env = "..."`, a `validate()` pass before dispatch).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ntmcore::timing::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "ntm", version, about = "Fleet orchestration for terminal-resident AI coding agents")]
pub struct Config {
    /// Multiplexer binary to invoke.
    #[arg(long, env = "NTM_TMUX_BIN", default_value = "tmux", global = true)]
    pub tmux_bin: String,

    /// Directory archive JSONL files are written to.
    #[arg(long, env = "NTM_ARCHIVE_DIR", default_value = ".", global = true)]
    pub archive_dir: PathBuf,

    #[arg(long, env = "NTM_ARCHIVE_INTERVAL_SECS", default_value_t = 30, global = true)]
    pub archive_interval_secs: u64,

    #[arg(long, env = "NTM_ARCHIVE_LINES_PER_CAPTURE", default_value_t = 500, global = true)]
    pub archive_lines_per_capture: u32,

    #[arg(long, env = "NTM_DEFAULT_STAGGER_MS", default_value_t = 500, global = true)]
    pub default_stagger_ms: u64,

    #[arg(long, env = "NTM_ADAPTER_TIMEOUT_MS", default_value_t = 10_000, global = true)]
    pub adapter_timeout_ms: u64,

    #[arg(long, env = "NTM_ACK_POLL_INTERVAL_MS", default_value_t = 1_000, global = true)]
    pub ack_poll_interval_ms: u64,

    #[arg(long, env = "NTM_PROMPT_SUBMIT_DELAY_MS", default_value_t = 1_500, global = true)]
    pub prompt_submit_delay_ms: u64,

    #[arg(long, env = "NTM_GEMINI_SUBMIT_DELAY_MS", default_value_t = 400, global = true)]
    pub gemini_submit_delay_ms: u64,

    #[arg(long, env = "NTM_CC_INIT_WAIT_MS", default_value_t = 6_000, global = true)]
    pub cc_init_wait_ms: u64,

    #[arg(long, env = "NTM_CTRL_C_GAP_MS", default_value_t = 150, global = true)]
    pub ctrl_c_gap_ms: u64,

    #[arg(long, env = "NTM_POST_EXIT_WAIT_MS", default_value_t = 3_000, global = true)]
    pub post_exit_wait_ms: u64,

    #[arg(long, value_enum, env = "NTM_LOG_FORMAT", default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[arg(long, env = "NTM_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit a RobotEnvelope JSON object instead of human-readable text
    /// (spec 4.H/6). Every `--robot-*=<session>` flag implies this.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Validation pass run before dispatch, mirroring the teacher's
    /// `Config::validate`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmux_bin.trim().is_empty() {
            anyhow::bail!("--tmux-bin must not be empty");
        }
        if self.ack_poll_interval_ms == 0 {
            anyhow::bail!("--ack-poll-interval-ms must be nonzero");
        }
        Ok(())
    }

    pub fn timing(&self) -> TimingConfig {
        TimingConfig {
            prompt_submit_delay_ms: self.prompt_submit_delay_ms,
            gemini_submit_delay_ms: self.gemini_submit_delay_ms,
            cc_init_wait_ms: self.cc_init_wait_ms,
            ctrl_c_gap_ms: self.ctrl_c_gap_ms,
            post_exit_wait_ms: self.post_exit_wait_ms,
            default_stagger_ms: self.default_stagger_ms,
            ack_poll_interval_ms: self.ack_poll_interval_ms,
            adapter_timeout_ms: self.adapter_timeout_ms,
        }
    }

    /// Install the global `tracing` subscriber. Called once at process
    /// start, before any command runs.
    pub fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

        match self.log_format {
            LogFormat::Json => {
                let _ = subscriber.json().try_init();
            }
            LogFormat::Text => {
                let _ = subscriber.try_init();
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Spawn(crate::commands::spawn::SpawnArgs),
    Send(crate::commands::send::SendArgs),
    Interrupt(crate::commands::interrupt::InterruptArgs),
    Restart(crate::commands::restart::RestartArgs),
    Kill(crate::commands::kill::KillArgs),
    List(crate::commands::list::ListArgs),
    Status(crate::commands::status::StatusArgs),
    Copy(crate::commands::copy::CopyArgs),
    Lock(crate::commands::lock::LockArgs),
    Unlock(crate::commands::unlock::UnlockArgs),
    Resume(crate::commands::resume::ResumeArgs),
}
