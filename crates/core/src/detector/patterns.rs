// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-type-specific classification patterns: a static, table-driven
//! registry so a new agent variant is additive, not a code change to
//! [`super::classify`] (spec 9: "treat it as data, not code").

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{AgentType, ErrorKind};

/// One fatal-banner pattern mapped to the `ErrorKind` it signals.
pub struct FatalPattern {
    pub regex: Regex,
    pub kind: ErrorKind,
}

/// The full pattern set for one agent type.
pub struct AgentPatterns {
    pub fatal: Vec<FatalPattern>,
    pub working_tail: Vec<Regex>,
    pub confirmation_tail: Vec<Regex>,
    pub idle_sentinel: Regex,
    pub shell_prompt: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        // These are compiled once from constants owned by this module;
        // a bad pattern here is a programmer error, not runtime input.
        unreachable!("invalid static pattern {pattern:?}: {e}")
    })
}

fn claude_patterns() -> AgentPatterns {
    AgentPatterns {
        fatal: vec![
            FatalPattern { regex: compile(r"(?i)credit balance too low"), kind: ErrorKind::RateLimited },
            FatalPattern { regex: compile(r"(?i)rate limit exceeded"), kind: ErrorKind::RateLimited },
            FatalPattern { regex: compile(r"(?i)invalid api key|please run /login|authentication_error"), kind: ErrorKind::CrashedAuth },
            FatalPattern { regex: compile(r"(?i)prompt is too long|context_length_exceeded"), kind: ErrorKind::ContextExhausted },
            FatalPattern { regex: compile(r"thread '.*' panicked at"), kind: ErrorKind::OtherError },
        ],
        working_tail: vec![compile(r"(?i)thinking…|thinking\.\.\.|esc to interrupt|tokens")],
        confirmation_tail: vec![compile(r"(?i)do you want to proceed\?|\(y/n\)|allow this|press enter to confirm")],
        idle_sentinel: compile(r"(?m)^>\s*$"),
        shell_prompt: compile(r"(?m)^[\w.\-]+@[\w.\-]+.*[$#]\s*$"),
    }
}

fn codex_patterns() -> AgentPatterns {
    AgentPatterns {
        fatal: vec![
            FatalPattern { regex: compile(r"(?i)rate limit exceeded|429 too many requests"), kind: ErrorKind::RateLimited },
            FatalPattern { regex: compile(r"(?i)not logged in|401 unauthorized|auth(entication)? failed"), kind: ErrorKind::CrashedAuth },
            FatalPattern { regex: compile(r"(?i)context window exceeded|too many tokens"), kind: ErrorKind::ContextExhausted },
            FatalPattern { regex: compile(r"(?i)panic:|fatal error"), kind: ErrorKind::OtherError },
        ],
        working_tail: vec![compile(r"(?i)running tool…|running command|working\.\.\.|⠋|⠙|⠹")],
        confirmation_tail: vec![compile(r"(?i)approve\?|\[y/n\]|allow command")],
        idle_sentinel: compile(r"(?m)^>\s?$"),
        shell_prompt: compile(r"(?m)^[\w.\-]+@[\w.\-]+.*[$#]\s*$"),
    }
}

fn gemini_patterns() -> AgentPatterns {
    AgentPatterns {
        fatal: vec![
            FatalPattern { regex: compile(r"(?i)resource_exhausted|quota exceeded"), kind: ErrorKind::RateLimited },
            FatalPattern { regex: compile(r"(?i)permission_denied|invalid credentials|please run.*auth"), kind: ErrorKind::CrashedAuth },
            FatalPattern { regex: compile(r"(?i)input too long|exceeds the maximum"), kind: ErrorKind::ContextExhausted },
            FatalPattern { regex: compile(r"(?i)unhandled exception|traceback \(most recent call last\)"), kind: ErrorKind::OtherError },
        ],
        working_tail: vec![compile(r"(?i)generating…|generating\.\.\.|loading\.\.\.")],
        confirmation_tail: vec![compile(r"(?i)do you want to continue\?|\(y/n\)")],
        idle_sentinel: compile(r"(?m)^│\s*>\s*│?\s*$"),
        shell_prompt: compile(r"(?m)^[\w.\-]+@[\w.\-]+.*[$#]\s*$"),
    }
}

/// Look up the static pattern set for `agent_type`. `User` and `Unknown`
/// panes are never classified by this registry: callers short-circuit
/// before reaching it (see [`super::classify`]).
pub fn for_agent_type(agent_type: AgentType) -> &'static AgentPatterns {
    static CLAUDE: OnceLock<AgentPatterns> = OnceLock::new();
    static CODEX: OnceLock<AgentPatterns> = OnceLock::new();
    static GEMINI: OnceLock<AgentPatterns> = OnceLock::new();

    match agent_type {
        AgentType::Claude => CLAUDE.get_or_init(claude_patterns),
        AgentType::Codex => CODEX.get_or_init(codex_patterns),
        AgentType::Gemini | AgentType::User | AgentType::Unknown => GEMINI.get_or_init(gemini_patterns),
    }
}
