// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Icon/theme registry: the second of exactly two permitted global
//! mutable-state items (spec 5/9), alongside the Change Tracker singleton.
//! Read-mostly, initialized once from environment.

use std::sync::OnceLock;

/// Which icon set to render with. Resolved once from `NTM_ICONS`,
/// `NTM_USE_ICONS`, and `NERD_FONTS` (spec 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSet {
    /// Plain ASCII fallback; always safe.
    Plain,
    /// Standard Unicode emoji/symbols.
    Unicode,
    /// Nerd Fonts glyphs, when the terminal is known to support them.
    NerdFont,
}

impl IconSet {
    fn from_env() -> Self {
        if std::env::var("NTM_ICONS").map(|v| v == "nerd-font").unwrap_or(false)
            || std::env::var("NERD_FONTS").is_ok_and(|v| v != "0" && !v.is_empty())
        {
            return Self::NerdFont;
        }
        let use_icons = std::env::var("NTM_USE_ICONS").map(|v| v != "0").unwrap_or(true);
        if use_icons {
            Self::Unicode
        } else {
            Self::Plain
        }
    }

    pub fn working(&self) -> &'static str {
        match self {
            Self::Plain => "[working]",
            Self::Unicode => "⚙",
            Self::NerdFont => "\u{f085}",
        }
    }

    pub fn idle(&self) -> &'static str {
        match self {
            Self::Plain => "[idle]",
            Self::Unicode => "○",
            Self::NerdFont => "\u{f111}",
        }
    }

    pub fn waiting(&self) -> &'static str {
        match self {
            Self::Plain => "[waiting]",
            Self::Unicode => "⏸",
            Self::NerdFont => "\u{f04c}",
        }
    }

    pub fn error(&self) -> &'static str {
        match self {
            Self::Plain => "[error]",
            Self::Unicode => "✗",
            Self::NerdFont => "\u{f00d}",
        }
    }

    pub fn stopped(&self) -> &'static str {
        match self {
            Self::Plain => "[stopped]",
            Self::Unicode => "■",
            Self::NerdFont => "\u{f04d}",
        }
    }
}

static ICON_SET: OnceLock<IconSet> = OnceLock::new();

/// The process-wide icon set, resolved from environment on first access
/// and cached for the remainder of the process lifetime.
pub fn icon_set() -> IconSet {
    *ICON_SET.get_or_init(IconSet::from_env)
}

#[cfg(test)]
#[path = "theme_tests.rs"]
mod tests;
