// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ntm`: fleet orchestration for terminal-resident AI coding agents.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use ntm::commands;
use ntm::config::Config;
use ntm::context::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }
    config.init_logging();

    let json = config.json;
    let ctx = Arc::new(AppContext::new(&config));
    let envelope = commands::dispatch(ctx, config.command).await;

    if json {
        match serde_json::to_string_pretty(&envelope) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => eprintln!("failed to serialize response: {e}"),
        }
    } else {
        commands::print_human(&envelope);
    }

    if envelope.success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
