// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core engines for orchestrating terminal-multiplexer sessions of AI
//! coding agents: the Multiplexer Adapter, Pane Registry, State Detector,
//! Incremental Output Archiver, Prompt Delivery Pipeline, Session
//! Lifecycle Manager, Cross-Session File Reservation Service, Robot
//! Envelope, and Change Tracker. The CLI crate is a thin surface over
//! this library.

pub mod adapter;
pub mod archiver;
pub mod change_tracker;
pub mod collaborators;
pub mod detector;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod reservation;
pub mod theme;
pub mod timing;
