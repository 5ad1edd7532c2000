#![deny(clippy::all)]

//! v1cli library: command definitions, handlers, rendering and the
//! interactive dashboard. The `v1` binary is a thin wrapper over this.

pub mod commands;
pub mod export;
pub mod handlers;
pub mod presenter;
pub mod resolve;
pub mod storage;
pub mod table;
pub mod telemetry;
pub mod tui;
