//! OuterTune queue CLI
//!
//! Operator tooling over the persisted queue board: list and inspect stored
//! queues, delete one, or prune the board down to a smaller capacity.

pub mod commands;
pub mod config;
pub mod error;
