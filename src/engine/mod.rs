//! The engine drives the monitor: the fixed-cadence polling loop, the tick
//! classification rules, and on-demand command processing.

pub mod classifier;
pub mod command_handler;
pub mod poller;
