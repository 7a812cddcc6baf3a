#![warn(missing_docs)]
//! Headcount is a monitoring bot that polls a game server for its online-player
//! count, keeps a capped sample history, and reports status changes to Discord.

pub mod chart;
pub mod cmd;
pub mod config;
pub mod context;
pub mod engine;
pub mod http_client;
pub mod http_server;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod providers;
pub mod supervisor;
pub mod test_helpers;
