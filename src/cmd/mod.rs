//! Subcommands that run outside the long-lived supervisor.

pub mod render;

pub use render::RenderArgs;
