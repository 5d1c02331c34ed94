//! TableTalk gateway — HTTP server, CLI, and the conversation runtime.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
