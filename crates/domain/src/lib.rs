//! Shared domain types for TableTalk.
//!
//! Everything the other crates agree on lives here: the error taxonomy,
//! the operation catalog types, the model response contract, chat wire
//! messages, and configuration.

pub mod config;
pub mod error;
pub mod message;
pub mod operation;
pub mod response;

pub use error::{Error, Result};
pub use message::{ChatMessage, Role};
pub use operation::{ArgMap, OperationSpec, ParamKind, ParamSpec};
pub use response::{ModelResponse, Reply, ReplyKind};
