//! Model transports for TableTalk.
//!
//! A transport turns a list of chat messages into the model's raw text
//! reply. It knows nothing about the response contract — validation
//! happens upstream in the gateway's retry loop.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaTransport;
pub use traits::ModelTransport;
