//! Core runtime — ties sessions, prompt building, the model gateway, and
//! operation dispatch into one deterministic turn loop.
//!
//! Entry point: [`process_message`] takes a session + user message and
//! returns the [`Reply`] to show the user.
//!
//! [`Reply`]: tt_domain::response::Reply

pub mod model_gateway;
pub mod session_lock;
pub mod turn;

pub use model_gateway::ModelGateway;
pub use session_lock::SessionLockMap;
pub use turn::{process_message, TurnInput};
