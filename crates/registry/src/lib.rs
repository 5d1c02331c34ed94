//! Operation registry, argument checking, dispatch, and the model
//! response validator.
//!
//! The registry is populated once at startup and wrapped in an `Arc`;
//! everything after bootstrap only reads it, so lookups take no lock.

pub mod dispatch;
pub mod registry;
pub mod validate;

pub use dispatch::{OpContext, OperationHandler};
pub use registry::Registry;
pub use validate::validate_response;
