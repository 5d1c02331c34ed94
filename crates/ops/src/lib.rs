//! Built-in restaurant operations for TableTalk.
//!
//! Implements the eight owner-facing operations (dashboard settings and
//! menu management), the restaurant store they act on, and the catalog
//! that registers them with the dispatcher.

pub mod catalog;
pub mod dashboard;
pub mod menu;
pub mod seed;
pub mod store;
pub mod util;

pub use catalog::register_all;
pub use store::{MenuGroup, MenuItem, Restaurant, RestaurantStore};
