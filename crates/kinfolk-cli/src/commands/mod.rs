//! Command implementations.

pub mod derive;
pub mod event_types;

pub use self::derive::{derive_document, execute_derive};
pub use self::event_types::execute_event_types;
