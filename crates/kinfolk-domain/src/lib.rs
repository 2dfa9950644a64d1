//! Kinfolk Domain Layer
//!
//! This crate contains the genealogical domain model that the date deriver
//! operates on. It depends only on `uuid` for entity identifiers and defines
//! the value objects and entity graph that all other crates build upon.
//!
//! ## Key Concepts
//!
//! - **Date / DateRange / Datey**: Partial, possibly fuzzy dates and ranges
//!   whose edges may be loose boundaries
//! - **Event type**: A category of life event with ordering relations to other
//!   categories and the capability flags *derivable* and *creatable*
//! - **Ancestry**: The owner of all people, events, presences and citations
//!
//! ## Architecture
//!
//! - No I/O, no logging, no configuration
//! - Plain data plus the pure operations over it (ordering, containment,
//!   relation aggregation)
//! - The derivation engine lives in `kinfolk-deriver`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ancestry;
pub mod date;
pub mod event_type;

// Re-exports for convenience
pub use ancestry::{Ancestry, Citation, CitationId, Event, EventId, EventOrigin, Person, PersonId, Presence, Role};
pub use date::{Date, DateRange, Datey};
pub use event_type::{EventType, EventTypeId, EventTypeRegistry, EventTypeRelations};
