//! Kinfolk Deriver
//!
//! Date derivation for genealogical records: bounds the dates of events that
//! have none (or only half of one) using the dates of a person's other events.
//!
//! # Overview
//!
//! The Deriver is responsible for:
//! - **Updating events**: Adding a start or end boundary to events whose dates are missing one
//! - **Creating events**: Adding a birth or death to people who have none but whose
//!   other events bound when it happened
//! - **Citations**: Carrying the reference events' citations onto what was derived
//! - **Metrics collection**: Counting derivations per event type
//!
//! # Event Type Ordering
//!
//! Event types declare which types come before and after them. A type inherits
//! the inverse of every other type's declarations, so `death` declaring that it
//! comes after `birth` also means `birth` comes before `death`.
//!
//! | Type | Derivable | Creatable |
//! |------|-----------|-----------|
//! | **birth** | yes | yes |
//! | **death** | yes | yes |
//! | **funeral**, **cremation**, **burial** | yes | no |
//! | everything else | no | no |
//!
//! # Usage
//!
//! ```
//! use kinfolk_deriver::Deriver;
//! use kinfolk_domain::{Ancestry, Date, Event, Person, Role};
//!
//! let mut ancestry = Ancestry::new();
//! let person = ancestry.add_person(Person::new(Some("Jane".to_string())));
//! let baptism = ancestry.add_event(Event::new("baptism", Some(Date::ymd(1970, 3, 1).into())));
//! ancestry.attach(person, baptism, Role::Subject).unwrap();
//!
//! let mut deriver = Deriver::default_config();
//! let metrics = deriver.derive(&mut ancestry);
//! println!("{}", metrics.summary());
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use kinfolk_deriver::DeriverConfig;
//!
//! // Default: every derivable builtin event type, results written
//! let config = DeriverConfig::default();
//!
//! // Dry run: count and log derivations, leave the ancestry alone
//! let config = DeriverConfig::dry_run();
//! ```
//!
//! # Configuration
//!
//! The Deriver can be configured via TOML:
//!
//! ```toml
//! dry_run = false
//! event_types = ["birth", "death", "probate"]
//! builtin_event_types = true
//!
//! [[event_type]]
//! id = "probate"
//! label = "Probate"
//! comes_after = ["death"]
//! derivable = true
//! ```

#![warn(missing_docs)]

mod config;
mod date_deriver;
mod deriver;
mod error;
mod metrics;
pub mod messages;

pub use config::{DeriverConfig, EventTypeDefinition};
pub use date_deriver::{Anchor, DateDeriver, Direction};
pub use deriver::Deriver;
pub use error::{DeriverError, Result};
pub use messages::{Localizer, PassthroughLocalizer};
pub use metrics::{DerivationCounts, DerivationMetrics};
