//! The ancestry graph: people, events, presences and citations
//!
//! [`Ancestry`] owns every record. People refer to events through
//! [`Presence`] links and events refer to citations by id, so mutating one
//! event never requires touching the people that participate in it.

use crate::date::{DateRange, Datey};
use crate::event_type::EventTypeId;
use std::collections::HashMap;
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from a UUID string
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid UUID string: {}", e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }
    };
}

entity_id!(
    /// Unique identifier of a person
    PersonId
);
entity_id!(
    /// Unique identifier of an event
    EventId
);
entity_id!(
    /// Unique identifier of a citation
    CitationId
);

/// A reference to evidence in a source
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    /// Unique identifier
    pub id: CitationId,

    /// Where in the source the evidence is found (e.g. "folio 12, entry 3")
    pub location: String,
}

impl Citation {
    /// Create a citation
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            id: CitationId::new(),
            location: location.into(),
        }
    }
}

/// Where an event comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    /// Supplied by source data
    Sourced,

    /// Created by date derivation
    Derived,
}

/// Something that happened, in which people took part
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// Category of the event
    pub event_type: EventTypeId,

    /// When the event happened, if known
    pub date: Option<Datey>,

    /// Evidence for the event, in order
    pub citations: Vec<CitationId>,

    /// Whether the event was sourced or derived
    pub origin: EventOrigin,
}

impl Event {
    /// Create a sourced event
    pub fn new(event_type: impl Into<EventTypeId>, date: Option<Datey>) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            date,
            citations: Vec::new(),
            origin: EventOrigin::Sourced,
        }
    }

    /// Create a derived event without a date
    pub fn derived(event_type: impl Into<EventTypeId>) -> Self {
        Self {
            origin: EventOrigin::Derived,
            ..Self::new(event_type, None)
        }
    }

    /// Add a citation
    pub fn with_citation(mut self, citation: CitationId) -> Self {
        self.citations.push(citation);
        self
    }

    /// Whether the event was created by date derivation
    pub fn is_derived(&self) -> bool {
        self.origin == EventOrigin::Derived
    }

    /// The event's date range, starting an open range if there is no date
    ///
    /// Returns `None` for events with an exact date.
    pub fn date_range_mut(&mut self) -> Option<&mut DateRange> {
        let date = self.date.get_or_insert(Datey::Range(DateRange::open()));
        match date {
            Datey::Range(range) => Some(range),
            Datey::Date(_) => None,
        }
    }
}

/// The part a person played in an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person the event is about
    Subject,
    /// Witnessed the event
    Witness,
    /// Attended the event
    Attendee,
    /// Benefited from the event (e.g. a will)
    Beneficiary,
    /// Officiated the event
    Celebrant,
    /// Organized the event
    Organizer,
    /// Spoke at the event
    Speaker,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Witness => "witness",
            Role::Attendee => "attendee",
            Role::Beneficiary => "beneficiary",
            Role::Celebrant => "celebrant",
            Role::Organizer => "organizer",
            Role::Speaker => "speaker",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "subject" => Some(Role::Subject),
            "witness" => Some(Role::Witness),
            "attendee" => Some(Role::Attendee),
            "beneficiary" => Some(Role::Beneficiary),
            "celebrant" => Some(Role::Celebrant),
            "organizer" => Some(Role::Organizer),
            "speaker" => Some(Role::Speaker),
            _ => None,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// A person's participation in an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    /// The participant
    pub person: PersonId,

    /// The event
    pub event: EventId,

    /// What the person did
    pub role: Role,
}

/// A person
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name, if known
    pub name: Option<String>,

    /// Participations, in order
    pub presences: Vec<Presence>,
}

impl Person {
    /// Create a person without presences
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: PersonId::new(),
            name,
            presences: Vec::new(),
        }
    }
}

/// Owner of all people, events and citations
#[derive(Debug, Clone, Default)]
pub struct Ancestry {
    people: Vec<Person>,
    person_index: HashMap<PersonId, usize>,
    events: HashMap<EventId, Event>,
    citations: HashMap<CitationId, Citation>,
}

impl Ancestry {
    /// Create an empty ancestry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person, returning its id
    pub fn add_person(&mut self, person: Person) -> PersonId {
        let id = person.id;
        self.person_index.insert(id, self.people.len());
        self.people.push(person);
        id
    }

    /// Add an event, returning its id
    pub fn add_event(&mut self, event: Event) -> EventId {
        let id = event.id;
        self.events.insert(id, event);
        id
    }

    /// Add a citation, returning its id
    pub fn add_citation(&mut self, citation: Citation) -> CitationId {
        let id = citation.id;
        self.citations.insert(id, citation);
        id
    }

    /// Link a person to an event in the given role
    pub fn attach(&mut self, person: PersonId, event: EventId, role: Role) -> Result<(), String> {
        if !self.events.contains_key(&event) {
            return Err(format!("Unknown event: {}", event));
        }
        let position = *self
            .person_index
            .get(&person)
            .ok_or_else(|| format!("Unknown person: {}", person))?;
        self.people[position].presences.push(Presence { person, event, role });
        Ok(())
    }

    /// Look up a person
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.person_index.get(&id).map(|&position| &self.people[position])
    }

    /// Look up an event
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Look up an event for modification
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    /// Replace a stored event with an updated copy of it
    ///
    /// Returns the previous version, or `None` (storing nothing) if the event
    /// is unknown.
    pub fn replace_event(&mut self, event: Event) -> Option<Event> {
        let stored = self.events.get_mut(&event.id)?;
        Some(std::mem::replace(stored, event))
    }

    /// Look up a citation
    pub fn citation(&self, id: CitationId) -> Option<&Citation> {
        self.citations.get(&id)
    }

    /// All people, in insertion order
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Ids of all people, in insertion order
    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|person| person.id).collect()
    }

    /// All events, in no particular order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// All citations, in no particular order
    pub fn citations(&self) -> impl Iterator<Item = &Citation> {
        self.citations.values()
    }

    /// The events a person takes part in, in presence order
    ///
    /// An event appears once per presence.
    pub fn events_of<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Event> + 'a {
        person
            .presences
            .iter()
            .filter_map(move |presence| self.events.get(&presence.event))
    }
}
