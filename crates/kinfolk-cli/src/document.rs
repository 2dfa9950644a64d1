//! Ancestry documents: the JSON format the CLI reads and writes.
//!
//! ```json
//! {
//!   "citations": [{ "id": "c1", "location": "Parish register, folio 12" }],
//!   "events": [
//!     { "id": "e1", "type": "birth", "date": null },
//!     { "id": "e2", "type": "baptism", "date": { "year": 1970, "month": 3, "day": 1 }, "citations": ["c1"] }
//!   ],
//!   "people": [
//!     { "id": "p1", "name": "Jane", "presences": [{ "event": "e1" }, { "event": "e2", "role": "subject" }] }
//!   ]
//! }
//! ```
//!
//! Document ids are free-form; they are mapped to domain ids on load and back
//! again when the document is updated.

use crate::error::{CliError, Result};
use kinfolk_domain::{
    Ancestry, Citation, CitationId, Date, DateRange, Datey, Event, EventId, EventOrigin, Person, PersonId, Role,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A serialized ancestry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Citations
    #[serde(default)]
    pub citations: Vec<CitationRecord>,

    /// Events
    #[serde(default)]
    pub events: Vec<EventRecord>,

    /// People
    #[serde(default)]
    pub people: Vec<PersonRecord>,
}

/// A citation in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Document id
    pub id: String,

    /// Where in the source the evidence is found
    pub location: String,
}

/// An event in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Document id
    pub id: String,

    /// Event type id
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event happened, if known
    #[serde(default)]
    pub date: Option<DateValue>,

    /// Document ids of the event's citations
    #[serde(default)]
    pub citations: Vec<String>,

    /// Whether the event was created by date derivation
    #[serde(default)]
    pub derived: bool,
}

/// A person in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Document id
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Participations in events
    #[serde(default)]
    pub presences: Vec<PresenceRecord>,
}

/// A person's participation in an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Document id of the event
    pub event: String,

    /// Role name
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    Role::Subject.as_str().to_string()
}

/// A date or a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// A single, possibly partial, date
    Date(DatePart),

    /// A range between two optional dates
    Range(RangeValue),
}

/// A single date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatePart {
    /// Year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Month, 1-12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    /// Day of the month, 1-31
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,

    /// Whether the date is approximate
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fuzzy: bool,
}

/// A date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeValue {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DatePart>,

    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DatePart>,

    /// Whether the start is only a limit
    #[serde(default)]
    pub start_is_boundary: bool,

    /// Whether the end is only a limit
    #[serde(default)]
    pub end_is_boundary: bool,
}

impl DatePart {
    fn to_date(self) -> Result<Date> {
        if let Some(month) = self.month.filter(|m| !(1..=12).contains(m)) {
            return Err(CliError::InvalidDocument(format!("Invalid month: {}", month)));
        }
        if let Some(day) = self.day.filter(|d| !(1..=31).contains(d)) {
            return Err(CliError::InvalidDocument(format!("Invalid day: {}", day)));
        }
        let date = Date::new(self.year, self.month, self.day);
        Ok(if self.fuzzy { date.fuzzy() } else { date })
    }
}

impl From<Date> for DatePart {
    fn from(date: Date) -> Self {
        let (year, month, day) = date.parts();
        Self {
            year,
            month,
            day,
            fuzzy: date.fuzzy,
        }
    }
}

impl DateValue {
    /// Convert to a domain date, validating month and day
    pub fn to_datey(self) -> Result<Datey> {
        Ok(match self {
            DateValue::Date(date) => Datey::Date(date.to_date()?),
            DateValue::Range(range) => Datey::Range(DateRange {
                start: range.start.map(DatePart::to_date).transpose()?,
                end: range.end.map(DatePart::to_date).transpose()?,
                start_is_boundary: range.start_is_boundary,
                end_is_boundary: range.end_is_boundary,
            }),
        })
    }
}

impl From<Datey> for DateValue {
    fn from(datey: Datey) -> Self {
        match datey {
            Datey::Date(date) => DateValue::Date(date.into()),
            Datey::Range(range) => DateValue::Range(RangeValue {
                start: range.start.map(Into::into),
                end: range.end.map(Into::into),
                start_is_boundary: range.start_is_boundary,
                end_is_boundary: range.end_is_boundary,
            }),
        }
    }
}

/// The mapping between document ids and domain ids of a loaded document
#[derive(Debug, Clone, Default)]
pub struct DocumentIds {
    people: HashMap<String, PersonId>,
    events: HashMap<String, EventId>,
    citations: HashMap<String, CitationId>,
    event_names: HashMap<EventId, String>,
    citation_names: HashMap<CitationId, String>,
}

impl DocumentIds {
    /// The domain id of a document person
    pub fn person(&self, id: &str) -> Option<PersonId> {
        self.people.get(id).copied()
    }

    /// The domain id of a document event
    pub fn event(&self, id: &str) -> Option<EventId> {
        self.events.get(id).copied()
    }

    /// The domain id of a document citation
    pub fn citation(&self, id: &str) -> Option<CitationId> {
        self.citations.get(id).copied()
    }

    fn citation_names_of(&self, citations: &[CitationId]) -> Vec<String> {
        citations
            .iter()
            .filter_map(|id| self.citation_names.get(id).cloned())
            .collect()
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a String>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CliError::InvalidDocument(format!("Duplicate {} id '{}'", kind, id)));
        }
    }
    Ok(())
}

impl Document {
    /// Parse a document from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the ancestry the document describes
    pub fn to_ancestry(&self) -> Result<(Ancestry, DocumentIds)> {
        check_unique("citation", self.citations.iter().map(|c| &c.id))?;
        check_unique("event", self.events.iter().map(|e| &e.id))?;
        check_unique("person", self.people.iter().map(|p| &p.id))?;

        let mut ancestry = Ancestry::new();
        let mut ids = DocumentIds::default();

        for record in &self.citations {
            let id = ancestry.add_citation(Citation::new(record.location.as_str()));
            ids.citations.insert(record.id.clone(), id);
            ids.citation_names.insert(id, record.id.clone());
        }

        for record in &self.events {
            let date = record.date.map(DateValue::to_datey).transpose()?;
            let mut event = Event::new(record.event_type.as_str(), date);
            if record.derived {
                event.origin = EventOrigin::Derived;
            }
            for citation in &record.citations {
                let citation = ids.citation(citation).ok_or_else(|| {
                    CliError::InvalidDocument(format!(
                        "Event '{}' cites unknown citation '{}'",
                        record.id, citation
                    ))
                })?;
                event.citations.push(citation);
            }
            let id = ancestry.add_event(event);
            ids.events.insert(record.id.clone(), id);
            ids.event_names.insert(id, record.id.clone());
        }

        for record in &self.people {
            let person = ancestry.add_person(Person::new(record.name.clone()));
            ids.people.insert(record.id.clone(), person);
            for presence in &record.presences {
                let event = ids.event(&presence.event).ok_or_else(|| {
                    CliError::InvalidDocument(format!(
                        "Person '{}' refers to unknown event '{}'",
                        record.id, presence.event
                    ))
                })?;
                let role: Role = presence.role.parse().map_err(CliError::InvalidDocument)?;
                ancestry.attach(person, event, role).map_err(CliError::InvalidDocument)?;
            }
        }

        Ok((ancestry, ids))
    }

    /// Write the ancestry's event dates and citations back into the document
    ///
    /// Events the document does not know yet are appended, with generated ids,
    /// and linked to their people. Returns the number of appended events.
    pub fn update_from(&mut self, ancestry: &Ancestry, ids: &DocumentIds) -> usize {
        for record in &mut self.events {
            if let Some(event) = ids.event(&record.id).and_then(|id| ancestry.event(id)) {
                record.date = event.date.map(DateValue::from);
                record.citations = ids.citation_names_of(&event.citations);
            }
        }

        let mut appended = Vec::new();
        let mut names = HashMap::new();
        for record in &mut self.people {
            let Some(person) = ids.person(&record.id).and_then(|id| ancestry.person(id)) else {
                continue;
            };
            for presence in &person.presences {
                if ids.event_names.contains_key(&presence.event) {
                    continue;
                }
                let Some(event) = ancestry.event(presence.event) else {
                    continue;
                };
                let name = names
                    .entry(event.id)
                    .or_insert_with(|| {
                        let name = format!("derived-{}", event.id);
                        appended.push(EventRecord {
                            id: name.clone(),
                            event_type: event.event_type.to_string(),
                            date: event.date.map(DateValue::from),
                            citations: ids.citation_names_of(&event.citations),
                            derived: event.is_derived(),
                        });
                        name
                    })
                    .clone();
                record.presences.push(PresenceRecord {
                    event: name,
                    role: presence.role.as_str().to_string(),
                });
            }
        }

        let count = appended.len();
        self.events.extend(appended);
        count
    }
}
