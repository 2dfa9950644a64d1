//! Reference selection and boundary derivation
//!
//! A [`DateDeriver`] bounds one side of an event's date by the closest date
//! of a person's other events that must happen on the far side of it. Events
//! that come later bound the end, events that come earlier bound the start.

use kinfolk_domain::{Ancestry, CitationId, Date, DateRange, Datey, Event, EventId, EventTypeId, Person};
use std::collections::BTreeSet;

/// Which side of the target's date a derivation fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The target comes before the references: bound its end
    ComesBefore,

    /// The target comes after the references: bound its start
    ComesAfter,
}

impl Direction {
    /// The dates of a reference range that are precise enough to anchor on
    ///
    /// A boundary edge is only a loose limit, so it can anchor in the
    /// direction it already points to but not in the other one.
    fn range_anchors(self, range: &DateRange) -> impl Iterator<Item = Date> {
        let (start, end) = match self {
            Direction::ComesBefore => (range.start.filter(|_| !range.start_is_boundary), range.end),
            Direction::ComesAfter => (range.start, range.end.filter(|_| !range.end_is_boundary)),
        };
        start.into_iter().chain(end)
    }

    fn anchors(self, date: Option<&Datey>) -> Vec<Date> {
        match date {
            Some(Datey::Date(date)) => vec![*date],
            Some(Datey::Range(range)) => self.range_anchors(range).collect(),
            None => Vec::new(),
        }
    }

    /// Whether `anchor` lies strictly beyond the target's opposite edge
    fn accepts(self, target: Option<&Datey>, anchor: &Date) -> bool {
        let opposite = match (self, target) {
            (_, Some(Datey::Date(date))) => Some(date),
            (Direction::ComesBefore, Some(Datey::Range(range))) => range.start.as_ref(),
            (Direction::ComesAfter, Some(Datey::Range(range))) => range.end.as_ref(),
            (_, None) => None,
        };
        match opposite.filter(|date| date.comparable()) {
            Some(opposite) => match self {
                Direction::ComesBefore => opposite < anchor,
                Direction::ComesAfter => opposite > anchor,
            },
            None => true,
        }
    }

    /// Whether `a` lies strictly closer to the target than `b`
    fn closer(self, a: &Date, b: &Date) -> bool {
        match self {
            Direction::ComesBefore => a < b,
            Direction::ComesAfter => a > b,
        }
    }

    /// Pick the closest of the accepted anchors
    ///
    /// Date ordering is partial and not transitive, so this picks the first
    /// anchor with the fewest strictly closer rivals; that is the first
    /// minimal anchor whenever one exists. Anchors without a year only
    /// compete when no anchor has one.
    fn closest<T>(self, candidates: Vec<(T, Date)>) -> Option<(T, Date)> {
        let with_year = candidates.iter().any(|(_, date)| date.year.is_some());
        let candidates: Vec<(T, Date)> = candidates
            .into_iter()
            .filter(|(_, date)| !with_year || date.year.is_some())
            .collect();

        let position = (0..candidates.len()).min_by_key(|&i| {
            let date = &candidates[i].1;
            candidates
                .iter()
                .filter(|(_, rival)| self.closer(rival, date))
                .count()
        })?;
        candidates.into_iter().nth(position)
    }
}

/// The reference date chosen for a derivation
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// The reference event
    pub event: EventId,

    /// The reference date
    pub date: Date,

    /// The reference event's citations
    pub citations: Vec<CitationId>,
}

/// Derives one edge of an event's date from a person's reference events
#[derive(Debug, Clone, Copy)]
pub struct DateDeriver {
    direction: Direction,
}

impl DateDeriver {
    /// Create a deriver for the given direction
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// The direction this deriver fills
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Choose the reference date closest to `target` among the person's
    /// events of the reference types
    ///
    /// Derived events never serve as references: their ranges say when
    /// something happened *at some point*, not when it started or ended.
    pub fn select(
        &self,
        ancestry: &Ancestry,
        person: &Person,
        target: &Event,
        reference_types: &BTreeSet<EventTypeId>,
    ) -> Option<Anchor> {
        if reference_types.is_empty() {
            return None;
        }

        let direction = self.direction;
        let candidates: Vec<(&Event, Date)> = ancestry
            .events_of(person)
            .filter(|event| event.id != target.id)
            .filter(|event| !event.is_derived())
            .filter(|event| reference_types.contains(&event.event_type))
            .flat_map(|event| {
                direction
                    .anchors(event.date.as_ref())
                    .into_iter()
                    .map(move |date| (event, date))
            })
            .filter(|(_, date)| date.comparable())
            .filter(|(_, date)| direction.accepts(target.date.as_ref(), date))
            .collect();

        direction.closest(candidates).map(|(event, date)| Anchor {
            event: event.id,
            date,
            citations: event.citations.clone(),
        })
    }

    /// Write a derived edge onto `target`
    ///
    /// The edge is always a boundary: a derived date is an inference, never
    /// an attested value. Returns false, leaving the event untouched, if the
    /// event has an exact date.
    pub fn apply(&self, target: &mut Event, anchor: &Anchor) -> bool {
        let Some(range) = target.date_range_mut() else {
            return false;
        };
        match self.direction {
            Direction::ComesBefore => {
                range.end = Some(anchor.date);
                range.end_is_boundary = true;
            }
            Direction::ComesAfter => {
                range.start = Some(anchor.date);
                range.start_is_boundary = true;
            }
        }
        target.citations.extend(anchor.citations.iter().copied());
        true
    }

    /// Select a reference and apply it to `target`
    ///
    /// Returns true iff an edge was written.
    pub fn derive(
        &self,
        ancestry: &Ancestry,
        person: &Person,
        target: &mut Event,
        reference_types: &BTreeSet<EventTypeId>,
    ) -> bool {
        if matches!(target.date, Some(Datey::Date(_))) {
            return false;
        }
        match self.select(ancestry, person, target, reference_types) {
            Some(anchor) => {
                tracing::debug!(
                    event = %target.id,
                    reference = %anchor.event,
                    direction = ?self.direction,
                    date = %anchor.date,
                    "Derived date boundary"
                );
                self.apply(target, &anchor)
            }
            None => false,
        }
    }
}
