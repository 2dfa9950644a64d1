//! Core Deriver implementation: per-person orchestration and the pass driver

use crate::date_deriver::{DateDeriver, Direction};
use crate::messages::{format_message, Localizer, PassthroughLocalizer, CREATED_DERIVATIONS, UPDATED_DERIVATIONS};
use crate::{DerivationCounts, DerivationMetrics, DeriverConfig, DeriverError, Result};
use kinfolk_domain::{
    Ancestry, Datey, Event, EventType, EventTypeId, EventTypeRegistry, EventTypeRelations, Person, PersonId, Role,
};
use std::collections::HashSet;

/// Deriver service that fills in event dates from related events
///
/// For every derivable event type and every person, the Deriver:
/// - Extends existing events of that type whose dates are missing an edge
/// - Creates a new event of a creatable type if the person has none
/// - Copies the citations of the reference events it derives from
///
/// # Examples
///
/// ```
/// use kinfolk_deriver::Deriver;
/// use kinfolk_domain::{Ancestry, Date, DateRange, Event, Person, Role};
///
/// let mut ancestry = Ancestry::new();
/// let person = ancestry.add_person(Person::new(Some("Jane".to_string())));
/// let death = ancestry.add_event(Event::new("death", Some(Date::ymd(1999, 12, 31).into())));
/// ancestry.attach(person, death, Role::Subject).unwrap();
///
/// let mut deriver = Deriver::default_config();
/// let metrics = deriver.derive(&mut ancestry);
///
/// // A birth was created before the death.
/// assert_eq!(metrics.counts(&"birth".into()).created, 1);
/// ```
pub struct Deriver<L = PassthroughLocalizer> {
    config: DeriverConfig,
    registry: EventTypeRegistry,
    event_types: Vec<EventTypeId>,
    localizer: L,
    metrics: DerivationMetrics,
}

impl Deriver<PassthroughLocalizer> {
    /// Create a Deriver with the registry described by the configuration
    pub fn new(config: DeriverConfig) -> Result<Self> {
        let registry = config.registry()?;
        Self::with_registry(registry, config)
    }

    /// Create a Deriver over an explicit registry
    ///
    /// The configuration's registry settings are ignored; its event-type
    /// selection must name derivable types of `registry`.
    pub fn with_registry(registry: EventTypeRegistry, config: DeriverConfig) -> Result<Self> {
        let event_types = config.selected_event_types(&registry)?;
        Ok(Self {
            config,
            registry,
            event_types,
            localizer: PassthroughLocalizer,
            metrics: DerivationMetrics::new(),
        })
    }

    /// Create a Deriver over the builtin event types with default configuration
    pub fn default_config() -> Self {
        let registry = EventTypeRegistry::builtin();
        let event_types = registry.derivable().map(|t| t.id().clone()).collect();
        Self {
            config: DeriverConfig::default(),
            registry,
            event_types,
            localizer: PassthroughLocalizer,
            metrics: DerivationMetrics::new(),
        }
    }
}

impl<L: Localizer> Deriver<L> {
    /// Use a different localizer for summary messages
    pub fn with_localizer<M: Localizer>(self, localizer: M) -> Deriver<M> {
        Deriver {
            config: self.config,
            registry: self.registry,
            event_types: self.event_types,
            localizer,
            metrics: self.metrics,
        }
    }

    /// The event-type registry
    pub fn registry(&self) -> &EventTypeRegistry {
        &self.registry
    }

    /// The configuration
    pub fn config(&self) -> &DeriverConfig {
        &self.config
    }

    /// Metrics accumulated over all passes
    pub fn metrics(&self) -> &DerivationMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run one derivation pass over the whole ancestry
    ///
    /// Event types are processed one at a time, in registry order; relations
    /// are aggregated once per type. Returns the metrics of this pass.
    pub fn derive(&mut self, ancestry: &mut Ancestry) -> DerivationMetrics {
        let mut pass = DerivationMetrics::new();
        let people = ancestry.person_ids();

        for id in &self.event_types {
            let Some(event_type) = self.registry.get(id) else {
                continue;
            };
            let relations = self.registry.aggregate_relations(event_type);
            let overlap = relations.overlap();
            if !overlap.is_empty() {
                tracing::warn!(
                    event_type = %id,
                    "Event types {:?} are declared both before and after {}",
                    overlap,
                    id
                );
            }

            let mut counts = DerivationCounts::default();
            for &person in &people {
                counts += self.derive_person_with(ancestry, person, event_type, &relations);
                pass.record_scan();
            }
            pass.record(id, counts);

            for line in self.summary_lines(event_type, counts) {
                tracing::info!(event_type = %id, created = counts.created, updated = counts.updated, "{}", line);
            }
        }

        pass.record_pass();
        self.metrics.merge(&pass);
        pass
    }

    /// Derive one event type for one person
    pub fn derive_person(
        &self,
        ancestry: &mut Ancestry,
        person: PersonId,
        event_type: &EventTypeId,
    ) -> Result<DerivationCounts> {
        let event_type = self
            .registry
            .get(event_type)
            .ok_or_else(|| DeriverError::UnknownEventType(event_type.to_string()))?;
        if !event_type.is_derivable() {
            return Err(DeriverError::NotDerivable(event_type.id().to_string()));
        }
        if ancestry.person(person).is_none() {
            return Err(DeriverError::UnknownPerson(person.to_string()));
        }

        let relations = self.registry.aggregate_relations(event_type);
        Ok(self.derive_person_with(ancestry, person, event_type, &relations))
    }

    /// The localized summary lines for one event type's derivations
    ///
    /// Creation is only reported for creatable types.
    pub fn summary_lines(&self, event_type: &EventType, counts: DerivationCounts) -> Vec<String> {
        let label = self.localizer.translate(event_type.label());
        let updated = counts.updated.to_string();
        let mut lines = vec![format_message(
            &self.localizer.translate(UPDATED_DERIVATIONS),
            &[("updated_derivations", &updated), ("event_type", &label)],
        )];

        if event_type.is_creatable() {
            let created = counts.created.to_string();
            lines.push(format_message(
                &self.localizer.translate(CREATED_DERIVATIONS),
                &[("created_derivations", &created), ("event_type", &label)],
            ));
        }

        lines
    }

    fn derive_person_with(
        &self,
        ancestry: &mut Ancestry,
        person_id: PersonId,
        event_type: &EventType,
        relations: &EventTypeRelations,
    ) -> DerivationCounts {
        let Some(person) = ancestry.person(person_id) else {
            return DerivationCounts::default();
        };

        let mut targets = derivable_events(ancestry, person, event_type.id(), relations);
        if targets.is_empty() {
            let has_presence = ancestry
                .events_of(person)
                .any(|event| &event.event_type == event_type.id());
            if has_presence || !event_type.is_creatable() {
                return DerivationCounts::default();
            }
            targets.push(Event::derived(event_type.id().clone()));
        }

        let comes_before = DateDeriver::new(Direction::ComesBefore);
        let comes_after = DateDeriver::new(Direction::ComesAfter);
        let mut derived = Vec::new();

        for mut target in targets {
            let (needs_start, needs_end) = missing_edges(target.date.as_ref());
            let mut dates_derived = false;
            if needs_end {
                dates_derived |= comes_before.derive(ancestry, person, &mut target, &relations.before);
            }
            if needs_start {
                dates_derived |= comes_after.derive(ancestry, person, &mut target, &relations.after);
            }

            if dates_derived {
                derived.push(target);
            }
        }

        let mut counts = DerivationCounts::default();
        for event in derived {
            if event.is_derived() {
                counts.created += 1;
            } else {
                counts.updated += 1;
            }

            if self.config.dry_run {
                tracing::info!(
                    "DRY RUN: Would {} {} event {} for person {} ({})",
                    if event.is_derived() { "create" } else { "update" },
                    event.event_type,
                    event.id,
                    person_id,
                    event.date.map(|date| date.to_string()).unwrap_or_default()
                );
                continue;
            }

            if event.is_derived() {
                let event_id = ancestry.add_event(event);
                if let Err(e) = ancestry.attach(person_id, event_id, Role::Subject) {
                    tracing::warn!("Failed to attach derived event {}: {}", event_id, e);
                }
            } else {
                ancestry.replace_event(event);
            }
        }

        counts
    }
}

/// Which edges of a date derivation may fill, as (start, end)
fn missing_edges(date: Option<&Datey>) -> (bool, bool) {
    match date {
        None => (true, true),
        Some(Datey::Range(range)) => (range.start.is_none(), range.end.is_none()),
        Some(Datey::Date(_)) => (false, false),
    }
}

/// The person's sourced events of `event_type` that still miss date
/// information the type's relations could provide
fn derivable_events(
    ancestry: &Ancestry,
    person: &Person,
    event_type: &EventTypeId,
    relations: &EventTypeRelations,
) -> Vec<Event> {
    let mut seen = HashSet::new();
    ancestry
        .events_of(person)
        .filter(|event| !event.is_derived())
        .filter(|event| &event.event_type == event_type)
        .filter(|event| match &event.date {
            None => true,
            Some(Datey::Date(_)) => false,
            Some(Datey::Range(range)) => {
                (range.start.is_none() && !relations.after.is_empty())
                    || (range.end.is_none() && !relations.before.is_empty())
            }
        })
        .filter(|event| seen.insert(event.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinfolk_domain::{Citation, Date, DateRange};

    fn registry() -> EventTypeRegistry {
        let mut registry = EventTypeRegistry::new();
        registry.register(EventType::new("birth", "Birth").creatable()).unwrap();
        registry
            .register(EventType::new("baptism", "Baptism").comes_after(["birth"]).comes_before(["death"]))
            .unwrap();
        registry
            .register(EventType::new("death", "Death").comes_after(["birth"]).creatable())
            .unwrap();
        registry
            .register(EventType::new("burial", "Burial").comes_after(["death"]).derivable())
            .unwrap();
        registry
    }

    fn deriver() -> Deriver {
        Deriver::with_registry(registry(), DeriverConfig::default()).unwrap()
    }

    fn add(ancestry: &mut Ancestry, person: PersonId, event: Event) -> kinfolk_domain::EventId {
        let id = ancestry.add_event(event);
        ancestry.attach(person, id, Role::Subject).unwrap();
        id
    }

    #[test]
    fn test_deriver_creation() {
        let deriver = deriver();
        assert_eq!(deriver.metrics().pass_count, 0);
        assert_eq!(deriver.event_types, vec!["birth".into(), "death".into(), "burial".into()]);
    }

    #[test]
    fn test_with_registry_rejects_invalid_selection() {
        let config = DeriverConfig {
            event_types: Some(vec!["baptism".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            Deriver::with_registry(registry(), config),
            Err(DeriverError::NotDerivable(_))
        ));
    }

    #[test]
    fn test_updates_existing_event() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        let birth = add(&mut ancestry, person, Event::new("birth", None));
        add(&mut ancestry, person, Event::new("baptism", Some(Date::ymd(1970, 3, 1).into())));

        let counts = deriver().derive_person(&mut ancestry, person, &"birth".into()).unwrap();

        assert_eq!(counts, DerivationCounts { created: 0, updated: 1 });
        assert_eq!(
            ancestry.event(birth).unwrap().date,
            Some(DateRange::before(Date::ymd(1970, 3, 1)).into())
        );
    }

    #[test]
    fn test_event_attached_twice_is_derived_once() {
        let mut ancestry = Ancestry::new();
        let register = ancestry.add_citation(Citation::new("Parish register"));
        let person = ancestry.add_person(Person::new(None));
        let birth = add(&mut ancestry, person, Event::new("birth", None));
        ancestry.attach(person, birth, Role::Witness).unwrap();
        add(
            &mut ancestry,
            person,
            Event::new("baptism", Some(Date::ymd(1970, 3, 1).into())).with_citation(register),
        );

        let counts = deriver().derive_person(&mut ancestry, person, &"birth".into()).unwrap();

        assert_eq!(counts, DerivationCounts { created: 0, updated: 1 });
        assert_eq!(ancestry.event(birth).unwrap().citations, vec![register]);
    }

    #[test]
    fn test_creates_event_when_person_has_none() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        add(&mut ancestry, person, Event::new("death", Some(Date::ymd(1999, 12, 31).into())));

        let counts = deriver().derive_person(&mut ancestry, person, &"burial".into()).unwrap();
        // Burial is derivable but not creatable.
        assert!(counts.is_empty());

        let counts = deriver().derive_person(&mut ancestry, person, &"birth".into()).unwrap();
        assert_eq!(counts, DerivationCounts { created: 1, updated: 0 });

        let person = ancestry.person(person).unwrap();
        let births: Vec<&Event> = ancestry
            .events_of(person)
            .filter(|e| e.event_type == "birth".into())
            .collect();
        assert_eq!(births.len(), 1);
        assert!(births[0].is_derived());
        assert_eq!(births[0].date, Some(DateRange::before(Date::ymd(1999, 12, 31)).into()));
    }

    #[test]
    fn test_does_not_attach_event_without_data() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));

        let counts = deriver().derive_person(&mut ancestry, person, &"birth".into()).unwrap();

        assert!(counts.is_empty());
        assert!(ancestry.person(person).unwrap().presences.is_empty());
        assert_eq!(ancestry.events().count(), 0);
    }

    #[test]
    fn test_existing_complete_event_blocks_creation() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        add(&mut ancestry, person, Event::new("birth", Some(Date::ymd(1970, 1, 1).into())));
        add(&mut ancestry, person, Event::new("baptism", Some(Date::ymd(1970, 3, 1).into())));

        let counts = deriver().derive_person(&mut ancestry, person, &"birth".into()).unwrap();

        assert!(counts.is_empty());
        assert_eq!(ancestry.person(person).unwrap().presences.len(), 2);
    }

    #[test]
    fn test_both_edges_are_derived() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        let baptism = add(&mut ancestry, person, Event::new("baptism", None));
        add(&mut ancestry, person, Event::new("birth", Some(Date::ymd(1970, 1, 1).into())));
        add(&mut ancestry, person, Event::new("death", Some(Date::ymd(2000, 1, 1).into())));

        let mut registry = EventTypeRegistry::new();
        registry.register(EventType::new("birth", "Birth")).unwrap();
        registry
            .register(
                EventType::new("baptism", "Baptism")
                    .comes_after(["birth"])
                    .comes_before(["death"])
                    .derivable(),
            )
            .unwrap();
        registry.register(EventType::new("death", "Death")).unwrap();
        let deriver = Deriver::with_registry(registry, DeriverConfig::default()).unwrap();

        let counts = deriver.derive_person(&mut ancestry, person, &"baptism".into()).unwrap();

        assert_eq!(counts, DerivationCounts { created: 0, updated: 1 });
        assert_eq!(
            ancestry.event(baptism).unwrap().date,
            Some(
                DateRange::new(Some(Date::ymd(1970, 1, 1)), Some(Date::ymd(2000, 1, 1)))
                    .with_start_boundary(true)
                    .with_end_boundary(true)
                    .into()
            )
        );
    }

    #[test]
    fn test_derive_person_unknown_ids() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        let deriver = deriver();

        assert!(matches!(
            deriver.derive_person(&mut ancestry, person, &"coronation".into()),
            Err(DeriverError::UnknownEventType(_))
        ));
        assert!(matches!(
            deriver.derive_person(&mut ancestry, person, &"baptism".into()),
            Err(DeriverError::NotDerivable(_))
        ));
        assert!(matches!(
            deriver.derive_person(&mut ancestry, PersonId::new(), &"birth".into()),
            Err(DeriverError::UnknownPerson(_))
        ));
    }

    #[test]
    fn test_dry_run_leaves_ancestry_untouched() {
        let mut ancestry = Ancestry::new();
        let person = ancestry.add_person(Person::new(None));
        let birth = add(&mut ancestry, person, Event::new("birth", None));
        add(&mut ancestry, person, Event::new("baptism", Some(Date::ymd(1970, 3, 1).into())));

        let mut deriver = Deriver::with_registry(registry(), DeriverConfig::dry_run()).unwrap();
        let metrics = deriver.derive(&mut ancestry);

        assert_eq!(metrics.counts(&"birth".into()).updated, 1);
        assert_eq!(metrics.counts(&"death".into()).created, 1);
        assert!(ancestry.event(birth).unwrap().date.is_none());
        assert_eq!(ancestry.person(person).unwrap().presences.len(), 2);
    }

    #[test]
    fn test_derive_records_metrics() {
        let mut ancestry = Ancestry::new();
        let citation = ancestry.add_citation(Citation::new("burial register"));
        for _ in 0..2 {
            let person = ancestry.add_person(Person::new(None));
            add(
                &mut ancestry,
                person,
                Event::new("death", Some(Date::ymd(1999, 12, 31).into())).with_citation(citation),
            );
            add(&mut ancestry, person, Event::new("burial", None));
        }

        let mut deriver = deriver();
        let metrics = deriver.derive(&mut ancestry);

        assert_eq!(metrics.pass_count, 1);
        assert_eq!(metrics.persons_scanned, 6);
        assert_eq!(metrics.counts(&"burial".into()), DerivationCounts { created: 0, updated: 2 });
        assert_eq!(metrics.counts(&"birth".into()), DerivationCounts { created: 2, updated: 0 });

        deriver.derive(&mut ancestry);
        assert_eq!(deriver.metrics().pass_count, 2);
        assert_eq!(deriver.metrics().total_updated(), 2);

        deriver.reset_metrics();
        assert_eq!(deriver.metrics().pass_count, 0);
    }

    #[test]
    fn test_summary_lines() {
        let deriver = deriver();
        let counts = DerivationCounts { created: 2, updated: 3 };

        let birth = deriver.registry().get(&"birth".into()).unwrap();
        assert_eq!(
            deriver.summary_lines(birth, counts),
            vec![
                "Updated 3 Birth events based on existing information.".to_string(),
                "Created 2 additional Birth events based on existing information.".to_string(),
            ]
        );

        let burial = deriver.registry().get(&"burial".into()).unwrap();
        assert_eq!(deriver.summary_lines(burial, counts).len(), 1);
    }

    #[test]
    fn test_missing_edges() {
        assert_eq!(missing_edges(None), (true, true));
        assert_eq!(missing_edges(Some(&Date::year(1970).into())), (false, false));
        assert_eq!(
            missing_edges(Some(&DateRange::after(Date::year(1970)).into())),
            (false, true)
        );
    }
}
