//! Event-type categories and their ordering relations
//!
//! Every event belongs to a category such as birth or burial. Categories
//! declare which other categories must happen after them (`comes_before`)
//! and which must happen before them (`comes_after`). Declarations are
//! one-sided: the registry combines them with the inverse declarations of
//! every other category when asked for a category's relations.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Registered identifier of an event type, e.g. `birth`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTypeId(String);

impl EventTypeId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventTypeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventTypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category of life event
///
/// # Examples
///
/// ```
/// use kinfolk_domain::EventType;
///
/// let burial = EventType::new("burial", "Burial")
///     .comes_after(["death"])
///     .derivable();
/// assert!(burial.is_derivable());
/// assert!(!burial.is_creatable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventType {
    id: EventTypeId,
    label: String,
    comes_before: BTreeSet<EventTypeId>,
    comes_after: BTreeSet<EventTypeId>,
    derivable: bool,
    creatable: bool,
}

impl EventType {
    /// Create a category without relations or capabilities
    pub fn new(id: impl Into<EventTypeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            comes_before: BTreeSet::new(),
            comes_after: BTreeSet::new(),
            derivable: false,
            creatable: false,
        }
    }

    /// Declare categories that must happen after this one
    pub fn comes_before<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EventTypeId>,
    {
        self.comes_before.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Declare categories that must happen before this one
    pub fn comes_after<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EventTypeId>,
    {
        self.comes_after.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Allow dates of this category to be derived
    pub fn derivable(mut self) -> Self {
        self.derivable = true;
        self
    }

    /// Allow new events of this category to be created (implies derivable)
    pub fn creatable(mut self) -> Self {
        self.derivable = true;
        self.creatable = true;
        self
    }

    /// Identifier
    pub fn id(&self) -> &EventTypeId {
        &self.id
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Declared categories that happen after this one
    pub fn declared_comes_before(&self) -> &BTreeSet<EventTypeId> {
        &self.comes_before
    }

    /// Declared categories that happen before this one
    pub fn declared_comes_after(&self) -> &BTreeSet<EventTypeId> {
        &self.comes_after
    }

    /// Whether dates of this category may be derived
    pub fn is_derivable(&self) -> bool {
        self.derivable
    }

    /// Whether new events of this category may be created
    pub fn is_creatable(&self) -> bool {
        self.creatable
    }
}

/// Aggregated relations of one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTypeRelations {
    /// Categories that happen after the category (they bound its end)
    pub before: BTreeSet<EventTypeId>,

    /// Categories that happen before the category (they bound its start)
    pub after: BTreeSet<EventTypeId>,
}

impl EventTypeRelations {
    /// Categories that are both before and after, which only conflicting
    /// declarations produce
    pub fn overlap(&self) -> BTreeSet<EventTypeId> {
        self.before.intersection(&self.after).cloned().collect()
    }
}

/// The table of known event types, in registration order
#[derive(Debug, Clone, Default)]
pub struct EventTypeRegistry {
    types: Vec<EventType>,
    index: HashMap<EventTypeId, usize>,
}

impl EventTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category
    ///
    /// Fails if a category with the same id is already registered.
    pub fn register(&mut self, event_type: EventType) -> Result<(), String> {
        if self.index.contains_key(event_type.id()) {
            return Err(format!("Event type '{}' is already registered", event_type.id()));
        }
        self.index.insert(event_type.id().clone(), self.types.len());
        self.types.push(event_type);
        Ok(())
    }

    /// Look up a category
    pub fn get(&self, id: &EventTypeId) -> Option<&EventType> {
        self.index.get(id).map(|&position| &self.types[position])
    }

    /// Whether a category is registered
    pub fn contains(&self, id: &EventTypeId) -> bool {
        self.index.contains_key(id)
    }

    /// All categories, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &EventType> {
        self.types.iter()
    }

    /// Derivable categories, in registration order
    pub fn derivable(&self) -> impl Iterator<Item = &EventType> {
        self.types.iter().filter(|event_type| event_type.is_derivable())
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Relation targets that are not registered, as (declaring type, target)
    pub fn unknown_references(&self) -> Vec<(EventTypeId, EventTypeId)> {
        self.types
            .iter()
            .flat_map(|event_type| {
                event_type
                    .comes_before
                    .iter()
                    .chain(event_type.comes_after.iter())
                    .filter(|target| !self.contains(target))
                    .map(move |target| (event_type.id.clone(), target.clone()))
            })
            .collect()
    }

    /// Combine a category's own relations with the inverse relations
    /// declared by every registered category
    ///
    /// If C declares `event_type` in its `comes_before`, C happens earlier and
    /// joins `after`; if C declares it in its `comes_after`, C joins `before`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk_domain::{EventType, EventTypeRegistry};
    ///
    /// let mut registry = EventTypeRegistry::new();
    /// registry.register(EventType::new("birth", "Birth").creatable()).unwrap();
    /// registry.register(EventType::new("baptism", "Baptism").comes_after(["birth"])).unwrap();
    ///
    /// let birth = registry.get(&"birth".into()).unwrap();
    /// let relations = registry.aggregate_relations(birth);
    /// assert!(relations.before.contains(&"baptism".into()));
    /// assert!(relations.after.is_empty());
    /// ```
    pub fn aggregate_relations(&self, event_type: &EventType) -> EventTypeRelations {
        let mut relations = EventTypeRelations {
            before: event_type.comes_before.clone(),
            after: event_type.comes_after.clone(),
        };

        for other in &self.types {
            if other.comes_before.contains(&event_type.id) {
                relations.after.insert(other.id.clone());
            }
            if other.comes_after.contains(&event_type.id) {
                relations.before.insert(other.id.clone());
            }
        }

        relations
    }

    /// The standard genealogical event types
    pub fn builtin() -> Self {
        const DURING_LIFE: [(&str, &str); 15] = [
            ("baptism", "Baptism"),
            ("adoption", "Adoption"),
            ("confirmation", "Confirmation"),
            ("engagement", "Engagement"),
            ("marriage-announcement", "Announcement of marriage"),
            ("marriage", "Marriage"),
            ("divorce-announcement", "Announcement of divorce"),
            ("divorce", "Divorce"),
            ("residence", "Residence"),
            ("immigration", "Immigration"),
            ("emigration", "Emigration"),
            ("occupation", "Occupation"),
            ("retirement", "Retirement"),
            ("correspondence", "Correspondence"),
            ("conference", "Conference"),
        ];

        let mut types = vec![EventType::new("birth", "Birth").creatable()];
        for (id, label) in DURING_LIFE {
            let mut event_type = EventType::new(id, label)
                .comes_after(["birth"])
                .comes_before(["death"]);
            event_type = match id {
                "engagement" | "marriage-announcement" => event_type.comes_before(["marriage"]),
                "divorce" => event_type.comes_after(["marriage"]),
                "divorce-announcement" => event_type.comes_after(["marriage"]).comes_before(["divorce"]),
                _ => event_type,
            };
            types.push(event_type);
        }
        types.push(EventType::new("death", "Death").comes_after(["birth"]).creatable());
        for (id, label) in [("funeral", "Funeral"), ("cremation", "Cremation"), ("burial", "Burial")] {
            types.push(EventType::new(id, label).comes_after(["death"]).derivable());
        }
        types.push(EventType::new("unknown", "Unknown"));

        let mut registry = Self::new();
        for event_type in types {
            // Builtin ids are unique.
            let _ = registry.register(event_type);
        }
        registry
    }
}
