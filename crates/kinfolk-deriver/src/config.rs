//! Configuration for Deriver operations
//!
//! Selects the event-type table and which derivable types a pass covers.

use crate::error::{DeriverError, Result};
use kinfolk_domain::{EventType, EventTypeId, EventTypeRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the Deriver
///
/// # Examples
///
/// ```
/// use kinfolk_deriver::DeriverConfig;
///
/// let config = DeriverConfig::from_toml_str(r#"
/// dry_run = true
/// event_types = ["birth"]
/// "#).unwrap();
/// assert!(config.dry_run);
///
/// let registry = config.registry().unwrap();
/// assert!(registry.contains(&"burial".into()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriverConfig {
    /// Dry-run mode: count and log derivations without changing the ancestry
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Only derive these event types (all derivable types when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<String>>,

    /// Start the registry from the builtin genealogical event types
    /// Default: true
    #[serde(default = "default_builtin_event_types")]
    pub builtin_event_types: bool,

    /// Additional event types, registered after the builtin ones
    #[serde(default, rename = "event_type", skip_serializing_if = "Vec::is_empty")]
    pub custom_event_types: Vec<EventTypeDefinition>,
}

/// An event type declared in configuration
///
/// ```toml
/// [[event_type]]
/// id = "probate"
/// label = "Probate"
/// comes_after = ["death"]
/// derivable = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTypeDefinition {
    /// Unique identifier
    pub id: String,

    /// Human-readable label (the id when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Event types that happen after this one
    #[serde(default)]
    pub comes_before: Vec<String>,

    /// Event types that happen before this one
    #[serde(default)]
    pub comes_after: Vec<String>,

    /// Whether dates of this type may be derived
    #[serde(default)]
    pub derivable: bool,

    /// Whether new events of this type may be created
    #[serde(default)]
    pub creatable: bool,
}

impl EventTypeDefinition {
    fn to_event_type(&self) -> EventType {
        let label = self.label.clone().unwrap_or_else(|| self.id.clone());
        let mut event_type = EventType::new(self.id.as_str(), label)
            .comes_before(self.comes_before.iter().map(String::as_str))
            .comes_after(self.comes_after.iter().map(String::as_str));
        if self.creatable {
            event_type = event_type.creatable();
        } else if self.derivable {
            event_type = event_type.derivable();
        }
        event_type
    }
}

fn default_builtin_event_types() -> bool {
    true
}

impl Default for DeriverConfig {
    /// Derive every derivable builtin event type and write the results
    fn default() -> Self {
        Self {
            dry_run: false,
            event_types: None,
            builtin_event_types: true,
            custom_event_types: Vec::new(),
        }
    }
}

impl DeriverConfig {
    /// Default configuration that only reports what it would derive
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Parse configuration from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DeriverConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Build the event-type registry this configuration describes
    pub fn registry(&self) -> Result<EventTypeRegistry> {
        let mut registry = if self.builtin_event_types {
            EventTypeRegistry::builtin()
        } else {
            EventTypeRegistry::new()
        };

        for definition in &self.custom_event_types {
            if definition.creatable && !definition.derivable {
                return Err(DeriverError::Config(format!(
                    "Event type '{}' is creatable but not derivable",
                    definition.id
                )));
            }
            registry
                .register(definition.to_event_type())
                .map_err(DeriverError::Config)?;
        }

        if let Some((declaring, target)) = registry.unknown_references().into_iter().next() {
            return Err(DeriverError::Config(format!(
                "Event type '{}' refers to unknown event type '{}'",
                declaring, target
            )));
        }

        Ok(registry)
    }

    /// Check that the configuration describes a usable registry and that the
    /// selected event types exist and are derivable
    pub fn validate(&self) -> Result<()> {
        let registry = self.registry()?;
        self.selected_event_types(&registry).map(|_| ())
    }

    /// The derivable event types a pass covers, in registry order
    pub fn selected_event_types(&self, registry: &EventTypeRegistry) -> Result<Vec<EventTypeId>> {
        let Some(selection) = &self.event_types else {
            return Ok(registry.derivable().map(|t| t.id().clone()).collect());
        };

        for id in selection {
            let event_type = registry
                .get(&EventTypeId::new(id.as_str()))
                .ok_or_else(|| DeriverError::UnknownEventType(id.clone()))?;
            if !event_type.is_derivable() {
                return Err(DeriverError::NotDerivable(id.clone()));
            }
        }

        Ok(registry
            .derivable()
            .filter(|t| selection.iter().any(|id| id == t.id().as_str()))
            .map(|t| t.id().clone())
            .collect())
    }
}
