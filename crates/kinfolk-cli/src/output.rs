//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use kinfolk_deriver::DerivationMetrics;
use kinfolk_domain::{EventTypeId, EventTypeRegistry};
use std::collections::BTreeSet;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the metrics of a derivation pass.
    pub fn format_metrics(&self, metrics: &DerivationMetrics) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let derivations: serde_json::Map<String, serde_json::Value> = metrics
                    .derivations
                    .iter()
                    .map(|(event_type, counts)| {
                        (
                            event_type.to_string(),
                            serde_json::json!({
                                "created": counts.created,
                                "updated": counts.updated
                            }),
                        )
                    })
                    .collect();

                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "passes": metrics.pass_count,
                    "persons_scanned": metrics.persons_scanned,
                    "derivations": derivations,
                    "total_created": metrics.total_created(),
                    "total_updated": metrics.total_updated()
                }))?)
            }
            CliFormat::Text => Ok(metrics.summary()),
        }
    }

    /// Format the registered event types with their aggregated ordering.
    pub fn format_event_types(&self, registry: &EventTypeRegistry) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_event_types_json(registry),
            CliFormat::Text => self.format_event_types_table(registry),
        }
    }

    fn format_event_types_json(&self, registry: &EventTypeRegistry) -> Result<String> {
        let event_types: Vec<serde_json::Value> = registry
            .iter()
            .map(|event_type| {
                let relations = registry.aggregate_relations(event_type);
                serde_json::json!({
                    "id": event_type.id().as_str(),
                    "label": event_type.label(),
                    "derivable": event_type.is_derivable(),
                    "creatable": event_type.is_creatable(),
                    "comes_after": id_list(&relations.after),
                    "comes_before": id_list(&relations.before)
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&event_types)?)
    }

    fn format_event_types_table(&self, registry: &EventTypeRegistry) -> Result<String> {
        if registry.is_empty() {
            return Ok(self.colorize("No event types registered.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Label", "Derivable", "Creatable", "Comes after", "Comes before"]);

        for event_type in registry.iter() {
            let relations = registry.aggregate_relations(event_type);
            builder.push_record([
                event_type.id().to_string(),
                event_type.label().to_string(),
                yes_no(event_type.is_derivable()).to_string(),
                yes_no(event_type.is_creatable()).to_string(),
                id_list(&relations.after).join(", "),
                id_list(&relations.before).join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn id_list(ids: &BTreeSet<EventTypeId>) -> Vec<&str> {
    ids.iter().map(EventTypeId::as_str).collect()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
