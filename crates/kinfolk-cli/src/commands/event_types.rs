//! Event-types command implementation.

use crate::error::Result;
use crate::output::Formatter;
use kinfolk_deriver::DeriverConfig;

/// Execute the event-types command.
pub fn execute_event_types(config: &DeriverConfig, formatter: &Formatter) -> Result<()> {
    let registry = config.registry()?;
    println!("{}", formatter.format_event_types(&registry)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;

    #[test]
    fn test_execute_event_types() {
        let formatter = Formatter::new(CliFormat::Text, false);
        assert!(execute_event_types(&DeriverConfig::default(), &formatter).is_ok());
    }

    #[test]
    fn test_execute_event_types_invalid_config() {
        let config = DeriverConfig {
            builtin_event_types: false,
            custom_event_types: vec![kinfolk_deriver::EventTypeDefinition {
                id: "probate".to_string(),
                label: None,
                comes_before: Vec::new(),
                comes_after: vec!["death".to_string()],
                derivable: true,
                creatable: false,
            }],
            ..Default::default()
        };
        let formatter = Formatter::new(CliFormat::Text, false);
        assert!(execute_event_types(&config, &formatter).is_err());
    }
}
