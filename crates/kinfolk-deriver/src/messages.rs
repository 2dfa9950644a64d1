//! Localized summary messages

/// Summary of updated derivations for one event type
pub const UPDATED_DERIVATIONS: &str =
    "Updated {updated_derivations} {event_type} events based on existing information.";

/// Summary of created derivations for one creatable event type
pub const CREATED_DERIVATIONS: &str =
    "Created {created_derivations} additional {event_type} events based on existing information.";

/// Translates message templates and labels
///
/// Hosts with translation catalogs implement this; the Deriver only ever asks
/// for the two summary templates and event-type labels.
pub trait Localizer {
    /// Translate a message, returning it unchanged when no translation exists
    fn translate(&self, message: &str) -> String;
}

/// Localizer that returns every message untranslated
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLocalizer;

impl Localizer for PassthroughLocalizer {
    fn translate(&self, message: &str) -> String {
        message.to_string()
    }
}

/// Fill `{name}` placeholders in a template
///
/// Placeholders without a matching argument are left as they are. Substituted
/// values are not scanned again.
///
/// # Examples
///
/// ```
/// use kinfolk_deriver::messages::format_message;
///
/// let line = format_message("Updated {n} {type} events", &[("n", "3"), ("type", "Birth")]);
/// assert_eq!(line, "Updated 3 Birth events");
/// ```
pub fn format_message(template: &str, arguments: &[(&str, &str)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match arguments.iter().find(|(argument, _)| *argument == name) {
            Some((_, value)) => message.push_str(value),
            None => message.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    message.push_str(rest);
    message
}
