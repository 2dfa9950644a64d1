//! Derive command implementation.

use crate::cli::DeriveArgs;
use crate::document::Document;
use crate::error::Result;
use crate::output::Formatter;
use kinfolk_deriver::{DerivationMetrics, Deriver, DeriverConfig};
use std::fs;

/// Execute the derive command.
///
/// Writes the updated document to the output path or stdout and the metrics
/// to stderr. A dry run writes no document.
pub fn execute_derive(
    args: &DeriveArgs,
    mut config: DeriverConfig,
    formatter: &Formatter,
) -> Result<DerivationMetrics> {
    config.dry_run |= args.dry_run;

    let json = fs::read_to_string(&args.input)?;
    let mut document = Document::from_json(&json)?;
    let metrics = derive_document(&mut document, config.clone())?;

    if config.dry_run {
        eprintln!("{}", formatter.warning("DRY RUN: no document written"));
    } else {
        let output = document.to_json()?;
        match &args.output {
            Some(path) => {
                fs::write(path, output + "\n")?;
                eprintln!("{}", formatter.success(&format!("Wrote {}", path.display())));
            }
            None => println!("{}", output),
        }
    }

    eprintln!("{}", formatter.format_metrics(&metrics)?);
    Ok(metrics)
}

/// Run one derivation pass over a document, updating it in place.
pub fn derive_document(document: &mut Document, config: DeriverConfig) -> Result<DerivationMetrics> {
    let (mut ancestry, ids) = document.to_ancestry()?;
    let dry_run = config.dry_run;

    let mut deriver = Deriver::new(config)?;
    let metrics = deriver.derive(&mut ancestry);

    if !dry_run {
        let appended = document.update_from(&ancestry, &ids);
        tracing::debug!("Appended {} derived events to the document", appended);
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DateValue;

    const FAMILY: &str = r#"
    {
        "citations": [{ "id": "c1", "location": "Parish register" }],
        "events": [
            { "id": "birth", "type": "birth" },
            { "id": "baptism", "type": "baptism", "date": { "year": 1970, "month": 3, "day": 1 }, "citations": ["c1"] }
        ],
        "people": [{ "id": "jane", "presences": [{ "event": "birth" }, { "event": "baptism" }] }]
    }
    "#;

    #[test]
    fn test_derive_document() {
        let mut document = Document::from_json(FAMILY).unwrap();
        let metrics = derive_document(&mut document, DeriverConfig::default()).unwrap();

        assert_eq!(metrics.counts(&"birth".into()).updated, 1);
        assert_eq!(document.events[0].citations, vec!["c1".to_string()]);
        assert!(matches!(document.events[0].date, Some(DateValue::Range(_))));

        // A death is created after the baptism.
        assert_eq!(metrics.counts(&"death".into()).created, 1);
        assert_eq!(document.events.len(), 3);
        assert_eq!(document.people[0].presences.len(), 3);
    }

    #[test]
    fn test_derive_document_dry_run() {
        let mut document = Document::from_json(FAMILY).unwrap();
        let original = document.clone();

        let metrics = derive_document(&mut document, DeriverConfig::dry_run()).unwrap();

        assert_eq!(metrics.counts(&"birth".into()).updated, 1);
        assert_eq!(document, original);
    }

    #[test]
    fn test_derive_document_is_idempotent() {
        let mut document = Document::from_json(FAMILY).unwrap();
        derive_document(&mut document, DeriverConfig::default()).unwrap();
        let once = document.clone();

        let metrics = derive_document(&mut document, DeriverConfig::default()).unwrap();

        assert_eq!(metrics.total_created(), 0);
        assert_eq!(document, once);
    }
}
