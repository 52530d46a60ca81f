//! Metadata parsing
//!
//! Turns decoded GDT text into an ordered list of field values, one per
//! configured identifier. Parsing fails as a whole if any identifier is
//! missing; a partial list is never returned.

use crate::error::{Error, Result};
use crate::extract::FieldExtractor;

/// Lines of a decoded metadata file, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    lines: Vec<String>,
}

impl MetadataRecord {
    /// Split decoded text into lines (`\n`, `\r\n` or a lone `\r`)
    pub fn parse(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            lines: normalized.lines().map(str::to_string).collect(),
        }
    }

    /// All lines in file order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Extract one value per identifier, in identifier order
    pub fn extract_all<E, S>(&self, extractor: &E, identifiers: &[S]) -> Result<Vec<String>>
    where
        E: FieldExtractor,
        S: AsRef<str>,
    {
        let mut values = Vec::with_capacity(identifiers.len());
        let mut missing = Vec::new();

        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match extractor.extract(identifier, &self.lines) {
                Some((line, value)) => {
                    tracing::info!("Field {} found in line {}: {}", identifier, line, value);
                    values.push(value);
                }
                None => {
                    tracing::warn!("No line found for field {}", identifier);
                    missing.push(identifier.to_string());
                }
            }
        }

        if !missing.is_empty() {
            return Err(Error::IncompleteExtraction { missing });
        }
        Ok(values)
    }
}

/// Parse decoded metadata text and extract the configured fields
pub fn parse_metadata<E, S>(text: &str, extractor: &E, identifiers: &[S]) -> Result<Vec<String>>
where
    E: FieldExtractor,
    S: AsRef<str>,
{
    MetadataRecord::parse(text).extract_all(extractor, identifiers)
}
