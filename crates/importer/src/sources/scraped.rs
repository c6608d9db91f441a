use serde_json::{Map, Value};
use tracing::debug;

use super::ingest;
use crate::mapping::FieldMapping;
use crate::row::{FieldValue, ImportOptions, RowRejection};
use crate::summary::ParseOutcome;
use crate::traits::ResultImporter;
use crate::{ImporterError, Result};

/// A JSON array of flat objects, one per finisher, as written by the
/// results scraper. Object keys play the role of CSV headers.
pub struct ScrapedJsonImporter;

impl ScrapedJsonImporter {
    fn parse_items(input: &str) -> Result<Vec<Value>> {
        match serde_json::from_str(input)? {
            Value::Array(items) => Ok(items),
            _ => Err(ImporterError::MappingError(
                "Scraped results must be a JSON array of objects".to_string(),
            )),
        }
    }

    /// Keys of every object, in first-seen order.
    fn collect_headers(items: &[Value]) -> Vec<String> {
        let mut headers: Vec<String> = Vec::new();
        for object in items.iter().filter_map(Value::as_object) {
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
        headers
    }

    fn cells(object: &Map<String, Value>, headers: &[String]) -> Vec<FieldValue> {
        headers
            .iter()
            .map(|header| {
                object
                    .get(header)
                    .map(FieldValue::from_json)
                    .unwrap_or(FieldValue::Missing)
            })
            .collect()
    }
}

impl ResultImporter for ScrapedJsonImporter {
    fn name(&self) -> &'static str {
        "scraped-json"
    }

    fn headers(&self, input: &str) -> Result<Vec<String>> {
        Ok(Self::collect_headers(&Self::parse_items(input)?))
    }

    fn import(
        &self,
        input: &str,
        mapping: &FieldMapping,
        options: &ImportOptions,
    ) -> Result<ParseOutcome> {
        let items = Self::parse_items(input)?;
        let headers = Self::collect_headers(&items);

        let rows = items.iter().enumerate().map(|(idx, item)| match item.as_object() {
            Some(object) => Ok(Self::cells(object, &headers)),
            None => {
                debug!("Skipping scraped item {} that is not an object", idx);
                Err(RowRejection::Unreadable)
            }
        });

        ingest(self.name(), &headers, rows, mapping, options)
    }
}
