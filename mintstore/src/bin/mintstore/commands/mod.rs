pub mod bids;
pub mod collections;
pub mod config;
pub mod nfts;
pub mod users;

use anyhow::{Context, Result};
use mintstore::StoreError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::output::{Detail, OutputManager, TableDisplay, TableRow};

/// Parse a `--json` argument: inline JSON, or `@path` to read it from a file.
pub fn read_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {path}"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).context("Invalid JSON payload")
}

/// Parse a create payload; anything that is JSON is handed to schema validation.
pub fn read_payload(raw: &str) -> Result<Value> {
    read_json(raw)
}

/// Show a created record, or list every validation issue and fail.
pub fn report_created<T>(
    output: &OutputManager,
    entity: &str,
    result: Result<T, StoreError>,
) -> Result<()>
where
    T: TableRow + Serialize,
{
    match result {
        Ok(record) => {
            output.success(&format!("Created {entity}"));
            output.display(&Detail(record))
        }
        Err(StoreError::Validation(err)) => {
            output.error(&format!("{entity} rejected"));
            for issue in &err.issues {
                output.bullet(&format!("{}: {}", issue.field, issue.message));
            }
            anyhow::bail!("{} invalid field(s)", err.issues.len())
        }
        Err(err) => Err(err.into()),
    }
}

/// Show a looked-up record, or warn that nothing matched.
pub fn report_found<T>(output: &OutputManager, what: &str, found: Option<T>) -> Result<()>
where
    T: TableRow + Serialize,
{
    match found {
        Some(record) => output.display(&Detail(record)),
        None => {
            output.warning(&format!("{what} not found"));
            Ok(())
        }
    }
}

/// Show a listing under a heading.
pub fn report_listing<T>(output: &OutputManager, heading: &str, records: Vec<T>) -> Result<()>
where
    Vec<T>: TableDisplay + Serialize,
{
    output.heading(heading);
    output.display(&records)
}
