use crate::config::Config;
use crate::error::{OutputError, TripmapError};
use schemars::schema_for;

/// Print the JSON Schema of tripmap.yaml
pub fn execute() -> Result<(), TripmapError> {
    let schema = schema_for!(Config);
    let json = serde_json::to_string_pretty(&schema).map_err(OutputError::Serialize)?;
    println!("{}", json);
    Ok(())
}
