//! JSON documents

use super::tree::nest;
use crate::error::{Error, Result};
use crate::token::Token;
use serde_json::{Map, Value};

/// `{ "<name>": <value>, ... }` in dictionary order
pub(super) fn flat(tokens: &[&Token]) -> Result<String> {
    let map: Map<String, Value> = tokens
        .iter()
        .map(|token| (token.name.clone(), token.value.to_json()))
        .collect();
    render(&Value::Object(map))
}

/// Object mirroring the path hierarchy
pub(super) fn nested(tokens: &[&Token]) -> Result<String> {
    render(&nest(tokens.iter().copied())?)
}

fn render(value: &Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| Error::Configuration {
        message: "cannot serialize JSON output".to_string(),
        source: Some(e.into()),
    })?;
    out.push('\n');
    Ok(out)
}
