//! ES module output

use super::tree::nest;
use super::{select, GENERATED_HEADER};
use crate::error::{Error, Result};
use crate::token::Dictionary;
use serde_json::{Map, Value};

/// `export const tokens = {...};`, an optional `themes` export, then
/// `export default tokens;`
///
/// With a theme, `tokens` holds the base tokens plus that theme's semantic
/// tokens. Without one, `tokens` holds the base tokens and `themes` maps each
/// theme name to its own semantic tokens.
pub(super) fn module(dictionary: &Dictionary, theme: Option<&str>) -> Result<String> {
    let tokens = nest(select(dictionary, theme)?)?;

    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push('\n');
    out.push_str(&format!("export const tokens = {};\n", literal(&tokens)?));

    if theme.is_none() {
        let mut themes = Map::new();
        for name in dictionary.themes() {
            let tagged = select(dictionary, Some(&name))?
                .into_iter()
                .filter(|t| t.attributes.theme.as_deref() == Some(name.as_str()));
            themes.insert(name.clone(), nest(tagged)?);
        }
        out.push('\n');
        out.push_str(&format!(
            "export const themes = {};\n",
            literal(&Value::Object(themes))?
        ));
    }

    out.push_str("\nexport default tokens;\n");
    Ok(out)
}

/// JSON is a valid JavaScript object literal
fn literal(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Configuration {
        message: "cannot serialize JavaScript output".to_string(),
        source: Some(e.into()),
    })
}
