//! Nested object construction from token paths

use crate::error::{Error, Result};
use crate::token::Token;
use serde_json::{Map, Value};

/// Build a nested JSON object where each path segment is a key and each
/// token value a leaf. A path that is both a leaf and a group is an error.
pub fn nest<'a, I>(tokens: I) -> Result<Value>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut root = Map::new();

    for token in tokens {
        let Some((leaf, parents)) = token.path.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match entry {
                Value::Object(map) => map,
                _ => return Err(conflict(token, &token.path[..=depth])),
            };
        }

        if node.get(leaf).is_some_and(Value::is_object) {
            return Err(conflict(token, &token.path));
        }
        node.insert(leaf.clone(), token.value.to_json());
    }

    Ok(Value::Object(root))
}

fn conflict(token: &Token, prefix: &[String]) -> Error {
    Error::NameCollision {
        name: prefix.join("."),
        first: prefix.join("."),
        second: token.key().to_string(),
    }
}
