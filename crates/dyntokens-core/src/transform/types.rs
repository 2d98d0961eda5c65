//! Core types for the token transform system
//!
//! A transform is a pure function over a single token, restricted by an
//! optional filter. Transforms come in three kinds, each replacing a different
//! part of the token.

use crate::error::Result;
use crate::token::{Attributes, Token, TokenValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate deciding whether a transform applies to a token
pub type TokenFilter = fn(&Token) -> bool;

/// Computes new attributes for a token
pub type AttributeFunction = fn(&Token, &TransformOptions) -> Attributes;

/// Computes the output name for a token
pub type NameFunction = fn(&Token, &TransformOptions) -> String;

/// Computes a new value for a token
pub type ValueFunction = fn(&Token, &TransformOptions) -> Result<TokenValue>;

/// Which part of the token a transform replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Attribute,
    Name,
    Value,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attribute => "attribute",
            Self::Name => "name",
            Self::Value => "value",
        };
        f.write_str(name)
    }
}

/// The function a transform runs
#[derive(Debug, Clone, Copy)]
pub enum TransformAction {
    Attribute(AttributeFunction),
    Name(NameFunction),
    Value(ValueFunction),
}

impl TransformAction {
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Attribute(_) => TransformKind::Attribute,
            Self::Name(_) => TransformKind::Name,
            Self::Value(_) => TransformKind::Value,
        }
    }
}

/// Options shared by every transform in a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Prefix prepended to generated names
    pub prefix: String,
    /// Separator between name segments
    pub separator: String,
    /// Root font size used for px to rem conversion
    pub base_font_size: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            prefix: "dyn".to_string(),
            separator: "-".to_string(),
            base_font_size: 16.0,
        }
    }
}

/// A named transform
#[derive(Debug, Clone)]
pub struct Transform {
    /// Registry key, e.g. `size/px-to-rem`
    pub name: String,
    /// Tokens the transform applies to; `None` matches every token
    pub filter: Option<TokenFilter>,
    pub action: TransformAction,
    pub description: Option<String>,
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        self.action.kind()
    }

    /// Whether the filter accepts this token
    pub fn matches(&self, token: &Token) -> bool {
        self.filter.map_or(true, |filter| filter(token))
    }

    /// Produce the transformed token. Callers check [`Transform::matches`] first.
    pub fn apply(&self, token: &Token, options: &TransformOptions) -> Result<Token> {
        let mut next = token.clone();
        match self.action {
            TransformAction::Attribute(f) => {
                let theme = next.attributes.theme.clone();
                next.attributes = f(token, options);
                // The theme tag is owned by the resolver, never by a transform
                next.attributes.theme = theme;
            }
            TransformAction::Name(f) => next.name = f(token, options),
            TransformAction::Value(f) => next.value = f(token, options)?,
        }
        Ok(next)
    }
}

/// An ordered, named list of transform names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformGroup {
    pub name: String,
    pub transforms: Vec<String>,
}

impl TransformGroup {
    pub fn new<I, S>(name: impl Into<String>, transforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            transforms: transforms.into_iter().map(Into::into).collect(),
        }
    }
}
