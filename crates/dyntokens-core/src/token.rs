//! Token and dictionary types
//!
//! A [`Token`] is the smallest named design value. Tokens are never mutated by
//! the pipeline: every transform produces a new token, and a [`Dictionary`]
//! holds them in a stable insertion order so emitted documents are
//! byte-identical across builds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Value carried by a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// No value; rejected by every emitter
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Ordered list, e.g. a font family stack
    List(Vec<TokenValue>),
}

impl TokenValue {
    /// Convert a JSON leaf into a token value. Objects are not leaves.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Object(_) => None,
        }
    }

    /// JSON representation used by the JSON and JavaScript emitters.
    /// Integral numbers are written without a fractional part.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True if this value, or any list element, is null
    pub fn is_unresolved(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.iter().any(Self::is_unresolved),
            _ => false,
        }
    }
}

impl fmt::Display for TokenValue {
    /// CSS-style rendering: lists are joined with `, `
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Format a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Category/type/item classification plus the optional theme tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subitem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Attributes {
    pub fn is_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

/// A single design token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Hierarchical path, e.g. `["color", "primary", "500"]`
    pub path: Vec<String>,
    /// Output name; the dotted path until a name transform runs
    pub name: String,
    /// Current (possibly transformed) value
    pub value: TokenValue,
    /// Value as it appeared in the source file
    pub original: TokenValue,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// File the token was defined in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Marked `"override": true` in its source; wins over earlier and
    /// generated definitions of the same key
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub overrides: bool,
}

impl Token {
    pub fn new<I, S>(path: I, value: impl Into<TokenValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        let value = value.into();
        Self {
            name: path.join("."),
            path,
            original: value.clone(),
            value,
            attributes: Attributes::default(),
            comment: None,
            source: None,
            overrides: false,
        }
    }

    /// Dotted path, e.g. `color.primary.500`
    pub fn path_key(&self) -> String {
        self.path.join(".")
    }

    pub fn key(&self) -> TokenKey {
        TokenKey {
            theme: self.attributes.theme.clone(),
            path: self.path_key(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.attributes.theme = Some(theme.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// A token is visible to a theme when it is untagged or tagged with that theme
    pub fn is_visible_in(&self, theme: Option<&str>) -> bool {
        match (&self.attributes.theme, theme) {
            (None, _) => true,
            (Some(tag), Some(wanted)) => tag == wanted,
            (Some(_), None) => false,
        }
    }
}

/// Dictionary key: the same path may exist once per theme
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenKey {
    pub theme: Option<String>,
    pub path: String,
}

impl TokenKey {
    pub fn base(path: impl Into<String>) -> Self {
        Self {
            theme: None,
            path: path.into(),
        }
    }

    pub fn themed(theme: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            theme: Some(theme.into()),
            path: path.into(),
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.theme {
            Some(theme) => write!(f, "{}@{}", self.path, theme),
            None => f.write_str(&self.path),
        }
    }
}

/// Ordered collection of tokens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    tokens: IndexMap<TokenKey, Token>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Insert a token, returning the one it replaced. A replaced token keeps
    /// its original position.
    pub fn insert(&mut self, token: Token) -> Option<Token> {
        self.tokens.insert(token.key(), token)
    }

    pub fn get(&self, key: &TokenKey) -> Option<&Token> {
        self.tokens.get(key)
    }

    /// Look up an untagged token by dotted path
    pub fn get_path(&self, path: &str) -> Option<&Token> {
        self.tokens.get(&TokenKey::base(path))
    }

    pub fn contains(&self, key: &TokenKey) -> bool {
        self.tokens.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Tokens visible to `theme`, in dictionary order
    pub fn visible_in<'a>(&'a self, theme: Option<&'a str>) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.values().filter(move |t| t.is_visible_in(theme))
    }

    /// Distinct theme tags in first-seen order
    pub fn themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = Vec::new();
        for tag in self.tokens.keys().filter_map(|k| k.theme.as_ref()) {
            if !themes.contains(tag) {
                themes.push(tag.clone());
            }
        }
        themes
    }

    /// Build a new dictionary by applying `f` to every token in order
    pub fn try_map<F, E>(&self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&Token) -> Result<Token, E>,
    {
        let mut out = Self::new();
        for token in self.tokens.values() {
            out.insert(f(token)?);
        }
        Ok(out)
    }
}

impl FromIterator<Token> for Dictionary {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        let mut dictionary = Self::new();
        for token in iter {
            dictionary.insert(token);
        }
        dictionary
    }
}

impl Extend<Token> for Dictionary {
    fn extend<T: IntoIterator<Item = Token>>(&mut self, iter: T) {
        for token in iter {
            self.insert(token);
        }
    }
}
