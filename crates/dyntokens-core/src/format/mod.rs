//! Output format emitters
//!
//! Each [`FormatKind`] renders a transformed dictionary into the text of one
//! output document. Emitters never touch the filesystem; the build
//! orchestrator stages their output and commits it.

mod css;
mod javascript;
mod json;
mod tree;


use crate::error::{Error, Result};
use crate::token::{Dictionary, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use tree::nest;

/// Banner written at the top of CSS and JavaScript output
pub const GENERATED_HEADER: &str = "/**\n * Do not edit directly, this file was auto-generated.\n */\n";

/// Per-file emitter options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// CSS selector wrapping the variables; `:root` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Theme whose tagged tokens are included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl FormatOptions {
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(":root")
    }
}

/// Registered output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatKind {
    /// `css/variables-themed`
    CssVariablesThemed,
    /// `css/variables`
    CssVariables,
    /// `javascript/module`
    JavascriptModule,
    /// `json/flat`
    JsonFlat,
    /// `json/nested`
    JsonNested,
}

impl FormatKind {
    pub const ALL: [FormatKind; 5] = [
        Self::CssVariablesThemed,
        Self::CssVariables,
        Self::JavascriptModule,
        Self::JsonFlat,
        Self::JsonNested,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CssVariablesThemed => "css/variables-themed",
            Self::CssVariables => "css/variables",
            Self::JavascriptModule => "javascript/module",
            Self::JsonFlat => "json/flat",
            Self::JsonNested => "json/nested",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CssVariablesThemed => "CSS custom properties for one selector, including one theme",
            Self::CssVariables => "CSS custom properties for the untagged tokens",
            Self::JavascriptModule => "ES module exporting nested token objects",
            Self::JsonFlat => "JSON object of name to value",
            Self::JsonNested => "JSON object mirroring the token hierarchy",
        }
    }

    /// Render `dictionary` as a complete document
    pub fn emit(&self, dictionary: &Dictionary, options: &FormatOptions) -> Result<String> {
        match self {
            Self::CssVariablesThemed => {
                let tokens = select(dictionary, options.theme.as_deref())?;
                Ok(css::variables(&tokens, options.selector()))
            }
            Self::CssVariables => {
                let tokens = select(dictionary, None)?;
                Ok(css::variables(&tokens, options.selector()))
            }
            Self::JavascriptModule => javascript::module(dictionary, options.theme.as_deref()),
            Self::JsonFlat => {
                let tokens = select(dictionary, options.theme.as_deref())?;
                json::flat(&tokens)
            }
            Self::JsonNested => {
                let tokens = select(dictionary, options.theme.as_deref())?;
                json::nested(&tokens)
            }
        }
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownFormat { name: s.to_string() })
    }
}

impl TryFrom<String> for FormatKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FormatKind> for String {
    fn from(kind: FormatKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tokens visible under `theme`, rejecting any whose value is still null
fn select<'a>(dictionary: &'a Dictionary, theme: Option<&'a str>) -> Result<Vec<&'a Token>> {
    dictionary
        .visible_in(theme)
        .map(|token| {
            if token.value.is_unresolved() {
                Err(Error::unresolved(
                    token.key().to_string(),
                    "value is null after transforms",
                ))
            } else {
                Ok(token)
            }
        })
        .collect()
}
