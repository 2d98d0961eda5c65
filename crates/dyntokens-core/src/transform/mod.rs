//! Token transform system
//!
//! Transforms rename tokens, classify them, or rewrite their values. They are
//! registered by name in a [`TransformRegistry`] and composed into ordered
//! [`TransformGroup`]s, which a [`TransformPipeline`] applies to a dictionary.
//!
//! # Module Organization
//!
//! - [`types`] - transform, action and group types
//! - [`builder`] - fluent builder for custom transforms
//! - [`built_in`] - naming, unit and color transforms and the `dyn/*` groups
//! - [`registry`] - explicit registry object
//! - [`pipeline`] - group application and name validation
//!
//! # Example
//!
//! ```
//! use dyntokens_core::transform::{apply_group, TransformOptions, TransformRegistry};
//! use dyntokens_core::{ClassificationRules, Dictionary, Token};
//!
//! let rules = ClassificationRules::default();
//! let path = vec!["spacing".to_string(), "md".to_string()];
//! let token = Token::new(path.clone(), "16px").with_attributes(rules.classify(&path));
//! let dictionary: Dictionary = std::iter::once(token).collect();
//!
//! let registry = TransformRegistry::with_builtins();
//! let out = apply_group(&registry, "dyn/css", &dictionary, &TransformOptions::default()).unwrap();
//! let token = out.get_path("spacing.md").unwrap();
//! assert_eq!(token.name, "dyn-spacing-md");
//! assert_eq!(token.value.to_string(), "1rem");
//! ```

pub mod types;

pub mod pipeline;

pub mod builder;

pub mod built_in;

pub mod registry;

#[cfg(test)]
mod tests;

pub use builder::TransformBuilder;
pub use pipeline::{apply_group, validate_names, TransformPipeline};
pub use registry::TransformRegistry;
pub use types::{
    AttributeFunction, NameFunction, TokenFilter, Transform, TransformAction, TransformGroup,
    TransformKind, TransformOptions, ValueFunction,
};
