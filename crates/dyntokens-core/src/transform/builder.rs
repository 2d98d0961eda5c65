//! Builder for creating transforms
//!
//! Fluent API used by the built-ins and by callers registering their own
//! transforms.

use crate::error::{Error, Result};
use super::types::{
    AttributeFunction, NameFunction, TokenFilter, Transform, TransformAction, ValueFunction,
};

/// Builder for creating transforms
pub struct TransformBuilder {
    name: String,
    filter: Option<TokenFilter>,
    action: Option<TransformAction>,
    description: Option<String>,
}

impl TransformBuilder {
    /// Create a new transform builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: None,
            action: None,
            description: None,
        }
    }

    /// Restrict the transform to tokens accepted by `filter`
    pub fn filter(mut self, filter: TokenFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Make this an attribute transform
    pub fn attribute(mut self, f: AttributeFunction) -> Self {
        self.action = Some(TransformAction::Attribute(f));
        self
    }

    /// Make this a name transform
    pub fn name(mut self, f: NameFunction) -> Self {
        self.action = Some(TransformAction::Name(f));
        self
    }

    /// Make this a value transform
    pub fn value(mut self, f: ValueFunction) -> Self {
        self.action = Some(TransformAction::Value(f));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the transform
    pub fn build(self) -> Result<Transform> {
        if self.name.trim().is_empty() {
            return Err(Error::configuration("transform name must not be empty"));
        }
        let action = self.action.ok_or_else(|| {
            Error::configuration(format!(
                "transform '{}' needs an attribute, name or value function",
                self.name
            ))
        })?;

        Ok(Transform {
            name: self.name,
            filter: self.filter,
            action,
            description: self.description,
        })
    }
}
