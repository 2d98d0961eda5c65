//! Transform pipeline implementation
//!
//! Applies an ordered list of transforms to every token of a dictionary. A
//! transform whose filter rejects a token is skipped for that token only; the
//! remaining transforms still run. Each transform runs at most once per token.

use super::registry::TransformRegistry;
use super::types::{Transform, TransformOptions};
use crate::error::{Error, Result};
use crate::token::{Dictionary, Token, TokenKey};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A resolved, ordered pipeline of transforms
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    /// Group name, or `custom` for ad-hoc pipelines
    name: String,
    /// Ordered list of transforms
    transforms: Vec<Transform>,
    options: TransformOptions,
}

impl TransformPipeline {
    /// Create an empty pipeline
    pub fn new(name: impl Into<String>, options: TransformOptions) -> Self {
        Self {
            name: name.into(),
            transforms: Vec::new(),
            options,
        }
    }

    /// Resolve a registered group into a pipeline
    pub fn from_group(registry: &TransformRegistry, group: &str, options: TransformOptions) -> Result<Self> {
        let transforms = registry
            .resolve_group(group)?
            .into_iter()
            .cloned()
            .collect();
        Ok(Self {
            name: group.to_string(),
            transforms,
            options,
        })
    }

    /// Append a transform; order of calls is the order of application
    pub fn add_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform_count(&self) -> usize {
        self.transforms.len()
    }

    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name.as_str()).collect()
    }

    /// Run every matching transform over one token
    pub fn apply_token(&self, token: &Token) -> Result<Token> {
        let mut current = token.clone();
        for transform in &self.transforms {
            if !transform.matches(&current) {
                continue;
            }
            let next = transform.apply(&current, &self.options)?;
            trace!(
                transform = %transform.name,
                token = %current.path_key(),
                "Transform applied"
            );
            current = next;
        }
        Ok(current)
    }

    /// Run the pipeline over a whole dictionary, preserving order
    pub fn apply(&self, dictionary: &Dictionary) -> Result<Dictionary> {
        debug!(
            group = %self.name,
            transforms = self.transforms.len(),
            tokens = dictionary.len(),
            "Applying transform group"
        );
        dictionary.try_map(|token| self.apply_token(token))
    }
}

/// Apply a registered group to a dictionary
pub fn apply_group(
    registry: &TransformRegistry,
    group: &str,
    dictionary: &Dictionary,
    options: &TransformOptions,
) -> Result<Dictionary> {
    TransformPipeline::from_group(registry, group, options.clone())?.apply(dictionary)
}

/// Check that no two tokens visible under the same theme share an output name
pub fn validate_names(dictionary: &Dictionary) -> Result<()> {
    let mut views: Vec<Option<String>> = vec![None];
    views.extend(dictionary.themes().into_iter().map(Some));

    for view in &views {
        let mut seen: HashMap<&str, TokenKey> = HashMap::new();
        for token in dictionary.visible_in(view.as_deref()) {
            let key = token.key();
            if let Some(first) = seen.get(token.name.as_str()) {
                if *first != key {
                    return Err(Error::NameCollision {
                        name: token.name.clone(),
                        first: first.to_string(),
                        second: key.to_string(),
                    });
                }
            } else {
                seen.insert(token.name.as_str(), key);
            }
        }
    }
    Ok(())
}
