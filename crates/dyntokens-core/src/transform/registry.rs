//! Transform and transform group registry
//!
//! The registry is an ordinary value owned by whoever runs the build and
//! passed by reference into the pipeline. Registering a name twice is an
//! error; replacing an entry has to be asked for explicitly.

use super::built_in;
use super::types::{Transform, TransformGroup};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Named transforms and groups
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: IndexMap<String, Transform>,
    groups: IndexMap<String, TransformGroup>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in transforms and the `dyn/css` and
    /// `dyn/js` groups
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for transform in built_in::all() {
            registry.transforms.insert(transform.name.clone(), transform);
        }
        for (name, members) in [
            (built_in::GROUP_CSS, built_in::css_group()),
            (built_in::GROUP_JS, built_in::js_group()),
        ] {
            registry
                .groups
                .insert(name.to_string(), TransformGroup::new(name, members));
        }
        registry
    }

    /// Add a transform. Fails if the name is already taken.
    pub fn register(&mut self, transform: Transform) -> Result<()> {
        if self.transforms.contains_key(&transform.name) {
            return Err(Error::DuplicateTransform {
                kind: "Transform",
                name: transform.name,
            });
        }
        self.transforms.insert(transform.name.clone(), transform);
        Ok(())
    }

    /// Add or replace a transform, returning the replaced one
    pub fn register_override(&mut self, transform: Transform) -> Option<Transform> {
        let replaced = self.transforms.insert(transform.name.clone(), transform);
        if let Some(old) = &replaced {
            debug!(transform = %old.name, "Transform replaced");
        }
        replaced
    }

    /// Retrieve a transform by name
    pub fn lookup(&self, name: &str) -> Result<&Transform> {
        self.transforms.get(name).ok_or_else(|| Error::UnknownTransform {
            name: name.to_string(),
            group: None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Transform names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Registered transforms in registration order
    pub fn transforms(&self) -> impl Iterator<Item = &Transform> {
        self.transforms.values()
    }

    /// Registered groups in definition order
    pub fn groups(&self) -> impl Iterator<Item = &TransformGroup> {
        self.groups.values()
    }

    /// Define a named group. Every member must already be registered and the
    /// group name must be new.
    pub fn define_group<I, S>(&mut self, name: impl Into<String>, transforms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = TransformGroup::new(name, transforms);
        if self.groups.contains_key(&group.name) {
            return Err(Error::DuplicateTransform {
                kind: "Transform group",
                name: group.name,
            });
        }
        self.check_members(&group)?;
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    /// Define or replace a named group
    pub fn define_group_override<I, S>(&mut self, name: impl Into<String>, transforms: I) -> Result<Option<TransformGroup>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = TransformGroup::new(name, transforms);
        self.check_members(&group)?;
        Ok(self.groups.insert(group.name.clone(), group))
    }

    /// Retrieve a group by name
    pub fn group(&self, name: &str) -> Result<&TransformGroup> {
        self.groups.get(name).ok_or_else(|| {
            Error::configuration(format!("Unknown transform group '{name}'"))
        })
    }

    /// Transforms of a group in declared order
    pub fn resolve_group(&self, name: &str) -> Result<Vec<&Transform>> {
        let group = self.group(name)?;
        group
            .transforms
            .iter()
            .map(|member| {
                self.transforms.get(member).ok_or_else(|| Error::UnknownTransform {
                    name: member.clone(),
                    group: Some(group.name.clone()),
                })
            })
            .collect()
    }

    fn check_members(&self, group: &TransformGroup) -> Result<()> {
        match group.transforms.iter().find(|member| !self.contains(member)) {
            Some(missing) => Err(Error::UnknownTransform {
                name: missing.clone(),
                group: Some(group.name.clone()),
            }),
            None => Ok(()),
        }
    }
}
