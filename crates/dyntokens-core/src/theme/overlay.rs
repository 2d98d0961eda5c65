//! Semantic overlays
//!
//! An overlay maps semantic roles such as `text.primary` to either a base
//! palette path or a literal color. The built-in `light` and `dark` overlays
//! are written out role by role.

use super::roles::REQUIRED_ROLES;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a role's value comes from
///
/// In configuration files a reference is written `{color.gray.900}`; any other
/// string is a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleSource {
    /// Dotted path into the base dictionary
    Reference(String),
    /// Concrete value used as is
    Literal(String),
}

impl RoleSource {
    pub fn reference(path: impl Into<String>) -> Self {
        Self::Reference(path.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Parse `{a.b.c}` as a reference and anything else as a literal
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(path) if !path.trim().is_empty() => Self::Reference(path.trim().to_string()),
            _ => Self::Literal(raw.to_string()),
        }
    }
}

impl From<String> for RoleSource {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<RoleSource> for String {
    fn from(source: RoleSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for RoleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference(path) => write!(f, "{{{path}}}"),
            Self::Literal(value) => f.write_str(value),
        }
    }
}

/// Role assignments for one theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticOverlay {
    pub name: String,
    pub roles: IndexMap<String, RoleSource>,
}

impl SemanticOverlay {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: IndexMap::new(),
        }
    }

    /// Built-in overlay by theme name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>, source: RoleSource) -> Self {
        self.roles.insert(role.into(), source);
        self
    }

    /// Add or replace role assignments
    pub fn merge(&mut self, roles: &IndexMap<String, RoleSource>) {
        for (role, source) in roles {
            self.roles.insert(role.clone(), source.clone());
        }
    }

    pub fn get(&self, role: &str) -> Option<&RoleSource> {
        self.roles.get(role)
    }

    /// Required roles this overlay does not define
    pub fn missing_roles(&self) -> Vec<&'static str> {
        REQUIRED_ROLES
            .iter()
            .copied()
            .filter(|role| !self.roles.contains_key(*role))
            .collect()
    }

    /// Light theme overlay
    pub fn light() -> Self {
        use RoleSource as R;

        Self::new("light")
            .with_role("text.primary", R::reference("color.gray.900"))
            .with_role("text.secondary", R::reference("color.gray.600"))
            .with_role("text.muted", R::reference("color.gray.500"))
            .with_role("text.inverse", R::reference("color.white"))
            .with_role("background.primary", R::reference("color.white"))
            .with_role("background.secondary", R::reference("color.gray.50"))
            .with_role("background.muted", R::reference("color.gray.100"))
            .with_role("background.inverse", R::reference("color.gray.900"))
            .with_role("border.primary", R::reference("color.gray.200"))
            .with_role("border.secondary", R::reference("color.gray.300"))
            .with_role("border.muted", R::reference("color.gray.100"))
            .with_role("border.focus", R::reference("color.primary.500"))
            .with_role("interactive.primary.default", R::reference("color.primary.500"))
            .with_role("interactive.primary.hover", R::reference("color.primary.600"))
            .with_role("interactive.primary.active", R::reference("color.primary.700"))
            .with_role("interactive.secondary.default", R::reference("color.gray.100"))
            .with_role("interactive.disabled", R::reference("color.gray.300"))
            .with_role("feedback.success.bg", R::literal("#10b981"))
            .with_role("feedback.success.fg", R::reference("color.white"))
            .with_role("feedback.warning.bg", R::literal("#f59e0b"))
            .with_role("feedback.warning.fg", R::reference("color.gray.900"))
            .with_role("feedback.danger.bg", R::literal("#ef4444"))
            .with_role("feedback.danger.fg", R::reference("color.white"))
            .with_role("feedback.info.bg", R::reference("color.primary.500"))
            .with_role("feedback.info.fg", R::reference("color.white"))
    }

    /// Dark theme overlay
    pub fn dark() -> Self {
        use RoleSource as R;

        Self::new("dark")
            .with_role("text.primary", R::reference("color.white"))
            .with_role("text.secondary", R::reference("color.gray.300"))
            .with_role("text.muted", R::reference("color.gray.400"))
            .with_role("text.inverse", R::reference("color.gray.900"))
            .with_role("background.primary", R::reference("color.gray.900"))
            .with_role("background.secondary", R::reference("color.gray.800"))
            .with_role("background.muted", R::reference("color.gray.700"))
            .with_role("background.inverse", R::reference("color.white"))
            .with_role("border.primary", R::reference("color.gray.700"))
            .with_role("border.secondary", R::reference("color.gray.600"))
            .with_role("border.muted", R::reference("color.gray.800"))
            .with_role("border.focus", R::reference("color.primary.400"))
            .with_role("interactive.primary.default", R::reference("color.primary.500"))
            .with_role("interactive.primary.hover", R::reference("color.primary.400"))
            .with_role("interactive.primary.active", R::reference("color.primary.300"))
            .with_role("interactive.secondary.default", R::reference("color.gray.800"))
            .with_role("interactive.disabled", R::reference("color.gray.600"))
            .with_role("feedback.success.bg", R::literal("#34d399"))
            .with_role("feedback.success.fg", R::reference("color.gray.900"))
            .with_role("feedback.warning.bg", R::literal("#fbbf24"))
            .with_role("feedback.warning.fg", R::reference("color.gray.900"))
            .with_role("feedback.danger.bg", R::literal("#f87171"))
            .with_role("feedback.danger.fg", R::reference("color.gray.900"))
            .with_role("feedback.info.bg", R::reference("color.primary.400"))
            .with_role("feedback.info.fg", R::reference("color.gray.900"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_source_parsing() {
        assert_eq!(RoleSource::parse("{color.gray.900}"), RoleSource::reference("color.gray.900"));
        assert_eq!(RoleSource::parse(" { color.white } "), RoleSource::reference("color.white"));
        assert_eq!(RoleSource::parse("#10b981"), RoleSource::literal("#10b981"));
        assert_eq!(RoleSource::parse("{}"), RoleSource::literal("{}"));
    }

    #[test]
    fn test_role_source_serde() {
        let yaml = "text.primary: '{color.black}'\nfeedback.success.bg: '#00ff00'\n";
        let roles: IndexMap<String, RoleSource> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(roles["text.primary"], RoleSource::reference("color.black"));
        assert_eq!(roles["feedback.success.bg"], RoleSource::literal("#00ff00"));

        let json = serde_json::to_string(&RoleSource::reference("color.white")).unwrap();
        assert_eq!(json, "\"{color.white}\"");
    }

    #[test]
    fn test_builtin_overlays_are_complete() {
        assert!(SemanticOverlay::light().missing_roles().is_empty());
        assert!(SemanticOverlay::dark().missing_roles().is_empty());
        assert!(SemanticOverlay::builtin("sepia").is_none());
    }

    #[test]
    fn test_dark_is_declared_independently() {
        let light = SemanticOverlay::light();
        let dark = SemanticOverlay::dark();
        assert_ne!(light.get("text.primary"), dark.get("text.primary"));
        assert_eq!(
            light.get("interactive.primary.default"),
            dark.get("interactive.primary.default")
        );
    }
}
