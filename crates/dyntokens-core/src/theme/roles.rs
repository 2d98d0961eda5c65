//! Semantic roles and their fallback colors
//!
//! When an overlay points at a base palette entry that does not exist, the
//! resolver substitutes the fallback listed here for that theme and role.
//! The values are the palette entries the built-in overlays reference, so a
//! partial palette still renders the same colors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Roles every theme must define
pub const REQUIRED_ROLES: &[&str] = &[
    "text.primary",
    "text.secondary",
    "text.muted",
    "text.inverse",
    "background.primary",
    "background.secondary",
    "background.muted",
    "background.inverse",
    "border.primary",
    "border.secondary",
    "border.muted",
    "border.focus",
    "interactive.primary.default",
    "interactive.primary.hover",
    "interactive.primary.active",
    "interactive.secondary.default",
    "interactive.disabled",
    "feedback.success.bg",
    "feedback.success.fg",
    "feedback.warning.bg",
    "feedback.warning.fg",
    "feedback.danger.bg",
    "feedback.danger.fg",
    "feedback.info.bg",
    "feedback.info.fg",
];

/// Light theme fallbacks, role by role
const LIGHT_FALLBACKS: &[(&str, &str)] = &[
    ("text.primary", "#111827"),         // gray-900
    ("text.secondary", "#4b5563"),       // gray-600
    ("text.muted", "#6b7280"),           // gray-500
    ("text.inverse", "#ffffff"),         // white
    ("background.primary", "#ffffff"),   // white
    ("background.secondary", "#f9fafb"), // gray-50
    ("background.muted", "#f3f4f6"),     // gray-100
    ("background.inverse", "#111827"),   // gray-900
    ("border.primary", "#e5e7eb"),       // gray-200
    ("border.secondary", "#d1d5db"),     // gray-300
    ("border.muted", "#f3f4f6"),         // gray-100
    ("border.focus", "#3b82f6"),         // primary-500
    ("interactive.primary.default", "#3b82f6"), // primary-500
    ("interactive.primary.hover", "#2563eb"),   // primary-600
    ("interactive.primary.active", "#1d4ed8"),  // primary-700
    ("interactive.secondary.default", "#f3f4f6"), // gray-100
    ("interactive.disabled", "#d1d5db"), // gray-300
    ("feedback.success.bg", "#10b981"),  // green-500
    ("feedback.success.fg", "#ffffff"),
    ("feedback.warning.bg", "#f59e0b"),  // amber-500
    ("feedback.warning.fg", "#111827"),
    ("feedback.danger.bg", "#ef4444"),   // red-500
    ("feedback.danger.fg", "#ffffff"),
    ("feedback.info.bg", "#3b82f6"),     // primary-500
    ("feedback.info.fg", "#ffffff"),
];

/// Dark theme fallbacks, role by role
const DARK_FALLBACKS: &[(&str, &str)] = &[
    ("text.primary", "#ffffff"),         // white
    ("text.secondary", "#d1d5db"),       // gray-300
    ("text.muted", "#9ca3af"),           // gray-400
    ("text.inverse", "#111827"),         // gray-900
    ("background.primary", "#111827"),   // gray-900
    ("background.secondary", "#1f2937"), // gray-800
    ("background.muted", "#374151"),     // gray-700
    ("background.inverse", "#ffffff"),   // white
    ("border.primary", "#374151"),       // gray-700
    ("border.secondary", "#4b5563"),     // gray-600
    ("border.muted", "#1f2937"),         // gray-800
    ("border.focus", "#60a5fa"),         // primary-400
    ("interactive.primary.default", "#3b82f6"), // primary-500, same as light
    ("interactive.primary.hover", "#60a5fa"),   // primary-400
    ("interactive.primary.active", "#93c5fd"),  // primary-300
    ("interactive.secondary.default", "#1f2937"), // gray-800
    ("interactive.disabled", "#4b5563"), // gray-600
    ("feedback.success.bg", "#34d399"),  // green-400
    ("feedback.success.fg", "#111827"),
    ("feedback.warning.bg", "#fbbf24"),  // amber-400
    ("feedback.warning.fg", "#111827"),
    ("feedback.danger.bg", "#f87171"),   // red-400
    ("feedback.danger.fg", "#111827"),
    ("feedback.info.bg", "#60a5fa"),     // primary-400
    ("feedback.info.fg", "#111827"),
];

/// Per-role default colors for one theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackTable {
    entries: IndexMap<String, String>,
}

impl FallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table for `light` or `dark`; other themes start empty
    pub fn for_theme(theme: &str) -> Self {
        let source = match theme {
            "light" => LIGHT_FALLBACKS,
            "dark" => DARK_FALLBACKS,
            _ => &[],
        };
        Self {
            entries: source
                .iter()
                .map(|(role, hex)| (role.to_string(), hex.to_string()))
                .collect(),
        }
    }

    pub fn with_entry(mut self, role: impl Into<String>, hex: impl Into<String>) -> Self {
        self.entries.insert(role.into(), hex.into());
        self
    }

    /// Add or replace every entry of `other`
    pub fn merge(&mut self, other: &FallbackTable) {
        for (role, hex) in &other.entries {
            self.entries.insert(role.clone(), hex.clone());
        }
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.entries.get(role).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_cover_every_required_role() {
        for theme in ["light", "dark"] {
            let table = FallbackTable::for_theme(theme);
            for role in REQUIRED_ROLES {
                let hex = table.get(role).unwrap_or_else(|| panic!("{theme} lacks {role}"));
                assert!(hex.starts_with('#') && (hex.len() == 7), "{theme}.{role} = {hex}");
            }
        }
    }

    #[test]
    fn test_unknown_theme_has_empty_table() {
        assert!(FallbackTable::for_theme("sepia").is_empty());
    }

    #[test]
    fn test_merge_replaces_entries() {
        let mut table = FallbackTable::for_theme("light");
        table.merge(&FallbackTable::new().with_entry("text.primary", "#000000"));
        assert_eq!(table.get("text.primary"), Some("#000000"));
        assert_eq!(table.len(), REQUIRED_ROLES.len());
    }
}
