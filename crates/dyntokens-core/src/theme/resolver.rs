//! Theme resolution
//!
//! Turns an overlay plus the base dictionary into a [`Theme`] where every role
//! has a concrete value and a record of where that value came from.

use super::overlay::{RoleSource, SemanticOverlay};
use super::roles::{FallbackTable, REQUIRED_ROLES};
use crate::error::{Error, Result};
use crate::token::{Attributes, Dictionary, Token, TokenValue};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Longest reference chain followed before giving up
const MAX_REFERENCE_DEPTH: usize = 10;

/// Provenance of a resolved role value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum ValueOrigin {
    /// Taken from the base dictionary at `path`
    Reference { path: String },
    /// Written directly in the overlay
    Literal,
    /// `missing` was not in the base dictionary; the fallback table was used
    Fallback { missing: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRole {
    pub value: TokenValue,
    #[serde(flatten)]
    pub origin: ValueOrigin,
}

/// A fully resolved theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    /// Snapshot of the base dictionary the roles were resolved against
    pub base: Dictionary,
    /// Required roles first in canonical order, then any extra overlay roles
    pub roles: IndexMap<String, ResolvedRole>,
}

impl Theme {
    pub fn role(&self, role: &str) -> Option<&ResolvedRole> {
        self.roles.get(role)
    }

    /// Roles that had to use the fallback table
    pub fn fallbacks(&self) -> impl Iterator<Item = (&str, &ResolvedRole)> {
        self.roles
            .iter()
            .filter(|(_, r)| matches!(r.origin, ValueOrigin::Fallback { .. }))
            .map(|(role, r)| (role.as_str(), r))
    }

    /// Tokens at `color.<role>` tagged with this theme
    pub fn semantic_tokens(&self) -> Vec<Token> {
        self.roles
            .iter()
            .map(|(role, resolved)| {
                let path: Vec<String> = std::iter::once("color")
                    .chain(role.split('.'))
                    .map(str::to_string)
                    .collect();
                let attributes = Attributes {
                    category: Some("color".to_string()),
                    kind: path.get(1).cloned(),
                    item: path.get(2).cloned(),
                    subitem: path.get(3).cloned(),
                    theme: Some(self.name.clone()),
                };
                Token::new(path, resolved.value.clone()).with_attributes(attributes)
            })
            .collect()
    }

    /// Base tokens followed by this theme's semantic tokens
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dictionary = self.base.clone();
        dictionary.extend(self.semantic_tokens());
        dictionary
    }
}

/// Resolve every role of `overlay` against `base`
pub fn resolve_theme(overlay: &SemanticOverlay, base: &Dictionary, fallbacks: &FallbackTable) -> Result<Theme> {
    let missing = overlay.missing_roles();
    if !missing.is_empty() {
        return Err(Error::ThemeCoverage {
            theme: overlay.name.clone(),
            message: format!("missing required roles: {}", missing.join(", ")),
        });
    }

    let order = REQUIRED_ROLES
        .iter()
        .map(|r| r.to_string())
        .chain(
            overlay
                .roles
                .keys()
                .filter(|r| !REQUIRED_ROLES.contains(&r.as_str()))
                .cloned(),
        );

    let mut roles = IndexMap::new();
    for role in order {
        let source = overlay.get(&role).ok_or_else(|| Error::ThemeCoverage {
            theme: overlay.name.clone(),
            message: format!("missing required role: {role}"),
        })?;
        let resolved = resolve_role(&overlay.name, &role, source, base, fallbacks)?;
        roles.insert(role, resolved);
    }

    debug!(theme = %overlay.name, roles = roles.len(), "Theme resolved");
    Ok(Theme {
        name: overlay.name.clone(),
        base: base.clone(),
        roles,
    })
}

fn resolve_role(
    theme: &str,
    role: &str,
    source: &RoleSource,
    base: &Dictionary,
    fallbacks: &FallbackTable,
) -> Result<ResolvedRole> {
    let qualified = format!("{theme}.{role}");

    let path = match source {
        RoleSource::Literal(value) => {
            if value.trim().is_empty() {
                return Err(Error::unresolved(qualified, "literal value is empty"));
            }
            return Ok(ResolvedRole {
                value: TokenValue::from(value.as_str()),
                origin: ValueOrigin::Literal,
            });
        }
        RoleSource::Reference(path) => path,
    };

    match follow_reference(path, base).map_err(|message| Error::unresolved(&qualified, message))? {
        Some(value) => Ok(ResolvedRole {
            value,
            origin: ValueOrigin::Reference { path: path.clone() },
        }),
        None => {
            let Some(hex) = fallbacks.get(role) else {
                return Err(Error::unresolved(
                    qualified,
                    format!("'{path}' is not in the base palette and no fallback is defined"),
                ));
            };
            warn!(
                theme = %theme,
                role = %role,
                missing = %path,
                fallback = %hex,
                "Base palette entry missing, using fallback"
            );
            Ok(ResolvedRole {
                value: TokenValue::from(hex),
                origin: ValueOrigin::Fallback {
                    missing: path.clone(),
                },
            })
        }
    }
}

/// Replace every token whose whole value is a `{path}` alias with the value
/// the alias chain ends at. Runs before themes and transforms so aliased
/// tokens are transformed like their targets.
pub fn resolve_aliases(base: &Dictionary) -> Result<Dictionary> {
    let mut aliases = 0usize;
    let resolved = base.try_map(|token| -> Result<Token> {
        let Some(RoleSource::Reference(target)) = token.value.as_str().map(RoleSource::parse) else {
            return Ok(token.clone());
        };
        let key = token.key().to_string();
        match follow_reference(&target, base).map_err(|message| Error::unresolved(&key, message))? {
            Some(value) => {
                aliases += 1;
                let mut token = token.clone();
                token.value = value;
                Ok(token)
            }
            None => Err(Error::unresolved(
                key,
                format!("alias '{{{target}}}' does not point at a defined value"),
            )),
        }
    })?;

    debug!(aliases, "Token aliases resolved");
    Ok(resolved)
}

/// Follow a chain of `{path}` references through the base dictionary.
/// `Ok(None)` means some link of the chain does not exist.
fn follow_reference(start: &str, base: &Dictionary) -> std::result::Result<Option<TokenValue>, String> {
    let mut chain: Vec<String> = Vec::new();
    let mut current = start.to_string();

    loop {
        if chain.contains(&current) {
            chain.push(current);
            return Err(format!("circular reference: {}", chain.join(" -> ")));
        }
        if chain.len() >= MAX_REFERENCE_DEPTH {
            return Err(format!("reference chain deeper than {MAX_REFERENCE_DEPTH}"));
        }

        let Some(token) = base.get_path(&current) else {
            return Ok(None);
        };
        if token.value.is_unresolved() {
            return Ok(None);
        }

        chain.push(current);
        match token.value.as_str().map(RoleSource::parse) {
            Some(RoleSource::Reference(next)) => current = next,
            _ => return Ok(Some(token.value.clone())),
        }
    }
}

/// A role defined by one overlay and not the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageGap {
    pub role: String,
    pub present_in: String,
    pub missing_in: String,
}

/// Roles present in one overlay but absent in the other
pub fn compare_coverage(a: &SemanticOverlay, b: &SemanticOverlay) -> Vec<CoverageGap> {
    let gaps = |from: &SemanticOverlay, to: &SemanticOverlay| {
        from.roles
            .keys()
            .filter(|role| !to.roles.contains_key(*role))
            .map(|role| CoverageGap {
                role: role.clone(),
                present_in: from.name.clone(),
                missing_in: to.name.clone(),
            })
            .collect::<Vec<_>>()
    };

    let mut all = gaps(a, b);
    all.extend(gaps(b, a));
    all
}

/// Fail when any pair of overlays differs in the roles it defines
pub fn check_coverage(overlays: &[SemanticOverlay]) -> Result<()> {
    let Some((first, rest)) = overlays.split_first() else {
        return Ok(());
    };
    for other in rest {
        let gaps = compare_coverage(first, other);
        if let Some(gap) = gaps.first() {
            let roles: Vec<String> = gaps
                .iter()
                .map(|g| format!("{} (only in {})", g.role, g.present_in))
                .collect();
            return Err(Error::ThemeCoverage {
                theme: gap.missing_in.clone(),
                message: format!(
                    "themes '{}' and '{}' cover different roles: {}",
                    first.name,
                    other.name,
                    roles.join(", ")
                ),
            });
        }
    }
    Ok(())
}
