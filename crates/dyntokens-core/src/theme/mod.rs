//! Light/dark theme resolution
//!
//! A theme is built from a [`SemanticOverlay`] (role to palette reference or
//! literal), the base [`Dictionary`](crate::Dictionary), and a
//! [`FallbackTable`] for palette entries the sources do not define. The
//! resolved roles become `color.<role>` tokens tagged with the theme name.
//!
//! ```
//! use dyntokens_core::theme::{resolve_theme, FallbackTable, SemanticOverlay, ValueOrigin};
//! use dyntokens_core::{Dictionary, Token};
//!
//! let base: Dictionary = std::iter::once(Token::new(["color", "gray", "900"], "#111827")).collect();
//! let theme = resolve_theme(&SemanticOverlay::light(), &base, &FallbackTable::for_theme("light")).unwrap();
//!
//! let text = theme.role("text.primary").unwrap();
//! assert_eq!(text.value.to_string(), "#111827");
//! assert!(matches!(text.origin, ValueOrigin::Reference { .. }));
//! ```

pub mod overlay;
pub mod resolver;
pub mod roles;

pub use overlay::{RoleSource, SemanticOverlay};
pub use resolver::{
    check_coverage, compare_coverage, resolve_aliases, resolve_theme, CoverageGap, ResolvedRole, Theme,
    ValueOrigin,
};
pub use roles::{FallbackTable, REQUIRED_ROLES};
