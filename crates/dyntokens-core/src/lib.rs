//! DynTokens Core - design token build pipeline
//!
//! This crate turns hierarchical design token sources into platform outputs:
//! CSS custom properties, an ES module and JSON documents, with light and dark
//! themes resolved from semantic overlays.
//!
//! # Main Components
//!
//! - **Tokens**: [`Token`] and the ordered [`Dictionary`]
//! - **Loader**: JSON/YAML sources matched by glob patterns
//! - **Transforms**: named attribute, name and value transforms composed into groups
//! - **Themes**: semantic roles resolved against the base palette
//! - **Formats**: CSS, JavaScript and JSON emitters
//! - **Build**: staging every platform in memory, then committing all files
//!
//! # Example
//!
//! ```no_run
//! use dyntokens_core::{BuildConfig, Builder, Result, TransformRegistry};
//!
//! fn example() -> Result<()> {
//!     let config = BuildConfig::default().with_root("design-system");
//!     let report = Builder::new(config, TransformRegistry::with_builtins()).build_all_platforms()?;
//!     for file in &report.files {
//!         println!("{} ({} bytes)", file.path.display(), file.bytes);
//!     }
//!     Ok(())
//! }
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod theme;
pub mod token;
pub mod transform;

// Re-export main types for convenience
pub use build::{BuildReport, Builder, FileReport, Staged, StagedFile, ThemeReport};
pub use config::{BuildConfig, FileSpec, PlatformConfig, ThemeConfig};
pub use error::{Error, Result};
pub use format::{FormatKind, FormatOptions};
pub use loader::{ClassificationRules, CollisionPolicy, LoaderOptions, TokenLoader};
pub use theme::{resolve_theme, SemanticOverlay, Theme};
pub use token::{Attributes, Dictionary, Token, TokenKey, TokenValue};
pub use transform::{apply_group, TransformOptions, TransformRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
