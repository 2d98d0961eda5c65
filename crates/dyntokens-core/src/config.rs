//! Build configuration
//!
//! Describes where token sources live, which themes to resolve, and which
//! platforms (transform group plus output files) to build. The defaults
//! reproduce the DynUI-Max layout: CSS, JavaScript and JSON outputs under
//! `dist/` with light and dark themes.

use crate::error::{Error, Result};
use crate::format::{FormatKind, FormatOptions};
use crate::loader::{ClassificationRules, CollisionPolicy, LoaderOptions};
use crate::theme::{FallbackTable, RoleSource, SemanticOverlay};
use crate::transform::built_in::{GROUP_CSS, GROUP_JS};
use crate::transform::TransformOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Complete description of one build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory sources and outputs are resolved against
    pub root: PathBuf,
    /// Glob patterns for token source files
    pub source: Vec<String>,
    pub collision: CollisionPolicy,
    pub classification: ClassificationRules,
    /// Options for every transform unless a platform overrides them
    pub transform: TransformOptions,
    pub themes: Vec<ThemeConfig>,
    pub platforms: IndexMap<String, PlatformConfig>,
}

/// A theme to resolve: built-in overlay roles can be replaced or extended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    /// Role assignments merged over the built-in overlay of the same name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub roles: IndexMap<String, RoleSource>,
    /// Fallback colors merged over the built-in table of the same name
    #[serde(default, skip_serializing_if = "FallbackTable::is_empty")]
    pub fallbacks: FallbackTable,
}

/// An output target bound to one transform group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub transform_group: String,
    /// Directory the file destinations are relative to
    pub build_path: PathBuf,
    /// Replaces the build-wide transform options for this platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TransformOptions>,
    pub files: Vec<FileSpec>,
}

/// One output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSpec {
    pub destination: PathBuf,
    pub format: FormatKind,
    #[serde(default)]
    pub options: FormatOptions,
}

impl FileSpec {
    pub fn new(destination: impl Into<PathBuf>, format: FormatKind) -> Self {
        Self {
            destination: destination.into(),
            format,
            options: FormatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }
}

impl ThemeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: IndexMap::new(),
            fallbacks: FallbackTable::new(),
        }
    }

    /// Built-in overlay of the same name with the configured roles applied
    pub fn overlay(&self) -> Result<SemanticOverlay> {
        let mut overlay = match SemanticOverlay::builtin(&self.name) {
            Some(builtin) => builtin,
            None if self.roles.is_empty() => {
                return Err(Error::configuration(format!(
                    "theme '{}' has no built-in overlay and defines no roles",
                    self.name
                )))
            }
            None => SemanticOverlay::new(&self.name),
        };
        overlay.merge(&self.roles);
        Ok(overlay)
    }

    /// Built-in fallback table of the same name with the configured entries applied
    pub fn fallback_table(&self) -> FallbackTable {
        let mut table = FallbackTable::for_theme(&self.name);
        table.merge(&self.fallbacks);
        table
    }
}

impl PlatformConfig {
    pub fn new(transform_group: impl Into<String>, build_path: impl Into<PathBuf>) -> Self {
        Self {
            transform_group: transform_group.into(),
            build_path: build_path.into(),
            options: None,
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: FileSpec) -> Self {
        self.files.push(file);
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        let css = PlatformConfig::new(GROUP_CSS, "dist/")
            .with_file(
                FileSpec::new("tokens.css", FormatKind::CssVariablesThemed).with_options(
                    FormatOptions::default()
                        .with_selector(":root")
                        .with_theme("light"),
                ),
            )
            .with_file(
                FileSpec::new("tokens-dark.css", FormatKind::CssVariablesThemed).with_options(
                    FormatOptions::default()
                        .with_selector(".theme-dark")
                        .with_theme("dark"),
                ),
            )
            .with_file(FileSpec::new("variables.css", FormatKind::CssVariables));

        let js = PlatformConfig::new(GROUP_JS, "dist/")
            .with_file(FileSpec::new("tokens.js", FormatKind::JavascriptModule));

        let json = PlatformConfig::new(GROUP_JS, "dist/")
            .with_file(FileSpec::new("tokens.json", FormatKind::JsonFlat))
            .with_file(FileSpec::new("tokens-nested.json", FormatKind::JsonNested));

        Self {
            root: PathBuf::from("."),
            source: vec!["tokens/**/*.json".to_string(), "tokens/**/*.yaml".to_string()],
            collision: CollisionPolicy::default(),
            classification: ClassificationRules::default(),
            transform: TransformOptions::default(),
            themes: vec![ThemeConfig::new("light"), ThemeConfig::new("dark")],
            platforms: IndexMap::from([
                ("css".to_string(), css),
                ("js".to_string(), js),
                ("json".to_string(), json),
            ]),
        }
    }
}

impl BuildConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            root: self.root.clone(),
            collision: self.collision,
            classification: self.classification.clone(),
        }
    }

    /// Transform options in effect for a platform
    pub fn transform_options<'a>(&'a self, platform: &'a PlatformConfig) -> &'a TransformOptions {
        platform.options.as_ref().unwrap_or(&self.transform)
    }

    /// Absolute or root-relative path of an output file
    pub fn output_path(&self, platform: &PlatformConfig, file: &FileSpec) -> PathBuf {
        self.root.join(&platform.build_path).join(&file.destination)
    }

    /// Check the configuration for problems detectable before loading sources
    pub fn validate(&self) -> Result<()> {
        if self.source.is_empty() {
            return Err(Error::configuration("no source patterns configured"));
        }
        if self.platforms.is_empty() {
            return Err(Error::configuration("no platforms configured"));
        }

        let mut themes = HashSet::new();
        for theme in &self.themes {
            if !themes.insert(theme.name.as_str()) {
                return Err(Error::configuration(format!(
                    "theme '{}' is configured twice",
                    theme.name
                )));
            }
        }

        let mut outputs = HashSet::new();
        for (name, platform) in &self.platforms {
            if platform.files.is_empty() {
                return Err(Error::configuration(format!(
                    "platform '{name}' declares no files"
                )));
            }
            for file in &platform.files {
                if let Some(theme) = &file.options.theme {
                    if !themes.contains(theme.as_str()) {
                        return Err(Error::configuration(format!(
                            "platform '{name}' file '{}' uses unknown theme '{theme}'",
                            file.destination.display()
                        ))
                        .in_platform(name, file.destination.display().to_string()));
                    }
                }
                let path = self.output_path(platform, file);
                if !outputs.insert(path.clone()) {
                    return Err(Error::configuration(format!(
                        "output '{}' is declared more than once",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = BuildConfig::default();
        config.validate().unwrap();

        let names: Vec<&str> = config.platforms.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["css", "js", "json"]);

        let css = &config.platforms["css"];
        assert_eq!(css.transform_group, "dyn/css");
        assert_eq!(css.files[1].options.selector(), ".theme-dark");
        assert_eq!(css.files[1].options.theme.as_deref(), Some("dark"));
        assert_eq!(
            config.output_path(css, &css.files[0]),
            PathBuf::from("./dist/tokens.css")
        );
        assert_eq!(config.platforms["json"].transform_group, "dyn/js");
    }

    #[test]
    fn test_yaml_round_trip_keeps_defaults() {
        let yaml = r#"
source: ["design/*.yaml"]
themes:
  - name: light
    roles:
      text.primary: "{color.black}"
  - name: dark
platforms:
  css:
    transform_group: dyn/css
    build_path: out/
    files:
      - destination: vars.css
        format: css/variables
"#;
        let config: BuildConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.source, vec!["design/*.yaml"]);
        assert_eq!(config.transform.prefix, "dyn");
        assert_eq!(config.platforms["css"].files[0].format, FormatKind::CssVariables);

        let overlay = config.themes[0].overlay().unwrap();
        assert_eq!(overlay.get("text.primary"), Some(&RoleSource::reference("color.black")));
        assert!(overlay.missing_roles().is_empty());
    }

    #[test]
    fn test_unknown_format_in_config_is_rejected() {
        let yaml = "platforms:\n  css:\n    transform_group: dyn/css\n    build_path: out/\n    files:\n      - destination: a.scss\n        format: scss/variables\n";
        let err = serde_yaml::from_str::<BuildConfig>(yaml).unwrap_err();
        assert!(err.to_string().contains("scss/variables"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = BuildConfig::default();
        config.themes.push(ThemeConfig::new("dark"));
        assert!(config.validate().is_err());

        let mut config = BuildConfig::default();
        config.themes.retain(|t| t.name == "light");
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("unknown theme 'dark'"));

        let mut config = BuildConfig::default();
        let js = config.platforms["js"].clone();
        config.platforms.insert("js2".to_string(), js);
        assert!(config.validate().unwrap_err().to_string().contains("more than once"));
    }

    #[test]
    fn test_custom_theme_needs_roles() {
        assert!(ThemeConfig::new("sepia").overlay().is_err());

        let mut sepia = ThemeConfig::new("sepia");
        sepia.roles.insert("text.primary".to_string(), RoleSource::literal("#433422"));
        let overlay = sepia.overlay().unwrap();
        assert_eq!(overlay.missing_roles().len(), crate::theme::REQUIRED_ROLES.len() - 1);
        assert!(sepia.fallback_table().is_empty());
    }
}
