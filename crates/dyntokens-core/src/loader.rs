//! Token source loading
//!
//! Reads every file matched by a set of glob patterns, parses it as JSON or
//! YAML, and flattens the nested groups into a [`Dictionary`]. Each token is
//! classified into category/type/item attributes by [`ClassificationRules`].

use crate::error::{Error, Result};
use crate::token::{Attributes, Dictionary, Token, TokenValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported token source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.json`
    Json,
    /// `.yaml`, `.yml`
    Yaml,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(Error::source_parse(
                path,
                "unsupported file extension, expected .json, .yaml or .yml",
            )),
        }
    }
}

/// What to do when the same path is defined twice with different values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail unless the later definition sets `"override": true`
    #[default]
    Error,
    /// Later definitions always win
    Override,
}

/// Maps the first path segment to a token category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationRules {
    categories: IndexMap<String, String>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "size",
                &[
                    "size",
                    "sizes",
                    "spacing",
                    "space",
                    "radius",
                    "radii",
                    "breakpoint",
                    "breakpoints",
                    "fontSize",
                ],
            ),
            ("color", &["color", "colors"]),
            ("font", &["font", "typography", "fontFamily"]),
            ("time", &["time", "duration", "transition"]),
            ("z-index", &["zIndex", "z-index"]),
            ("shadow", &["shadow", "shadows"]),
        ];

        let mut categories = IndexMap::new();
        for (category, segments) in table {
            for segment in *segments {
                categories.insert(segment.to_string(), category.to_string());
            }
        }
        Self { categories }
    }
}

impl ClassificationRules {
    /// Rules that keep the first path segment as the category
    pub fn empty() -> Self {
        Self {
            categories: IndexMap::new(),
        }
    }

    /// Add or replace a rule
    pub fn with_rule(mut self, segment: impl Into<String>, category: impl Into<String>) -> Self {
        self.categories.insert(segment.into(), category.into());
        self
    }

    /// Category for a first path segment
    pub fn category_for(&self, segment: &str) -> String {
        self.categories
            .get(segment)
            .cloned()
            .unwrap_or_else(|| segment.to_string())
    }

    /// Classify a token path into category/type/item/subitem
    pub fn classify(&self, path: &[String]) -> Attributes {
        Attributes {
            category: path.first().map(|s| self.category_for(s)),
            kind: path.get(1).cloned(),
            item: path.get(2).cloned(),
            subitem: path.get(3).cloned(),
            theme: None,
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Directory relative patterns are resolved against
    pub root: PathBuf,
    pub collision: CollisionPolicy,
    pub classification: ClassificationRules,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            collision: CollisionPolicy::Error,
            classification: ClassificationRules::default(),
        }
    }
}

/// Reads and flattens token source files
#[derive(Debug, Clone, Default)]
pub struct TokenLoader {
    options: LoaderOptions,
}

impl TokenLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Expand glob patterns into a sorted, deduplicated list of files
    pub fn resolve_sources<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let full = if Path::new(pattern).is_absolute() {
                pattern.to_string()
            } else {
                self.options.root.join(pattern).to_string_lossy().into_owned()
            };

            let entries = glob::glob(&full).map_err(|e| {
                Error::configuration(format!("invalid source pattern '{pattern}': {e}"))
            })?;

            let mut matched = 0usize;
            for entry in entries {
                let path = entry.map_err(|e| Error::SourceParse {
                    path: e.path().to_path_buf(),
                    message: "cannot read matched path".to_string(),
                    source: Some(anyhow::Error::new(std::io::Error::from(e))),
                })?;
                if path.is_file() {
                    matched += 1;
                    files.insert(path);
                }
            }

            if matched == 0 {
                warn!(pattern = %full, "Source pattern matched no files");
            }
        }

        Ok(files.into_iter().collect())
    }

    /// Load every file matched by `patterns` into one dictionary
    pub fn load<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Dictionary> {
        let files = self.resolve_sources(patterns)?;
        self.load_files(&files)
    }

    /// Load the given files, in order, into one dictionary
    pub fn load_files(&self, files: &[PathBuf]) -> Result<Dictionary> {
        let mut dictionary = Dictionary::new();

        for file in files {
            let value = Self::parse_file(file)?;
            self.load_value(&value, file, &mut dictionary)?;
        }

        debug!(files = files.len(), tokens = dictionary.len(), "Token sources loaded");
        Ok(dictionary)
    }

    /// Parse a single source file into a JSON tree
    pub fn parse_file(path: &Path) -> Result<Value> {
        let format = SourceFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::SourceParse {
            path: path.to_path_buf(),
            message: "cannot read file".to_string(),
            source: Some(e.into()),
        })?;
        Self::parse_content(&content, format, path)
    }

    /// Parse source text with an explicit format
    pub fn parse_content(content: &str, format: SourceFormat, path: &Path) -> Result<Value> {
        let value = match format {
            SourceFormat::Json => {
                serde_json::from_str::<Value>(content).map_err(|e| Error::SourceParse {
                    path: path.to_path_buf(),
                    message: format!("invalid JSON at line {} column {}", e.line(), e.column()),
                    source: Some(e.into()),
                })?
            }
            SourceFormat::Yaml => {
                // Parse as YAML first so numeric keys such as `500:` survive
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| Error::SourceParse {
                        path: path.to_path_buf(),
                        message: "invalid YAML".to_string(),
                        source: Some(e.into()),
                    })?;
                serde_json::to_value(yaml).map_err(|e| Error::SourceParse {
                    path: path.to_path_buf(),
                    message: "YAML document cannot be represented as JSON".to_string(),
                    source: Some(e.into()),
                })?
            }
        };

        if !value.is_object() {
            return Err(Error::source_parse(path, "token source root must be an object"));
        }
        Ok(value)
    }

    /// Flatten one parsed source tree into `dictionary`
    pub fn load_value(&self, value: &Value, source: &Path, dictionary: &mut Dictionary) -> Result<()> {
        let Value::Object(root) = value else {
            return Err(Error::source_parse(source, "token source root must be an object"));
        };
        let mut path = Vec::new();
        self.walk_group(root, &mut path, source, dictionary)
    }

    fn walk_group(
        &self,
        group: &Map<String, Value>,
        path: &mut Vec<String>,
        source: &Path,
        dictionary: &mut Dictionary,
    ) -> Result<()> {
        for (key, child) in group {
            // `$type`, `$description` and friends annotate groups
            if key.starts_with('$') {
                continue;
            }
            path.push(key.clone());
            match child {
                Value::Object(map) if is_definition(map) => {
                    let mut token = self.definition_token(map, path, source)?;
                    let forced = map.get("override").and_then(Value::as_bool).unwrap_or(false);
                    token.overrides = forced;
                    self.insert(token, forced, dictionary)?;
                }
                Value::Object(map) => {
                    if map.is_empty() {
                        warn!(path = %path.join("."), file = %source.display(), "Empty token group");
                    }
                    self.walk_group(map, path, source, dictionary)?;
                }
                leaf => {
                    let value = leaf_value(leaf, path, source)?;
                    let token = self.make_token(path, value, source);
                    self.insert(token, false, dictionary)?;
                }
            }
            path.pop();
        }
        Ok(())
    }

    fn definition_token(&self, map: &Map<String, Value>, path: &[String], source: &Path) -> Result<Token> {
        let raw = map.get("value").or_else(|| map.get("$value")).unwrap_or(&Value::Null);
        let value = leaf_value(raw, path, source)?;
        let mut token = self.make_token(path, value, source);

        if let Some(theme) = map.get("theme") {
            let theme = theme.as_str().ok_or_else(|| {
                Error::source_parse(source, format!("'{}': theme must be a string", path.join(".")))
            })?;
            token.attributes.theme = Some(theme.to_string());
        }
        token.comment = map
            .get("comment")
            .or_else(|| map.get("$description"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(token)
    }

    fn make_token(&self, path: &[String], value: TokenValue, source: &Path) -> Token {
        let attributes = self.options.classification.classify(path);
        Token::new(path.iter().cloned(), value)
            .with_attributes(attributes)
            .with_source(source)
    }

    fn insert(&self, token: Token, forced: bool, dictionary: &mut Dictionary) -> Result<()> {
        let key = token.key();
        if let Some(existing) = dictionary.get(&key) {
            if existing.value == token.value {
                return Ok(());
            }
            if !forced && self.options.collision == CollisionPolicy::Error {
                let first = existing
                    .source
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<memory>".to_string());
                return Err(Error::source_parse(
                    token.source.clone().unwrap_or_default(),
                    format!(
                        "'{key}' is already defined in {first} with a different value; mark the later definition with \"override\": true"
                    ),
                ));
            }
            debug!(token = %key, "Token definition overridden");
        }
        dictionary.insert(token);
        Ok(())
    }
}

fn is_definition(map: &Map<String, Value>) -> bool {
    map.contains_key("value") || map.contains_key("$value")
}

fn leaf_value(value: &Value, path: &[String], source: &Path) -> Result<TokenValue> {
    TokenValue::from_json(value).ok_or_else(|| {
        Error::source_parse(
            source,
            format!("'{}': token values must be scalars or lists of scalars", path.join(".")),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn load_json(loader: &TokenLoader, value: Value) -> Result<Dictionary> {
        let mut dict = Dictionary::new();
        loader.load_value(&value, Path::new("inline.json"), &mut dict)?;
        Ok(dict)
    }

    #[test]
    fn test_flatten_plain_leaves_and_definitions() {
        let loader = TokenLoader::default();
        let dict = load_json(
            &loader,
            json!({
                "colors": { "primary": { "500": "#3366FF" } },
                "spacing": { "md": { "value": "16px", "comment": "base unit" } },
                "font": { "family": { "sans": ["Inter", "sans-serif"] } }
            }),
        )
        .unwrap();

        let keys: Vec<String> = dict.iter().map(Token::path_key).collect();
        assert_eq!(keys, vec!["colors.primary.500", "spacing.md", "font.family.sans"]);

        let spacing = dict.get_path("spacing.md").unwrap();
        assert_eq!(spacing.value, TokenValue::from("16px"));
        assert_eq!(spacing.comment.as_deref(), Some("base unit"));
        assert_eq!(spacing.attributes.category.as_deref(), Some("size"));
        assert_eq!(spacing.attributes.kind.as_deref(), Some("md"));

        let color = dict.get_path("colors.primary.500").unwrap();
        assert_eq!(color.attributes.category.as_deref(), Some("color"));
        assert_eq!(color.attributes.kind.as_deref(), Some("primary"));
        assert_eq!(color.attributes.item.as_deref(), Some("500"));
    }

    #[test]
    fn test_unknown_segment_keeps_itself_as_category() {
        let rules = ClassificationRules::default();
        assert_eq!(rules.category_for("opacity"), "opacity");
        assert_eq!(rules.category_for("radii"), "size");

        let rules = ClassificationRules::empty().with_rule("gap", "size");
        assert_eq!(rules.category_for("gap"), "size");
        assert_eq!(rules.category_for("spacing"), "spacing");
    }

    #[test]
    fn test_theme_tag_and_metadata_keys() {
        let loader = TokenLoader::default();
        let dict = load_json(
            &loader,
            json!({
                "$description": "palette",
                "color": {
                    "surface": { "value": "#111827", "theme": "dark" }
                }
            }),
        )
        .unwrap();

        assert_eq!(dict.len(), 1);
        let token = dict.iter().next().unwrap();
        assert_eq!(token.attributes.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_collision_requires_override() {
        let loader = TokenLoader::default();
        let mut dict = Dictionary::new();
        loader
            .load_value(&json!({"color": {"white": "#ffffff"}}), Path::new("a.json"), &mut dict)
            .unwrap();

        // Equal redefinition is fine
        loader
            .load_value(&json!({"color": {"white": "#ffffff"}}), Path::new("b.json"), &mut dict)
            .unwrap();

        let err = loader
            .load_value(&json!({"color": {"white": "#fefefe"}}), Path::new("c.json"), &mut dict)
            .unwrap_err();
        assert_eq!(err.kind(), "source_parse");
        assert!(err.to_string().contains("a.json"));

        loader
            .load_value(
                &json!({"color": {"white": {"value": "#fefefe", "override": true}}}),
                Path::new("d.json"),
                &mut dict,
            )
            .unwrap();
        assert_eq!(dict.get_path("color.white").unwrap().value, TokenValue::from("#fefefe"));
    }

    #[test]
    fn test_override_policy() {
        let loader = TokenLoader::new(LoaderOptions {
            collision: CollisionPolicy::Override,
            ..LoaderOptions::default()
        });
        let mut dict = Dictionary::new();
        loader
            .load_value(&json!({"radius": {"sm": "2px"}}), Path::new("a.json"), &mut dict)
            .unwrap();
        loader
            .load_value(&json!({"radius": {"sm": "4px"}}), Path::new("b.json"), &mut dict)
            .unwrap();
        assert_eq!(dict.get_path("radius.sm").unwrap().value, TokenValue::from("4px"));
    }

    #[test]
    fn test_object_inside_list_is_rejected() {
        let loader = TokenLoader::default();
        let err = load_json(&loader, json!({"shadow": {"sm": [{"x": 1}]}})).unwrap_err();
        assert!(err.to_string().contains("shadow.sm"));
    }

    #[test]
    fn test_load_files_from_globs_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        let tokens = dir.path().join("tokens");
        fs::create_dir_all(&tokens).unwrap();
        fs::write(tokens.join("b-spacing.json"), r#"{"spacing": {"md": "16px"}}"#).unwrap();
        fs::write(
            tokens.join("a-color.yaml"),
            "color:\n  primary:\n    500: \"#3366ff\"\n",
        )
        .unwrap();
        fs::write(tokens.join("notes.txt"), "ignored").unwrap();

        let loader = TokenLoader::new(LoaderOptions {
            root: dir.path().to_path_buf(),
            ..LoaderOptions::default()
        });
        let dict = loader
            .load(&["tokens/**/*.json", "tokens/**/*.yaml", "tokens/*.json"])
            .unwrap();

        let keys: Vec<String> = dict.iter().map(Token::path_key).collect();
        assert_eq!(keys, vec!["color.primary.500", "spacing.md"]);
    }

    #[test]
    fn test_malformed_json_reports_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{ \"color\": ").unwrap();

        let err = TokenLoader::parse_file(&file).unwrap_err();
        assert_eq!(err.kind(), "source_parse");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SourceFormat::from_path(Path::new("tokens/base.ts")).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }
}
