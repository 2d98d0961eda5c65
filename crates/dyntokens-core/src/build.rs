//! Platform build orchestration
//!
//! A build loads the sources, resolves every theme, runs each platform's
//! transform group and renders every file into memory. Only when all of that
//! has succeeded are the files committed: each one is written to a temporary
//! file next to its destination, and the temporaries are renamed into place
//! once all of them exist. A failure before the rename phase leaves the
//! output directories as they were.

use crate::config::{BuildConfig, FileSpec, PlatformConfig};
use crate::error::{Error, Result};
use crate::format::FormatKind;
use crate::loader::TokenLoader;
use crate::theme::{check_coverage, resolve_aliases, resolve_theme, Theme, ValueOrigin};
use crate::token::Dictionary;
use crate::transform::{apply_group, validate_names, TransformRegistry};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, info_span};

/// A rendered output document that has not been written yet
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub platform: String,
    /// Destination as declared in the file spec
    pub file: String,
    /// Resolved output path
    pub path: PathBuf,
    pub format: FormatKind,
    pub contents: String,
    /// Tokens the document was rendered from
    pub tokens: usize,
}

/// Everything a build produced before commit
#[derive(Debug, Clone)]
pub struct Staged {
    pub sources: Vec<PathBuf>,
    /// Base tokens loaded from the sources
    pub tokens: usize,
    pub themes: Vec<Theme>,
    pub files: Vec<StagedFile>,
}

/// Summary of one output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub platform: String,
    pub file: String,
    pub path: PathBuf,
    pub format: FormatKind,
    pub bytes: usize,
    pub tokens: usize,
}

/// Summary of one resolved theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeReport {
    pub name: String,
    pub roles: usize,
    /// Roles that used the fallback table, with the missing palette path
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<FallbackUse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackUse {
    pub role: String,
    pub missing: String,
}

/// Result of staging or building all platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub sources: Vec<PathBuf>,
    pub tokens: usize,
    pub themes: Vec<ThemeReport>,
    pub files: Vec<FileReport>,
    /// Whether the files were written to disk
    pub written: bool,
}

impl Staged {
    pub fn report(&self, written: bool) -> BuildReport {
        BuildReport {
            sources: self.sources.clone(),
            tokens: self.tokens,
            themes: self.themes.iter().map(theme_report).collect(),
            files: self
                .files
                .iter()
                .map(|f| FileReport {
                    platform: f.platform.clone(),
                    file: f.file.clone(),
                    path: f.path.clone(),
                    format: f.format,
                    bytes: f.contents.len(),
                    tokens: f.tokens,
                })
                .collect(),
            written,
        }
    }
}

fn theme_report(theme: &Theme) -> ThemeReport {
    ThemeReport {
        name: theme.name.clone(),
        roles: theme.roles.len(),
        fallbacks: theme
            .fallbacks()
            .filter_map(|(role, resolved)| match &resolved.origin {
                ValueOrigin::Fallback { missing } => Some(FallbackUse {
                    role: role.to_string(),
                    missing: missing.clone(),
                }),
                _ => None,
            })
            .collect(),
    }
}

/// Runs builds for a configuration with an injected transform registry
#[derive(Debug, Clone)]
pub struct Builder {
    config: BuildConfig,
    registry: TransformRegistry,
}

impl Builder {
    pub fn new(config: BuildConfig, registry: TransformRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Build every platform and write the files
    pub fn build_all_platforms(&self) -> Result<BuildReport> {
        let staged = self.stage_all_platforms()?;
        commit(&staged.files)?;
        info!(files = staged.files.len(), "Build complete");
        Ok(staged.report(true))
    }

    /// Run the whole build in memory without writing anything
    pub fn stage_all_platforms(&self) -> Result<Staged> {
        self.config.validate()?;

        let loader = TokenLoader::new(self.config.loader_options());
        let sources = loader.resolve_sources(&self.config.source)?;
        if sources.is_empty() {
            return Err(Error::configuration(format!(
                "no token source files matched {:?} under '{}'",
                self.config.source,
                self.config.root.display()
            )));
        }
        let base = resolve_aliases(&loader.load_files(&sources)?)?;
        info!(sources = sources.len(), tokens = base.len(), "Token sources loaded");

        let themes = self.resolve_themes(&base)?;
        let mut dictionary = base.clone();
        for theme in &themes {
            merge_semantic_tokens(&mut dictionary, theme)?;
        }

        let mut files = Vec::new();
        for (name, platform) in &self.config.platforms {
            files.extend(self.stage_platform(name, platform, &dictionary)?);
        }

        Ok(Staged {
            sources,
            tokens: base.len(),
            themes,
            files,
        })
    }

    /// Remove every declared output file. Files that do not exist are skipped.
    pub fn clean_all_platforms(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for platform in self.config.platforms.values() {
            for file in &platform.files {
                let path = self.config.output_path(platform, file);
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        info!(path = %path.display(), "Removed output file");
                        removed.push(path);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(path = %path.display(), "Output file already absent");
                    }
                    Err(source) => return Err(Error::EmissionWrite { path, source }),
                }
            }
        }
        Ok(removed)
    }

    fn resolve_themes(&self, base: &Dictionary) -> Result<Vec<Theme>> {
        let overlays = self
            .config
            .themes
            .iter()
            .map(|t| t.overlay())
            .collect::<Result<Vec<_>>>()?;
        check_coverage(&overlays)?;

        self.config
            .themes
            .iter()
            .zip(&overlays)
            .map(|(config, overlay)| resolve_theme(overlay, base, &config.fallback_table()))
            .collect()
    }

    fn stage_platform(
        &self,
        name: &str,
        platform: &PlatformConfig,
        dictionary: &Dictionary,
    ) -> Result<Vec<StagedFile>> {
        let span = info_span!("platform", platform = %name, group = %platform.transform_group);
        let _guard = span.enter();

        let options = self.config.transform_options(platform);
        let transformed = apply_group(&self.registry, &platform.transform_group, dictionary, options)
            .and_then(|d| validate_names(&d).map(|()| d))
            .map_err(|e| e.in_all_platform_files(name))?;

        platform
            .files
            .iter()
            .map(|file| self.stage_file(name, platform, file, &transformed))
            .collect()
    }

    fn stage_file(
        &self,
        name: &str,
        platform: &PlatformConfig,
        file: &FileSpec,
        dictionary: &Dictionary,
    ) -> Result<StagedFile> {
        let destination = file.destination.display().to_string();
        let contents = file
            .format
            .emit(dictionary, &file.options)
            .map_err(|e| e.in_platform(name, &destination))?;

        let tokens = match file.format {
            FormatKind::CssVariables => dictionary.visible_in(None).count(),
            FormatKind::JavascriptModule if file.options.theme.is_none() => dictionary.len(),
            _ => dictionary.visible_in(file.options.theme.as_deref()).count(),
        };

        info!(
            file = %destination,
            format = %file.format,
            bytes = contents.len(),
            tokens,
            "File staged"
        );
        Ok(StagedFile {
            platform: name.to_string(),
            file: destination,
            path: self.config.output_path(platform, file),
            format: file.format,
            contents,
            tokens,
        })
    }
}

/// Add a theme's semantic tokens. A source token with the same key must
/// either carry the same value or be marked `"override": true`, in which case
/// it is kept.
fn merge_semantic_tokens(dictionary: &mut Dictionary, theme: &Theme) -> Result<()> {
    for token in theme.semantic_tokens() {
        let key = token.key();
        if let Some(existing) = dictionary.get(&key) {
            if existing.overrides {
                debug!(token = %key, "Source definition overrides resolved role");
                continue;
            }
            if existing.value != token.value {
                return Err(Error::source_parse(
                    existing.source.clone().unwrap_or_default(),
                    format!(
                        "'{key}' is {} but theme '{}' resolves it to {}; mark the source definition with \"override\": true",
                        existing.value, theme.name, token.value
                    ),
                ));
            }
        }
        dictionary.insert(token);
    }
    Ok(())
}

/// Write staged files: all temporaries first, then rename each into place
pub fn commit(files: &[StagedFile]) -> Result<()> {
    let mut pending = Vec::with_capacity(files.len());

    for file in files {
        let temp = write_temp(file)
            .map_err(|source| Error::EmissionWrite {
                path: file.path.clone(),
                source,
            })
            .map_err(|e| e.in_platform(&file.platform, &file.file))?;
        pending.push((temp, file));
    }

    for (temp, file) in pending {
        temp.persist(&file.path)
            .map_err(|e| Error::EmissionWrite {
                path: file.path.clone(),
                source: e.error,
            })
            .map_err(|e| e.in_platform(&file.platform, &file.file))?;
        debug!(path = %file.path.display(), "File written");
    }
    Ok(())
}

fn write_temp(file: &StagedFile) -> std::io::Result<NamedTempFile> {
    let dir = file
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(file.contents.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let tokens = dir.path().join("tokens");
        fs::create_dir_all(&tokens).unwrap();
        fs::write(
            tokens.join("base.json"),
            r##"{
  "color": {
    "white": "#ffffff",
    "gray": { "900": "#111827" }
  },
  "spacing": { "md": "16px" }
}"##,
        )
        .unwrap();
        dir
    }

    fn builder(dir: &TempDir) -> Builder {
        Builder::new(
            BuildConfig::default().with_root(dir.path()),
            TransformRegistry::with_builtins(),
        )
    }

    #[test]
    fn test_stage_does_not_write() {
        let dir = project();
        let staged = builder(&dir).stage_all_platforms().unwrap();

        assert_eq!(staged.files.len(), 6);
        assert!(!dir.path().join("dist").exists());

        let report = staged.report(false);
        assert_eq!(report.tokens, 3);
        assert!(!report.written);
        let light = &report.themes[0];
        assert_eq!(light.name, "light");
        assert!(light.fallbacks.iter().any(|f| f.role == "border.focus"));
        assert!(!light.fallbacks.iter().any(|f| f.role == "text.primary"));
    }

    #[test]
    fn test_build_writes_all_files() {
        let dir = project();
        let report = builder(&dir).build_all_platforms().unwrap();
        assert!(report.written);

        for name in [
            "tokens.css",
            "tokens-dark.css",
            "variables.css",
            "tokens.js",
            "tokens.json",
            "tokens-nested.json",
        ] {
            assert!(dir.path().join("dist").join(name).is_file(), "{name}");
        }

        let light = fs::read_to_string(dir.path().join("dist/tokens.css")).unwrap();
        assert!(light.contains(":root {\n"));
        assert!(light.contains("  --dyn-spacing-md: 1rem;\n"));
        assert!(light.contains("  --dyn-color-text-primary: #111827;\n"));

        let dark = fs::read_to_string(dir.path().join("dist/tokens-dark.css")).unwrap();
        assert!(dark.contains(".theme-dark {\n"));
        assert!(dark.contains("  --dyn-color-text-primary: #ffffff;\n"));

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("dist"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failure_in_one_file_writes_nothing() {
        let dir = project();
        fs::write(
            dir.path().join("tokens/dark.json"),
            r#"{ "shadow": { "focus": { "value": null, "theme": "dark" } } }"#,
        )
        .unwrap();

        let err = builder(&dir).build_all_platforms().unwrap_err();
        match &err {
            Error::Platform { platform, file, .. } => {
                assert_eq!(platform, "css");
                assert_eq!(file.as_deref(), Some("tokens-dark.css"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(err.kind(), "unresolved_value");
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_unknown_group_names_platform() {
        let dir = project();
        let mut config = BuildConfig::default().with_root(dir.path());
        config.platforms["js"].transform_group = "dyn/ios".to_string();

        let err = Builder::new(config, TransformRegistry::with_builtins())
            .stage_all_platforms()
            .unwrap_err();
        assert!(err.to_string().starts_with("Platform 'js' (all files): "), "{err}");
        assert!(matches!(&err, Error::Platform { file: None, .. }));
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_no_sources_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = builder(&dir).stage_all_platforms().unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_clean_removes_outputs() {
        let dir = project();
        let builder = builder(&dir);
        builder.build_all_platforms().unwrap();

        let removed = builder.clean_all_platforms().unwrap();
        assert_eq!(removed.len(), 6);
        assert!(!dir.path().join("dist/tokens.css").exists());

        assert!(builder.clean_all_platforms().unwrap().is_empty());
    }
}
