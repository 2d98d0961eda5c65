//! End-to-end builds of the DynUI fixture project

mod test_support;

use dyntokens_core::theme::{RoleSource, REQUIRED_ROLES};
use dyntokens_core::{Builder, Error, ThemeConfig, TransformRegistry};
use dyntokens_golden::DirSnapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use test_support::{declared_properties, default_builder, fixture_project, read_output};

#[test]
fn test_build_report_for_fixture() {
    let project = fixture_project();
    let report = default_builder(project.path()).build_all_platforms().unwrap();

    assert!(report.written);
    assert_eq!(report.sources.len(), 3);
    assert_eq!(report.tokens, 26);

    let themes: Vec<(&str, usize)> = report
        .themes
        .iter()
        .map(|t| (t.name.as_str(), t.roles))
        .collect();
    assert_eq!(themes, vec![("light", 25), ("dark", 25)]);
    assert!(report.themes.iter().all(|t| t.fallbacks.is_empty()));

    let files: Vec<&str> = report.files.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(
        files,
        vec![
            "tokens.css",
            "tokens-dark.css",
            "variables.css",
            "tokens.js",
            "tokens.json",
            "tokens-nested.json",
        ]
    );
    let light = &report.files[0];
    assert_eq!(light.tokens, 26 + 25);
    assert_eq!(light.bytes, read_output(project.path(), "tokens.css").len());
}

#[test]
fn test_css_values_are_transformed() {
    let project = fixture_project();
    default_builder(project.path()).build_all_platforms().unwrap();
    let css = read_output(project.path(), "variables.css");

    for line in [
        "  --dyn-spacing-md: 1rem;",
        "  --dyn-radius-full: 624.9375rem;",
        "  --dyn-duration-fast: 0.15s;",
        "  --dyn-color-overlay: #11182780;",
        "  --dyn-z-index-modal: 1000;",
        "  --dyn-font-family-sans: Inter, system-ui, sans-serif; /* Default UI stack */",
    ] {
        assert!(css.contains(line), "missing {line:?} in\n{css}");
    }
    assert!(!css.contains("--dyn-color-text-primary"));
}

#[test]
fn test_every_role_is_declared_in_both_stylesheets() {
    let project = fixture_project();
    default_builder(project.path()).build_all_platforms().unwrap();

    let light: BTreeSet<String> = declared_properties(&read_output(project.path(), "tokens.css"))
        .into_iter()
        .collect();
    let dark: BTreeSet<String> = declared_properties(&read_output(project.path(), "tokens-dark.css"))
        .into_iter()
        .collect();

    assert_eq!(light, dark);
    for role in REQUIRED_ROLES {
        let property = format!("dyn-color-{}", role.replace('.', "-"));
        assert!(light.contains(&property), "light stylesheet lacks {property}");
    }
}

#[test]
fn test_javascript_and_json_outputs() {
    let project = fixture_project();
    default_builder(project.path()).build_all_platforms().unwrap();

    let js = read_output(project.path(), "tokens.js");
    assert!(js.starts_with("/**\n * Do not edit directly, this file was auto-generated.\n */\n"));
    assert!(js.contains("export const tokens = {"));
    assert!(js.contains("export const themes = {"));
    assert!(js.ends_with("\nexport default tokens;\n"));

    let flat: Value = serde_json::from_str(&read_output(project.path(), "tokens.json")).unwrap();
    assert_eq!(flat["dynSpacingMd"], "1rem");
    assert_eq!(flat["dynDurationFast"], "0.15s");
    assert_eq!(flat["dynZIndexModal"], 1000);
    assert_eq!(flat["dynColorGray900"], "#111827");
    assert_eq!(
        flat["dynFontFamilySans"],
        serde_json::json!(["Inter", "system-ui", "sans-serif"])
    );
    assert!(flat.get("dynColorTextPrimary").is_none());
    assert_eq!(flat.as_object().unwrap().len(), 26);

    let nested: Value =
        serde_json::from_str(&read_output(project.path(), "tokens-nested.json")).unwrap();
    assert_eq!(nested["spacing"]["md"], "1rem");
    assert_eq!(nested["color"]["primary"]["500"], "#3b82f6");
}

#[test]
fn test_failed_build_preserves_previous_outputs() {
    let project = fixture_project();
    let builder = default_builder(project.path());
    builder.build_all_platforms().unwrap();
    let before = DirSnapshot::capture(project.path().join("dist")).unwrap();

    fs::write(
        project.path().join("tokens/zz-broken.json"),
        r#"{ "shadow": { "focus": { "value": null, "theme": "dark" } } }"#,
    )
    .unwrap();
    fs::write(
        project.path().join("tokens/extra.json"),
        r#"{ "spacing": { "xl": "32px" } }"#,
    )
    .unwrap();

    let err = builder.build_all_platforms().unwrap_err();
    assert!(matches!(err.root(), Error::UnresolvedValue { path, .. } if path == "shadow.focus@dark"));

    let after = DirSnapshot::capture(project.path().join("dist")).unwrap();
    assert_eq!(before, after);
    assert!(!after.get("tokens.css").unwrap().contains("--dyn-spacing-xl"));
}

#[test]
fn test_conflicting_sources_fail_before_output() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/override.json"),
        r#"{ "spacing": { "md": "20px" } }"#,
    )
    .unwrap();

    let err = default_builder(project.path()).build_all_platforms().unwrap_err();
    assert!(matches!(err, Error::SourceParse { .. }), "{err}");
    assert!(!project.path().join("dist").exists());
}

#[test]
fn test_themed_source_token_conflicting_with_role_fails() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/dark.json"),
        r##"{ "color": { "text": { "primary": { "value": "#ff0000", "theme": "dark" } } } }"##,
    )
    .unwrap();

    let err = default_builder(project.path()).build_all_platforms().unwrap_err();
    match &err {
        Error::SourceParse { path, message, .. } => {
            assert!(path.ends_with("tokens/dark.json"), "{}", path.display());
            assert!(message.contains("color.text.primary@dark"), "{message}");
            assert!(message.contains("\"override\": true"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(!project.path().join("dist").exists());
}

#[test]
fn test_themed_source_token_marked_override_wins() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/dark.json"),
        r##"{ "color": { "text": {
            "primary": { "value": "#ff0000", "theme": "dark", "override": true },
            "inverse": { "value": "#111827", "theme": "dark" }
        } } }"##,
    )
    .unwrap();

    let report = default_builder(project.path()).build_all_platforms().unwrap();
    assert_eq!(report.themes[1].roles, 25);

    let dark = read_output(project.path(), "tokens-dark.css");
    assert!(dark.contains("  --dyn-color-text-primary: #ff0000;\n"), "{dark}");
    assert!(!dark.contains("  --dyn-color-text-primary: #ffffff;"));
    assert_eq!(declared_properties(&dark).len(), 26 + 25);

    let light = read_output(project.path(), "tokens.css");
    assert!(!light.contains("#ff0000"));
}

#[test]
fn test_aliased_tokens_emit_target_values() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/aliases.json"),
        r#"{ "color": { "brand": "{color.gray.900}" }, "spacing": { "gutter": "{spacing.md}" } }"#,
    )
    .unwrap();

    let report = default_builder(project.path()).build_all_platforms().unwrap();
    assert_eq!(report.tokens, 28);

    let css = read_output(project.path(), "variables.css");
    assert!(css.contains("  --dyn-color-brand: #111827;\n"), "{css}");
    assert!(css.contains("  --dyn-spacing-gutter: 1rem;\n"), "{css}");
    assert!(!css.contains("{color."), "{css}");

    let flat: Value = serde_json::from_str(&read_output(project.path(), "tokens.json")).unwrap();
    assert_eq!(flat["dynSpacingGutter"], "1rem");
    assert_eq!(flat["dynColorBrand"], "#111827");
}

#[test]
fn test_dangling_alias_fails_before_output() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/aliases.json"),
        r#"{ "color": { "brand": "{color.teal.500}" } }"#,
    )
    .unwrap();

    let err = default_builder(project.path()).build_all_platforms().unwrap_err();
    assert!(matches!(err.root(), Error::UnresolvedValue { path, .. } if path == "color.brand"), "{err}");
    assert!(!project.path().join("dist").exists());
}

#[test]
fn test_missing_palette_entries_use_fallbacks() {
    let project = fixture_project();
    fs::write(
        project.path().join("tokens/colors.json"),
        r##"{ "color": { "white": "#ffffff", "gray": { "900": "#111827" } } }"##,
    )
    .unwrap();

    let report = default_builder(project.path()).build_all_platforms().unwrap();
    let light = &report.themes[0];
    assert!(light
        .fallbacks
        .iter()
        .any(|f| f.role == "background.secondary" && f.missing == "color.gray.50"));
    assert!(!light.fallbacks.iter().any(|f| f.role == "text.primary"));

    let css = read_output(project.path(), "tokens.css");
    assert!(css.contains("  --dyn-color-background-secondary: #"));
    assert!(css.contains("  --dyn-color-text-primary: #111827;"));
}

#[test]
fn test_incomplete_custom_theme_is_rejected() {
    let project = fixture_project();
    let mut config = default_builder(project.path()).config().clone();

    let mut sepia = ThemeConfig::new("sepia");
    sepia
        .roles
        .insert("text.primary".to_string(), RoleSource::literal("#433422"));
    config.themes.push(sepia);

    let err = Builder::new(config, TransformRegistry::with_builtins())
        .build_all_platforms()
        .unwrap_err();
    assert!(matches!(err.root(), Error::ThemeCoverage { theme, .. } if theme == "sepia"), "{err}");
    assert!(!project.path().join("dist").exists());
}

#[test]
fn test_clean_removes_outputs() {
    let project = fixture_project();
    let builder = default_builder(project.path());
    builder.build_all_platforms().unwrap();

    let removed = builder.clean_all_platforms().unwrap();
    assert_eq!(removed.len(), 6);
    assert!(DirSnapshot::capture(project.path().join("dist")).unwrap().is_empty());
    assert!(builder.clean_all_platforms().unwrap().is_empty());
}
