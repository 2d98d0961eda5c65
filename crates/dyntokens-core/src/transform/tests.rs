//! Tests for the token transform system

use super::built_in::{self, rgb_to_hex};
use super::{
    apply_group, validate_names, TransformBuilder, TransformKind, TransformOptions,
    TransformPipeline, TransformRegistry,
};
use crate::loader::ClassificationRules;
use crate::token::{Dictionary, Token, TokenValue};
use crate::Error;

fn classified(path: &[&str], value: impl Into<TokenValue>) -> Token {
    let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    let attributes = ClassificationRules::default().classify(&path);
    Token::new(path, value).with_attributes(attributes)
}

fn css(dictionary: &Dictionary) -> Dictionary {
    let registry = TransformRegistry::with_builtins();
    apply_group(&registry, "dyn/css", dictionary, &TransformOptions::default()).unwrap()
}

#[test]
fn test_registry_builtins() {
    let registry = TransformRegistry::with_builtins();
    for name in [
        "attribute/cti",
        "name/cti/dyn-kebab",
        "name/cti/camel",
        "time/seconds",
        "size/px-to-rem",
        "font/family/css",
        "color/hex",
    ] {
        assert!(registry.contains(name), "missing {name}");
    }
    let groups: Vec<&str> = registry.groups().map(|g| g.name.as_str()).collect();
    assert_eq!(groups, vec!["dyn/css", "dyn/js"]);
    assert_eq!(registry.lookup("size/px-to-rem").unwrap().kind(), TransformKind::Value);
}

#[test]
fn test_duplicate_registration_is_an_error() {
    let mut registry = TransformRegistry::with_builtins();
    let err = registry.register(built_in::color_hex()).unwrap_err();
    assert!(matches!(err, Error::DuplicateTransform { .. }));

    let replaced = registry.register_override(built_in::color_hex());
    assert!(replaced.is_some());
}

#[test]
fn test_lookup_unknown_transform() {
    let registry = TransformRegistry::new();
    let err = registry.lookup("size/em").unwrap_err();
    assert_eq!(err.kind(), "unknown_transform");
}

#[test]
fn test_group_with_unknown_member_is_rejected() {
    let mut registry = TransformRegistry::with_builtins();
    let err = registry
        .define_group("brand/css", ["attribute/cti", "size/em"])
        .unwrap_err();
    match err {
        Error::UnknownTransform { name, group } => {
            assert_eq!(name, "size/em");
            assert_eq!(group.as_deref(), Some("brand/css"));
        }
        other => panic!("unexpected error {other}"),
    }

    let err = registry.define_group("dyn/css", ["attribute/cti"]).unwrap_err();
    assert!(matches!(err, Error::DuplicateTransform { .. }));
    assert!(registry
        .define_group_override("dyn/css", ["attribute/cti"])
        .unwrap()
        .is_some());
}

#[test]
fn test_dyn_kebab_names() {
    let dict: Dictionary = [
        classified(&["colors", "primary", "500"], "#3366FF"),
        classified(&["spacing", "2xl"], "48px"),
    ]
    .into_iter()
    .collect();

    let out = css(&dict);
    let names: Vec<&str> = out.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["dyn-colors-primary-500", "dyn-spacing-2xl"]);
}

#[test]
fn test_camel_names() {
    let options = TransformOptions::default();
    let path: Vec<String> = ["typography", "fontSize", "2xl"].iter().map(|s| s.to_string()).collect();
    assert_eq!(built_in::camel_name(&path, &options), "dynTypographyFontSize2xl");

    let path: Vec<String> = ["z-index", "modal"].iter().map(|s| s.to_string()).collect();
    assert_eq!(built_in::camel_name(&path, &options), "dynZIndexModal");
}

#[test]
fn test_custom_prefix_and_separator() {
    let options = TransformOptions {
        prefix: String::new(),
        separator: "_".to_string(),
        ..TransformOptions::default()
    };
    let path: Vec<String> = ["color", "white"].iter().map(|s| s.to_string()).collect();
    assert_eq!(built_in::kebab_name(&path, &options), "color_white");
}

#[test]
fn test_px_to_rem_only_for_size_category() {
    let dict: Dictionary = [
        classified(&["spacing", "md"], "16px"),
        classified(&["spacing", "sm"], "8px"),
        classified(&["radius", "full"], "9999px"),
        classified(&["shadow", "offset"], "4px"),
        classified(&["spacing", "auto"], "auto"),
    ]
    .into_iter()
    .collect();

    let out = css(&dict);
    let value = |p: &str| out.get_path(p).unwrap().value.to_string();
    assert_eq!(value("spacing.md"), "1rem");
    assert_eq!(value("spacing.sm"), "0.5rem");
    assert_eq!(value("radius.full"), "624.9375rem");
    assert_eq!(value("shadow.offset"), "4px");
    assert_eq!(value("spacing.auto"), "auto");
}

#[test]
fn test_px_to_rem_respects_base_font_size() {
    let registry = TransformRegistry::with_builtins();
    let options = TransformOptions {
        base_font_size: 10.0,
        ..TransformOptions::default()
    };
    let dict: Dictionary = std::iter::once(classified(&["size", "icon"], "24px")).collect();
    let out = apply_group(&registry, "dyn/css", &dict, &options).unwrap();
    assert_eq!(out.get_path("size.icon").unwrap().value.to_string(), "2.4rem");
}

#[test]
fn test_malformed_px_value_fails() {
    let dict: Dictionary = std::iter::once(classified(&["spacing", "odd"], "calc(1px)px")).collect();
    let registry = TransformRegistry::with_builtins();
    let err = apply_group(&registry, "dyn/css", &dict, &TransformOptions::default()).unwrap_err();
    assert_eq!(err.kind(), "unresolved_value");
}

#[test]
fn test_time_to_seconds() {
    let dict: Dictionary = [
        classified(&["duration", "fast"], "150ms"),
        classified(&["duration", "slow"], TokenValue::Number(400.0)),
        classified(&["duration", "done"], "0.2s"),
    ]
    .into_iter()
    .collect();

    let out = css(&dict);
    let value = |p: &str| out.get_path(p).unwrap().value.to_string();
    assert_eq!(value("duration.fast"), "0.15s");
    assert_eq!(value("duration.slow"), "0.4s");
    assert_eq!(value("duration.done"), "0.2s");
}

#[test]
fn test_font_family_passthrough() {
    let stack = TokenValue::List(vec!["Inter".into(), "system-ui".into()]);
    let dict: Dictionary = std::iter::once(classified(&["font", "family", "sans"], stack.clone())).collect();
    let out = css(&dict);
    assert_eq!(out.get_path("font.family.sans").unwrap().value, stack);
}

#[test]
fn test_color_hex() {
    assert_eq!(rgb_to_hex("#3366FF"), None);
    assert_eq!(rgb_to_hex("rgb(51, 102, 255)").as_deref(), Some("#3366ff"));
    assert_eq!(rgb_to_hex("rgba(0,0,0,0.5)").as_deref(), Some("#00000080"));
    assert_eq!(rgb_to_hex("rgba(0,0,0,1)").as_deref(), Some("#000000"));
    assert_eq!(rgb_to_hex("transparent"), None);

    let dict: Dictionary = [
        classified(&["colors", "primary", "500"], "#3366FF"),
        classified(&["colors", "overlay"], "rgba(17, 24, 39, 0.5)"),
    ]
    .into_iter()
    .collect();
    let out = css(&dict);
    assert_eq!(out.get_path("colors.primary.500").unwrap().value.to_string(), "#3366FF");
    assert_eq!(out.get_path("colors.overlay").unwrap().value.to_string(), "#11182780");
}

#[test]
fn test_attribute_cti_fills_missing_only() {
    let token = Token::new(["opacity", "disabled"], TokenValue::Number(0.5));
    let dict: Dictionary = std::iter::once(token).collect();
    let out = css(&dict);
    let attributes = &out.get_path("opacity.disabled").unwrap().attributes;
    assert_eq!(attributes.category.as_deref(), Some("opacity"));
    assert_eq!(attributes.kind.as_deref(), Some("disabled"));

    // Loader classification wins over the raw path segment
    let dict: Dictionary = std::iter::once(classified(&["spacing", "md"], "16px")).collect();
    let out = css(&dict);
    assert_eq!(out.get_path("spacing.md").unwrap().attributes.category.as_deref(), Some("size"));
}

#[test]
fn test_attribute_transform_keeps_theme() {
    let token = classified(&["color", "text", "primary"], "#111827").with_theme("light");
    let out = TransformPipeline::new("custom", TransformOptions::default())
        .add_transform(built_in::attribute_cti())
        .apply_token(&token)
        .unwrap();
    assert_eq!(out.attributes.theme.as_deref(), Some("light"));
}

#[test]
fn test_transforms_are_idempotent() {
    let dict: Dictionary = [
        classified(&["spacing", "md"], "16px"),
        classified(&["colors", "overlay"], "rgb(0, 0, 0)"),
        classified(&["duration", "fast"], "150ms"),
    ]
    .into_iter()
    .collect();

    let once = css(&dict);
    let twice = css(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_never_matching_filter_is_noop() {
    let never = TransformBuilder::new("test/never")
        .filter(|_| false)
        .value(|_, _| Ok(TokenValue::Null))
        .build()
        .unwrap();

    let mut registry = TransformRegistry::new();
    registry.register(never).unwrap();
    registry.define_group("test/noop", ["test/never"]).unwrap();

    let dict: Dictionary = [
        classified(&["spacing", "md"], "16px"),
        classified(&["colors", "white"], "#fff"),
    ]
    .into_iter()
    .collect();
    let out = apply_group(&registry, "test/noop", &dict, &TransformOptions::default()).unwrap();
    assert_eq!(out, dict);
}

#[test]
fn test_non_matching_transform_does_not_short_circuit() {
    let pipeline = TransformPipeline::new("custom", TransformOptions::default())
        .add_transform(built_in::color_hex())
        .add_transform(built_in::size_px_to_rem())
        .add_transform(built_in::name_dyn_kebab());

    assert_eq!(pipeline.transform_names(), vec!["color/hex", "size/px-to-rem", "name/cti/dyn-kebab"]);
    let out = pipeline.apply_token(&classified(&["spacing", "md"], "16px")).unwrap();
    assert_eq!(out.value.to_string(), "1rem");
    assert_eq!(out.name, "dyn-spacing-md");
    assert_eq!(out.original, TokenValue::from("16px"));
}

#[test]
fn test_builder_requires_action() {
    let err = TransformBuilder::new("test/empty").build().unwrap_err();
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn test_name_collision_detected() {
    // `a-b.c` and `a.b-c` both become `dyn-a-b-c`
    let dict: Dictionary = [
        classified(&["a-b", "c"], "1"),
        classified(&["a", "b-c"], "2"),
    ]
    .into_iter()
    .collect();
    let out = css(&dict);
    let err = validate_names(&out).unwrap_err();
    match err {
        Error::NameCollision { name, first, second } => {
            assert_eq!(name, "dyn-a-b-c");
            assert_eq!(first, "a-b.c");
            assert_eq!(second, "a.b-c");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_same_path_in_different_themes_is_not_a_collision() {
    let dict: Dictionary = [
        classified(&["color", "text", "primary"], "#111827").with_theme("light"),
        classified(&["color", "text", "primary"], "#ffffff").with_theme("dark"),
    ]
    .into_iter()
    .collect();
    validate_names(&css(&dict)).unwrap();
}

#[test]
fn test_themed_token_shadowing_base_token_is_a_collision() {
    let dict: Dictionary = [
        classified(&["color", "text", "primary"], "#000000"),
        classified(&["color", "text", "primary"], "#ffffff").with_theme("dark"),
    ]
    .into_iter()
    .collect();
    let err = validate_names(&css(&dict)).unwrap_err();
    assert_eq!(err.kind(), "name_collision");
}
