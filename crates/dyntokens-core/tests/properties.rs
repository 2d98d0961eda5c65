//! Property-based tests for the transform pipeline
//!
//! These tests verify invariants that should hold for any token tree the
//! loader accepts.

use dyntokens_core::transform::built_in::{GROUP_CSS, GROUP_JS};
use dyntokens_core::transform::{TransformBuilder, TransformPipeline};
use dyntokens_core::{
    apply_group, ClassificationRules, Dictionary, Token, TokenValue, TransformOptions,
    TransformRegistry,
};
use proptest::prelude::*;

/// Strategy for token path segments as they appear in source files
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

/// Strategy for token paths of one to four segments
fn path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..=4)
}

/// Strategy for dictionaries of distinct paths with text values
fn dictionary_strategy() -> impl Strategy<Value = Dictionary> {
    prop::collection::btree_map(path_strategy(), "#[0-9a-f]{3,8}", 1..20).prop_map(|entries| {
        let rules = ClassificationRules::default();
        entries
            .into_iter()
            .map(|(path, value)| {
                let attributes = rules.classify(&path);
                Token::new(path, value.as_str()).with_attributes(attributes)
            })
            .collect()
    })
}

fn classified(path: &[String], value: impl Into<TokenValue>) -> Token {
    let attributes = ClassificationRules::default().classify(path);
    Token::new(path.iter().cloned(), value).with_attributes(attributes)
}

proptest! {
    #[test]
    fn css_names_join_prefix_and_path(path in path_strategy()) {
        let mut dictionary = Dictionary::new();
        dictionary.insert(classified(&path, "x"));

        let registry = TransformRegistry::with_builtins();
        let out = apply_group(&registry, GROUP_CSS, &dictionary, &TransformOptions::default()).unwrap();
        let token = out.iter().next().unwrap();

        prop_assert_eq!(&token.name, &format!("dyn-{}", path.join("-")));
        prop_assert!(!token.name.contains('.'));
        prop_assert_eq!(&token.path, &path);
    }

    #[test]
    fn js_names_are_identifiers(path in path_strategy()) {
        let mut dictionary = Dictionary::new();
        dictionary.insert(classified(&path, "x"));

        let registry = TransformRegistry::with_builtins();
        let out = apply_group(&registry, GROUP_JS, &dictionary, &TransformOptions::default()).unwrap();
        let name = &out.iter().next().unwrap().name;

        prop_assert!(name.starts_with("dyn"));
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn px_sizes_become_rem(px in 0u32..10_000) {
        let path = vec!["spacing".to_string(), "x".to_string()];
        let mut dictionary = Dictionary::new();
        dictionary.insert(classified(&path, format!("{px}px")));

        let registry = TransformRegistry::with_builtins();
        let out = apply_group(&registry, GROUP_CSS, &dictionary, &TransformOptions::default()).unwrap();
        let value = out.iter().next().unwrap().value.to_string();

        let rem: f64 = value.strip_suffix("rem").unwrap().parse().unwrap();
        prop_assert_eq!(rem * 16.0, f64::from(px));
    }

    #[test]
    fn never_matching_filter_changes_nothing(dictionary in dictionary_strategy()) {
        let transform = TransformBuilder::new("test/never")
            .filter(|_| false)
            .value(|_, _| Ok(TokenValue::Null))
            .build()
            .unwrap();
        let pipeline = TransformPipeline::new("test", TransformOptions::default())
            .add_transform(transform);

        let out = pipeline.apply(&dictionary).unwrap();
        prop_assert_eq!(out, dictionary);
    }

    #[test]
    fn transforms_preserve_order_and_count(dictionary in dictionary_strategy()) {
        let registry = TransformRegistry::with_builtins();
        let out = apply_group(&registry, GROUP_CSS, &dictionary, &TransformOptions::default()).unwrap();

        let before: Vec<String> = dictionary.iter().map(Token::path_key).collect();
        let after: Vec<String> = out.iter().map(Token::path_key).collect();
        prop_assert_eq!(before, after);
    }
}
