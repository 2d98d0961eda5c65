//! Built-in transforms
//!
//! The naming, unit and color transforms the DynUI-Max token package relies
//! on. Each function returns a fresh [`Transform`] ready for registration.

use super::types::{Transform, TransformAction, TransformOptions};
use crate::error::{Error, Result};
use crate::token::{format_number, Attributes, Token, TokenValue};
use regex::Regex;
use std::sync::OnceLock;

pub const ATTRIBUTE_CTI: &str = "attribute/cti";
pub const NAME_DYN_KEBAB: &str = "name/cti/dyn-kebab";
pub const NAME_CAMEL: &str = "name/cti/camel";
pub const TIME_SECONDS: &str = "time/seconds";
pub const SIZE_PX_TO_REM: &str = "size/px-to-rem";
pub const FONT_FAMILY_CSS: &str = "font/family/css";
pub const COLOR_HEX: &str = "color/hex";

pub const GROUP_CSS: &str = "dyn/css";
pub const GROUP_JS: &str = "dyn/js";

/// Every built-in transform, in registration order
pub fn all() -> Vec<Transform> {
    vec![
        attribute_cti(),
        name_dyn_kebab(),
        name_camel(),
        time_seconds(),
        size_px_to_rem(),
        font_family_css(),
        color_hex(),
    ]
}

/// Transform names of the `dyn/css` group. Attribution runs first, then
/// naming, then unit conversions, then final value formatting.
pub fn css_group() -> Vec<&'static str> {
    vec![
        ATTRIBUTE_CTI,
        NAME_DYN_KEBAB,
        TIME_SECONDS,
        SIZE_PX_TO_REM,
        FONT_FAMILY_CSS,
        COLOR_HEX,
    ]
}

/// Transform names of the `dyn/js` group
pub fn js_group() -> Vec<&'static str> {
    vec![ATTRIBUTE_CTI, NAME_CAMEL, TIME_SECONDS, SIZE_PX_TO_REM, COLOR_HEX]
}

fn transform(name: &str, filter: Option<fn(&Token) -> bool>, action: TransformAction, description: &str) -> Transform {
    Transform {
        name: name.to_string(),
        filter,
        action,
        description: Some(description.to_string()),
    }
}

/// Fill category/type/item/subitem from the path where they are still missing
pub fn attribute_cti() -> Transform {
    transform(
        ATTRIBUTE_CTI,
        None,
        TransformAction::Attribute(|token, _| {
            let current = &token.attributes;
            let segment = |i: usize| token.path.get(i).cloned();
            Attributes {
                category: current.category.clone().or_else(|| segment(0)),
                kind: current.kind.clone().or_else(|| segment(1)),
                item: current.item.clone().or_else(|| segment(2)),
                subitem: current.subitem.clone().or_else(|| segment(3)),
                theme: current.theme.clone(),
            }
        }),
        "Adds category/type/item attributes derived from the token path",
    )
}

/// `dyn-color-primary-500`
pub fn name_dyn_kebab() -> Transform {
    transform(
        NAME_DYN_KEBAB,
        None,
        TransformAction::Name(|token, options| kebab_name(&token.path, options)),
        "Prefixed name with path segments joined by the separator",
    )
}

/// `dynColorPrimary500`
pub fn name_camel() -> Transform {
    transform(
        NAME_CAMEL,
        None,
        TransformAction::Name(|token, options| camel_name(&token.path, options)),
        "Prefixed camelCase name for JavaScript consumers",
    )
}

/// Milliseconds to seconds for `time` tokens
pub fn time_seconds() -> Transform {
    transform(
        TIME_SECONDS,
        Some(|token| {
            token.attributes.is_category("time")
                && match &token.value {
                    TokenValue::Number(_) => true,
                    TokenValue::Text(s) => s.trim().ends_with("ms"),
                    _ => false,
                }
        }),
        TransformAction::Value(|token, _| {
            let ms = match &token.value {
                TokenValue::Number(n) => *n,
                other => parse_unit(other, "ms", token)?,
            };
            Ok(TokenValue::Text(format!("{}s", format_number(ms / 1000.0))))
        }),
        "Converts millisecond durations to seconds",
    )
}

/// `16px` to `1rem` for `size` tokens
pub fn size_px_to_rem() -> Transform {
    transform(
        SIZE_PX_TO_REM,
        Some(|token| {
            token.attributes.is_category("size")
                && token
                    .value
                    .as_str()
                    .is_some_and(|s| s.trim().ends_with("px"))
        }),
        TransformAction::Value(|token, options| {
            if options.base_font_size <= 0.0 {
                return Err(Error::configuration("base_font_size must be positive"));
            }
            let px = parse_unit(&token.value, "px", token)?;
            Ok(TokenValue::Text(format!(
                "{}rem",
                format_number(px / options.base_font_size)
            )))
        }),
        "Converts px sizes to rem using the base font size",
    )
}

/// Font family stacks pass through unchanged
pub fn font_family_css() -> Transform {
    transform(
        FONT_FAMILY_CSS,
        Some(|token| token.attributes.is_category("font") && token.attributes.is_type("family")),
        TransformAction::Value(|token, _| Ok(token.value.clone())),
        "Keeps font family values as declared",
    )
}

/// Normalises `rgb()`/`rgba()` colors to hex; hex input is left as written
pub fn color_hex() -> Transform {
    transform(
        COLOR_HEX,
        Some(|token| token.attributes.is_category("color") && token.value.as_str().is_some()),
        TransformAction::Value(|token, _| {
            let Some(raw) = token.value.as_str() else {
                return Ok(token.value.clone());
            };
            Ok(match rgb_to_hex(raw) {
                Some(hex) => TokenValue::Text(hex),
                None => token.value.clone(),
            })
        }),
        "Ensures colors are expressed in hex",
    )
}

/// Join the prefix and path segments with the separator
pub fn kebab_name(path: &[String], options: &TransformOptions) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(path.len() + 1);
    if !options.prefix.is_empty() {
        parts.push(&options.prefix);
    }
    parts.extend(path.iter().map(String::as_str));
    parts.join(&options.separator)
}

/// camelCase of the prefix and path segments
pub fn camel_name(path: &[String], options: &TransformOptions) -> String {
    let words = std::iter::once(options.prefix.as_str())
        .chain(path.iter().map(String::as_str))
        .flat_map(|segment| segment.split(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty());

    let mut name = String::new();
    for word in words {
        if name.is_empty() {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_lowercase());
                name.push_str(chars.as_str());
            }
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
        }
    }
    name
}

fn parse_unit(value: &TokenValue, unit: &str, token: &Token) -> Result<f64> {
    value
        .as_str()
        .map(str::trim)
        .and_then(|s| s.strip_suffix(unit))
        .and_then(|n| n.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            Error::unresolved(
                token.path_key(),
                format!("cannot read '{}' as a {unit} quantity", value),
            )
        })
}

fn hex_pattern() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("hex color pattern is valid")
    })
}

fn rgb_pattern() -> &'static Regex {
    static RGB: OnceLock<Regex> = OnceLock::new();
    RGB.get_or_init(|| {
        Regex::new(
            r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
        )
        .expect("rgb color pattern is valid")
    })
}

/// Hex form of an `rgb()`/`rgba()` color, `None` for anything else
pub fn rgb_to_hex(input: &str) -> Option<String> {
    let input = input.trim();
    if hex_pattern().is_match(input) {
        return None;
    }
    let caps = rgb_pattern().captures(input)?;

    let channel = |i: usize| -> Option<u8> {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .map(|v| v.min(255) as u8)
    };
    let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
    let mut hex = format!("#{r:02x}{g:02x}{b:02x}");

    if let Some(alpha) = caps.get(4).and_then(|m| m.as_str().parse::<f64>().ok()) {
        if alpha < 1.0 {
            let byte = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            hex.push_str(&format!("{byte:02x}"));
        }
    }
    Some(hex)
}
