//! CSS custom property sheets

use super::GENERATED_HEADER;
use crate::token::Token;
use std::fmt::Write;

/// One `selector { --name: value; }` block
pub(super) fn variables(tokens: &[&Token], selector: &str) -> String {
    let mut out = String::with_capacity(64 + tokens.len() * 48);
    out.push_str(GENERATED_HEADER);
    out.push('\n');
    out.push_str(selector);
    out.push_str(" {\n");

    for token in tokens {
        // Writing into a String cannot fail
        let _ = write!(out, "  --{}: {};", token.name, token.value);
        if let Some(comment) = &token.comment {
            let _ = write!(out, " /* {} */", comment.replace("*/", "* /"));
        }
        out.push('\n');
    }

    out.push_str("}\n");
    out
}
