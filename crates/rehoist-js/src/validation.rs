// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! JavaScript identifier validation.

use thiserror::Error;


/// Error for validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid JavaScript identifier name.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reserved words of the language, literals included.
pub const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

/// Names that are reserved in strict mode code, where modules always run.
pub const STRICT_MODE_RESERVED: &[&str] = &[
    "arguments",
    "await",
    "eval",
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

fn is_id_continue(c: char) -> bool {
    // ZWNJ and ZWJ are allowed after the first character.
    c == '$' || c == '\u{200c}' || c == '\u{200d}' || unicode_ident::is_xid_continue(c)
}

/// Validate that `name` can be declared with `const` in any source type.
///
/// # Examples
///
/// ```
/// use rehoist_js::validation::validate_js_identifier;
///
/// assert!(validate_js_identifier("REGEX").is_ok());
/// assert!(validate_js_identifier("$re_1").is_ok());
/// assert!(validate_js_identifier("").is_err());
/// assert!(validate_js_identifier("1RE").is_err());
/// assert!(validate_js_identifier("class").is_err());
/// ```
pub fn validate_js_identifier(name: &str) -> ValidationResult<()> {
    let invalid = |reason: String| ValidationError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("name cannot be empty".to_string()));
    };
    if !is_id_start(first) {
        return Err(invalid(
            "must start with a letter, `_` or `$`".to_string(),
        ));
    }
    if let Some(ch) = chars.find(|c| !is_id_continue(*c)) {
        return Err(invalid(format!("invalid character: '{}'", ch)));
    }
    if RESERVED_WORDS.contains(&name) || STRICT_MODE_RESERVED.contains(&name) {
        return Err(invalid("cannot use a reserved word as identifier".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["REGEX", "_re", "$", "re2", "café", "a\u{200c}b"] {
            assert!(validate_js_identifier(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn invalid_names() {
        assert_eq!(
            validate_js_identifier("").unwrap_err().to_string(),
            "invalid name '': name cannot be empty"
        );
        assert!(validate_js_identifier("9lives").is_err());
        assert_eq!(
            validate_js_identifier("RE-GEX").unwrap_err().to_string(),
            "invalid name 'RE-GEX': invalid character: '-'"
        );
        for name in ["const", "null", "let", "yield", "arguments"] {
            assert!(validate_js_identifier(name).is_err(), "{}", name);
        }
    }
}
