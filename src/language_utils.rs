//! Language utilities for caption language tags
//!
//! Caption tracks are tagged with BCP 47 style codes such as `en`, `en-US`
//! or `zh-Hans`. Only the primary subtag is checked against ISO 639-1 and
//! ISO 639-3; region and script subtags are accepted as-is.

use isolang::Language;

use crate::errors::ConfigError;

/// Primary language subtag of a tag, lowercased (`en-US` -> `en`)
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(code: &str) -> Option<Language> {
    let primary = primary_subtag(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Validate a caption language tag
pub fn validate_language_code(code: &str) -> Result<(), ConfigError> {
    let subtags_ok = code
        .trim()
        .split(['-', '_'])
        .skip(1)
        .all(|subtag| !subtag.is_empty() && subtag.chars().all(|c| c.is_ascii_alphanumeric()));

    match lookup(code) {
        Some(_) if subtags_ok => Ok(()),
        _ => Err(ConfigError::InvalidLanguage(code.to_string())),
    }
}

/// Check if two tags name the same language, ignoring region subtags
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
