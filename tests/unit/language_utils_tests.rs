/*!
 * Tests for language utilities
 */

use subsent::errors::ConfigError;
use subsent::language_utils::{language_codes_match, primary_subtag, validate_language_code};

#[test]
fn test_validate_language_code_withCaptionTags_shouldAccept() {
    for code in ["en", "en-US", "en-GB", "ko", "pt-BR", "zh-Hant", "kor"] {
        assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
    }
}

#[test]
fn test_validate_language_code_withInvalidTags_shouldReturnInvalidLanguage() {
    for code in ["", "x", "zz", "english", "en-", "en-U$"] {
        assert!(
            matches!(validate_language_code(code), Err(ConfigError::InvalidLanguage(_))),
            "{} should be invalid",
            code
        );
    }
}

#[test]
fn test_primary_subtag_withRegion_shouldLowercasePrimary() {
    assert_eq!(primary_subtag("EN-us"), "en");
    assert_eq!(primary_subtag("pt_BR"), "pt");
}

#[test]
fn test_language_codes_match_withRegionVariants_shouldMatch() {
    assert!(language_codes_match("en", "en-US"));
    assert!(language_codes_match("ko", "kor"));
    assert!(!language_codes_match("en", "ko"));
    assert!(!language_codes_match("en", "zz"));
}
