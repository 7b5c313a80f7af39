/*!
 * Tests for language utility functions
 */

use signplay::language_utils::{
    LanguageCodeType, SUPPORTED_LANGUAGES, get_language_name, is_supported_language, language_codes_match,
    normalize_to_part1_or_part2t, normalize_to_part2t, to_service_code, validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("hi").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("mar").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1);

    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test normalization of language codes
#[test]
fn test_normalize_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("hi").unwrap(), "hin");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");

    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("mar").unwrap(), "mr");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
}

/// Test language code matching across forms
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("HI", "hin"));
    assert!(language_codes_match("de", "ger"));
    assert!(!language_codes_match("en", "hi"));
    assert!(!language_codes_match("en", "123"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("hin").unwrap(), "Hindi");
    assert!(get_language_name("q").is_err());
}

/// Test the service's language list
#[test]
fn test_isSupportedLanguage_shouldAcceptServiceLanguagesInAnyForm() {
    for code in SUPPORTED_LANGUAGES {
        assert!(is_supported_language(code));
    }
    assert!(is_supported_language("eng"));
    assert!(is_supported_language("mar"));
    assert!(!is_supported_language("fr"));
    assert!(!is_supported_language("123"));
}

#[test]
fn test_toServiceCode_shouldPreferTwoLetterCodes() {
    assert_eq!(to_service_code("eng").unwrap(), "en");
    assert_eq!(to_service_code(" Hi ").unwrap(), "hi");
    assert!(to_service_code("nope").is_err());
}
