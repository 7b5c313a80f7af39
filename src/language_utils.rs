use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The translation service takes ISO 639-1 codes; users may type 2-letter or
/// 3-letter codes, which are normalized here before a request is sent.
/// Languages the translation service has grammar rules for
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "hi", "mr"];

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/T equivalent of a ISO 639-2/B code, if the two differ
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if bibliographic_to_terminology(&normalized_code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Resolve a 2- or 3-letter code to its language
fn lookup(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = bibliographic_to_terminology(&normalized_code).unwrap_or(&normalized_code);
            Language::from_639_3(part2t)
        }
        _ => None,
    };
    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    Ok(lookup(code)?.to_639_3().to_string())
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let language = lookup(code)?;
    Ok(language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(lookup(code)?.to_name().to_string())
}

/// Whether the translation service knows `code`, in any accepted form
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES
        .iter()
        .any(|supported| language_codes_match(supported, code))
}

/// Code to put in a translation request
pub fn to_service_code(code: &str) -> Result<String> {
    normalize_to_part1_or_part2t(code)
}
