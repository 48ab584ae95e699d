use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO 639 language codes
///
/// Used to validate the configured language pair and to decide whether a
/// request's source language is enabled.
/// Kind of a recognised language code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

// ISO 639-2/B codes that differ from their ISO 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn terminological_form(code: &str) -> Option<&'static str> {
    BIBLIOGRAPHIC_CODES
        .iter()
        .find(|(bibliographic, _)| *bibliographic == code)
        .map(|(_, terminological)| *terminological)
}

fn lookup(code: &str) -> Option<(Language, LanguageCodeType)> {
    let code = code.trim().to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code).map(|lang| (lang, LanguageCodeType::Part1)),
        3 => match terminological_form(&code) {
            Some(part2t) => Language::from_639_3(part2t).map(|lang| (lang, LanguageCodeType::Part2B)),
            None => Language::from_639_3(&code).map(|lang| (lang, LanguageCodeType::Part2T)),
        },
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    lookup(code)
        .map(|(_, kind)| kind)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    lookup(code)
        .map(|(lang, _)| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Some((a, _)), Some((b, _))) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    lookup(code)
        .map(|(lang, _)| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}

/// Whether `code` is one of the `supported` languages.
///
/// An empty list accepts every valid code.
pub fn is_supported_language(code: &str, supported: &[String]) -> bool {
    if supported.is_empty() {
        return lookup(code).is_some();
    }
    supported.iter().any(|candidate| language_codes_match(code, candidate))
}
