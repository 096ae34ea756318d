use anyhow::{Result, anyhow};
use isolang::Language;

// Language utilities for translation prompts
//
// Turns ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes into
// the English language name used in translation requests.

/// Map an ISO 639-2/B code to its ISO 639-2/T twin
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let terminology = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(terminology)
}

/// Resolve a 2 or 3 letter language code
pub fn lookup_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => bibliographic_to_terminology(&normalized_code)
            .and_then(Language::from_639_3)
            .or_else(|| Language::from_639_3(&normalized_code)),
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(lookup_language(code)?.to_name().to_string())
}

/// Label used for the target language in translation requests
///
/// Codes become English names ("fr" -> "French"); anything else is taken
/// as a label already ("Brazilian Portuguese").
pub fn target_language_label(input: &str) -> String {
    match get_language_name(input) {
        Ok(name) => name,
        Err(_) => input.trim().to_string(),
    }
}
