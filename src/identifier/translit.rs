//! Cyrillic to Latin transliteration and anchor ids.
//!
//! Anchor ids are used both for in-page navigation (`#graficheskiy-dizayn`)
//! and as the readable half of SEO segments.

/// Latin replacement for a lower-case Cyrillic letter, `None` for anything else
fn latin_for(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Lower-case the text and replace Cyrillic letters with their Latin spelling.
/// Other characters pass through unchanged.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match latin_for(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// URL- and fragment-safe id for a label.
///
/// Transliterates, lower-cases, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and strips hyphens at both ends. Total
/// (empty in, empty out) and idempotent.
pub fn anchor_id(text: &str) -> String {
    let transliterated = transliterate(text);

    let mut out = String::with_capacity(transliterated.len());
    let mut pending_hyphen = false;
    for c in transliterated.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    out
}
