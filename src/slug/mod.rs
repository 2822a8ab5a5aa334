//! Slug generation for note titles.
//!
//! Titles are lowercased, transliterated from Cyrillic into Latin and reduced
//! to `[a-z0-9_-]`, so that `"Заголовок"` becomes `"zagolovok"`.

use crate::entity::SLUG_MAX_LENGTH;

/// Transliteration of a single lowercase character, if it is one we keep.
///
/// ASCII letters and digits map to themselves. Quotes survive this step and
/// are removed by the final `[a-z0-9_-]` filter.
fn transliterate(c: char) -> Option<&'static str> {
    let out = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
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
        'ъ' => "`",
        'ы' => "yi",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        // Typography
        '\'' | '‘' | '’' => "'",
        '"' | '«' | '»' | '“' | '”' => "\"",
        '–' | '—' | '‒' | '−' | '-' => "-",
        '№' => "#",
        c if c.is_ascii_lowercase() || c.is_ascii_digit() => return ascii_str(c),
        _ => return None,
    };
    Some(out)
}

/// Static single-character string for an ASCII lowercase letter or digit
fn ascii_str(c: char) -> Option<&'static str> {
    const TABLE: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
    TABLE.find(c).map(|i| &TABLE[i..i + 1])
}

/// Convert a title into a URL-safe slug.
///
/// - Lowercases the input and spells out `&` as `and`
/// - Collapses runs of whitespace and hyphens into a single hyphen
/// - Drops characters that cannot be transliterated
/// - Transliterates Cyrillic into Latin
/// - Keeps only `[a-z0-9_-]`
///
/// The result may be empty when nothing in the title is transliterable.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let lowered = lowered.replace("&amp;", " and ").replace('&', " and ");

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_separator = false;
    for c in lowered.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_separator {
                collapsed.push('-');
                in_separator = true;
            }
        } else {
            collapsed.push(c);
            in_separator = false;
        }
    }

    let translated: String = collapsed.chars().filter_map(transliterate).collect();

    translated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_ascii_lowercase()
}

/// Truncate a slug to at most `max` characters
pub fn truncate(slug: &str, max: usize) -> String {
    slug.chars().take(max).collect()
}

/// Slug for a note title: `slugify` truncated to the slug column length
pub fn slug_for_title(title: &str) -> String {
    truncate(&slugify(title), SLUG_MAX_LENGTH)
}

/// Whether a user-supplied slug only uses letters, digits, underscores or hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
