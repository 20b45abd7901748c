//! Conversion of arbitrary names to their canonical, comparable form

/// Separator inserted between words of a canonical name.
pub const SEPARATOR: char = '-';

/// Convert any text to its canonical lower-kebab form.
///
/// - Lowercases every character.
/// - Splits camel case: a separator is inserted before an uppercase letter
///   that directly follows a lowercase letter or a digit. Runs of uppercase
///   letters are kept together (`APIUtils` -> `apiutils`).
/// - Replaces every maximal run of characters outside `[a-z0-9.]` with a
///   single separator.
/// - Trims leading and trailing separators.
///
/// `FooBar` -> `foo-bar`, `my_file name` -> `my-file-name`, `""` -> `""`.
pub fn to_canonical_form(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 4);
    let mut last_was_separator = true; // Start true to skip leading separators
    let mut prev: Option<char> = None;

    for c in text.chars() {
        let word_boundary =
            c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        prev = Some(c);

        if word_boundary && !last_was_separator {
            result.push(SEPARATOR);
            last_was_separator = true;
        }

        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '.' {
                result.push(lower);
                last_was_separator = false;
            } else if !last_was_separator {
                result.push(SEPARATOR);
                last_was_separator = true;
            }
        }
    }

    // Remove trailing separator
    if result.ends_with(SEPARATOR) {
        result.pop();
    }

    result
}
