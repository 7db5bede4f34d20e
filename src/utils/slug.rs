/// Lowercase, URL-safe identifier derived from a display name.
///
/// Non-ASCII letters are transliterated (`é` becomes `e`, Cyrillic is
/// romanised) and `&` is spelled out as `and`. Whitespace and punctuation
/// collapse into single `-` separators, so the result only ever contains
/// `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    slug::slugify(name.replace('&', " and "))
}
