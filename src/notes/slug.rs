//! Slug derivation for note URLs.

/// Maximum length of a note slug (matches the column width the forms allow).
pub const SLUG_MAX_LEN: usize = 100;

/// Convert a title to a URL-safe slug.
///
/// Lowercases, maps every non-ASCII-alphanumeric character to a hyphen,
/// collapses runs of hyphens, and truncates to [`SLUG_MAX_LEN`] without
/// leaving a trailing hyphen. Non-ASCII characters do not contribute to
/// the slug; a title without any ASCII alphanumerics yields an empty
/// string, which the form layer treats as a validation error.
pub fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    truncate_slug(&slug)
}

/// Truncate a slug to [`SLUG_MAX_LEN`], trimming any hyphen left dangling
/// at the cut point.
fn truncate_slug(slug: &str) -> String {
    if slug.len() <= SLUG_MAX_LEN {
        return slug.to_string();
    }
    slug[..SLUG_MAX_LEN].trim_end_matches('-').to_string()
}
