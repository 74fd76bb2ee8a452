//! URL slug generation.
//!
//! Slugs are lowercase ASCII with hyphens; uniqueness (numeric suffixing) is
//! enforced by the repositories, which can see the table.

/// Slugify a display name: lowercase, alphanumerics kept, runs of anything
/// else collapsed to single hyphens, trimmed at both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Candidate slug for the nth uniqueness attempt: the base slug itself
/// first, then `{base}2`, `{base}3`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}{attempt}")
    }
}
