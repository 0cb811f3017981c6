//! URL slug generation for blog posts.

lazy_static::lazy_static! {
    static ref NON_SLUG_CHARS: regex::Regex = regex::Regex::new(r"[^a-z0-9]+").unwrap();
    /// Valid slug: lowercase alphanumerics separated by single hyphens.
    pub static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Maximum slug length; longer titles are cut at a hyphen boundary.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Converts a title into a URL slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and trims leading/trailing hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let replaced = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches('-');

    if trimmed.len() <= MAX_SLUG_LENGTH {
        return trimmed.to_string();
    }

    let cut = &trimmed[..MAX_SLUG_LENGTH];
    match cut.rfind('-') {
        Some(pos) if pos > 0 => cut[..pos].to_string(),
        _ => cut.to_string(),
    }
}

/// Returns true if the value is already a valid slug.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && SLUG_REGEX.is_match(slug)
}
