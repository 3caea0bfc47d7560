use std::collections::HashSet;

/// Derive a URL-safe slug from a title: lowercase, word characters only,
/// whitespace and underscore runs collapsed to single hyphens, no
/// leading/trailing/repeated hyphens. May return an empty string for
/// titles with no usable characters; `allocate` handles that case.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_alphanumeric() {
            slug.push(c);
        }
        // everything else is stripped
    }
    slug.trim_end_matches('-').to_string()
}

/// Assign a slug for a title, unique among `existing`. Deterministic when
/// the slugified title is free; on collision a random 6-hex-char suffix is
/// appended (and re-rolled in the unlikely event it collides again).
/// Titles that slugify to nothing fall back to a random token.
pub fn allocate(title: &str, existing: &HashSet<String>) -> String {
    let mut base = slugify(title);
    if base.is_empty() {
        base = random_suffix();
    }
    if !existing.contains(&base) {
        return base;
    }
    loop {
        let candidate = format!("{}-{}", base, random_suffix());
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}

/// Six hex characters of cryptographically random token.
fn random_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_string()
}
