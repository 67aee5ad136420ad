//! History article metadata: categories, statuses, slug generation, and
//! validation applied before a document is persisted.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_BATTLES: &str = "battles";
pub const CATEGORY_UNIFORMS: &str = "uniforms";
pub const CATEGORY_DAILY_LIFE: &str = "daily-life";
pub const CATEGORY_ASSOCIATION: &str = "association";

/// All valid history article categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_BATTLES,
    CATEGORY_UNIFORMS,
    CATEGORY_DAILY_LIFE,
    CATEGORY_ASSOCIATION,
];

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid article statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED, STATUS_ARCHIVED];

/// Status assigned when the operator does not pick one.
pub const DEFAULT_STATUS: &str = STATUS_DRAFT;

/// Maximum article title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Derive a URL-safe slug from an article title.
///
/// Lowercases the title, maps every non-alphanumeric character to a
/// hyphen, collapses runs of hyphens, and strips them from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
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

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-blank, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a slug (non-empty, lowercase alphanumeric and hyphens only).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Validate a category against the known set.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if !VALID_CATEGORIES.contains(&category) {
        return Err(CoreError::Validation(format!(
            "Invalid category '{}'. Valid categories: {}",
            category,
            VALID_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate a status against the known set.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if !VALID_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid status '{}'. Valid statuses: {}",
            status,
            VALID_STATUSES.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
