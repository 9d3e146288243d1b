//! Display-name normalization: `Elven Arrow` becomes `Arrow - Elven`.
//!
//! The transform is not a fixed point. Feeding an already renamed name back
//! in prepends the category a second time, so callers run it once per
//! source record.
use regex::Regex;
use std::sync::OnceLock;

/// Category prefix detected from a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePrefix {
    Arrow,
    Bolt,
}

impl NamePrefix {
    /// Classify by substring, with `Arrow` taking precedence over `Bolt`.
    #[must_use]
    pub fn detect(name: &str) -> Option<Self> {
        if name.contains("Arrow") {
            Some(Self::Arrow)
        } else if name.contains("Bolt") {
            Some(Self::Bolt)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "Arrow",
            Self::Bolt => "Bolt",
        }
    }
}

fn trailing_category() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new("Arrow$|Bolt$").ok())
        .as_ref()
}

/// Remove a trailing `Arrow` or `Bolt`; interior occurrences are kept.
#[must_use]
pub fn strip_category_suffix(name: &str) -> String {
    match trailing_category() {
        Some(pattern) => pattern.replace(name, "").into_owned(),
        None => name.to_string(),
    }
}

/// Normalized name for a classifiable display name, or the name unchanged.
#[must_use]
pub fn rename(name: &str, separator: &str) -> String {
    let Some(prefix) = NamePrefix::detect(name) else {
        return name.to_string();
    };
    let renamed = format!(
        "{}{separator}{}",
        prefix.as_str(),
        strip_category_suffix(name)
    );
    renamed.trim_matches(' ').to_string()
}

/// Rename an optional display name; a record without one gets an empty name.
#[must_use]
pub fn rename_ammo(name: Option<&str>, separator: &str) -> String {
    name.map_or_else(String::new, |name| rename(name, separator))
}
