//! Locale tag helpers shared by configuration and the runtime store.

/// Locale active before any catalog has been loaded.
pub const DEFAULT_LOCALE: &str = "en";

/// Trim whitespace and discard empty locale candidates.
///
/// # Examples
///
/// ```
/// use glossa_common::normalise_locale;
///
/// assert_eq!(normalise_locale(Some("  ja ")), Some("ja"));
/// assert_eq!(normalise_locale(Some("   ")), None);
/// assert_eq!(normalise_locale(None), None);
/// ```
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
