//! Small text normalisation helpers shared by form-backed domain types.

/// Trim `value` and collapse blank input to `None`.
///
/// # Examples
/// ```
/// use tagpet::domain::non_blank;
///
/// assert_eq!(non_blank(Some("  Luna ".to_owned())), Some("Luna".to_owned()));
/// assert_eq!(non_blank(Some("   ".to_owned())), None);
/// assert_eq!(non_blank(None), None);
/// ```
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}
