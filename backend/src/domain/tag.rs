//! QR tags: printed labels identified by an opaque code.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AccountId;

const MAX_CODE_LEN: usize = 64;
const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Validation failures for tag codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TagCodeValidationError {
    /// The code was blank.
    #[error("tag code must not be empty")]
    Empty,
    /// The code exceeded the maximum length.
    #[error("tag code must be at most {max} characters")]
    TooLong { max: usize },
    /// The code contained characters outside `[A-Za-z0-9_-]`.
    #[error("tag code may only contain letters, digits, '-' or '_'")]
    InvalidCharacters,
}

/// Opaque code printed on a tag and embedded in its QR artwork.
///
/// # Examples
/// ```
/// use tagpet::domain::TagCode;
///
/// let code = TagCode::new(" QR000TEST ").expect("valid code");
/// assert_eq!(code.as_ref(), "QR000TEST");
/// assert!(TagCode::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagCode(String);

impl TagCode {
    /// Validate a code received from a client or the store.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TagCodeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TagCodeValidationError::Empty);
        }
        if trimmed.chars().count() > MAX_CODE_LEN {
            return Err(TagCodeValidationError::TooLong { max: MAX_CODE_LEN });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TagCodeValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Mint a fresh code: `QR`, the millisecond timestamp, then nine base-36
    /// characters, upper-cased.
    pub fn generate<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let index = rng.gen_range(0..SUFFIX_ALPHABET.len());
                char::from(SUFFIX_ALPHABET.get(index).copied().unwrap_or(b'0'))
            })
            .collect();
        Self(format!("QR{}{}", now.timestamp_millis(), suffix).to_uppercase())
    }

    /// URL a finder lands on after scanning the tag.
    ///
    /// # Examples
    /// ```
    /// use tagpet::domain::TagCode;
    ///
    /// let code = TagCode::new("QR000TEST").expect("valid code");
    /// assert_eq!(
    ///     code.scan_url("https://tagpet.example/"),
    ///     "https://tagpet.example/qr/QR000TEST"
    /// );
    /// ```
    pub fn scan_url(&self, base_url: &str) -> String {
        format!("{}/qr/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Relative path of the owner-facing association page.
    pub fn association_path(&self) -> String {
        format!("/associate-qr?code={}", self.0)
    }
}

impl AsRef<str> for TagCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TagCode {
    type Error = TagCodeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagCode> for String {
    fn from(value: TagCode) -> Self {
        value.0
    }
}

/// Storage identifier of a tag row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(Uuid);

impl TagId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag row as seen by the domain.
///
/// `is_associated` mirrors the stored flag. A flagged tag with no pet
/// pointing at it is an orphan left by an interrupted release and gets
/// reset by the association flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Storage identifier.
    pub id: TagId,
    /// Printed code.
    pub code: TagCode,
    /// Stored association flag.
    pub is_associated: bool,
    /// Account that claimed the tag.
    pub owner: Option<AccountId>,
    /// When the tag was claimed.
    pub associated_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// A freshly issued, unclaimed tag.
    pub fn unassociated(code: TagCode) -> Self {
        Self {
            id: TagId::random(),
            code,
            is_associated: false,
            owner: None,
            associated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case("", TagCodeValidationError::Empty)]
    #[case("   ", TagCodeValidationError::Empty)]
    #[case("QR 1", TagCodeValidationError::InvalidCharacters)]
    #[case("QR/1", TagCodeValidationError::InvalidCharacters)]
    fn rejects_invalid_codes(#[case] raw: &str, #[case] expected: TagCodeValidationError) {
        assert_eq!(TagCode::new(raw).expect_err("invalid"), expected);
    }

    #[rstest]
    fn rejects_overlong_codes() {
        let raw = "A".repeat(MAX_CODE_LEN + 1);
        assert_eq!(
            TagCode::new(raw).expect_err("too long"),
            TagCodeValidationError::TooLong { max: MAX_CODE_LEN }
        );
    }

    #[rstest]
    fn generated_codes_follow_the_printed_format() {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("timestamp");
        let mut rng = SmallRng::seed_from_u64(7);
        let code = TagCode::generate(now, &mut rng);
        let text = code.as_ref();

        let prefix = format!("QR{}", now.timestamp_millis());
        assert!(text.starts_with(&prefix), "unexpected code {text}");
        let suffix = text.trim_start_matches(&prefix);
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert!(TagCode::new(text).is_ok(), "generated codes must validate");
    }

    #[rstest]
    fn generated_codes_differ_between_draws() {
        let now = Utc::now();
        let mut rng = SmallRng::seed_from_u64(42);
        let first = TagCode::generate(now, &mut rng);
        let second = TagCode::generate(now, &mut rng);
        assert_ne!(first, second);
    }

    #[rstest]
    fn association_path_embeds_code() {
        let code = TagCode::new("QR000TEST").expect("code");
        assert_eq!(code.association_path(), "/associate-qr?code=QR000TEST");
    }
}
