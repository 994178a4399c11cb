//! Driving ports for issuing tags and rendering their artwork.

use async_trait::async_trait;

use super::{ArtworkFormat, TagArtwork};
use crate::domain::{Account, Error, Tag, TagCode};

/// Largest batch an operator may issue at once.
pub const MAX_ISSUE_BATCH: u16 = 100;

/// A tag fresh from issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTag {
    /// Stored tag.
    pub tag: Tag,
    /// URL encoded in the artwork.
    pub scan_url: String,
}

/// Artwork request for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkRequest {
    /// Output format.
    pub format: ArtworkFormat,
    /// Edge in pixels, already range-checked.
    pub size: u32,
}

/// Domain use-case port for issuing tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagIssuanceCommand: Send + Sync {
    /// Issue `count` tags. Only the operator account may call this.
    async fn issue(&self, operator: &Account, count: u16) -> Result<Vec<IssuedTag>, Error>;
}

/// Domain use-case port for tag artwork.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagArtworkQuery: Send + Sync {
    /// Render the artwork of an existing tag.
    async fn artwork(&self, code: &TagCode, request: ArtworkRequest)
    -> Result<TagArtwork, Error>;
}
