//! Port abstraction for rendering QR artwork.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::define_port_error;

/// Smallest PNG edge in pixels.
pub const MIN_ARTWORK_SIZE: u32 = 100;
/// Largest PNG edge in pixels.
pub const MAX_ARTWORK_SIZE: u32 = 4000;
/// PNG edge used when none is requested.
pub const DEFAULT_ARTWORK_SIZE: u32 = 1000;

define_port_error! {
    /// Errors raised by artwork renderers.
    pub enum TagArtworkError {
        /// The payload could not be encoded as a QR symbol.
        Encoding { message: String } => "qr encoding failed: {message}",
        /// The encoded symbol could not be written in the requested format.
        Output { message: String } => "qr image output failed: {message}",
    }
}

/// Output format for tag artwork.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkFormat {
    /// Raster image.
    #[default]
    Png,
    /// Vector image.
    Svg,
}

impl ArtworkFormat {
    /// MIME type of the rendered output.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    /// File extension of the rendered output.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ArtworkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArtworkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(format!("unsupported artwork format: {other}")),
        }
    }
}

/// Rendered artwork bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArtwork {
    /// Format of `bytes`.
    pub format: ArtworkFormat,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
pub trait TagArtworkRenderer: Send + Sync {
    /// Encode `payload` as a QR symbol with an edge of `size` pixels.
    ///
    /// SVG output scales freely; `size` sets its nominal dimensions.
    fn render(
        &self,
        payload: &str,
        format: ArtworkFormat,
        size: u32,
    ) -> Result<TagArtwork, TagArtworkError>;
}
