//! Image formats and image references as exchanged with the backend.

use crate::error::{CardError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Parses a MIME type such as `image/png`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// An image reference returned by the backend.
///
/// The backend hands out inline `data:` URLs; anything else (a path like
/// `/output/card.png` or a full URL) is kept as an opaque remote reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Image bytes carried inline in a data URL.
    Inline {
        /// Format declared by the data URL (PNG when unrecognized).
        format: ImageFormat,
        /// Decoded image bytes.
        data: Vec<u8>,
    },
    /// A path or URL the host must fetch.
    Remote(String),
}

impl ImageReference {
    /// Parses a reference string, decoding inline data URLs.
    pub fn parse(reference: &str) -> Result<Self> {
        let Some(rest) = reference.strip_prefix("data:") else {
            return Ok(Self::Remote(reference.to_string()));
        };

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CardError::Decode("malformed data URL: missing ','".into()))?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| CardError::Decode("data URL is not base64 encoded".into()))?;

        // Whitespace sneaks into long payloads copied through terminals.
        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let data = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .map_err(|e| CardError::Decode(e.to_string()))?;

        let format = ImageFormat::from_mime_type(mime)
            .or_else(|| ImageFormat::from_magic_bytes(&data))
            .unwrap_or_default();

        Ok(Self::Inline { format, data })
    }

    /// Returns true for inline data URL references.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// Writes inline image bytes to `path`.
    ///
    /// Remote references fail with [`CardError::UnsupportedReference`]:
    /// saving them would need a network fetch.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        match self {
            Self::Inline { data, .. } => {
                std::fs::write(path, data)?;
                Ok(())
            }
            Self::Remote(url) => Err(CardError::UnsupportedReference(url.clone())),
        }
    }

    /// Short human-readable description, used where a full data URL would flood the output.
    pub fn describe(&self) -> String {
        match self {
            Self::Inline { format, data } => {
                format!("inline {} image ({} bytes)", format.extension(), data.len())
            }
            Self::Remote(url) => url.clone(),
        }
    }
}

/// Builds a data URL from raw image bytes.
pub fn to_data_url(format: ImageFormat, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.mime_type(),
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}
