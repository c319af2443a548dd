//! The content-type registry and conversion graph.
//!
//! The set of supported types is closed: ten exact content-type strings over
//! eight bare media types. The conversion graph is a hand-specified directed
//! graph, not a symmetric matrix — richer text formats degrade to simpler
//! ones and never the reverse, while the image formats form a full mesh.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A bare media type: `type/subtype` with parameters stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaType {
    TextPlain,
    TextMarkdown,
    TextHtml,
    ApplicationJson,
    ImagePng,
    ImageJpeg,
    ImageGif,
    ImageWebp,
}

impl MediaType {
    /// All supported bare media types.
    pub const ALL: [MediaType; 8] = [
        Self::TextPlain,
        Self::TextMarkdown,
        Self::TextHtml,
        Self::ApplicationJson,
        Self::ImagePng,
        Self::ImageJpeg,
        Self::ImageGif,
        Self::ImageWebp,
    ];

    /// The canonical `type/subtype` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextMarkdown => "text/markdown",
            Self::TextHtml => "text/html",
            Self::ApplicationJson => "application/json",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageGif => "image/gif",
            Self::ImageWebp => "image/webp",
        }
    }

    /// The canonical file extension for this media type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TextPlain => "txt",
            Self::TextMarkdown => "md",
            Self::TextHtml => "html",
            Self::ApplicationJson => "json",
            Self::ImagePng => "png",
            Self::ImageJpeg => "jpg",
            Self::ImageGif => "gif",
            Self::ImageWebp => "webp",
        }
    }

    /// Returns `true` if the top-level category is `text`.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::TextPlain | Self::TextMarkdown | Self::TextHtml)
    }

    /// Returns `true` if the top-level category is `image`.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::ImagePng | Self::ImageJpeg | Self::ImageGif | Self::ImageWebp
        )
    }

    /// The media types this type can be converted into, self included.
    ///
    /// Text conversions are strictly one-directional (markdown and json
    /// degrade to plainer forms, never the reverse); the image group is a
    /// full mesh. Nothing converts across the text/image boundary.
    pub fn conversion_targets(&self) -> &'static [MediaType] {
        match self {
            Self::TextPlain => &[Self::TextPlain],
            Self::TextMarkdown => &[Self::TextMarkdown, Self::TextHtml, Self::TextPlain],
            Self::TextHtml => &[Self::TextHtml, Self::TextPlain],
            Self::ApplicationJson => &[Self::ApplicationJson, Self::TextPlain],
            Self::ImagePng => &[Self::ImagePng, Self::ImageJpeg, Self::ImageGif, Self::ImageWebp],
            Self::ImageJpeg => &[Self::ImageJpeg, Self::ImagePng, Self::ImageGif, Self::ImageWebp],
            Self::ImageGif => &[Self::ImageGif, Self::ImagePng, Self::ImageJpeg, Self::ImageWebp],
            Self::ImageWebp => &[Self::ImageWebp, Self::ImagePng, Self::ImageJpeg, Self::ImageGif],
        }
    }

    /// Returns `true` if `target` is reachable from this type.
    pub fn can_convert_to(&self, target: MediaType) -> bool {
        self.conversion_targets().contains(&target)
    }

    /// Resolve an exact `type/subtype` string.
    pub fn from_mime(value: &str) -> Option<MediaType> {
        MediaType::ALL.iter().copied().find(|m| m.as_str() == value)
    }

    /// Resolve a requested target token: a file extension (with or without a
    /// leading dot) or a full `type/subtype` string.
    ///
    /// The token set is closed; anything else resolves to `None`.
    pub fn from_request(token: &str) -> Option<MediaType> {
        let token = token.trim_start_matches('.').to_ascii_lowercase();
        match token.as_str() {
            "txt" => Some(Self::TextPlain),
            "md" | "markdown" => Some(Self::TextMarkdown),
            "html" | "htm" => Some(Self::TextHtml),
            "json" => Some(Self::ApplicationJson),
            "png" => Some(Self::ImagePng),
            "jpg" | "jpeg" => Some(Self::ImageJpeg),
            "gif" => Some(Self::ImageGif),
            "webp" => Some(Self::ImageWebp),
            other => Self::from_mime(other),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared content type: a supported media type, optionally carrying a
/// `charset=utf-8` parameter where the supported set defines one.
///
/// Parsing is an exact string match against the fixed supported set — no
/// wildcard or parameter-fuzzy matching. The charset parameter is only
/// defined for `text/plain` and `application/json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentType {
    media: MediaType,
    charset_utf8: bool,
}

impl ContentType {
    /// Every content-type string the system accepts, verbatim.
    pub const SUPPORTED: [&'static str; 10] = [
        "text/plain",
        "text/plain; charset=utf-8",
        "text/markdown",
        "text/html",
        "application/json",
        "application/json; charset=utf-8",
        "image/png",
        "image/jpeg",
        "image/gif",
        "image/webp",
    ];

    /// Parse a declared content-type string.
    ///
    /// Accepts exactly the strings in [`ContentType::SUPPORTED`]; everything
    /// else fails with [`TypeError::Unsupported`].
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let (media, charset_utf8) = match value {
            "text/plain" => (MediaType::TextPlain, false),
            "text/plain; charset=utf-8" => (MediaType::TextPlain, true),
            "text/markdown" => (MediaType::TextMarkdown, false),
            "text/html" => (MediaType::TextHtml, false),
            "application/json" => (MediaType::ApplicationJson, false),
            "application/json; charset=utf-8" => (MediaType::ApplicationJson, true),
            "image/png" => (MediaType::ImagePng, false),
            "image/jpeg" => (MediaType::ImageJpeg, false),
            "image/gif" => (MediaType::ImageGif, false),
            "image/webp" => (MediaType::ImageWebp, false),
            other => return Err(TypeError::Unsupported(other.to_string())),
        };
        Ok(Self {
            media,
            charset_utf8,
        })
    }

    /// Returns `true` if `value` is one of the supported content types.
    pub fn is_supported(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// A content type with no parameters for the given media type.
    pub fn bare(media: MediaType) -> Self {
        Self {
            media,
            charset_utf8: false,
        }
    }

    /// The bare media type, parameters stripped.
    pub fn media_type(&self) -> MediaType {
        self.media
    }

    /// Returns `true` if the declared type carries `charset=utf-8`.
    pub fn has_charset(&self) -> bool {
        self.charset_utf8
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.charset_utf8 {
            write!(f, "{}; charset=utf-8", self.media.as_str())
        } else {
            write!(f, "{}", self.media.as_str())
        }
    }
}

impl FromStr for ContentType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContentTypeVisitor;

        impl Visitor<'_> for ContentTypeVisitor {
            type Value = ContentType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a supported content-type string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ContentType, E> {
                ContentType::parse(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(ContentTypeVisitor)
    }
}
