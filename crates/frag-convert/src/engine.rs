use pulldown_cmark::Options;
use tracing::debug;

use frag_types::MediaType;

use crate::error::{ConvertError, ConvertResult};
use crate::raster;
use crate::text;

/// The conversion engine: fixed configuration constructed once at startup
/// and shared by reference. Holds no mutable state.
pub struct ConversionEngine {
    markdown: Options,
}

impl ConversionEngine {
    /// Create an engine with the default markdown feature set (tables and
    /// strikethrough on top of CommonMark).
    pub fn new() -> Self {
        Self {
            markdown: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }

    /// Convert `data`, declared as `source`, into the representation named by
    /// `target` (a file extension or full `type/subtype` string).
    ///
    /// Fails with [`ConvertError::UnknownTarget`] when the token does not
    /// resolve, [`ConvertError::UnsupportedConversion`] when the resolved
    /// target is not reachable from `source` in the conversion graph. When
    /// the target equals the source the bytes are returned unchanged.
    pub fn convert(&self, data: &[u8], source: MediaType, target: &str) -> ConvertResult<Vec<u8>> {
        let resolved = MediaType::from_request(target)
            .ok_or_else(|| ConvertError::UnknownTarget(target.to_string()))?;
        if !source.can_convert_to(resolved) {
            return Err(ConvertError::UnsupportedConversion {
                from: source,
                to: resolved,
            });
        }
        if resolved == source {
            return Ok(data.to_vec());
        }
        debug!(%source, target = %resolved, bytes = data.len(), "converting payload");

        match (source, resolved) {
            (MediaType::TextMarkdown, MediaType::TextHtml) => {
                Ok(text::markdown_to_html(data, self.markdown))
            }
            (MediaType::TextMarkdown, MediaType::TextPlain) => Ok(text::markdown_to_plain(data)),
            (MediaType::TextHtml, MediaType::TextPlain) => Ok(text::html_to_plain(data)),
            (MediaType::ApplicationJson, MediaType::TextPlain) => text::json_to_plain(data),
            (from, to) if from.is_image() && to.is_image() => raster::reencode(data, from, to),
            // The graph admits no other pairs; keep the closed world closed.
            (from, to) => Err(ConvertError::UnsupportedConversion { from, to }),
        }
    }
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}
