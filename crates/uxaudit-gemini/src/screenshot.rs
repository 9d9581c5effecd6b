//! Screenshot payloads: format sniffing and base64 data URIs.
//!
//! The image is held as a `data:<mime>;base64,<data>` URI once read. The wire
//! request strips the prefix and sends the raw base64 with an explicit MIME
//! type.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;
use uxaudit_core::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime: ImageMime,
    data_uri: String,
}

impl ImagePayload {
    /// Sniffs the format from the leading bytes and encodes a data URI.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyInput`] for empty input.
    /// - [`CoreError::UnsupportedImage`] unless the bytes are JPEG or PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        let mime = match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => ImageMime::Jpeg,
            Ok(ImageFormat::Png) => ImageMime::Png,
            Ok(other) => {
                return Err(CoreError::UnsupportedImage(format!(
                    "{other:?} images are not accepted; use JPEG or PNG"
                )))
            }
            Err(_) => {
                return Err(CoreError::UnsupportedImage(
                    "unrecognized image format".to_owned(),
                ))
            }
        };
        let data_uri = format!("data:{};base64,{}", mime.as_str(), STANDARD.encode(bytes));
        Ok(Self { mime, data_uri })
    }

    #[must_use]
    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// The raw base64 data with the data-URI prefix stripped.
    #[must_use]
    pub fn base64_data(&self) -> &str {
        split_data_uri(&self.data_uri).map_or("", |(_, data)| data)
    }
}

/// Splits `data:<mime>;base64,<data>` into `(mime, data)`.
fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, data))
}
