//! Avatar image acquisition.
//!
//! A profile picture reference is either an inline `data:image/<subtype>;base64,`
//! string or an `http(s)://` URL. Both resolve to an 8-bit RGB image; alpha is
//! dropped so the avatar service always receives three channels.

use crate::error::AcquisitionError;
use base64::Engine;
use image::RgbImage;
use std::future::Future;
use std::time::Duration;

/// Maximum accepted image payload (10 MiB), inline or fetched.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Default bound on a remote image fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const DATA_IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// Turns an avatar image reference into a decoded RGB image.
pub trait ImageAcquirer: Send + Sync {
    /// Makes a single attempt to acquire the referenced image.
    fn acquire(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<RgbImage, AcquisitionError>> + Send;
}

/// Acquires inline images locally and remote images with one bounded GET.
#[derive(Debug, Clone)]
pub struct HttpImageAcquirer {
    client: reqwest::Client,
}

impl HttpImageAcquirer {
    /// Creates an acquirer whose remote fetches give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AcquisitionError::FetchFailed` if the HTTP client cannot be
    /// built (e.g. the TLS backend fails to initialize).
    pub fn new(timeout: Duration) -> Result<Self, AcquisitionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AcquisitionError::FetchFailed {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<RgbImage, AcquisitionError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::FetchFailed {
                status: Some(status.as_u16()),
                message: format!("server responded with {}", status),
            });
        }

        if let Some(length) = response.content_length() {
            if length > MAX_IMAGE_BYTES {
                return Err(AcquisitionError::TooLarge {
                    size: length,
                    limit: MAX_IMAGE_BYTES,
                });
            }
        }

        let body = response.bytes().await.map_err(transport_error)?;
        check_size(body.len())?;
        decode_image_bytes(&body)
    }
}

impl ImageAcquirer for HttpImageAcquirer {
    async fn acquire(&self, reference: &str) -> Result<RgbImage, AcquisitionError> {
        if reference.starts_with("data:") {
            return decode_data_url(reference);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return self.fetch(reference).await;
        }
        let scheme = reference.split_once(':').map_or("<none>", |(s, _)| s);
        Err(AcquisitionError::UnsupportedReference(format!(
            "scheme '{}' is not data, http or https",
            scheme
        )))
    }
}

fn transport_error(e: reqwest::Error) -> AcquisitionError {
    AcquisitionError::FetchFailed {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    }
}

fn check_size(len: usize) -> Result<(), AcquisitionError> {
    let size = len as u64;
    if size > MAX_IMAGE_BYTES {
        return Err(AcquisitionError::TooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Splits `data:image/<subtype>;base64,<payload>` into subtype and payload.
fn split_data_url(reference: &str) -> Option<(&str, &str)> {
    let rest = reference.strip_prefix(DATA_IMAGE_PREFIX)?;
    let (subtype, payload) = rest.split_once(BASE64_MARKER)?;
    if subtype.is_empty() || subtype.contains(';') || payload.is_empty() {
        return None;
    }
    Some((subtype, payload))
}

/// Decodes an inline `data:image/<subtype>;base64,<payload>` reference.
///
/// # Errors
///
/// Returns `AcquisitionError::InvalidEncodedImage` when the prefix does not
/// match exactly or the payload is not valid base64, and
/// `AcquisitionError::Decode` when the bytes are not an image.
pub fn decode_data_url(reference: &str) -> Result<RgbImage, AcquisitionError> {
    let (subtype, payload) = split_data_url(reference).ok_or_else(|| {
        AcquisitionError::InvalidEncodedImage(
            "expected data:image/<subtype>;base64,<payload>".to_string(),
        )
    })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| {
            AcquisitionError::InvalidEncodedImage(format!(
                "image/{} payload is not valid base64: {}",
                subtype, e
            ))
        })?;

    check_size(bytes.len())?;
    decode_image_bytes(&bytes)
}

/// Decodes raw image bytes and normalizes them to 8-bit RGB.
///
/// # Errors
///
/// Returns `AcquisitionError::Decode` if the format is unknown or the data is
/// corrupt.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RgbImage, AcquisitionError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| AcquisitionError::Decode(e.to_string()))?;
    Ok(decoded.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_with_alpha() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn data_url(bytes: &[u8]) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn inline_png_decodes_to_three_channels() {
        let img = decode_data_url(&data_url(&png_with_alpha())).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.as_raw().len(), 2 * 2 * 3);
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(img.get_pixel(1, 1).0, [200, 100, 50]);
    }

    #[test]
    fn missing_base64_marker_is_invalid() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_with_alpha());
        let reference = format!("data:image/png,{}", encoded);
        assert!(matches!(
            decode_data_url(&reference),
            Err(AcquisitionError::InvalidEncodedImage(_))
        ));
    }

    #[test]
    fn malformed_prefixes_are_invalid() {
        for reference in [
            "data:text/plain;base64,aGVsbG8=",
            "data:image/;base64,aGVsbG8=",
            "data:image/png;charset=utf-8;base64,aGVsbG8=",
            "data:image/png;base64,",
            "data:",
        ] {
            assert!(
                matches!(
                    decode_data_url(reference),
                    Err(AcquisitionError::InvalidEncodedImage(_))
                ),
                "{} should be rejected",
                reference
            );
        }
    }

    #[test]
    fn bad_base64_is_invalid() {
        let result = decode_data_url("data:image/png;base64,@@not-base64@@");
        assert!(matches!(
            result,
            Err(AcquisitionError::InvalidEncodedImage(msg)) if msg.contains("image/png")
        ));
    }

    #[test]
    fn non_image_payload_fails_decode() {
        let reference = data_url(b"definitely not an image");
        assert!(matches!(
            decode_data_url(&reference),
            Err(AcquisitionError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn acquirer_routes_inline_references_without_network() {
        let acquirer = HttpImageAcquirer::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let img = acquirer.acquire(&data_url(&png_with_alpha())).await.unwrap();
        assert_eq!(img.as_raw().len(), 12);

        let err = acquirer.acquire("data:image/png,abc").await.unwrap_err();
        assert!(matches!(err, AcquisitionError::InvalidEncodedImage(_)));
    }

    #[tokio::test]
    async fn unsupported_schemes_are_rejected() {
        let acquirer = HttpImageAcquirer::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        for reference in ["ftp://example.com/a.png", "avatar.png"] {
            let err = acquirer.acquire(reference).await.unwrap_err();
            assert!(matches!(err, AcquisitionError::UnsupportedReference(_)));
        }
    }
}
