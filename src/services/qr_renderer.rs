use image::Luma;
use qrcode::{EcLevel, QrCode};
use std::fs;
use std::path::{Path, PathBuf};

/// Pixel width of a single QR module
const MODULE_SIZE: u32 = 10;

/// Subdirectory of the media root that holds ticket QR images
const QR_SUBDIR: &str = "qr_codes";

/// Errors that can occur while rendering a ticket QR code
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("failed to encode QR data: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to write QR image: {0}")]
    Image(#[from] image::ImageError),

    #[error("media directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders ticket QR codes as PNG files under the media root
pub struct QrRenderer {
    media_root: PathBuf,
}

impl QrRenderer {
    /// Create a renderer writing below the given media root
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Render a final key into a PNG and return the media-root-relative path
    ///
    /// The image uses error-correction level L with 10-pixel modules and the
    /// standard 4-module quiet zone. The filename is derived from the owner's
    /// username and the ticket's purchase key.
    pub fn render_ticket_qr(
        &self,
        username: &str,
        purchase_key: &str,
        final_key: &str,
    ) -> Result<String, QrError> {
        let dir = self.media_root.join(QR_SUBDIR);
        fs::create_dir_all(&dir)?;

        let code = QrCode::with_error_correction_level(final_key.as_bytes(), EcLevel::L)?;
        let img = code
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_SIZE, MODULE_SIZE)
            .build();

        let filename = format!("ticket_{}_{}.png", username, purchase_key);
        img.save(dir.join(&filename))?;

        Ok(format!("{}/{}", QR_SUBDIR, filename))
    }

    /// The media root this renderer writes under
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_writes_png_under_qr_codes() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = QrRenderer::new(dir.path());

        let rel = renderer
            .render_ticket_qr("alice", "key-123", "abc-123xyz-789")
            .unwrap();

        assert_eq!(rel, "qr_codes/ticket_alice_key-123.png");
        assert!(dir.path().join(&rel).exists());
    }

    #[test]
    fn test_rendered_image_encodes_the_final_key() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = QrRenderer::new(dir.path());
        let final_key = "abc-123xyz-789";

        let rel = renderer
            .render_ticket_qr("alice", "key-456", final_key)
            .unwrap();

        // Re-render the same payload with the same settings and compare
        // pixel-for-pixel; identical output means the saved image encodes
        // exactly this string.
        let expected = QrCode::with_error_correction_level(final_key.as_bytes(), EcLevel::L)
            .unwrap()
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_SIZE, MODULE_SIZE)
            .build();

        let saved = image::open(dir.path().join(&rel)).unwrap().into_luma8();

        assert_eq!(saved.dimensions(), expected.dimensions());
        assert!(saved.pixels().eq(expected.pixels()));
    }

    #[test]
    fn test_render_fails_on_oversized_payload() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = QrRenderer::new(dir.path());

        // Far beyond QR capacity
        let huge = "x".repeat(10_000);
        let result = renderer.render_ticket_qr("bob", "key-789", &huge);

        assert!(matches!(result, Err(QrError::Encode(_))));
    }
}
