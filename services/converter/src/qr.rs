//! QR code generation
//!
//! The QR payload is always the raw click-through URL so ad trackers are hit
//! when the code is scanned. The PNG doubles as an ffmpeg input for the
//! overlay, so it goes through the artifact store rather than staying in
//! memory.

use common::storage::ArtifactStore;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Rendered QR side length; matches the overlay slot
const QR_DIMENSIONS: u32 = 530;

/// Errors that can occur while producing the QR image
#[derive(Error, Debug)]
pub enum QrError {
    #[error("Failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Failed to render QR image: {0}")]
    Render(#[from] image::ImageError),

    #[error(transparent)]
    Storage(#[from] common::error::StorageError),
}

/// Generate a QR PNG for `payload` and store it under `file_name`
pub fn generate_png(
    store: &ArtifactStore,
    file_name: &str,
    payload: &str,
) -> Result<PathBuf, QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_DIMENSIONS, QR_DIMENSIONS)
        .build();

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(store.write(file_name, &bytes)?)
}
