//! Custom error types for the conversion service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::views;

/// Custom error type for the conversion handler
///
/// Every variant renders the HTML error view; a failed conversion must never
/// take down the server process.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No usable input modality, or a disallowed upload
    #[error("{0}")]
    Input(String),

    /// The submitted VAST URL could not be fetched
    #[error("Error fetching VAST URL: {0}")]
    Fetch(String),

    /// The VAST document is malformed or missing required fields
    #[error(transparent)]
    Vast(#[from] crate::vast::VastError),

    /// QR generation failed
    #[error(transparent)]
    Qr(#[from] crate::qr::QrError),

    /// The external video tool failed or timed out
    #[error(transparent)]
    Render(#[from] crate::overlay::RenderError),

    /// Artifact storage failed
    #[error(transparent)]
    Storage(#[from] common::error::StorageError),
}

impl ConvertError {
    fn status(&self) -> StatusCode {
        match self {
            ConvertError::Input(_) | ConvertError::Fetch(_) | ConvertError::Vast(_) => {
                StatusCode::BAD_REQUEST
            }
            ConvertError::Qr(_) | ConvertError::Render(_) | ConvertError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        tracing::error!("Conversion failed: {}", self);

        let ffmpeg_stderr = match &self {
            ConvertError::Render(e) => e.diagnostics().map(str::to_owned),
            _ => None,
        };

        (
            self.status(),
            views::error_page(&self.to_string(), ffmpeg_stderr.as_deref()),
        )
            .into_response()
    }
}
