//! Request and result models for the conversion service

use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Upload extensions accepted at the form boundary
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["xml", "txt"];

/// Upper bound on the VAST snippet shown on the result page
pub const VAST_SNIPPET_MAX_LEN: usize = 2000;

/// One submitted conversion request
///
/// Exactly one input modality is expected: an uploaded VAST file, inline XML
/// text, or a VAST URL in the text field. The uploaded file wins when
/// several are present.
#[derive(TryFromMultipart)]
pub struct ConvertForm {
    /// Raw VAST XML or a VAST URL
    pub vast_input: Option<String>,

    /// Uploaded VAST document (.xml / .txt)
    #[form_data(limit = "2MiB")]
    pub vast_file: Option<FieldData<NamedTempFile>>,
}

/// Check an uploaded file name against the extension allow-list
pub fn is_allowed_upload(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Everything the result view renders after a successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub ad_title: String,
    pub brand_name: String,
    pub media_file_url: String,

    /// Canonical tracker URL; also the QR payload
    pub raw_clickthrough_url: String,

    /// Redirect-resolved destination used for display
    pub final_clickthrough_url: String,

    pub output_video_url: String,
    pub output_filename: String,
    pub qr_code_url: String,

    /// Bounded snippet of the processed VAST document
    pub vast_content: String,
}

/// Derive the display snippet from the processed VAST document
pub fn vast_snippet(vast_content: &str) -> String {
    if vast_content.chars().count() <= VAST_SNIPPET_MAX_LEN {
        vast_content.to_string()
    } else {
        vast_content.chars().take(VAST_SNIPPET_MAX_LEN).collect()
    }
}
