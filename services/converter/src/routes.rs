//! Conversion service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use axum_typed_multipart::TypedMultipart;
use serde_json::json;
use tracing::info;

use common::storage::ArtifactStore;

use crate::{
    brand::extract_brand_name,
    error::ConvertError,
    models::{ConversionResult, ConvertForm, is_allowed_upload, vast_snippet},
    overlay::{self, OverlaySpec},
    qr,
    state::AppState,
    vast, views,
};

/// Create the router for the conversion service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(convert))
        .route("/generated/:filename", get(generated_file))
        .route("/static/*path", get(static_file))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "converter-service"
    }))
}

/// Landing page
pub async fn index() -> Html<String> {
    views::form_page()
}

/// Handle one conversion request end to end
///
/// Exactly one view comes back: the result page on success, the error page
/// through `ConvertError` on any failure.
pub async fn convert(
    State(state): State<AppState>,
    TypedMultipart(form): TypedMultipart<ConvertForm>,
) -> Result<Html<String>, ConvertError> {
    let vast_content = resolve_vast_content(&state, &form).await?;

    let ad = vast::extract_ad(&vast_content)?;
    let brand_name = extract_brand_name(&ad.ad_title);

    info!("Converting ad '{}' for brand '{}'", ad.ad_title, brand_name);

    // Display URL may be redirect-resolved; the QR payload stays raw.
    let final_clickthrough_url = state.resolver.final_destination(&ad.clickthrough_url).await;

    let id = state.ids.next_id();

    let qr_file = ArtifactStore::qr_file_name(&id);
    let qr_path = qr::generate_png(&state.store, &qr_file, &ad.clickthrough_url)?;

    let output_filename = ArtifactStore::video_file_name(&brand_name, &id);
    let output_path = state.store.path_for(&output_filename);
    let log_path = state
        .store
        .path_for(&ArtifactStore::log_file_name(&output_filename));

    let spec = OverlaySpec {
        background_image: state.config.background_image.clone(),
        qr_image: qr_path,
        media_url: ad.media_file_url.clone(),
        brand_name: brand_name.clone(),
        display_url: overlay::display_url(&final_clickthrough_url),
    };

    state.renderer.render(&spec, &output_path, &log_path).await?;

    let result = ConversionResult {
        ad_title: ad.ad_title,
        brand_name,
        media_file_url: ad.media_file_url,
        raw_clickthrough_url: ad.clickthrough_url,
        final_clickthrough_url,
        output_video_url: format!("/generated/{output_filename}"),
        output_filename,
        qr_code_url: format!("/generated/{qr_file}"),
        vast_content: vast_snippet(&vast_content),
    };

    Ok(views::result_page(&result))
}

/// Pick the submitted input modality and return the VAST document text
///
/// Uploaded file wins over inline text; inline text starting with a scheme
/// is fetched as a VAST URL.
async fn resolve_vast_content(
    state: &AppState,
    form: &ConvertForm,
) -> Result<String, ConvertError> {
    if let Some(upload) = &form.vast_file {
        let file_name = upload.metadata.file_name.as_deref().unwrap_or_default();
        if !file_name.is_empty() {
            if !is_allowed_upload(file_name) {
                return Err(ConvertError::Input(format!(
                    "File type not allowed for '{file_name}'; expected .xml or .txt"
                )));
            }

            return tokio::fs::read_to_string(upload.contents.path())
                .await
                .map_err(|e| ConvertError::Input(format!("Failed to read uploaded file: {e}")));
        }
    }

    let vast_input = form.vast_input.as_deref().unwrap_or("").trim();
    if vast_input.is_empty() {
        return Err(ConvertError::Input(
            "No VAST content provided or file type not allowed.".to_string(),
        ));
    }

    if vast_input.starts_with("http://") || vast_input.starts_with("https://") {
        let response = state
            .http
            .get(vast_input)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ConvertError::Fetch(e.to_string()))?;

        return response
            .text()
            .await
            .map_err(|e| ConvertError::Fetch(e.to_string()));
    }

    Ok(vast_input.to_string())
}

/// Serve a generated artifact (video, QR image or ffmpeg log)
pub async fn generated_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let path = state.store.resolve(&filename).ok_or(StatusCode::NOT_FOUND)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes))
}

/// Serve the static assets referenced by the page shell
pub async fn static_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    if path.contains("..") || path.contains('\\') {
        return Err(StatusCode::NOT_FOUND);
    }

    let full_path = state.config.static_dir.join(&path);
    let bytes = tokio::fs::read(&full_path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&path))], bytes))
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "css" => "text/css",
        "log" | "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
