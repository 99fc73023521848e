//! L-Bar overlay rendering via ffmpeg
//!
//! Builds the filter graph that composites the ad video and QR code onto a
//! 1920x1080 canvas with the brand name, destination URL and call to action
//! drawn into the lower bar, then drives an external ffmpeg process to
//! encode the result.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info};

/// Canvas size and overlay placement for the L-Bar layout
const CANVAS: (u32, u32) = (1920, 1080);
/// Ad video: width, height, x, y
const AD_VIDEO: (u32, u32, u32, u32) = (1164, 654, 80, 163);
/// QR code: width, height, x, y
const QR_CODE: (u32, u32, u32, u32) = (530, 530, 1317, 163);

/// Call to action drawn beneath the QR code
const CTA_TEXT: &str = "SCAN QR CODE FOR MORE.";

/// Output framerate
const OUTPUT_FRAMERATE: &str = "23.98";

/// Longest URL drawn into the video before truncation
const MAX_URL_TEXT_LEN: usize = 70;

/// Inputs for one overlay render
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    /// Background composited under everything else
    pub background_image: PathBuf,

    /// QR image generated for this request
    pub qr_image: PathBuf,

    /// URL of the ad video; ffmpeg reads it directly
    pub media_url: String,

    /// Brand name drawn into the lower bar
    pub brand_name: String,

    /// Simplified destination URL drawn into the lower bar
    pub display_url: String,
}

/// Errors surfaced by the external video tool
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("FFmpeg processing failed with exit status {status}")]
    Failed {
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error("FFmpeg processing timed out after {0} seconds")]
    TimedOut(u64),

    #[error("Failed to launch FFmpeg: {0}")]
    Spawn(#[from] std::io::Error),
}

impl RenderError {
    /// Raw diagnostic text for the error view, verbatim from the tool
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            RenderError::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// External ffmpeg collaborator rendering the L-Bar overlay
#[derive(Debug, Clone)]
pub struct LBarRenderer {
    ffmpeg_path: String,
    font_file: String,
    render_timeout: Duration,
}

impl LBarRenderer {
    pub fn new(ffmpeg_path: String, font_file: String, render_timeout: Duration) -> Self {
        Self {
            ffmpeg_path,
            font_file,
            render_timeout,
        }
    }

    /// Probe the ffmpeg binary; used as a startup health check
    pub async fn health_check(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Render the overlay into `output_path`, writing a log beside it
    pub async fn render(
        &self,
        spec: &OverlaySpec,
        output_path: &Path,
        log_path: &Path,
    ) -> Result<(), RenderError> {
        let filter = self.filter_graph(spec);
        let args = command_args(spec, &filter, output_path);
        let command_line = format!("{} {}", self.ffmpeg_path, args.join(" "));

        info!("Rendering overlay to {}", output_path.display());

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.render_timeout, command.output()).await {
            // Elapsed: dropping the output future kills the child.
            Err(_) => {
                error!(
                    "FFmpeg timed out after {} seconds",
                    self.render_timeout.as_secs()
                );
                write_log(log_path, &command_line, "timed out", "", "").await;
                Err(RenderError::TimedOut(self.render_timeout.as_secs()))
            }
            Ok(Err(e)) => {
                error!("Failed to launch FFmpeg: {}", e);
                Err(RenderError::Spawn(e))
            }
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                let status = output.status.code().unwrap_or(-1);

                write_log(log_path, &command_line, &status.to_string(), &stdout, &stderr).await;

                if output.status.success() {
                    info!("Rendered {}", output_path.display());
                    Ok(())
                } else {
                    error!("FFmpeg failed with exit status {}", status);
                    Err(RenderError::Failed {
                        status,
                        stdout,
                        stderr,
                    })
                }
            }
        }
    }

    /// Filter graph compositing the L-Bar layout
    fn filter_graph(&self, spec: &OverlaySpec) -> String {
        let (canvas_w, canvas_h) = CANVAS;
        let (ad_w, ad_h, ad_x, ad_y) = AD_VIDEO;
        let (qr_w, qr_h, qr_x, qr_y) = QR_CODE;

        format!(
            "[0:v]scale={canvas_w}:{canvas_h}[base_bg];\
             [1:v]scale={qr_w}:{qr_h}[scaled_qr];\
             [2:v]scale={ad_w}:{ad_h}[scaled_ad_video];\
             [base_bg][scaled_ad_video]overlay=x={ad_x}:y={ad_y}[video_on_bg];\
             [video_on_bg][scaled_qr]overlay=x={qr_x}:y={qr_y}:shortest=1[with_qr];\
             [with_qr]drawtext=fontfile={font}:text='{brand}':fontcolor=white:fontsize=45:x=80:y=857,\
             drawtext=fontfile={font}:text='{url}':fontcolor=white:fontsize=30:x=80:y=917,\
             drawtext=fontfile={font}:text='{cta}':fontcolor=white:fontsize=38:x=1332:y=723[final_output]",
            font = self.font_file,
            brand = escape_drawtext(&spec.brand_name),
            url = escape_drawtext(&spec.display_url),
            cta = escape_drawtext(CTA_TEXT),
        )
    }
}

/// Full ffmpeg argument list for one render
fn command_args(spec: &OverlaySpec, filter: &str, output_path: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        spec.background_image.display().to_string(),
        "-i".to_string(),
        spec.qr_image.display().to_string(),
        "-i".to_string(),
        spec.media_url.clone(),
        "-filter_complex".to_string(),
        filter.to_string(),
        "-map".to_string(),
        "[final_output]".to_string(),
        "-map".to_string(),
        "2:a?".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "fast".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "192k".to_string(),
        "-r".to_string(),
        OUTPUT_FRAMERATE.to_string(),
        "-shortest".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        output_path.display().to_string(),
    ]
}

/// Escape text for a drawtext filter argument
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\'', "\\\\\\'")
        .replace(':', "\\\\:")
        .replace('%', "\\\\%")
}

/// Simplify the destination URL for the overlay text row
pub fn display_url(url: &str) -> String {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let text = decoded.replace("https://", "").replace("http://", "");

    if text.chars().count() > MAX_URL_TEXT_LEN {
        let truncated: String = text.chars().take(MAX_URL_TEXT_LEN - 3).collect();
        format!("{truncated}...")
    } else {
        text
    }
}

/// Record one ffmpeg invocation for operator debugging
async fn write_log(log_path: &Path, command_line: &str, status: &str, stdout: &str, stderr: &str) {
    let contents = format!(
        "FFMPEG COMMAND: {command_line}\nFFMPEG exit status: {status}\nFFMPEG STDOUT:\n{stdout}\nFFMPEG STDERR:\n{stderr}\n"
    );

    if let Err(e) = tokio::fs::write(log_path, contents).await {
        error!("Failed to write ffmpeg log {}: {}", log_path.display(), e);
    }
}
