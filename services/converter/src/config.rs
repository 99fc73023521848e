//! Service configuration
//!
//! All settings come from the environment, with defaults matching the
//! container image.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the conversion service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds on
    pub port: u16,

    /// Root directory for generated artifacts
    pub storage_root: PathBuf,

    /// Directory serving the logo and stylesheet
    pub static_dir: PathBuf,

    /// ffmpeg executable
    pub ffmpeg_path: String,

    /// Font file used by the drawtext overlay rows
    pub font_file: String,

    /// Background image composited under the ad video
    pub background_image: PathBuf,

    /// Wall-clock bound on one ffmpeg invocation
    pub render_timeout: Duration,
}

impl AppConfig {
    /// Create an AppConfig from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let storage_root = env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("lbar_converter"));

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let ffmpeg_path = env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());

        let font_file = env::var("FONT_FILE")
            .unwrap_or_else(|_| "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_string());

        let background_image = env::var("BACKGROUND_IMAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| static_dir.join("images/background.png"));

        let render_timeout = Duration::from_secs(
            env::var("RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
        );

        Self {
            port,
            storage_root,
            static_dir,
            ffmpeg_path,
            font_file,
            background_image,
            render_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults() {
        let config = AppConfig::from_env();

        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.render_timeout, Duration::from_secs(120));
        assert!(
            config
                .background_image
                .ends_with("images/background.png")
        );
    }
}
