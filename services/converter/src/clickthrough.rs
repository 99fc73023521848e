//! Click-through URL extraction and resolution
//!
//! Ad trackers wrap the real destination inside query parameters and
//! redirect chains. The QR payload always stays on the raw tracker URL so
//! impressions are counted; the resolved destination is only used for
//! display and for the text drawn into the video.

use percent_encoding::percent_decode_str;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Query parameters that commonly carry the wrapped destination URL
const DESTINATION_PARAMS: &[&str] = &["u", "url", "redirect_url", "destination_url", "finalUrl"];

/// Maximum number of redirects followed during resolution
const MAX_REDIRECTS: usize = 10;

/// Timeout for a single resolution request
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(20);

/// Resolver for tracker-wrapped click-through URLs
#[derive(Clone)]
pub struct ClickthroughResolver {
    client: reqwest::Client,
}

impl ClickthroughResolver {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(RESOLVE_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Resolve the final destination for a raw click-through URL
    ///
    /// Falls back to the input whenever extraction or resolution fails, so
    /// the caller always gets something usable for display.
    pub async fn final_destination(&self, clickthrough_url: &str) -> String {
        if clickthrough_url.is_empty() {
            return clickthrough_url.to_string();
        }

        info!("Original click-through: {}", clickthrough_url);

        if let Some(intermediate) = extract_click_url(clickthrough_url) {
            info!("Extracted intermediate URL: {}", intermediate);
            return self
                .resolve_final_url(&intermediate)
                .await
                .unwrap_or(intermediate);
        }

        match self.resolve_final_url(clickthrough_url).await {
            Some(final_url) => final_url,
            None => clickthrough_url.to_string(),
        }
    }

    /// Follow HTTP redirects to the final destination URL
    async fn resolve_final_url(&self, url: &str) -> Option<String> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warn!("Invalid URL for resolution: {}", url);
            return None;
        }

        match self.client.get(url).send().await {
            Ok(response) => Some(response.url().to_string()),
            Err(e) => {
                warn!("Failed to resolve URL {}: {}", url, e);
                None
            }
        }
    }
}

/// Extract the embedded destination from a tracker's query string
pub fn extract_click_url(clickthrough_url: &str) -> Option<String> {
    let parsed = match Url::parse(clickthrough_url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(
                "Error parsing or extracting click URL from {}: {}",
                clickthrough_url, e
            );
            return None;
        }
    };

    // The "click" parameter is the canonical wrapper; the rest are seen in
    // the wild on various tracker families.
    for (key, value) in parsed.query_pairs() {
        if key == "click" && !value.is_empty() {
            return Some(decode(&value));
        }
    }

    for param in DESTINATION_PARAMS {
        for (key, value) in parsed.query_pairs() {
            if key == *param && !value.is_empty() {
                return Some(decode(&value));
            }
        }
    }

    None
}

/// Percent-decode a query value once more for double-encoded trackers
fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_click_param() {
        let url = "https://tracker.example.com/c?click=https%3A%2F%2Fwww.homedepot.com%2Fdeals";
        assert_eq!(
            extract_click_url(url),
            Some("https://www.homedepot.com/deals".to_string())
        );
    }

    #[test]
    fn test_click_wins_over_other_params() {
        let url = "https://t.example.com/c?url=https%3A%2F%2Flater.example%2F&click=https%3A%2F%2Ffirst.example%2F";
        assert_eq!(
            extract_click_url(url),
            Some("https://first.example/".to_string())
        );
    }

    #[test]
    fn test_destination_param_fallbacks() {
        let url = "https://t.example.com/c?redirect_url=https%3A%2F%2Fbrand.example%2Fpage";
        assert_eq!(
            extract_click_url(url),
            Some("https://brand.example/page".to_string())
        );

        let url = "https://t.example.com/c?finalUrl=https%3A%2F%2Fbrand.example%2F";
        assert_eq!(
            extract_click_url(url),
            Some("https://brand.example/".to_string())
        );
    }

    #[test]
    fn test_double_encoded_value() {
        let url = "https://t.example.com/c?click=https%253A%252F%252Fbrand.example%252F";
        assert_eq!(
            extract_click_url(url),
            Some("https://brand.example/".to_string())
        );
    }

    #[test]
    fn test_no_wrapped_destination() {
        assert_eq!(extract_click_url("https://brand.example/landing"), None);
        assert_eq!(extract_click_url("not a url"), None);
    }

    #[tokio::test]
    async fn test_unresolvable_url_falls_back() {
        let resolver = ClickthroughResolver::new().expect("Failed to build resolver");

        // Not an http(s) URL: resolution is skipped and the input comes back.
        let out = resolver.final_destination("mailto:ads@example.com").await;
        assert_eq!(out, "mailto:ads@example.com");
    }

    #[tokio::test]
    async fn test_empty_clickthrough_passes_through() {
        let resolver = ClickthroughResolver::new().expect("Failed to build resolver");
        assert_eq!(resolver.final_destination("").await, "");
    }
}
