//! Server-rendered HTML views
//!
//! One page shell with three bodies: the submission form, the conversion
//! result and the error block. Values interpolated into markup go through
//! `escape_html`; ffmpeg diagnostics keep their line breaks inside a
//! fixed-width block.

use axum::response::Html;

use crate::models::ConversionResult;

/// Escape a value for embedding in HTML text or attributes
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const FORM_BODY: &str = r#"        <form method="post" action="/" enctype="multipart/form-data" class="convert-form">
            <label for="vast_input">Paste VAST XML or a VAST URL</label>
            <textarea id="vast_input" name="vast_input" rows="8" placeholder="&lt;VAST ...&gt; or https://adserver.example.com/vast.xml"></textarea>
            <label for="vast_file">Or upload a VAST file</label>
            <input id="vast_file" type="file" name="vast_file" accept=".xml,.txt">
            <button type="submit">Convert</button>
        </form>"#;

fn page(body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>VAST L-Bar Converter</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <header>
        <img src="/static/images/logo.png" alt="Logo" class="logo">
        <h1>VAST L-Bar Converter</h1>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#
    ))
}

/// Landing page with the submission form
pub fn form_page() -> Html<String> {
    page(FORM_BODY)
}

/// Result page for a completed conversion
pub fn result_page(result: &ConversionResult) -> Html<String> {
    let body = format!(
        r#"{FORM_BODY}
        <section class="result">
            <h2>Conversion complete</h2>
            <video controls width="640">
                <source src="{video}" type="video/mp4">
            </video>
            <p><a href="{video}" download="{filename}">Download {filename}</a></p>
            <dl class="metadata">
                <dt>Ad title</dt><dd>{title}</dd>
                <dt>Brand</dt><dd>{brand}</dd>
                <dt>Media file</dt><dd><a href="{media}">{media}</a></dd>
                <dt>Click-through (raw)</dt><dd><a href="{raw}">{raw}</a></dd>
                <dt>Click-through (final)</dt><dd><a href="{final_url}">{final_url}</a></dd>
            </dl>
            <h3>QR code</h3>
            <img src="{qr}" alt="QR code for the click-through URL" class="qr">
            <h3>Processed VAST</h3>
            <pre class="vast-snippet">{vast}</pre>
        </section>"#,
        video = escape_html(&result.output_video_url),
        filename = escape_html(&result.output_filename),
        title = escape_html(&result.ad_title),
        brand = escape_html(&result.brand_name),
        media = escape_html(&result.media_file_url),
        raw = escape_html(&result.raw_clickthrough_url),
        final_url = escape_html(&result.final_clickthrough_url),
        qr = escape_html(&result.qr_code_url),
        vast = escape_html(&result.vast_content),
    );

    page(&body)
}

/// Error page; ffmpeg diagnostics are shown verbatim when present
pub fn error_page(message: &str, ffmpeg_stderr: Option<&str>) -> Html<String> {
    let mut body = format!(
        r#"{FORM_BODY}
        <section class="error">
            <h2>Conversion failed</h2>
            <p class="error-message">{}</p>"#,
        escape_html(message)
    );

    if let Some(stderr) = ffmpeg_stderr {
        body.push_str(&format!(
            "\n            <h3>FFmpeg output</h3>\n            <pre class=\"ffmpeg-stderr\">{}</pre>",
            escape_html(stderr)
        ));
    }

    body.push_str("\n        </section>");
    page(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ConversionResult {
        ConversionResult {
            ad_title: "250415_OMD_The Home Depot_HD<script>".to_string(),
            brand_name: "The Home Depot".to_string(),
            media_file_url: "https://cdn.example.com/ad.mp4".to_string(),
            raw_clickthrough_url: "https://tracker.example.com/c?click=x".to_string(),
            final_clickthrough_url: "https://www.homedepot.com/".to_string(),
            output_video_url: "/generated/output_The_Home_Depot_abc.mp4".to_string(),
            output_filename: "output_The_Home_Depot_abc.mp4".to_string(),
            qr_code_url: "/generated/qr_abc.png".to_string(),
            vast_content: "<VAST version=\"3.0\"></VAST>".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_form_page_has_both_modalities() {
        let Html(html) = form_page();

        assert!(html.contains("name=\"vast_input\""));
        assert!(html.contains("name=\"vast_file\""));
        assert!(html.contains("accept=\".xml,.txt\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }

    #[test]
    fn test_result_page_embeds_artifacts() {
        let Html(html) = result_page(&sample_result());

        assert!(html.contains("src=\"/generated/output_The_Home_Depot_abc.mp4\""));
        assert!(html.contains("type=\"video/mp4\""));
        assert!(html.contains("download=\"output_The_Home_Depot_abc.mp4\""));
        assert!(html.contains("src=\"/generated/qr_abc.png\""));
        // Metadata is escaped, not dropped.
        assert!(html.contains("HD&lt;script&gt;"));
        assert!(!html.contains("HD<script>"));
    }

    #[test]
    fn test_error_page_shows_diagnostics_verbatim() {
        let stderr = "ffmpeg version 6.0\nError opening input\nInvalid data found";
        let Html(html) = error_page("FFmpeg processing failed with exit status 1", Some(stderr));

        assert!(html.contains("FFmpeg processing failed with exit status 1"));
        assert!(html.contains("<pre class=\"ffmpeg-stderr\">"));
        // Line breaks survive into the fixed-width block.
        assert!(html.contains("Error opening input\nInvalid data found"));
    }

    #[test]
    fn test_error_page_without_diagnostics() {
        let Html(html) = error_page("No VAST content provided or file type not allowed.", None);

        assert!(html.contains("No VAST content provided"));
        assert!(!html.contains("ffmpeg-stderr"));
        // The form stays available for the next attempt.
        assert!(html.contains("name=\"vast_input\""));
    }
}
