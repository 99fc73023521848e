//! VAST document extraction
//!
//! Scans a VAST XML document for the fields the conversion pipeline needs:
//! the ad title, an MP4 media file and the click-through URL. Full VAST
//! schema handling stays with the ad server; only the conversion inputs are
//! pulled out here.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::str::from_utf8;
use thiserror::Error;

/// Errors that can occur when extracting conversion inputs from VAST XML
#[derive(Error, Debug)]
pub enum VastError {
    #[error("Invalid XML content in VAST document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Could not find a suitable MP4 MediaFile in VAST")]
    MissingMediaFile,

    #[error("Could not find ClickThrough URL in VAST")]
    MissingClickThrough,
}

pub type Result<T> = std::result::Result<T, VastError>;

/// Conversion inputs extracted from a VAST document
#[derive(Debug, Clone, PartialEq)]
pub struct VastAd {
    /// AdTitle text; `Untitled Ad` when the document carries none
    pub ad_title: String,

    /// URL of the first `video/mp4` media file
    pub media_file_url: String,

    /// Raw click-through URL, later used as the QR payload
    pub clickthrough_url: String,
}

/// Extract the conversion inputs from a VAST XML document
pub fn extract_ad(xml: &str) -> Result<VastAd> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();

    let mut ad_title: Option<String> = None;
    let mut media_file_url: Option<String> = None;
    let mut clickthrough_url: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"AdTitle" if ad_title.is_none() => {
                    let text = read_text_element(&mut reader)?;
                    if !text.is_empty() {
                        ad_title = Some(text);
                    }
                }
                b"MediaFile" => {
                    let mut is_mp4 = false;
                    for attr in e.attributes() {
                        if let Ok(attr) = attr {
                            if attr.key.as_ref() == b"type" {
                                if let Ok(value) = from_utf8(&attr.value) {
                                    is_mp4 = value == "video/mp4";
                                }
                            }
                        }
                    }

                    // The element text must be consumed either way.
                    let url = read_text_element(&mut reader)?;
                    if media_file_url.is_none() && is_mp4 && !url.is_empty() {
                        media_file_url = Some(url);
                    }
                }
                b"ClickThrough" if clickthrough_url.is_none() => {
                    let url = read_text_element(&mut reader)?;
                    if !url.is_empty() {
                        clickthrough_url = Some(url);
                    }
                }
                _ => (),
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(VastError::Xml(e)),
            _ => (),
        }
        buf.clear();
    }

    Ok(VastAd {
        ad_title: ad_title.unwrap_or_else(|| "Untitled Ad".to_string()),
        media_file_url: media_file_url.ok_or(VastError::MissingMediaFile)?,
        clickthrough_url: clickthrough_url.ok_or(VastError::MissingClickThrough)?,
    })
}

/// Helper function to read the text content of an XML element
fn read_text_element(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                text = e.unescape()?.trim().to_string();
            }
            Ok(Event::CData(e)) => {
                if let Ok(value) = from_utf8(&e) {
                    text = value.trim().to_string();
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(VastError::Xml(e)),
            _ => (),
        }
        buf.clear();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_VAST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VAST version="3.0">
  <Ad id="1234">
    <InLine>
      <AdSystem>Test Ad Server</AdSystem>
      <AdTitle>250415_OMD_The Home Depot_HD Home Awareness Q2'25_Element+PMEF</AdTitle>
      <Creatives>
        <Creative id="5678">
          <Linear>
            <Duration>00:00:15</Duration>
            <MediaFiles>
              <MediaFile delivery="progressive" type="video/webm" width="1280" height="720">
                <![CDATA[https://cdn.example.com/ad.webm]]>
              </MediaFile>
              <MediaFile delivery="progressive" type="video/mp4" width="1920" height="1080">
                <![CDATA[https://cdn.example.com/ad.mp4]]>
              </MediaFile>
            </MediaFiles>
            <VideoClicks>
              <ClickThrough>
                <![CDATA[https://tracker.example.com/click?click=https%3A%2F%2Fwww.homedepot.com%2F]]>
              </ClickThrough>
            </VideoClicks>
          </Linear>
        </Creative>
      </Creatives>
    </InLine>
  </Ad>
</VAST>"#;

    #[test]
    fn test_extract_ad_fields() {
        let ad = extract_ad(SAMPLE_VAST).expect("Failed to extract ad");

        assert_eq!(
            ad.ad_title,
            "250415_OMD_The Home Depot_HD Home Awareness Q2'25_Element+PMEF"
        );
        assert_eq!(ad.media_file_url, "https://cdn.example.com/ad.mp4");
        assert_eq!(
            ad.clickthrough_url,
            "https://tracker.example.com/click?click=https%3A%2F%2Fwww.homedepot.com%2F"
        );
    }

    #[test]
    fn test_skips_non_mp4_media_files() {
        let ad = extract_ad(SAMPLE_VAST).expect("Failed to extract ad");
        assert!(!ad.media_file_url.ends_with(".webm"));
    }

    #[test]
    fn test_missing_title_defaults() {
        let xml = r#"<VAST version="3.0"><Ad><InLine>
            <MediaFile type="video/mp4">https://cdn.example.com/a.mp4</MediaFile>
            <ClickThrough>https://example.com/</ClickThrough>
        </InLine></Ad></VAST>"#;

        let ad = extract_ad(xml).expect("Failed to extract ad");
        assert_eq!(ad.ad_title, "Untitled Ad");
    }

    #[test]
    fn test_missing_media_file_is_an_error() {
        let xml = r#"<VAST version="3.0"><Ad><InLine>
            <AdTitle>No media</AdTitle>
            <ClickThrough>https://example.com/</ClickThrough>
        </InLine></Ad></VAST>"#;

        assert!(matches!(
            extract_ad(xml),
            Err(VastError::MissingMediaFile)
        ));
    }

    #[test]
    fn test_missing_clickthrough_is_an_error() {
        let xml = r#"<VAST version="3.0"><Ad><InLine>
            <AdTitle>No click</AdTitle>
            <MediaFile type="video/mp4">https://cdn.example.com/a.mp4</MediaFile>
        </InLine></Ad></VAST>"#;

        assert!(matches!(
            extract_ad(xml),
            Err(VastError::MissingClickThrough)
        ));
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        let xml = "<VAST version=\"3.0\"><Ad><AdTitle>broken</Ad></VAST>";
        assert!(matches!(extract_ad(xml), Err(VastError::Xml(_))));
    }
}
