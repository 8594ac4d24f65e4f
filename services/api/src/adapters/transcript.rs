//! services/api/src/adapters/transcript.rs
//!
//! This module contains the adapter for fetching video caption tracks.
//! It implements the `TranscriptService` port from the `core` crate.

use async_trait::async_trait;
use regex::Regex;
use vocab_core::domain::CaptionLine;
use vocab_core::ports::{PortError, PortResult, TranscriptService};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranscriptService` port by scraping the
/// video watch page for its caption track and fetching the track XML.
#[derive(Clone)]
pub struct CaptionTrackAdapter {
    client: reqwest::Client,
    base_url_re: Regex,
    text_node_re: Regex,
}

impl CaptionTrackAdapter {
    /// Creates a new `CaptionTrackAdapter`.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            // The watch page embeds the caption track list as JSON; the first
            // baseUrl inside "captionTracks" is the default track.
            base_url_re: Regex::new(r#""captionTracks":\s*\[\s*\{[^}]*?"baseUrl":"([^"]+)""#)
                .expect("caption track pattern is valid"),
            text_node_re: Regex::new(
                r#"(?s)<text start="([\d.]+)" dur="([\d.]+)"[^>]*>(.*?)</text>"#,
            )
            .expect("caption text pattern is valid"),
        }
    }

    async fn fetch_page(&self, url: &str) -> PortResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "Caption provider returned status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `TranscriptService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranscriptService for CaptionTrackAdapter {
    async fn fetch_transcript(&self, video_id: &str) -> PortResult<Vec<CaptionLine>> {
        let page = self
            .fetch_page(&format!("{}{}", WATCH_URL, video_id))
            .await?;

        let track_url = self
            .base_url_re
            .captures(&page)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace("\\u0026", "&"))
            .ok_or_else(|| {
                PortError::NotFound(format!("No caption track for video {}", video_id))
            })?;

        let track_xml = self.fetch_page(&track_url).await?;

        let lines = self
            .text_node_re
            .captures_iter(&track_xml)
            .filter_map(|c| {
                let offset = c.get(1)?.as_str().parse::<f64>().ok()?;
                let duration = c.get(2)?.as_str().parse::<f64>().ok()?;
                // The track XML is entity-encoded on top of already-encoded
                // text, so one pass still leaves &amp;#39; and friends behind.
                let text = unescape_entities(&unescape_entities(c.get(3)?.as_str()));
                Some(CaptionLine {
                    text,
                    duration,
                    offset,
                })
            })
            .collect();

        Ok(lines)
    }
}

/// Decodes the handful of HTML entities caption tracks actually contain.
pub(crate) fn unescape_entities(text: &str) -> String {
    let mut out = text.replace("&amp;", "&");
    for (entity, plain) in [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&apos;", "'"),
    ] {
        out = out.replace(entity, plain);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_decodes_named_entities() {
        assert_eq!(unescape_entities("a &lt;b&gt; &quot;c&quot;"), "a <b> \"c\"");
    }

    #[test]
    fn double_pass_resolves_double_encoded_text() {
        // What a track actually serves for an apostrophe: &amp;#39;
        let raw = "it&amp;#39;s";
        assert_eq!(unescape_entities(&unescape_entities(raw)), "it's");
    }

    #[test]
    fn text_nodes_parse_offset_and_duration() {
        let adapter = CaptionTrackAdapter::new(reqwest::Client::new());
        let xml = r#"<transcript><text start="1.5" dur="2.25">hello</text></transcript>"#;
        let caps: Vec<_> = adapter.text_node_re.captures_iter(xml).collect();
        assert_eq!(caps.len(), 1);
        assert_eq!(&caps[0][1], "1.5");
        assert_eq!(&caps[0][2], "2.25");
        assert_eq!(&caps[0][3], "hello");
    }
}
