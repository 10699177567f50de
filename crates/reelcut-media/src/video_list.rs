//! The `videos` query parameter that hands uploaded sources to the editor.
//!
//! The value is a JSON array of `{url, name, duration}` objects, percent-encoded
//! on top of the usual query-string encoding. Malformed input never fails: it
//! yields an empty list and a warning.

use reelcut_core::{ReelcutError, Result, VideoSource};
use tracing::{debug, warn};

const PARAM: &str = "videos";

/// Extract the video list from a query string such as `?videos=...&tab=edit`.
pub fn videos_from_query(query: &str) -> Vec<VideoSource> {
    let Some(raw) = query_param(query, PARAM) else {
        debug!("No video list in query");
        return Vec::new();
    };
    match decode_param(raw) {
        Ok(json) => parse_video_list(&json),
        Err(e) => {
            warn!(error = %e, "Malformed video list parameter; starting with no videos");
            Vec::new()
        }
    }
}

/// Parse a JSON video list. Invalid JSON yields an empty list.
pub fn parse_video_list(json: &str) -> Vec<VideoSource> {
    match serde_json::from_str::<Vec<VideoSource>>(json) {
        Ok(videos) => {
            debug!(count = videos.len(), "Parsed video list");
            videos
        }
        Err(e) => {
            warn!(error = %e, "Video list is not valid JSON; starting with no videos");
            Vec::new()
        }
    }
}

/// Encode `videos` as a value for the `videos` query parameter.
pub fn encode_video_list(videos: &[VideoSource]) -> Result<String> {
    let json =
        serde_json::to_string(videos).map_err(|e| ReelcutError::Serialization(e.to_string()))?;
    let inner = urlencoding::encode(&json);
    Ok(urlencoding::encode(&inner).into_owned())
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Form-decode the raw parameter, then undo the inner percent-encoding.
fn decode_param(raw: &str) -> Result<String> {
    let form = raw.replace('+', " ");
    let once = urlencoding::decode(&form).map_err(|e| ReelcutError::Serialization(e.to_string()))?;
    let twice =
        urlencoding::decode(&once).map_err(|e| ReelcutError::Serialization(e.to_string()))?;
    Ok(twice.into_owned())
}
