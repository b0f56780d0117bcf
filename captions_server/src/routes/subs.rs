//! `/subs` query parsing and validation.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::ApiError;

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

#[derive(Debug, Deserialize)]
pub struct SubsQuery {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub dedupe: bool,
}

impl SubsQuery {
    /// The video id, required and limited to YouTube's id alphabet.
    pub fn video_id(&self) -> Result<&str, ApiError> {
        let id = self.video_id.as_deref().ok_or_else(|| {
            ApiError::Unprocessable("Missing required query parameter: videoId".to_string())
        })?;
        if !VIDEO_ID_REGEX.is_match(id) {
            return Err(ApiError::Unprocessable(format!("Invalid videoId: {id:?}")));
        }
        Ok(id)
    }

    /// Requested language, or `default` when absent or blank.
    pub fn lang<'a>(&'a self, default: &'a str) -> &'a str {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(video_id: Option<&str>, lang: Option<&str>) -> SubsQuery {
        SubsQuery {
            video_id: video_id.map(str::to_string),
            lang: lang.map(str::to_string),
            dedupe: false,
        }
    }

    #[test]
    fn accepts_youtube_ids() {
        assert_eq!(query(Some("dQw4w9WgXcQ"), None).video_id().unwrap(), "dQw4w9WgXcQ");
        assert_eq!(query(Some("a-b_c"), None).video_id().unwrap(), "a-b_c");
    }

    #[test]
    fn rejects_missing_or_odd_ids() {
        assert!(query(None, None).video_id().is_err());
        assert!(query(Some(""), None).video_id().is_err());
        assert!(query(Some("../etc/passwd"), None).video_id().is_err());
        assert!(query(Some("abc&list=1"), None).video_id().is_err());
    }

    #[test]
    fn lang_defaults_when_blank() {
        assert_eq!(query(None, None).lang("pl"), "pl");
        assert_eq!(query(None, Some(" ")).lang("pl"), "pl");
        assert_eq!(query(None, Some("en")).lang("pl"), "en");
    }
}
