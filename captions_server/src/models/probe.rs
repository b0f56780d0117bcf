//! probe — The subset of the `yt-dlp -J` metadata document we read.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Language code -> format list. `null` and absent both mean "none".
    #[serde(default)]
    pub automatic_captions: Option<Map<String, Value>>,
    #[serde(default)]
    pub subtitles: Option<Map<String, Value>>,
}

impl ProbeInfo {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Auto-caption language codes, in the order yt-dlp reported them.
    pub fn auto_languages(&self) -> Vec<String> {
        keys(&self.automatic_captions)
    }

    /// Uploaded subtitle language codes, in the order yt-dlp reported them.
    pub fn manual_languages(&self) -> Vec<String> {
        keys(&self.subtitles)
    }
}

fn keys(map: &Option<Map<String, Value>>) -> Vec<String> {
    map.as_ref()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_reported_language_order() {
        let info = ProbeInfo::from_json(
            r#"{"id":"abc","automatic_captions":{"zu":[],"en":[],"pl-PL":[]},"subtitles":{}}"#,
        )
        .unwrap();
        assert_eq!(info.auto_languages(), vec!["zu", "en", "pl-PL"]);
        assert!(info.manual_languages().is_empty());
    }

    #[test]
    fn null_and_missing_caption_maps_are_empty() {
        let info = ProbeInfo::from_json(r#"{"automatic_captions":null}"#).unwrap();
        assert!(info.auto_languages().is_empty());
        assert!(info.manual_languages().is_empty());
        assert!(info.id.is_none());
    }

    #[test]
    fn rejects_non_json() {
        assert!(ProbeInfo::from_json("ERROR: not json").is_err());
    }
}
