//! transcript — A caption track flattened to plain text.

use serde::{Deserialize, Serialize};

/// Which caption list a track came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionKind {
    /// Speech-recognition captions generated by YouTube.
    Auto,
    /// Subtitles uploaded by the channel.
    Manual,
}

impl CaptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CaptionKind::Auto => "auto",
            CaptionKind::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackChoice {
    pub lang: String,
    pub kind: CaptionKind,
}

/// JSON body returned by `GET /subs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub video_id: String,
    pub requested_lang: String,
    pub used_lang: String,
    pub used_type: CaptionKind,
    pub available_auto: Vec<String>,
    pub available_manual: Vec<String>,
    pub chars: usize,
    pub text: String,
}
