//! Captions API services — yt-dlp driving and caption processing.

pub mod cookies;
pub mod language;
pub mod transcript_service;
pub mod vtt;
pub mod ytdlp;

#[cfg(test)]
pub mod fake_source;
