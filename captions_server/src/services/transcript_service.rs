//! Transcript service — probe, pick a track, download it, flatten it.

use std::path::{Path, PathBuf};

use crate::error::ApiError;
use crate::models::transcript::TranscriptResponse;
use crate::services::language::select_track;
use crate::services::vtt::{vtt_to_text, FlattenOptions};
use crate::services::ytdlp::{CaptionSource, SourceError};

/// Fetch one video's captions as plain text.
///
/// Downloads land in a fresh directory under `work_dir` that is removed
/// before returning.
pub async fn fetch_transcript(
    source: &dyn CaptionSource,
    work_dir: &Path,
    video_id: &str,
    requested_lang: &str,
    options: FlattenOptions,
) -> Result<TranscriptResponse, ApiError> {
    let probe = source.probe(video_id).await.map_err(|e| match e {
        SourceError::InvalidJson(e) => {
            ApiError::Internal(format!("Failed to parse probe JSON: {e}"))
        }
        SourceError::Timeout(_) => ApiError::GatewayTimeout(e.to_string()),
        other => ApiError::Internal(format!("Failed to probe video: {other}")),
    })?;

    tracing::debug!(id = ?probe.id, title = ?probe.title, "Probed video");

    let available_auto = probe.auto_languages();
    let available_manual = probe.manual_languages();

    let track = select_track(&available_auto, &available_manual, requested_lang).ok_or_else(
        || {
            ApiError::NotFound(
                "No subtitles (auto or manual) advertised for this video.".to_string(),
            )
        },
    )?;

    tracing::info!(
        video_id,
        requested_lang,
        used_lang = %track.lang,
        used_type = track.kind.as_str(),
        "Selected caption track"
    );

    let job_dir = tempfile::Builder::new()
        .prefix("subs-")
        .tempdir_in(work_dir)
        .map_err(|e| ApiError::Internal(format!("Failed to create work directory: {e}")))?;

    source
        .download(video_id, &track, job_dir.path())
        .await
        .map_err(|e| match e {
            SourceError::Timeout(_) => ApiError::GatewayTimeout(e.to_string()),
            SourceError::Failed { .. } => ApiError::NotFound(format!(
                "Failed to download subtitles for {video_id} in {}: {e}",
                track.lang
            )),
            other => ApiError::Internal(format!(
                "Failed to download subtitles for {video_id} in {}: {other}",
                track.lang
            )),
        })?;

    let vtt_path = find_vtt(job_dir.path(), video_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read work directory: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Subtitles not found after download.".to_string()))?;

    let raw = tokio::fs::read(&vtt_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read subtitles: {e}")))?;
    let text = vtt_to_text(&String::from_utf8_lossy(&raw), options);
    if text.is_empty() {
        return Err(ApiError::Unprocessable(
            "Subtitles parsed but empty.".to_string(),
        ));
    }

    let chars = text.chars().count();
    crate::metrics::transcript_chars(chars);

    Ok(TranscriptResponse {
        video_id: video_id.to_string(),
        requested_lang: requested_lang.to_string(),
        used_lang: track.lang,
        used_type: track.kind,
        available_auto,
        available_manual,
        chars,
        text,
    })
}

/// Locate the downloaded track: `<video id>.*.vtt` first, else any `.vtt`.
async fn find_vtt(dir: &Path, video_id: &str) -> std::io::Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".vtt") {
            names.push(name);
        }
    }
    names.sort();

    let prefix = format!("{video_id}.");
    let picked = names
        .iter()
        .find(|name| name.starts_with(&prefix))
        .or(names.first());
    Ok(picked.map(|name| dir.join(name)))
}
