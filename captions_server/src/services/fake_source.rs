//! In-memory `CaptionSource` for handler and service tests.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::probe::ProbeInfo;
use crate::models::transcript::TrackChoice;
use crate::services::ytdlp::{CaptionSource, SourceError};

pub enum FakeProbe {
    Json(String),
    Fail(String),
    Timeout,
}

pub enum FakeDownload {
    /// Write `FakeSource::vtt` (if any) as `<id>.<lang>.vtt`.
    Write,
    /// Exit non-zero with this stderr.
    Fail(String),
    Timeout,
    /// The tool binary could not be started.
    SpawnError,
}

pub struct FakeSource {
    pub probe: FakeProbe,
    /// Sleep before answering the probe.
    pub probe_delay: Option<Duration>,
    /// VTT written on download; `None` writes nothing.
    pub vtt: Option<String>,
    pub download_outcome: FakeDownload,
    pub downloads: Mutex<Vec<TrackChoice>>,
}

impl FakeSource {
    pub fn new(probe_json: &str, vtt: &str) -> Self {
        Self {
            probe: FakeProbe::Json(probe_json.to_string()),
            probe_delay: None,
            vtt: Some(vtt.to_string()),
            download_outcome: FakeDownload::Write,
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn downloaded(&self) -> Vec<TrackChoice> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionSource for FakeSource {
    async fn probe(&self, _video_id: &str) -> Result<ProbeInfo, SourceError> {
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.probe {
            FakeProbe::Json(raw) => Ok(ProbeInfo::from_json(raw)?),
            FakeProbe::Fail(stderr) => Err(SourceError::Failed {
                code: Some(1),
                stderr: stderr.clone(),
            }),
            FakeProbe::Timeout => Err(SourceError::Timeout(60)),
        }
    }

    async fn download(
        &self,
        video_id: &str,
        track: &TrackChoice,
        dest: &Path,
    ) -> Result<(), SourceError> {
        self.downloads.lock().unwrap().push(track.clone());
        match &self.download_outcome {
            FakeDownload::Write => {
                if let Some(vtt) = &self.vtt {
                    let path = dest.join(format!("{video_id}.{}.vtt", track.lang));
                    tokio::fs::write(path, vtt).await.unwrap();
                }
                Ok(())
            }
            FakeDownload::Fail(stderr) => Err(SourceError::Failed {
                code: Some(1),
                stderr: stderr.clone(),
            }),
            FakeDownload::Timeout => Err(SourceError::Timeout(120)),
            FakeDownload::SpawnError => Err(SourceError::Spawn {
                program: "yt-dlp".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            }),
        }
    }
}
