//! yt-dlp driver — probes video metadata and downloads caption tracks.
//!
//! Every invocation is a child process with a timeout. The child is killed
//! if the request that started it goes away.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::CaptionsConfig;
use crate::models::probe::ProbeInfo;
use crate::models::transcript::{CaptionKind, TrackChoice};

/// stderr beyond this many bytes keeps only its tail.
const MAX_STDERR_BYTES: usize = 65536;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("yt-dlp timed out after {0}s")]
    Timeout(u64),
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Where caption metadata and tracks come from.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch metadata listing the advertised caption languages.
    async fn probe(&self, video_id: &str) -> Result<ProbeInfo, SourceError>;

    /// Write the chosen track as `<video id>.<lang>.vtt` into `dest`.
    async fn download(
        &self,
        video_id: &str,
        track: &TrackChoice,
        dest: &Path,
    ) -> Result<(), SourceError>;
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: String,
    video_url_base: String,
    cookies: Option<PathBuf>,
    probe_timeout: Duration,
    download_timeout: Duration,
}

impl YtDlp {
    pub fn from_config(config: &CaptionsConfig) -> Self {
        Self {
            bin: config.ytdlp_bin.clone(),
            video_url_base: config.video_url_base.clone(),
            cookies: config.cookie_file().map(Path::to_path_buf),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
        }
    }

    fn video_url(&self, video_id: &str) -> String {
        format!("{}{}", self.video_url_base, video_id)
    }

    async fn invoke(
        &self,
        stage: &'static str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ToolOutput, SourceError> {
        let start = Instant::now();
        let result = run_tool(&self.bin, args, timeout).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        crate::metrics::ytdlp_duration(stage, duration_ms);
        match &result {
            Ok(output) => {
                crate::metrics::ytdlp_invocation(stage, "success");
                tracing::debug!(stage, duration_ms, "yt-dlp finished");
                tracing::trace!(stage, stderr = %output.stderr, "yt-dlp stderr");
            }
            Err(SourceError::Failed { code, stderr }) => {
                crate::metrics::ytdlp_invocation(stage, "failure");
                tracing::warn!(stage, duration_ms, exit_code = ?code, "yt-dlp failed: {stderr}");
            }
            Err(e) => {
                let kind = match e {
                    SourceError::Timeout(_) => "timeout",
                    _ => "error",
                };
                crate::metrics::ytdlp_invocation(stage, kind);
                tracing::warn!(stage, duration_ms, error = %e, "yt-dlp failed");
            }
        }
        result
    }
}

#[async_trait]
impl CaptionSource for YtDlp {
    async fn probe(&self, video_id: &str) -> Result<ProbeInfo, SourceError> {
        let args = probe_args(&self.video_url(video_id), self.cookies.as_deref());
        let output = self.invoke("probe", &args, self.probe_timeout).await?;
        Ok(ProbeInfo::from_json(&output.stdout)?)
    }

    async fn download(
        &self,
        video_id: &str,
        track: &TrackChoice,
        dest: &Path,
    ) -> Result<(), SourceError> {
        let args = download_args(
            &self.video_url(video_id),
            track,
            dest,
            self.cookies.as_deref(),
        );
        self.invoke("download", &args, self.download_timeout)
            .await
            .map(|_| ())
    }
}

/// Arguments for `yt-dlp -J`, which dumps metadata as one JSON document.
pub fn probe_args(url: &str, cookies: Option<&Path>) -> Vec<String> {
    let mut args = Vec::new();
    push_cookies(&mut args, cookies);
    args.push("-J".to_string());
    args.push(url.to_string());
    args
}

/// Arguments that fetch a single WebVTT caption track and no media.
pub fn download_args(
    url: &str,
    track: &TrackChoice,
    dest: &Path,
    cookies: Option<&Path>,
) -> Vec<String> {
    let write_flag = match track.kind {
        CaptionKind::Auto => "--write-auto-subs",
        CaptionKind::Manual => "--write-subs",
    };
    let mut args = vec![write_flag.to_string()];
    push_cookies(&mut args, cookies);
    args.extend([
        format!("--sub-lang={}", track.lang),
        "--skip-download".to_string(),
        "--sub-format".to_string(),
        "vtt".to_string(),
        "-o".to_string(),
        dest.join("%(id)s.%(ext)s").to_string_lossy().into_owned(),
        url.to_string(),
    ]);
    args
}

fn push_cookies(args: &mut Vec<String>, cookies: Option<&Path>) {
    if let Some(path) = cookies {
        args.push("--cookies".to_string());
        args.push(path.to_string_lossy().into_owned());
    }
}

#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` to completion, failing on non-zero exit or timeout.
pub async fn run_tool(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput, SourceError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(SourceError::Spawn {
                program: program.to_string(),
                source: e,
            })
        }
        Err(_) => return Err(SourceError::Timeout(timeout.as_secs())),
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = truncate_tail(String::from_utf8_lossy(&output.stderr).into_owned());

    if !output.status.success() {
        return Err(SourceError::Failed {
            code: output.status.code(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

fn truncate_tail(text: String) -> String {
    if text.len() <= MAX_STDERR_BYTES {
        return text;
    }
    let mut start = text.len() - MAX_STDERR_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...truncated...\n{}", &text[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn probe_args_with_and_without_cookies() {
        let url = "https://www.youtube.com/watch?v=abc";
        assert_eq!(probe_args(url, None), vec!["-J", url]);
        assert_eq!(
            probe_args(url, Some(Path::new("/app/cookies.txt"))),
            vec!["--cookies", "/app/cookies.txt", "-J", url]
        );
    }

    #[test]
    fn download_args_pick_write_flag_by_kind() {
        let url = "https://www.youtube.com/watch?v=abc";
        let auto = TrackChoice {
            lang: "pl-PL".to_string(),
            kind: CaptionKind::Auto,
        };
        assert_eq!(
            download_args(url, &auto, Path::new("/tmp/job"), Some(Path::new("/c.txt"))),
            vec![
                "--write-auto-subs",
                "--cookies",
                "/c.txt",
                "--sub-lang=pl-PL",
                "--skip-download",
                "--sub-format",
                "vtt",
                "-o",
                "/tmp/job/%(id)s.%(ext)s",
                url,
            ]
        );

        let manual = TrackChoice {
            lang: "en".to_string(),
            kind: CaptionKind::Manual,
        };
        let args = download_args(url, &manual, Path::new("/tmp/job"), None);
        assert_eq!(args[0], "--write-subs");
        assert_eq!(args[1], "--sub-lang=en");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = format!("ą{}", "x".repeat(MAX_STDERR_BYTES - 1));
        let out = truncate_tail(text);
        assert!(out.starts_with("...truncated...\n"));
        assert!(out.ends_with('x'));

        assert_eq!(truncate_tail("short".to_string()), "short");
    }

    #[tokio::test]
    async fn run_tool_captures_stdout() {
        let out = run_tool("sh", &sh("echo '{\"id\":\"abc\"}'"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "{\"id\":\"abc\"}");
    }

    #[tokio::test]
    async fn run_tool_reports_exit_code_and_stderr() {
        let err = run_tool("sh", &sh("echo 'HTTP Error 429' >&2; exit 3"), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            SourceError::Failed { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "HTTP Error 429");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_tool_times_out() {
        let err = run_tool("sh", &sh("sleep 5"), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Timeout(_)));
    }

    #[tokio::test]
    async fn run_tool_missing_binary() {
        let err = run_tool("definitely-not-yt-dlp", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Spawn { .. }));
    }
}
