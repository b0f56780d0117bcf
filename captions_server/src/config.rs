//! Captions API configuration — loaded from environment variables.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CaptionsConfig {
    /// yt-dlp executable, resolved through `PATH` when not absolute.
    pub ytdlp_bin: String,
    /// Where the Netscape cookie file is written for yt-dlp.
    pub cookies_path: PathBuf,
    /// Cookie file contents from `YOUTUBE_COOKIES`. Empty disables `--cookies`.
    pub cookies: String,
    /// Parent directory for per-request download directories.
    pub work_dir: PathBuf,
    /// Caption language used when the request names none.
    pub default_lang: String,
    /// Video page URL prefix; the video id is appended.
    pub video_url_base: String,
    /// Timeout in seconds for the metadata probe.
    pub probe_timeout_secs: u64,
    /// Timeout in seconds for the subtitle download.
    pub download_timeout_secs: u64,
    /// Maximum number of requests running yt-dlp at once.
    pub max_concurrent_fetches: usize,
    /// Overall HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Port for the Prometheus exporter.
    pub metrics_port: u16,
}

impl CaptionsConfig {
    pub fn from_env() -> Self {
        let ytdlp_bin =
            std::env::var("CAPTIONS_YTDLP_BIN").unwrap_or_else(|_| "yt-dlp".to_string());
        let cookies_path = std::env::var("CAPTIONS_COOKIES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/app/cookies.txt"));
        let cookies = std::env::var("YOUTUBE_COOKIES").unwrap_or_default();
        let work_dir = std::env::var("CAPTIONS_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());
        let default_lang =
            std::env::var("CAPTIONS_DEFAULT_LANG").unwrap_or_else(|_| "pl".to_string());
        let video_url_base = std::env::var("CAPTIONS_VIDEO_URL_BASE")
            .unwrap_or_else(|_| "https://www.youtube.com/watch?v=".to_string());
        let probe_timeout_secs = std::env::var("CAPTIONS_PROBE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let download_timeout_secs = std::env::var("CAPTIONS_DOWNLOAD_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);
        let max_concurrent_fetches = std::env::var("CAPTIONS_MAX_CONCURRENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(4);
        let request_timeout_secs = std::env::var("CAPTIONS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);
        let metrics_port = std::env::var("CAPTIONS_METRICS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(9000);

        if cookies.is_empty() {
            tracing::warn!("YOUTUBE_COOKIES not set -- yt-dlp runs unauthenticated and may hit 429");
        }

        Self {
            ytdlp_bin,
            cookies_path,
            cookies,
            work_dir,
            default_lang,
            video_url_base,
            probe_timeout_secs,
            download_timeout_secs,
            max_concurrent_fetches,
            request_timeout_secs,
            metrics_port,
        }
    }

    /// Cookie file to hand to yt-dlp, if any cookies were configured.
    pub fn cookie_file(&self) -> Option<&std::path::Path> {
        if self.cookies.trim().is_empty() {
            None
        } else {
            Some(self.cookies_path.as_path())
        }
    }
}

#[cfg(test)]
impl CaptionsConfig {
    /// Deterministic config for tests; never reads the environment.
    pub fn for_tests(work_dir: PathBuf) -> Self {
        Self {
            ytdlp_bin: "yt-dlp".to_string(),
            cookies_path: work_dir.join("cookies.txt"),
            cookies: String::new(),
            work_dir,
            default_lang: "pl".to_string(),
            video_url_base: "https://www.youtube.com/watch?v=".to_string(),
            probe_timeout_secs: 5,
            download_timeout_secs: 5,
            max_concurrent_fetches: 2,
            request_timeout_secs: 30,
            metrics_port: 0,
        }
    }
}
