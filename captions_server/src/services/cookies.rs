//! YouTube cookie file for authenticated yt-dlp requests.

use anyhow::Context;

use crate::config::CaptionsConfig;

/// Write `YOUTUBE_COOKIES` to the configured cookie path.
///
/// Does nothing when no cookies were configured; yt-dlp then runs without
/// `--cookies`.
pub async fn write_cookie_file(config: &CaptionsConfig) -> anyhow::Result<()> {
    let Some(path) = config.cookie_file() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(path, config.cookies.as_bytes())
        .await
        .with_context(|| format!("writing cookie file {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote YouTube cookie file");
    Ok(())
}
