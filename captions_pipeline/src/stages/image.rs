use dagger_sdk::{Container, Directory, Query};

use crate::containers;

/// Build the runtime image and confirm the bundled tools start.
pub async fn build(client: &Query, source: Directory) -> eyre::Result<(Container, String)> {
    let binary = containers::api_binary(client, source);
    let image = containers::runtime(client, binary);

    let ytdlp = image
        .with_exec(vec!["yt-dlp", "--version"])
        .stdout()
        .await?;
    let api = image
        .with_exec(vec!["captions-api", "--version"])
        .stdout()
        .await?;

    let report = format!(
        "[image] Runtime image built.\nyt-dlp {}\n{}",
        ytdlp.trim(),
        api.trim()
    );
    Ok((image, report))
}

/// Push the runtime image to `address` and return the published reference.
pub async fn publish(image: &Container, address: &str) -> eyre::Result<String> {
    let reference = image.publish(address).await?;
    Ok(format!("[publish] {reference}"))
}
