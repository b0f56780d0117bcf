use dagger_sdk::{Directory, Query};

use crate::containers;

/// Run `cargo fmt --all --check` over both workspace crates.
pub async fn run(client: &Query, source: Directory) -> eyre::Result<String> {
    let output = containers::rust_base(client, source)
        .with_exec(vec!["cargo", "fmt", "--all", "--check"])
        .stdout()
        .await?;

    Ok(format!("[fmt] Format check passed.\n{output}"))
}
