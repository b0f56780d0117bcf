use dagger_sdk::{Container, Directory, File, Query};

/// Port the API listens on inside the runtime image.
pub const API_PORT: isize = 8000;

/// Rust build container with cargo caches.
pub fn rust_base(client: &Query, source: Directory) -> Container {
    client
        .container()
        .from("rust:1.85-bookworm")
        .with_exec(vec!["rustup", "component", "add", "clippy", "rustfmt"])
        .with_mounted_cache(
            "/usr/local/cargo/registry",
            client.cache_volume("cargo-registry"),
        )
        .with_mounted_cache(
            "/usr/local/cargo/git",
            client.cache_volume("cargo-git"),
        )
        .with_mounted_cache(
            "/app/target",
            client.cache_volume("cargo-target"),
        )
        .with_workdir("/app")
        .with_directory("/app", source)
        .with_env_variable("CARGO_TARGET_DIR", "/app/target")
        .with_env_variable("RUST_BACKTRACE", "1")
}

/// Release build of the `captions-api` binary.
///
/// The binary is copied out of the target cache mount, which is not part
/// of the container filesystem.
pub fn api_binary(client: &Query, source: Directory) -> File {
    rust_base(client, source)
        .with_exec(vec![
            "cargo", "build", "--release", "--package", "captions-server",
        ])
        .with_exec(vec!["cp", "/app/target/release/captions-api", "/captions-api"])
        .file("/captions-api")
}

/// Runtime image: Python slim base with yt-dlp plus the API binary.
pub fn runtime(client: &Query, binary: File) -> Container {
    client
        .container()
        .from("python:3.12-slim-bookworm")
        .with_exec(vec![
            "pip", "install", "--no-cache-dir", "--upgrade", "yt-dlp",
        ])
        .with_file("/usr/local/bin/captions-api", binary)
        .with_workdir("/app")
        .with_env_variable("CAPTIONS_HOST", "0.0.0.0")
        .with_env_variable("CAPTIONS_PORT", "8000")
        .with_env_variable("CAPTIONS_COOKIES_PATH", "/app/cookies.txt")
        .with_env_variable("CAPTIONS_WORK_DIR", "/tmp/captions")
        .with_exposed_port(API_PORT)
        .with_default_args(vec!["captions-api"])
}
