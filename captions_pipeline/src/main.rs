mod containers;
mod stages;

use clap::{Parser, Subcommand};
use dagger_sdk::{Directory, HostDirectoryOpts, Query};

#[derive(Parser)]
#[command(name = "captions-pipeline", about = "Captions API CI/CD Pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fast compile check
    Check {
        #[arg(long)]
        source: String,
    },
    /// Format check
    Fmt {
        #[arg(long)]
        source: String,
    },
    /// Clippy lint
    Lint {
        #[arg(long)]
        source: String,
    },
    /// Unit tests
    Test {
        #[arg(long)]
        source: String,
    },
    /// Security audit
    #[command(name = "security-audit")]
    SecurityAudit {
        #[arg(long)]
        source: String,
    },
    /// Build the runtime image and check yt-dlp and the API binary start
    Image {
        #[arg(long)]
        source: String,
    },
    /// Run the image and require an answer on port 8000
    Smoke {
        #[arg(long)]
        source: String,
    },
    /// Build, smoke test, and push the image
    Publish {
        #[arg(long)]
        source: String,
        /// Registry reference, e.g. ghcr.io/org/captions-api:latest
        #[arg(long)]
        address: String,
    },
    /// Full pipeline (check + fmt + lint + test + image + smoke)
    All {
        #[arg(long)]
        source: String,
    },
}

fn host_directory(client: &Query, source: &str) -> Directory {
    client.host().directory_opts(
        source,
        HostDirectoryOpts {
            exclude: Some(vec!["target/", ".git/", "examples/"]),
            include: None,
            gitignore: None,
            no_cache: None,
        },
    )
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let Cli { command } = Cli::parse();

    dagger_sdk::connect(|client| async move {
        match command {
            Command::Check { source } => {
                let src = host_directory(&client, &source);
                let out = stages::check::run(&client, src).await?;
                println!("{out}");
            }
            Command::Fmt { source } => {
                let src = host_directory(&client, &source);
                let out = stages::fmt::run(&client, src).await?;
                println!("{out}");
            }
            Command::Lint { source } => {
                let src = host_directory(&client, &source);
                let out = stages::lint::run(&client, src).await?;
                println!("{out}");
            }
            Command::Test { source } => {
                let src = host_directory(&client, &source);
                let out = stages::test::run(&client, src).await?;
                println!("{out}");
            }
            Command::SecurityAudit { source } => {
                let src = host_directory(&client, &source);
                let out = stages::security::run(&client, src).await?;
                println!("{out}");
            }
            Command::Image { source } => {
                let src = host_directory(&client, &source);
                let (_, out) = stages::image::build(&client, src).await?;
                println!("{out}");
            }
            Command::Smoke { source } => {
                let src = host_directory(&client, &source);
                let (image, image_out) = stages::image::build(&client, src).await?;
                println!("{image_out}");
                let out = stages::smoke::run(&client, image).await?;
                println!("{out}");
            }
            Command::Publish { source, address } => {
                let src = host_directory(&client, &source);
                let (image, image_out) = stages::image::build(&client, src).await?;
                println!("{image_out}");
                let smoke_out = stages::smoke::run(&client, image.clone()).await?;
                println!("{smoke_out}");
                let out = stages::image::publish(&image, &address).await?;
                println!("{out}");
            }
            Command::All { source } => {
                let src = host_directory(&client, &source);

                println!("=== Phase 1: Fast Gates ===");
                let (check_out, fmt_out) = tokio::try_join!(
                    stages::check::run(&client, src.clone()),
                    stages::fmt::run(&client, src.clone()),
                )?;
                println!("{check_out}\n{fmt_out}");

                println!("=== Phase 2: Quality Gates ===");
                let (lint_out, test_out) = tokio::try_join!(
                    stages::lint::run(&client, src.clone()),
                    stages::test::run(&client, src.clone()),
                )?;
                println!("{lint_out}\n{test_out}");

                println!("=== Phase 3: Container Image ===");
                let (image, image_out) = stages::image::build(&client, src).await?;
                println!("{image_out}");
                let smoke_out = stages::smoke::run(&client, image).await?;
                println!("{smoke_out}");

                println!("\n=== Full CI Pipeline Complete ===");
            }
        }
        Ok(())
    })
    .await?;

    Ok(())
}
