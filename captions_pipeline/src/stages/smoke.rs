use dagger_sdk::{Container, Query};

use crate::containers::API_PORT;

/// Start the runtime image as a service and wait for `/health` on port 8000.
pub async fn run(client: &Query, image: Container) -> eyre::Result<String> {
    let api = image.as_service();

    let probe = format!(
        "for i in $(seq 1 30); do \
           curl -fsS http://api:{API_PORT}/health && exit 0; \
           sleep 1; \
         done; \
         echo 'captions-api did not answer on port {API_PORT}' >&2; exit 1"
    );

    let output = client
        .container()
        .from("curlimages/curl:8.10.1")
        .with_service_binding("api", api)
        .with_exec(vec!["sh", "-c", probe.as_str()])
        .stdout()
        .await?;

    Ok(format!("[smoke] Service answered on port {API_PORT}.\n{output}"))
}
