//! Prometheus metrics for captions API observability.

use std::net::SocketAddr;

use metrics::{counter, histogram};

/// Initialize metrics exporter (Prometheus) listening on `port`.
pub fn init_metrics(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a finished `/subs` request by outcome (`ok` or a status code).
pub fn subs_request(outcome: &str) {
    counter!("captions_subs_requests_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record one yt-dlp invocation.
pub fn ytdlp_invocation(stage: &str, result: &str) {
    counter!(
        "captions_ytdlp_invocations_total",
        "stage" => stage.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

/// Record yt-dlp wall time.
pub fn ytdlp_duration(stage: &str, duration_ms: u64) {
    histogram!("captions_ytdlp_duration_ms", "stage" => stage.to_string())
        .record(duration_ms as f64);
}

/// Record the length of a returned transcript.
pub fn transcript_chars(chars: usize) {
    histogram!("captions_transcript_chars").record(chars as f64);
}
