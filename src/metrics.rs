use std::path::Path;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and register the grading counters.
/// The returned handle renders the text/plain exposition payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;

    // Pre-register so a quiet run still reports zeros.
    counter!("picks_considered_total").absolute(0);
    counter!("picks_graded_total", "result" => "ai_won").absolute(0);
    counter!("picks_graded_total", "result" => "ai_lost").absolute(0);

    Ok(handle)
}

/// Write the current metrics for a node_exporter textfile collector.
///
/// Written to a sibling temp file first so a scrape never sees a partial file.
pub async fn write_textfile(handle: &PrometheusHandle, path: &Path) -> anyhow::Result<()> {
    let tmp = path.with_extension("prom.tmp");
    tokio::fs::write(&tmp, handle.render()).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!(path = %path.display(), "Metrics written");
    Ok(())
}
