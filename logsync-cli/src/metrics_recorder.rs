//! In-process Prometheus recorder.
//!
//! A batch run exits long before anything could scrape it, so there is no
//! HTTP listener. The recorder only collects, and the snapshot is logged at
//! the end of `run`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

/// Install the global metrics recorder and register metric descriptions.
///
/// Returns `None` when a recorder is already installed; the run continues
/// without metrics.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            logsync_core::metrics::describe_all();
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsync_core::metrics as m;

    // the only test in this crate that installs the global recorder
    #[test]
    fn installed_recorder_collects_pipeline_counters() {
        let handle = install_recorder().expect("first install succeeds");
        metrics::counter!(m::RECORDS_REPORTED_TOTAL).increment(3);

        let rendered = handle.render();
        assert!(rendered.contains(m::RECORDS_REPORTED_TOTAL), "{rendered}");
        assert!(rendered.contains(" 3"), "{rendered}");

        assert!(install_recorder().is_none());
    }
}
