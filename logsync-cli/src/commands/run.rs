//! `logsync run` command handler
//!
//! ```text
//! config ──▶ DetectionSet + HubApi + (SyslogWriter | DryRunSink)
//!                    │
//!   EventSource.fetch(query) ──▶ Forwarder.process(events) ──▶ RunSummary
//! ```

use std::io::Write;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use logsync_cef_syslog::{Facility, Network, Priority, Severity, SyslogWriter, WriterOptions};
use logsync_core::config::{LogsyncConfig, SyslogConfig};
use logsync_core::pipeline::{EventSource, RecordSink};
use logsync_detection::{BatchReport, DetectionSet, DryRunSink, Forwarder};
use logsync_event_api::{EventQuery, HubApi};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command with an already loaded configuration.
pub async fn execute(
    args: &RunArgs,
    config: &LogsyncConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let summary = run_batch(config, args.dry_run, local_today()).await?;
    writer.render(&summary)?;
    Ok(())
}

/// Fetch one batch of events and report every detection match.
///
/// The collector is dialed before events are fetched; dry runs never dial.
pub async fn run_batch(
    config: &LogsyncConfig,
    dry_run: bool,
    today: NaiveDate,
) -> Result<RunSummary, CliError> {
    info!(dry_run, "starting logsync");

    let detections = DetectionSet::from_configs(&config.detections)?;
    let api = HubApi::from_config(&config.oauth2)?;
    let query = EventQuery::from_filter(&config.filter, today);
    for (key, value) in query.params() {
        info!(param = key, value = %value, "[Query] {key}: {value}");
    }

    let report = if dry_run {
        let forwarder = Forwarder::new(detections, DryRunSink);
        forward(&api, &query, &forwarder).await?
    } else {
        let sink = SyslogWriter::connect(writer_options(&config.syslog)?).await?;
        let forwarder = Forwarder::new(detections, sink);
        let result = forward(&api, &query, &forwarder).await;
        if let Err(e) = forwarder.sink().close().await {
            warn!(error = %e, "failed to close syslog session");
        }
        result?
    };

    info!("exiting");
    Ok(RunSummary {
        dry_run,
        date_from: query.date_from.to_string(),
        date_to: query.date_to.to_string(),
        report,
    })
}

/// Fetch events from `source` and push them through `forwarder`.
pub async fn forward<S, K>(
    source: &S,
    query: &S::Query,
    forwarder: &Forwarder<K>,
) -> Result<BatchReport, CliError>
where
    S: EventSource,
    K: RecordSink,
{
    let events = source.fetch(query).await?;
    info!(
        count = events.len(),
        source = source.name(),
        "Retrieved {} event(s)",
        events.len()
    );
    if events.is_empty() {
        return Ok(BatchReport::default());
    }

    let report = forwarder.process(&events).await;
    info!(
        reported = report.reported,
        failed = report.failed,
        sink = forwarder.sink().name(),
        "Reported {} event(s)",
        report.reported
    );
    Ok(report)
}

/// Build transport options from the `syslog` config section.
/// Query window end: the operator's calendar day, not UTC.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn writer_options(syslog: &SyslogConfig) -> Result<WriterOptions, CliError> {
    let network: Network = syslog.proto.parse()?;
    let facility = Facility::try_from(syslog.facility)?;
    let mut options = WriterOptions::new(
        network,
        syslog.address.clone(),
        Priority::new(facility, Severity::Info),
    )
    .with_tag(syslog.tag.clone());
    if let Some(hostname) = &syslog.hostname {
        options = options.with_hostname(hostname.clone());
    }
    Ok(options)
}

/// Result of one `run`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub date_from: String,
    pub date_to: String,
    #[serde(flatten)]
    pub report: BatchReport,
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(
            w,
            "{}{}",
            format!("Events {} .. {}", self.date_from, self.date_to).bold(),
            mode.yellow()
        )?;
        writeln!(w, "  Retrieved: {}", self.report.events)?;
        writeln!(w, "  Matched:   {}", self.report.matched)?;
        writeln!(
            w,
            "  Reported:  {}",
            self.report.reported.to_string().green()
        )?;
        if self.report.failed > 0 {
            writeln!(w, "  Failed:    {}", self.report.failed.to_string().red())?;
        }
        Ok(())
    }
}
