//! `logsync check` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logsync_core::config::LogsyncConfig;
use logsync_detection::{Detection, DetectionSet};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `check` command with an already loaded configuration.
pub fn execute(
    source: &Path,
    config: &LogsyncConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = build_report(source, config)?;
    info!(
        source = %report.source,
        detections = report.detections.len(),
        "configuration is valid"
    );
    writer.render(&report)?;
    Ok(())
}

/// Compile detections and summarize the effective configuration.
pub fn build_report(source: &Path, config: &LogsyncConfig) -> Result<CheckReport, CliError> {
    let set = DetectionSet::from_configs(&config.detections)?;
    Ok(CheckReport {
        source: source.display().to_string(),
        collector: format!("{}://{}", config.syslog.proto, config.syslog.address),
        tag: config.syslog.tag.clone(),
        event_types: config.filter.types.clone(),
        days: config.filter.days,
        max: config.filter.max,
        detections: set.iter().map(DetectionEntry::from).collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub source: String,
    pub collector: String,
    pub tag: String,
    pub event_types: Vec<String>,
    pub days: u32,
    pub max: u32,
    pub detections: Vec<DetectionEntry>,
}

#[derive(Debug, Serialize)]
pub struct DetectionEntry {
    pub class_id: String,
    pub name: String,
    pub severity: u8,
    pub loglevel: u8,
    pub reporters: Vec<String>,
    /// false when any reporter type is unknown and the detection can never match
    pub active: bool,
}

impl From<&Detection> for DetectionEntry {
    fn from(d: &Detection) -> Self {
        Self {
            class_id: d.class_id.clone(),
            name: d.name.clone(),
            severity: d.severity,
            loglevel: d.loglevel,
            reporters: d.reporters().iter().map(ToString::to_string).collect(),
            active: d.reporters().iter().all(|r| r.is_supported()),
        }
    }
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Configuration: {} {}", self.source.bold(), "OK".green())?;
        writeln!(w, "  Collector: {} (tag {})", self.collector, self.tag)?;
        let types = if self.event_types.is_empty() {
            "all".to_owned()
        } else {
            self.event_types.join(", ")
        };
        writeln!(
            w,
            "  Filter:    last {} day(s), max {}, types {}",
            self.days, self.max, types
        )?;
        writeln!(w)?;
        writeln!(
            w,
            "Detections ({} total)",
            self.detections.len().to_string().bold()
        )?;
        writeln!(
            w,
            "{:<10} {:<30} {:<4} {:<4} Reporters",
            "Class", "Name", "Sev", "Lvl"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;

        for d in &self.detections {
            let reporters = d.reporters.join(" AND ");
            let reporters = if d.active {
                reporters.normal()
            } else {
                reporters.yellow()
            };
            writeln!(
                w,
                "{:<10} {:<30} {:<4} {:<4} {}",
                d.class_id, d.name, d.severity, d.loglevel, reporters
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use logsync_core::config::{DetectionConfig, ReporterConfig};

    use super::*;

    fn reporter(kind: &str, pairs: &[(&str, &str)]) -> ReporterConfig {
        ReporterConfig {
            kind: kind.to_owned(),
            config: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn config() -> LogsyncConfig {
        let mut config = LogsyncConfig::default();
        config.syslog.address = "siem.example.com:514".to_owned();
        config.detections = vec![
            DetectionConfig {
                class_id: "100".to_owned(),
                name: "Login".to_owned(),
                severity: 5,
                loglevel: 6,
                reporters: vec![reporter("type", &[("type", "LOGIN")])],
            },
            DetectionConfig {
                class_id: "900".to_owned(),
                name: "Geo".to_owned(),
                severity: 3,
                loglevel: 4,
                reporters: vec![reporter("ip_range", &[])],
            },
        ];
        config
    }

    #[test]
    fn test_build_report_lists_detections() {
        let report = build_report(Path::new("logsync.json"), &config()).expect("valid");
        assert_eq!(report.collector, "tcp://siem.example.com:514");
        assert_eq!(report.detections.len(), 2);
        assert_eq!(report.detections[0].reporters, vec!["type == \"LOGIN\""]);
        assert!(report.detections[0].active);
        assert!(!report.detections[1].active, "unknown reporter type never matches");
    }

    #[test]
    fn test_render_check_report_text() {
        let report = build_report(Path::new("logsync.json"), &config()).expect("valid");
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("utf-8");
        // counts may be wrapped in ANSI codes when stdout is a terminal
        assert!(output.contains("Detections ("));
        assert!(output.contains("total)"));
        assert!(output.contains("Login"));
        assert!(output.contains("types all"));
    }

    #[test]
    fn test_invalid_detection_is_config_error() {
        let mut config = config();
        config.detections[0].reporters.clear();
        let err = build_report(Path::new("logsync.json"), &config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
