//! Final-report sinks.

use datagen_engine::{format_table, AggregateReport, EnvironmentInfo, ReportSink, TaskPlan};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Everything written to the JSON report file.
#[derive(Serialize)]
pub struct PopulateRunReport<'a> {
    pub environment: &'a EnvironmentInfo,
    pub plan: &'a TaskPlan,
    pub report: &'a AggregateReport,
}

/// Prints the report table to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableReport;

impl ReportSink for TableReport {
    fn on_report(&self, report: &AggregateReport) -> std::io::Result<()> {
        println!("{}", format_table(report));
        Ok(())
    }
}

/// Writes the report, plan and environment as pretty JSON.
pub struct JsonReportFile {
    pub path: PathBuf,
    pub environment: EnvironmentInfo,
    pub plan: TaskPlan,
}

impl ReportSink for JsonReportFile {
    fn on_report(&self, report: &AggregateReport) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&PopulateRunReport {
            environment: &self.environment,
            plan: &self.plan,
            report,
        })?;
        std::fs::write(&self.path, json)?;
        info!("Report written to {:?}", self.path);
        Ok(())
    }
}
