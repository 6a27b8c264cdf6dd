//! Results aggregation across workers.

use crate::metrics::{AggregateReport, RunSummary};
use chrono::Utc;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

/// Fold worker summaries into a report.
///
/// Totals are plain sums over `summaries`; `per_worker` is ordered by worker
/// id regardless of the order workers finished in.
pub fn aggregate(mut summaries: Vec<RunSummary>) -> AggregateReport {
    summaries.sort_by_key(|s| s.worker_id);

    let total_inserted: u64 = summaries.iter().map(|s| s.inserted_count).sum();
    let total_cost_units: f64 = summaries.iter().map(|s| s.total_cost_units).sum();

    // Workers run in parallel, so wall clock is the longest worker
    let wall_clock_duration_secs = summaries
        .iter()
        .map(|s| s.duration_secs())
        .fold(0.0f64, |a, b| a.max(b));

    let (inserts_per_second, cost_units_per_second) = if wall_clock_duration_secs > 0.0 {
        (
            total_inserted as f64 / wall_clock_duration_secs,
            total_cost_units / wall_clock_duration_secs,
        )
    } else {
        (0.0, 0.0)
    };

    let average_cost_per_insert = if total_inserted > 0 {
        total_cost_units / total_inserted as f64
    } else {
        0.0
    };

    AggregateReport {
        total_inserted,
        total_cost_units,
        wall_clock_duration_secs,
        inserts_per_second,
        cost_units_per_second,
        average_cost_per_insert,
        per_worker: summaries,
        aggregated_at: Utc::now(),
    }
}

/// Format the report as a table.
pub fn format_table(report: &AggregateReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Task",
        "Inserts",
        "Cost units",
        "Duration",
        "Inserts/sec",
    ]);

    for summary in &report.per_worker {
        let rate = summary
            .inserts_per_second()
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(summary.worker_id),
            Cell::new(format_number(summary.inserted_count)),
            Cell::new(format!("{:.2}", summary.total_cost_units)),
            Cell::new(format_duration(summary.duration_secs())),
            Cell::new(rate),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(report.total_inserted)),
        Cell::new(format!("{:.2}", report.total_cost_units)),
        Cell::new(format!(
            "{}*",
            format_duration(report.wall_clock_duration_secs)
        )),
        Cell::new(format!("{:.1}†", report.inserts_per_second)),
    ]);

    output.push_str(&table.to_string());
    output.push_str("\n* Wall clock (parallel)  † Aggregate throughput\n");
    output.push_str(&format!(
        "Cost units/sec: {:.2}  Average cost per insert: {:.2}\n",
        report.cost_units_per_second, report.average_cost_per_insert
    ));

    output
}

/// Format a duration, rounding before splitting into units.
fn format_duration(secs: f64) -> String {
    let tenths = (secs * 10.0).round() as u64;
    if tenths < 600 {
        return format!("{}.{}s", tenths / 10, tenths % 10);
    }

    let total = secs.round() as u64;
    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, mins, secs) => format!("{mins}m {secs:02}s"),
        (hours, mins, _) => format!("{hours}h {mins:02}m"),
    }
}

/// Group digits in thousands: `1234567` -> `1,234,567`.
fn format_number(n: u64) -> String {
    let mut groups = Vec::new();
    let mut rest = n;
    while rest >= 1000 {
        groups.push(format!("{:03}", rest % 1000));
        rest /= 1000;
    }
    groups.push(rest.to_string());
    groups.reverse();
    groups.join(",")
}
