//! Plain-text summary table for terminal output

use crate::summary::ScenarioSummary;

const HEADERS: [&str; 8] = [
    "counters",
    "throughput_per_hr",
    "avg_wait_min",
    "max_wait_min",
    "utilization_pct",
    "num_served",
    "p50_wait_min",
    "p95_wait_min",
];

fn row(summary: &ScenarioSummary) -> [String; 8] {
    [
        summary.counters.to_string(),
        format!("{:.3}", summary.throughput_per_hr),
        format!("{:.3}", summary.avg_wait_min),
        format!("{:.3}", summary.max_wait_min),
        format!("{:.3}", summary.utilization_pct),
        summary.num_served.to_string(),
        format!("{:.3}", summary.wait_percentiles.p50_min),
        format!("{:.3}", summary.wait_percentiles.p95_min),
    ]
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render summaries as a right-aligned table, one line per scenario.
pub fn format_summary_table(summaries: &[ScenarioSummary]) -> String {
    let rows: Vec<[String; 8]> = summaries.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(HEADERS.iter().copied(), &widths));
    for cells in &rows {
        lines.push(render_line(cells.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}
