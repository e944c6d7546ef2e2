use crate::error::AggregationError;
use crate::filter::FilteredView;
use crate::types::{
    Column, GroupedCount, MetricRow, ProgressRatio, ProgressStatus, SeriesRow, SummaryStats,
};
use crate::util::{abbreviate, format_int, format_number, format_plain};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table};

const BAR_WIDTH: usize = 40;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const NO_DATA: &str = "no data";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// The filtered rows, restricted to `columns`, as a markdown table.
pub fn render_database(view: &FilteredView<'_>, columns: &[Column], max_rows: usize) -> String {
    if view.is_empty() || columns.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.name().to_string()).collect::<Vec<_>>());
    for r in view.rows().iter().take(max_rows) {
        builder.push_record(columns.iter().map(|c| r.cell(*c)).collect::<Vec<_>>());
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    let mut out = format!("{}\n", table);
    if view.len() > max_rows {
        out.push_str(&format!(
            "({} of {} rows shown)\n",
            format_int(max_rows),
            format_int(view.len())
        ));
    }
    out
}

fn money(value: Result<f64, AggregationError>) -> String {
    match value {
        Ok(v) => format_number(v, 0),
        Err(_) => NO_DATA.to_string(),
    }
}

/// The five metric cards of the home page.
pub fn metric_rows(summary: &SummaryStats, currency: &str) -> Vec<MetricRow> {
    let rating = format!(
        "{} (Total Rating: {})",
        abbreviate(summary.rating_sum, 2),
        format_plain(summary.rating_sum)
    );
    vec![
        MetricRow {
            title: "Total Investment".into(),
            label: format!("SUM {}", currency),
            value: format_number(summary.investment_sum, 0),
        },
        MetricRow {
            title: "Most Frequent Investment".into(),
            label: format!("MODE {}", currency),
            value: money(summary.mode()),
        },
        MetricRow {
            title: "Average Investment".into(),
            label: format!("MEAN {}", currency),
            value: money(summary.mean()),
        },
        MetricRow {
            title: "Investment Median".into(),
            label: format!("MEDIAN {}", currency),
            value: money(summary.median()),
        },
        MetricRow {
            title: "Ratings".into(),
            label: "Rating".into(),
            value: rating,
        },
    ]
}

pub fn render_metrics(summary: &SummaryStats, currency: &str) -> String {
    let table = Table::new(metric_rows(summary, currency))
        .with(Style::markdown())
        .to_string();
    format!("{}\n", table)
}

fn share(value: f64, total: f64) -> String {
    if total.abs() < f64::EPSILON {
        "-".to_string()
    } else {
        format!("{:.1}%", value / total * 100.0)
    }
}

/// Horizontal bar chart, one bar per entry in the series order.
pub fn render_bar_chart(title: &str, series: &GroupedCount) -> String {
    let mut out = format!("{}\n", title);
    if series.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    let width = series
        .entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let max = series
        .entries
        .iter()
        .map(|e| e.value)
        .fold(0.0_f64, f64::max);
    for e in &series.entries {
        let len = if max > 0.0 {
            ((e.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<width$} | {} {}\n",
            e.label,
            "█".repeat(len),
            format_plain(e.value),
            width = width
        ));
    }
    out
}

/// Line chart over a categorical axis: a sparkline plus the points.
pub fn render_line_chart(title: &str, series: &GroupedCount) -> String {
    let mut out = format!("{}\n", title);
    if series.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    let (min, max) = series
        .entries
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), e| (lo.min(e.value), hi.max(e.value)));
    let range = max - min;
    let spark: String = series
        .entries
        .iter()
        .map(|e| {
            let idx = if range.abs() < f64::EPSILON {
                SPARK.len() - 1
            } else {
                (((e.value - min) / range) * (SPARK.len() - 1) as f64).round() as usize
            };
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect();
    out.push_str(&format!("{}\n\n", spark));
    out.push_str(&series_table(series));
    out
}

/// Pie chart as a table of shares of the series total.
pub fn render_pie(title: &str, series: &GroupedCount) -> String {
    let mut out = format!("{}\n", title);
    if series.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    out.push_str(&series_table(series));
    out
}

fn series_table(series: &GroupedCount) -> String {
    let total = series.total();
    let rows: Vec<SeriesRow> = series
        .entries
        .iter()
        .map(|e| SeriesRow {
            label: e.label.clone(),
            value: format_plain(e.value),
            share: share(e.value, total),
        })
        .collect();
    format!("{}\n", Table::new(rows).with(Style::markdown()))
}

pub fn render_progress(progress: &ProgressRatio, currency: &str) -> String {
    match progress.status {
        ProgressStatus::Achieved => format!(
            "Target Achieved! ({} of {} {})\n",
            format_number(progress.current, 0),
            format_number(progress.target, 0),
            currency
        ),
        ProgressStatus::InProgress { percent } => {
            let filled = (percent as usize * BAR_WIDTH) / 100;
            format!(
                "You have achieved {}% of {} {}\n[{}{}] {}% Target Percentage\n",
                percent,
                format_number(progress.target, 0),
                currency,
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled),
                percent
            )
        }
    }
}
