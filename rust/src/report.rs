//! Plain-text rendering of a match result.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::grid::{TimeGrid, UNIT_MINUTES};
use crate::models::MatchResult;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn day_name(day: usize) -> String {
    DAY_NAMES
        .get(day)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Day{}", day + 1))
}

/// Occupants of a cell joined with `/`, or `-` when empty.
pub fn format_cell(occupants: &[String]) -> String {
    if occupants.is_empty() {
        "-".to_string()
    } else {
        occupants.join("/")
    }
}

/// Units as hours, e.g. `6.5h`.
pub fn format_hours(units: u32) -> String {
    let minutes = units * UNIT_MINUTES;
    if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}.5h", minutes / 60)
    }
}

/// One row per slot, one column per day.
pub fn render_board(result: &MatchResult, grid: &TimeGrid) -> String {
    let label_width = "00:00-00:00".len();
    let mut widths: Vec<usize> = (0..grid.days()).map(|d| day_name(d).len()).collect();
    for (day, row) in result.board.iter().enumerate() {
        for cell in row {
            widths[day] = widths[day].max(format_cell(cell).len());
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:<label_width$}", "Slot");
    for (day, width) in widths.iter().enumerate() {
        let _ = write!(out, " | {:<width$}", day_name(day));
    }
    out.push('\n');
    let rule = label_width + widths.iter().map(|w| w + 3).sum::<usize>();
    out.push_str(&"-".repeat(rule));
    out.push('\n');

    for (index, interval) in grid.intervals().iter().enumerate() {
        let label = format!(
            "{}-{}",
            interval.start.format("%H:%M"),
            interval.end.format("%H:%M")
        );
        let _ = write!(out, "{:<label_width$}", label);
        for (day, width) in widths.iter().enumerate() {
            let _ = write!(out, " | {:<width$}", format_cell(&result.board[day][index]));
        }
        out.push('\n');
    }
    out
}

/// Per-person totals in roster order, with an under-quota warning.
pub fn render_totals(result: &MatchResult, min_quota: u32) -> String {
    let mut out = String::from("Total work\n");
    let id_width = result
        .work_totals
        .iter()
        .map(|(id, _)| id.len())
        .max()
        .unwrap_or(0);
    for (id, units) in &result.work_totals {
        let _ = writeln!(
            out,
            "  {:<id_width$}  {:>3} units  {:>5}",
            id,
            units,
            format_hours(*units)
        );
    }
    if !result.under_quota.is_empty() {
        let _ = writeln!(
            out,
            "Below minimum of {} units ({}): {}",
            min_quota,
            result.under_quota.len(),
            result.under_quota.join(", ")
        );
    }
    out
}

/// Full report: board followed by totals.
pub fn render_report(result: &MatchResult, grid: &TimeGrid, min_quota: u32) -> String {
    format!(
        "Assignment\n{}\n{}",
        render_board(result, grid),
        render_totals(result, min_quota)
    )
}

/// Write a rendered report to a file.
pub fn write_report<P: AsRef<Path>>(path: P, report: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(report.as_bytes())?;
    Ok(())
}
