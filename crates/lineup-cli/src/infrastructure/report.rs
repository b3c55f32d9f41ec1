//! Terminal rendering of rosters, validation results and lineups.
//!
//! Every renderer returns a `String`; `main.rs` decides where it goes.  JSON
//! output is the `serde` form of the same data, for scripts.

use std::fmt::Write as _;

use lineup_core::domain::lineup::{LINES_PER_PERIOD, LINE_COUNT};
use lineup_core::Player;
use serde::Serialize;
use thiserror::Error;

use crate::application::plan_lineup::LineupPlan;
use crate::infrastructure::storage::config::OutputFormat;

/// Error type for report rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders a player list.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if JSON serialisation fails.
pub fn render_roster(players: &[&Player], format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Json => json(&players),
        OutputFormat::Table => Ok(roster_table(players)),
    }
}

/// Renders validation messages; an empty list means the roster is valid.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if JSON serialisation fails.
pub fn render_violations(messages: &[String], format: OutputFormat) -> Result<String, ReportError> {
    #[derive(Serialize)]
    struct Validation<'a> {
        valid: bool,
        violations: &'a [String],
    }

    match format {
        OutputFormat::Json => json(&Validation {
            valid: messages.is_empty(),
            violations: messages,
        }),
        OutputFormat::Table if messages.is_empty() => Ok("Roster is valid.\n".to_string()),
        OutputFormat::Table => Ok(messages.iter().map(|m| format!("- {m}\n")).collect()),
    }
}

/// Renders a planned lineup.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if JSON serialisation fails.
pub fn render_lineup(plan: &LineupPlan, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Json => json(plan),
        OutputFormat::Table => Ok(lineup_table(plan)),
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

// ── Tables ────────────────────────────────────────────────────────────────────

fn roster_table(players: &[&Player]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<34} {:<24} {:>3} {:>5} {:>3} {:>6}", "ID", "Name", "#", "Skill", "Pos", "Active");
    for p in players {
        let _ = writeln!(
            out,
            "{:<34} {:<24} {:>3} {:>5} {:>3} {:>6}",
            p.id.as_str(),
            p.name,
            p.number,
            p.skill.value(),
            p.position.code(),
            if p.active { "yes" } else { "no" }
        );
    }
    let _ = writeln!(out, "{} players", players.len());
    out
}

fn lineup_table(plan: &LineupPlan) -> String {
    let schedule = &plan.schedule;
    let mut out = String::new();

    let _ = write!(out, "{:<24} {:>3} {:>5} ", "Name", "Pos", "Skill");
    for line in 0..LINE_COUNT {
        let sep = if line % LINES_PER_PERIOD == 0 { "|" } else { "" };
        let _ = write!(out, "{sep}{:>3}", line + 1);
    }
    let _ = writeln!(out, " | Occ");

    for row in &schedule.rows {
        let _ = write!(
            out,
            "{:<24} {:>3} {:>5} ",
            row.player.name,
            row.player.position.code(),
            row.player.skill.value()
        );
        for (line, &on) in row.lines.iter().enumerate() {
            let sep = if line % LINES_PER_PERIOD == 0 { "|" } else { "" };
            let _ = write!(out, "{sep}{:>3}", if on { "X" } else { "." });
        }
        let _ = writeln!(out, " | {:>3}", row.occurrences);
    }

    let _ = write!(out, "{:<24} {:>3} {:>5} ", "Line total", "", "");
    for (line, sum) in schedule.line_sums.iter().enumerate() {
        let sep = if line % LINES_PER_PERIOD == 0 { "|" } else { "" };
        let _ = write!(out, "{sep}{sum:>3}");
    }
    let _ = writeln!(out);

    let summary = &plan.summary;
    let _ = writeln!(
        out,
        "Fielders {} / goalies {} | fielder lines {}..={} | goalie periods <= {}",
        summary.active_fielders,
        summary.active_goalies,
        schedule.min_fielder_occ,
        schedule.max_fielder_occ,
        schedule.max_goalie_periods
    );
    let _ = writeln!(
        out,
        "Mean line {:.1} | std dev {:.2} | weakest line {} | strongest line {}",
        summary.mean_line_sum,
        summary.standard_deviation,
        summary.weakest_line + 1,
        summary.strongest_line + 1
    );
    if summary.open_fielder_slots > 0 {
        let _ = writeln!(out, "Open fielder slots: {}", summary.open_fielder_slots);
    }
    for violation in &schedule.violations {
        let _ = writeln!(out, "! {violation}");
    }
    out
}
