//! PlanLineupUseCase: turns the current roster into a game schedule plus the
//! balance figures shown under it.

use lineup_core::domain::lineup::LINE_COUNT;
use lineup_core::domain::stats;
use lineup_core::{LineupError, Roster, Schedule};
use serde::Serialize;
use tracing::{info, warn};

/// What to do when the roster breaks a roster rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanMode {
    /// Refuse to schedule.
    #[default]
    Strict,
    /// Schedule anyway; the result carries the violations and only goalies
    /// are placed.
    Lenient,
}

/// Balance figures for a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSummary {
    pub active_fielders: usize,
    pub active_goalies: usize,
    pub mean_line_sum: f64,
    pub line_sum_variance: f64,
    pub standard_deviation: f64,
    /// Zero-based index of the weakest line (first one on ties).
    pub weakest_line: usize,
    /// Zero-based index of the strongest line (first one on ties).
    pub strongest_line: usize,
    /// Fielder slots that could not be filled.
    pub open_fielder_slots: u32,
}

/// A schedule with its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupPlan {
    pub schedule: Schedule,
    pub summary: LineupSummary,
}

/// Plans a lineup for the active players on `roster`.
///
/// # Errors
///
/// In [`PlanMode::Strict`], returns [`LineupError::InvalidRoster`] when the
/// roster breaks a roster rule.
pub fn plan_lineup(roster: &Roster, mode: PlanMode) -> Result<LineupPlan, LineupError> {
    let schedule = match mode {
        PlanMode::Strict => roster.try_build_lineup()?,
        PlanMode::Lenient => roster.build_lineup(),
    };
    let summary = summarize(&schedule);

    if summary.open_fielder_slots > 0 && schedule.is_valid() {
        warn!(open = summary.open_fielder_slots, "lineup has unfilled fielder slots");
    }
    info!(
        sd = summary.standard_deviation,
        weakest = summary.weakest_line + 1,
        strongest = summary.strongest_line + 1,
        "lineup planned"
    );
    Ok(LineupPlan { schedule, summary })
}

/// Computes balance figures for `schedule`.
pub fn summarize(schedule: &Schedule) -> LineupSummary {
    let sums = &schedule.line_sums;
    let first_index_by = |better: fn(u32, u32) -> bool| {
        (1..LINE_COUNT).fold(0, |best, i| if better(sums[i], sums[best]) { i } else { best })
    };
    let fielders = schedule.rows.iter().filter(|r| !r.player.is_goalie()).count();

    LineupSummary {
        active_fielders: fielders,
        active_goalies: schedule.rows.len() - fielders,
        mean_line_sum: stats::mean(sums),
        line_sum_variance: stats::variance(sums),
        standard_deviation: schedule.standard_deviation,
        weakest_line: first_index_by(|a, b| a < b),
        strongest_line: first_index_by(|a, b| a > b),
        open_fielder_slots: lineup_core::domain::lineup::TOTAL_FIELDER_SLOTS as u32
            - schedule.fielder_occurrences(),
    }
}
