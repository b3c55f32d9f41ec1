//! Equal-play lineup scheduler.
//!
//! A game is split into [`PERIOD_COUNT`] periods of [`LINES_PER_PERIOD`]
//! lines each.  Every line fields [`FIELDERS_PER_LINE`] fielders plus the
//! period's goalie.  The scheduler decides who plays on which line so that:
//!
//! - fielders play a similar number of lines and never more than the
//!   equal-play maximum,
//! - the summed skill of each line stays close to every other line, and
//! - each period has exactly one goalie covering all three of its lines.
//!
//! # How the greedy fill works (for beginners)
//!
//! Fielders are sorted by descending skill and offered to the lines over and
//! over.  Each offer goes to the *lightest* line (lowest running skill sum)
//! that still has a free slot and does not already contain the player.  The
//! strongest players are placed first, each one onto whichever line currently
//! needs help the most, which approximates an even split without any
//! backtracking.
//!
//! Goalies are placed afterwards, a whole period at a time, onto the period
//! whose fielders are weakest.
//!
//! The lines live in a small fixed arena indexed `0..LINE_COUNT`; players are
//! referenced by their index in the input snapshot, never by reference.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::player::{Player, PlayerId};
use super::stats;
use super::validate::validation_messages;

/// Number of periods in a game.
pub const PERIOD_COUNT: usize = 3;
/// Number of lines in each period.
pub const LINES_PER_PERIOD: usize = 3;
/// Total number of lines in a game.
pub const LINE_COUNT: usize = PERIOD_COUNT * LINES_PER_PERIOD;
/// Fielder slots on a line.  The goalie is extra.
pub const FIELDERS_PER_LINE: usize = 5;
/// Fielder slots in a whole game.
pub const TOTAL_FIELDER_SLOTS: usize = LINE_COUNT * FIELDERS_PER_LINE;

/// Errors returned by the strict scheduling entry point.
#[derive(Debug, Error, PartialEq)]
pub enum LineupError {
    /// The roster breaks at least one constraint; the messages say which.
    #[error("roster is not valid for a lineup: {}", .0.join(" "))]
    InvalidRoster(Vec<String>),
}

/// Zero-based period that owns `line` (`0..LINE_COUNT`).
pub fn period_of(line: usize) -> usize {
    line / LINES_PER_PERIOD
}

/// Zero-based line indices belonging to `period` (`0..PERIOD_COUNT`).
pub fn lines_of(period: usize) -> std::ops::Range<usize> {
    let first = period * LINES_PER_PERIOD;
    first..first + LINES_PER_PERIOD
}

/// How often each player may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccupancyBounds {
    /// Fewest lines any fielder should play.
    pub min_fielder: u32,
    /// Most lines any fielder may play.
    pub max_fielder: u32,
    /// Most periods any one goalie may cover.
    pub max_goalie_periods: u32,
}

impl OccupancyBounds {
    /// Computes the equal-play band for `fielders` fielders and `goalies`
    /// goalies.
    ///
    /// With an average of `45 / fielders` lines per fielder the band is
    /// `ceil(avg) - 1 ..= floor(avg) + 1`.  Zero fielders or zero goalies
    /// yield zero bounds instead of dividing by zero.
    pub fn for_counts(fielders: usize, goalies: usize) -> Self {
        let (min_fielder, max_fielder) = if fielders == 0 {
            (0, 0)
        } else {
            let floor = TOTAL_FIELDER_SLOTS / fielders;
            let ceil = TOTAL_FIELDER_SLOTS.div_ceil(fielders);
            (ceil - 1, floor + 1)
        };
        let max_goalie_periods = if goalies == 0 {
            0
        } else {
            PERIOD_COUNT.div_ceil(goalies)
        };
        Self {
            min_fielder: min_fielder as u32,
            max_fielder: max_fielder as u32,
            max_goalie_periods: max_goalie_periods as u32,
        }
    }
}

/// One row of the schedule: a player and the lines they play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub player: Player,
    /// `true` at index `i` when the player is on line `i`.
    pub lines: [bool; LINE_COUNT],
    /// Earliest line the player appears on, `None` when never placed.
    pub first_line: Option<usize>,
    /// Number of lines the player appears on.
    pub occurrences: u32,
}

/// The players placed on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAssignment {
    /// Zero-based line index.
    pub index: usize,
    /// Zero-based period index.
    pub period: usize,
    /// Fielders in the order they were placed.
    pub fielders: Vec<PlayerId>,
    pub goalie: Option<PlayerId>,
    /// Summed skill of everyone on the line, goalie included.
    pub sum: u32,
}

/// Output of [`build_lineup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    /// Rows sorted by the line each player first appears on.  Players that
    /// were never placed come last.
    pub rows: Vec<PlayerRow>,
    pub lines: Vec<LineAssignment>,
    pub line_sums: [u32; LINE_COUNT],
    pub min_fielder_occ: u32,
    pub max_fielder_occ: u32,
    pub max_goalie_periods: u32,
    /// Raw occurrence counts, fielders first then goalies, in roster order.
    pub occurrences: Vec<(PlayerId, u32)>,
    /// Population standard deviation of `line_sums`.
    pub standard_deviation: f64,
    /// Roster violations found before scheduling.  When non-empty the
    /// fielder fill was skipped.
    pub violations: Vec<String>,
}

impl Schedule {
    /// `true` when the roster passed validation and the fielder fill ran.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Occurrence count for `id`, or `None` if the player was not scheduled.
    pub fn occurrences_of(&self, id: &PlayerId) -> Option<u32> {
        self.occurrences
            .iter()
            .find(|(pid, _)| pid == id)
            .map(|&(_, n)| n)
    }

    /// Sum of fielder appearances over all lines.
    pub fn fielder_occurrences(&self) -> u32 {
        self.lines.iter().map(|l| l.fielders.len() as u32).sum()
    }

    /// Sum of goalie appearances over all lines.
    pub fn goalie_occurrences(&self) -> u32 {
        self.lines.iter().filter(|l| l.goalie.is_some()).count() as u32
    }
}

// ── Line arena ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Line {
    fielders: [usize; FIELDERS_PER_LINE],
    fielder_count: usize,
    goalie: Option<usize>,
    sum: u32,
}

impl Line {
    fn is_full(&self) -> bool {
        self.fielder_count == FIELDERS_PER_LINE
    }

    fn fielders(&self) -> &[usize] {
        &self.fielders[..self.fielder_count]
    }

    fn contains(&self, player: usize) -> bool {
        self.goalie == Some(player) || self.fielders().contains(&player)
    }

    fn add_fielder(&mut self, player: usize, skill: u32) {
        debug_assert!(!self.is_full());
        self.fielders[self.fielder_count] = player;
        self.fielder_count += 1;
        self.sum += skill;
    }

    fn set_goalie(&mut self, player: usize, skill: u32) {
        debug_assert!(self.goalie.is_none());
        self.goalie = Some(player);
        self.sum += skill;
    }
}

/// Per-player bookkeeping, indexed like the input snapshot.
struct Tally {
    occurrences: Vec<u32>,
    lines: Vec<[bool; LINE_COUNT]>,
    first_line: Vec<Option<usize>>,
}

impl Tally {
    fn new(players: usize) -> Self {
        Self {
            occurrences: vec![0; players],
            lines: vec![[false; LINE_COUNT]; players],
            first_line: vec![None; players],
        }
    }

    fn record(&mut self, player: usize, line: usize) {
        self.occurrences[player] += 1;
        self.lines[player][line] = true;
        let first = self.first_line[player].map_or(line, |f| f.min(line));
        self.first_line[player] = Some(first);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Builds a schedule for the given active fielders and goalies.
///
/// Both slices must contain active players only, in roster order; the order
/// breaks ties between equally skilled players.  The inputs are never
/// modified.
///
/// If the players break a roster rule the fielder fill is skipped: the
/// returned schedule places goalies only and lists the violations in
/// [`Schedule::violations`].  Use [`try_build_lineup`] to reject such rosters
/// outright.
pub fn build_lineup(fielders: &[Player], goalies: &[Player]) -> Schedule {
    let players: Vec<&Player> = fielders.iter().chain(goalies.iter()).collect();
    let violations = validation_messages(players.iter().copied());
    let bounds = OccupancyBounds::for_counts(fielders.len(), goalies.len());

    let mut lines: [Line; LINE_COUNT] = Default::default();
    let mut tally = Tally::new(players.len());
    let skill = |idx: usize| players[idx].skill.value() as u32;

    // Strongest first; the stable sort keeps roster order among equals.
    let mut fielder_order: Vec<usize> = (0..fielders.len()).collect();
    fielder_order.sort_by(|&a, &b| players[b].skill.cmp(&players[a].skill));
    let mut goalie_order: Vec<usize> = (fielders.len()..players.len()).collect();
    goalie_order.sort_by(|&a, &b| players[b].skill.cmp(&players[a].skill));

    if violations.is_empty() {
        fill_fielders(&mut lines, &mut tally, &fielder_order, bounds.max_fielder, skill);
    } else {
        debug!(?violations, "skipping fielder fill for invalid roster");
    }

    place_goalies(&mut lines, &mut tally, &goalie_order, bounds.max_goalie_periods, skill);

    let line_sums: [u32; LINE_COUNT] = std::array::from_fn(|i| lines[i].sum);
    let standard_deviation = stats::standard_deviation(&line_sums);

    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by_key(|&idx| tally.first_line[idx].unwrap_or(LINE_COUNT));
    let rows = order
        .into_iter()
        .map(|idx| PlayerRow {
            player: players[idx].clone(),
            lines: tally.lines[idx],
            first_line: tally.first_line[idx],
            occurrences: tally.occurrences[idx],
        })
        .collect();

    let assignments = lines
        .iter()
        .enumerate()
        .map(|(index, line)| LineAssignment {
            index,
            period: period_of(index),
            fielders: line.fielders().iter().map(|&p| players[p].id.clone()).collect(),
            goalie: line.goalie.map(|g| players[g].id.clone()),
            sum: line.sum,
        })
        .collect();

    let occurrences = players
        .iter()
        .zip(&tally.occurrences)
        .map(|(p, &n)| (p.id.clone(), n))
        .collect();

    debug!(?line_sums, standard_deviation, "lineup built");

    Schedule {
        rows,
        lines: assignments,
        line_sums,
        min_fielder_occ: bounds.min_fielder,
        max_fielder_occ: bounds.max_fielder,
        max_goalie_periods: bounds.max_goalie_periods,
        occurrences,
        standard_deviation,
        violations,
    }
}

/// Like [`build_lineup`] but refuses rosters that fail validation.
///
/// # Errors
///
/// Returns [`LineupError::InvalidRoster`] carrying the violation messages.
pub fn try_build_lineup(fielders: &[Player], goalies: &[Player]) -> Result<Schedule, LineupError> {
    let schedule = build_lineup(fielders, goalies);
    if schedule.is_valid() {
        Ok(schedule)
    } else {
        Err(LineupError::InvalidRoster(schedule.violations))
    }
}

/// Offers the fielders, strongest first and `max_occ` rounds deep, to the
/// lightest eligible line until every fielder slot is taken.
///
/// A pass over the candidate stream that places nobody ends the fill; this
/// happens when there are too few fielders to cover every slot.
fn fill_fielders(
    lines: &mut [Line; LINE_COUNT],
    tally: &mut Tally,
    order: &[usize],
    max_occ: u32,
    skill: impl Fn(usize) -> u32,
) {
    let stream: Vec<usize> = std::iter::repeat(order)
        .take(max_occ as usize)
        .flatten()
        .copied()
        .collect();

    let mut filled = 0;
    let mut pass = 0;
    while filled < TOTAL_FIELDER_SLOTS {
        let before = filled;
        pass += 1;
        for &player in &stream {
            if filled == TOTAL_FIELDER_SLOTS {
                break;
            }
            if tally.occurrences[player] >= max_occ {
                continue;
            }
            let Some(line) = lightest_open_line(lines, player) else {
                continue;
            };
            lines[line].add_fielder(player, skill(player));
            tally.record(player, line);
            filled += 1;
        }
        debug!(pass, filled, "fielder fill pass");
        if filled == before {
            warn!(
                filled,
                slots = TOTAL_FIELDER_SLOTS,
                "not enough fielders to fill every line"
            );
            break;
        }
    }
}

/// Lowest-sum line with a free fielder slot that does not already hold
/// `player`.  Ties go to the earliest line.
fn lightest_open_line(lines: &[Line; LINE_COUNT], player: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_full() && !line.contains(player))
        .min_by_key(|(_, line)| line.sum)
        .map(|(idx, _)| idx)
}

/// Gives each period one goalie, weakest period first.
fn place_goalies(
    lines: &mut [Line; LINE_COUNT],
    tally: &mut Tally,
    order: &[usize],
    max_periods: u32,
    skill: impl Fn(usize) -> u32,
) {
    // Period strength is measured once, from the fielders alone.
    let mut period_sums = [0u32; PERIOD_COUNT];
    for (idx, line) in lines.iter().enumerate() {
        period_sums[period_of(idx)] += line.sum;
    }
    let mut covered = [false; PERIOD_COUNT];

    let stream = std::iter::repeat(order).take(max_periods as usize).flatten();
    for &goalie in stream {
        let Some(period) = (0..PERIOD_COUNT)
            .filter(|&p| !covered[p])
            .min_by_key(|&p| period_sums[p])
        else {
            break;
        };
        for line in lines_of(period) {
            lines[line].set_goalie(goalie, skill(goalie));
            tally.record(goalie, line);
        }
        covered[period] = true;
        debug!(goalie, period, "goalie placed");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::Position;

    /// Players `1..=n`, skill `id * 4`, the first `goalies` of them in goal.
    fn team(n: usize, goalies: usize) -> (Vec<Player>, Vec<Player>) {
        let players: Vec<Player> = (1..=n)
            .map(|id| {
                let position = if id <= goalies { Position::Goalie } else { Position::Fielder };
                Player::new(id.to_string())
                    .with_name(format!("P{id}"))
                    .with_number(format!("0{id}"))
                    .with_skill(id as i64 * 4)
                    .with_active(true)
                    .with_position(position)
            })
            .collect();
        players.into_iter().partition(|p| !p.is_goalie())
    }

    fn count_goalies_per_line(schedule: &Schedule) -> Vec<usize> {
        (0..LINE_COUNT)
            .map(|line| {
                schedule
                    .rows
                    .iter()
                    .filter(|r| r.player.is_goalie() && r.lines[line])
                    .count()
            })
            .collect()
    }

    // ── OccupancyBounds ───────────────────────────────────────────────────────

    #[test]
    fn test_bounds_for_evenly_dividing_fielder_count() {
        // 45 / 9 = 5 exactly → band 4..=6
        let bounds = OccupancyBounds::for_counts(9, 1);
        assert_eq!((bounds.min_fielder, bounds.max_fielder), (4, 6));
        assert_eq!(bounds.max_goalie_periods, 3);
    }

    #[test]
    fn test_bounds_for_unevenly_dividing_fielder_count() {
        // 45 / 14 = 3.21 → ceil 4 - 1 = 3, floor 3 + 1 = 4
        let bounds = OccupancyBounds::for_counts(14, 2);
        assert_eq!((bounds.min_fielder, bounds.max_fielder), (3, 4));
        assert_eq!(bounds.max_goalie_periods, 2);
    }

    #[test]
    fn test_bounds_with_zero_players_do_not_divide_by_zero() {
        let bounds = OccupancyBounds::for_counts(0, 0);
        assert_eq!(bounds, OccupancyBounds { min_fielder: 0, max_fielder: 0, max_goalie_periods: 0 });
    }

    // ── Period helpers ────────────────────────────────────────────────────────

    #[test]
    fn test_period_of_groups_three_consecutive_lines() {
        assert_eq!(period_of(0), 0);
        assert_eq!(period_of(2), 0);
        assert_eq!(period_of(3), 1);
        assert_eq!(period_of(8), 2);
        assert_eq!(lines_of(1), 3..6);
    }

    // ── build_lineup ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_lineup_fifteen_players_single_goalie() {
        // Arrange
        let (fielders, goalies) = team(15, 1);

        // Act
        let schedule = build_lineup(&fielders, &goalies);

        // Assert
        assert!(schedule.is_valid());
        assert_eq!(schedule.fielder_occurrences(), 45);
        assert_eq!(schedule.goalie_occurrences(), 9);
        assert_eq!(schedule.occurrences_of(&PlayerId::new("1")), Some(9));
        let total: u32 = schedule.occurrences.iter().map(|&(_, n)| n).sum();
        assert_eq!(total, 54);
    }

    #[test]
    fn test_build_lineup_every_valid_team_size_fills_all_slots() {
        for n in 6..=16 {
            let (fielders, goalies) = team(n, 1);
            let schedule = build_lineup(&fielders, &goalies);

            let mut fielder_total = 0;
            let mut goalie_total = 0;
            for row in &schedule.rows {
                let occ = row.lines.iter().filter(|&&on| on).count() as u32;
                assert_eq!(occ, row.occurrences, "row occupancy mismatch; {n}");
                if row.player.is_goalie() {
                    goalie_total += occ;
                } else {
                    fielder_total += occ;
                    assert!(occ <= schedule.max_fielder_occ, "equal play max; {n}");
                    assert!(occ >= schedule.min_fielder_occ, "equal play min; {n}");
                }
            }
            assert_eq!(fielder_total, 45, "fielder occurrences; {n}");
            assert_eq!(goalie_total, 9, "goalie occurrences; {n}");
        }
    }

    #[test]
    fn test_build_lineup_rotates_multiple_goalies_by_whole_periods() {
        for goalie_count in 1..=3 {
            let (fielders, goalies) = team(12, goalie_count);
            let schedule = build_lineup(&fielders, &goalies);

            assert_eq!(count_goalies_per_line(&schedule), vec![1; LINE_COUNT]);
            for row in schedule.rows.iter().filter(|r| r.player.is_goalie()) {
                assert_eq!(row.occurrences % LINES_PER_PERIOD as u32, 0);
                let periods = row.occurrences / LINES_PER_PERIOD as u32;
                assert!(periods <= schedule.max_goalie_periods);
                for period in 0..PERIOD_COUNT {
                    let on: Vec<bool> = lines_of(period).map(|l| row.lines[l]).collect();
                    assert!(on.iter().all(|&b| b) || on.iter().all(|&b| !b));
                }
            }
        }
    }

    #[test]
    fn test_build_lineup_three_goalies_each_cover_one_period() {
        let (fielders, goalies) = team(16, 3);
        let schedule = build_lineup(&fielders, &goalies);
        for goalie in &goalies {
            assert_eq!(schedule.occurrences_of(&goalie.id), Some(3));
        }
    }

    #[test]
    fn test_build_lineup_never_places_a_fielder_twice_on_one_line() {
        let (fielders, goalies) = team(7, 1);
        let schedule = build_lineup(&fielders, &goalies);
        for line in &schedule.lines {
            let mut ids = line.fielders.clone();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), line.fielders.len());
            assert!(line.fielders.len() <= FIELDERS_PER_LINE);
        }
    }

    #[test]
    fn test_build_lineup_line_sums_match_assignments() {
        let (fielders, goalies) = team(13, 2);
        let schedule = build_lineup(&fielders, &goalies);
        let skill_of = |id: &PlayerId| {
            fielders
                .iter()
                .chain(&goalies)
                .find(|p| &p.id == id)
                .map(|p| p.skill.value() as u32)
                .unwrap()
        };
        for line in &schedule.lines {
            let expected: u32 = line.fielders.iter().map(skill_of).sum::<u32>()
                + line.goalie.as_ref().map(skill_of).unwrap_or(0);
            assert_eq!(schedule.line_sums[line.index], expected);
            assert_eq!(line.sum, expected);
        }
        assert!(schedule.standard_deviation >= 0.0);
    }

    #[test]
    fn test_build_lineup_first_line_places_strongest_fielder() {
        let (fielders, goalies) = team(10, 1);
        let schedule = build_lineup(&fielders, &goalies);
        // Player 10 has the highest skill and is offered first → line 0.
        assert_eq!(schedule.lines[0].fielders[0], PlayerId::new("10"));
    }

    #[test]
    fn test_build_lineup_rows_sorted_by_first_line() {
        let (fielders, goalies) = team(14, 2);
        let schedule = build_lineup(&fielders, &goalies);
        let keys: Vec<usize> = schedule
            .rows
            .iter()
            .map(|r| r.first_line.unwrap_or(LINE_COUNT))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_build_lineup_is_deterministic() {
        let (fielders, goalies) = team(11, 2);
        assert_eq!(build_lineup(&fielders, &goalies), build_lineup(&fielders, &goalies));
    }

    #[test]
    fn test_build_lineup_invalid_roster_skips_fielder_fill_but_places_goalie() {
        // Arrange: 1 goalie + 3 fielders is below the 6 player minimum
        let (fielders, goalies) = team(4, 1);

        // Act
        let schedule = build_lineup(&fielders, &goalies);

        // Assert
        assert!(!schedule.is_valid());
        assert_eq!(schedule.fielder_occurrences(), 0);
        assert_eq!(schedule.goalie_occurrences(), 9);
        assert!(schedule
            .rows
            .iter()
            .filter(|r| !r.player.is_goalie())
            .all(|r| r.first_line.is_none()));
    }

    #[test]
    fn test_build_lineup_empty_roster_does_not_panic() {
        let schedule = build_lineup(&[], &[]);
        assert!(schedule.rows.is_empty());
        assert_eq!(schedule.line_sums, [0; LINE_COUNT]);
        assert_eq!(schedule.standard_deviation, 0.0);
        assert_eq!(schedule.violations.len(), 2);
    }

    #[test]
    fn test_build_lineup_no_goalies_leaves_lines_without_goalie() {
        let (fielders, _) = team(10, 0);
        let schedule = build_lineup(&fielders, &[]);
        assert_eq!(schedule.goalie_occurrences(), 0);
        assert_eq!(schedule.max_goalie_periods, 0);
    }

    #[test]
    fn test_build_lineup_with_too_few_fielders_terminates() {
        // Valid roster (6 players) but only 4 fielders: 36 of 45 slots fit.
        let (fielders, goalies) = team(6, 2);
        let schedule = build_lineup(&fielders, &goalies);
        assert!(schedule.is_valid());
        assert_eq!(schedule.fielder_occurrences(), 36);
        assert_eq!(schedule.goalie_occurrences(), 9);
    }

    #[test]
    fn test_build_lineup_greedy_dead_end_terminates_one_slot_short() {
        // The last open line already holds every fielder still under the cap.
        let fielders: Vec<Player> = [70, 20, 10, 40, 40, 70]
            .iter()
            .enumerate()
            .map(|(i, &skill)| Player::new(format!("f{i}")).with_skill(skill).with_active(true))
            .collect();
        let goalie = Player::new("g")
            .with_skill(50)
            .with_position(Position::Goalie)
            .with_active(true);

        let schedule = build_lineup(&fielders, &[goalie]);

        assert!(schedule.is_valid());
        assert_eq!(schedule.fielder_occurrences(), 44);
        assert_eq!(schedule.goalie_occurrences(), 9);
    }

    // ── try_build_lineup ──────────────────────────────────────────────────────

    #[test]
    fn test_try_build_lineup_rejects_invalid_roster() {
        let result = try_build_lineup(&[], &[]);
        assert!(matches!(result, Err(LineupError::InvalidRoster(v)) if v.len() == 2));
    }

    #[test]
    fn test_try_build_lineup_accepts_valid_roster() {
        let (fielders, goalies) = team(9, 1);
        assert!(try_build_lineup(&fielders, &goalies).is_ok());
    }
}
