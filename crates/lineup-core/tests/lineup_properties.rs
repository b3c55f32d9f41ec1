//! Integration tests for the lineup scheduler.
//!
//! These tests drive the public API over every valid team shape and check the
//! guarantees a coach relies on: every slot filled, nobody twice on a line,
//! play time capped at the equal-play maximum, whole-period goalie duty.

use std::collections::HashSet;

use lineup_core::domain::lineup::{lines_of, FIELDERS_PER_LINE, PERIOD_COUNT};
use lineup_core::{build_lineup, try_build_lineup, LineupError, Player, Position, Schedule};

fn team(fielders: usize, goalies: usize) -> (Vec<Player>, Vec<Player>) {
    let player = |id: String, skill: usize, position: Position| {
        Player::new(id)
            .with_skill((skill * 29 % 101) as i64)
            .with_position(position)
            .with_active(true)
    };
    (
        (0..fielders).map(|i| player(format!("f{i}"), i, Position::Fielder)).collect(),
        (0..goalies).map(|i| player(format!("g{i}"), i + 7, Position::Goalie)).collect(),
    )
}

/// Every valid roster shape with at least five fielders.
fn valid_shapes() -> impl Iterator<Item = (usize, usize)> {
    (1..=3).flat_map(|goalies| (5..=16 - goalies).map(move |fielders| (fielders, goalies)))
}

fn schedule_for(fielders: usize, goalies: usize) -> Schedule {
    let (f, g) = team(fielders, goalies);
    try_build_lineup(&f, &g).expect("valid roster must schedule")
}

#[test]
fn test_every_line_has_five_fielders_and_one_goalie() {
    for (fielders, goalies) in valid_shapes() {
        let schedule = schedule_for(fielders, goalies);
        for line in &schedule.lines {
            assert_eq!(
                line.fielders.len(),
                FIELDERS_PER_LINE,
                "{fielders}F/{goalies}G line {}",
                line.index
            );
            assert!(line.goalie.is_some(), "{fielders}F/{goalies}G line {}", line.index);
        }
    }
}

#[test]
fn test_nobody_appears_twice_on_a_line() {
    for (fielders, goalies) in valid_shapes() {
        let schedule = schedule_for(fielders, goalies);
        for line in &schedule.lines {
            let mut seen = HashSet::new();
            for id in line.fielders.iter().chain(line.goalie.iter()) {
                assert!(seen.insert(id), "{id} twice on line {}", line.index);
            }
        }
    }
}

#[test]
fn test_fielder_occurrences_never_exceed_max() {
    for (fielders, goalies) in valid_shapes() {
        let schedule = schedule_for(fielders, goalies);
        for row in schedule.rows.iter().filter(|r| !r.player.is_goalie()) {
            assert!(
                row.occurrences <= schedule.max_fielder_occ,
                "{fielders}F/{goalies}G: {} played {} lines",
                row.player.id,
                row.occurrences
            );
        }
        assert_eq!(schedule.fielder_occurrences(), 45);
    }
}

#[test]
fn test_fielder_occurrences_reach_min_for_every_fixture_shape() {
    for (fielders, goalies) in valid_shapes() {
        let schedule = schedule_for(fielders, goalies);
        for row in schedule.rows.iter().filter(|r| !r.player.is_goalie()) {
            assert!(
                row.occurrences >= schedule.min_fielder_occ,
                "{fielders}F/{goalies}G: {} played {} lines",
                row.player.id,
                row.occurrences
            );
        }
    }
}

#[test]
fn test_min_fielder_occurrences_is_reported_not_enforced() {
    // Arrange: the strongest fielder is crowded out of the lighter lines
    let fielders: Vec<Player> = [20, 90, 20, 30, 40, 50]
        .iter()
        .enumerate()
        .map(|(i, &skill)| Player::new(format!("f{i}")).with_skill(skill).with_active(true))
        .collect();
    let goalie = Player::new("g")
        .with_skill(50)
        .with_position(Position::Goalie)
        .with_active(true);

    // Act
    let schedule = try_build_lineup(&fielders, &[goalie]).unwrap();

    // Assert
    let star = schedule.rows.iter().find(|r| r.player.id.as_str() == "f1").unwrap();
    assert_eq!(schedule.fielder_occurrences(), 45);
    assert_eq!(schedule.min_fielder_occ, 7);
    assert_eq!(star.occurrences, 6);
}

#[test]
fn test_goalies_cover_whole_periods() {
    for (fielders, goalies) in valid_shapes() {
        let schedule = schedule_for(fielders, goalies);
        for period in 0..PERIOD_COUNT {
            let keepers: HashSet<_> = lines_of(period)
                .map(|line| schedule.lines[line].goalie.clone())
                .collect();
            assert_eq!(keepers.len(), 1, "period {period} split between goalies");
        }
        for row in schedule.rows.iter().filter(|r| r.player.is_goalie()) {
            assert_eq!(row.occurrences % 3, 0);
            assert!(row.occurrences / 3 <= schedule.max_goalie_periods);
        }
    }
}

#[test]
fn test_line_sums_match_assigned_skills() {
    let (f, g) = team(11, 2);
    let schedule = try_build_lineup(&f, &g).unwrap();
    let skill_of = |id: &lineup_core::PlayerId| {
        f.iter()
            .chain(&g)
            .find(|p| &p.id == id)
            .map(|p| p.skill.value() as u32)
            .unwrap()
    };
    for line in &schedule.lines {
        let expected: u32 = line.fielders.iter().chain(line.goalie.iter()).map(skill_of).sum();
        assert_eq!(line.sum, expected);
        assert_eq!(schedule.line_sums[line.index], expected);
    }
}

#[test]
fn test_inputs_are_not_modified() {
    let (f, g) = team(9, 1);
    let (f_before, g_before) = (f.clone(), g.clone());
    let _ = build_lineup(&f, &g);
    assert_eq!(f, f_before);
    assert_eq!(g, g_before);
}

#[test]
fn test_too_many_goalies_is_rejected() {
    let (f, g) = team(8, 4);
    let err = try_build_lineup(&f, &g).unwrap_err();
    assert_eq!(
        err,
        LineupError::InvalidRoster(vec![
            "Too many active goalies, maximum of 3 allowed.".to_string()
        ])
    );
}

#[test]
fn test_invalid_roster_schedule_still_places_goalies() {
    let (f, g) = team(20, 1);
    let schedule = build_lineup(&f, &g);
    assert!(!schedule.is_valid());
    assert_eq!(schedule.fielder_occurrences(), 0);
    assert_eq!(schedule.goalie_occurrences(), 9);
}
