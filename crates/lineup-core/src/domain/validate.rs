//! Roster constraint validation.
//!
//! [`validate`] is advisory: it never fails, it reports.  Each rule is
//! checked independently so a caller sees every problem at once.

use std::fmt;

use super::player::Player;

/// Minimum number of active goalies.
pub const MIN_ACTIVE_GOALIES: usize = 1;
/// Maximum number of active goalies.
pub const MAX_ACTIVE_GOALIES: usize = 3;
/// Minimum number of active players, goalies included.
pub const MIN_ACTIVE_PLAYERS: usize = 6;
/// Maximum number of active players, goalies included.
pub const MAX_ACTIVE_PLAYERS: usize = 16;

/// One broken roster rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    NoGoalie,
    TooManyGoalies { active: usize },
    TooFewPlayers { active: usize },
    TooManyPlayers { active: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoGoalie => write!(f, "No goalie! At least one goalie is required."),
            Violation::TooManyGoalies { .. } => write!(
                f,
                "Too many active goalies, maximum of {MAX_ACTIVE_GOALIES} allowed."
            ),
            Violation::TooFewPlayers { .. } => write!(
                f,
                "Too few active players, minimum of {MIN_ACTIVE_PLAYERS} players."
            ),
            Violation::TooManyPlayers { .. } => write!(
                f,
                "Too many active players, maximum of {MAX_ACTIVE_PLAYERS} players."
            ),
        }
    }
}

/// Checks the active players of `players` against the roster rules.
///
/// Inactive players are ignored.  An empty result means the roster can be
/// scheduled.
pub fn validate<'a, I>(players: I) -> Vec<Violation>
where
    I: IntoIterator<Item = &'a Player>,
{
    let (mut active, mut goalies) = (0usize, 0usize);
    for player in players.into_iter().filter(|p| p.active) {
        active += 1;
        if player.is_goalie() {
            goalies += 1;
        }
    }

    let mut violations = Vec::new();
    if goalies < MIN_ACTIVE_GOALIES {
        violations.push(Violation::NoGoalie);
    }
    if goalies > MAX_ACTIVE_GOALIES {
        violations.push(Violation::TooManyGoalies { active: goalies });
    }
    if active < MIN_ACTIVE_PLAYERS {
        violations.push(Violation::TooFewPlayers { active });
    }
    if active > MAX_ACTIVE_PLAYERS {
        violations.push(Violation::TooManyPlayers { active });
    }
    violations
}

/// [`validate`] rendered as human-readable messages.
pub fn validation_messages<'a, I>(players: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Player>,
{
    validate(players).iter().map(ToString::to_string).collect()
}
