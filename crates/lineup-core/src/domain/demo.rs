//! Built-in demo team.

use super::player::{Player, Position};

/// `(id, name, number, skill, active, position)` for each demo player.
const DEMO_TEAM: [(&str, &str, &str, i64, bool, Position); 15] = [
    ("18rspns", "Ryan Getzlaf", "15", 86, true, Position::Fielder),
    ("18rsqfk", "Ryan Kesler", "17", 66, true, Position::Fielder),
    ("18rsr7c", "Corey Perry", "10", 94, true, Position::Fielder),
    ("18rsrz4", "John Gibson", "36", 75, true, Position::Goalie),
    ("18rssqw", "Rickard Rakell", "67", 83, true, Position::Fielder),
    ("18rstio", "Andrew Cogliano", "7", 79, true, Position::Fielder),
    ("18rsuag", "Cam Fowler", "4", 72, true, Position::Fielder),
    ("18rsv28", "Hampus Lindholm", "47", 77, true, Position::Fielder),
    ("18rsvu0", "Kevin Bieksa", "3", 91, true, Position::Fielder),
    ("18rswls", "Jakob Silfverberg", "33", 88, true, Position::Fielder),
    ("18rsxdk", "Ryan Miller", "30", 85, false, Position::Goalie),
    ("18rsy5c", "Nick Ritchie", "37", 96, false, Position::Fielder),
    ("18rsyx4", "Antoine Vermette", "50", 67, true, Position::Fielder),
    ("18rszow", "François Beauchemin", "23", 87, true, Position::Fielder),
    ("18rt0go", "Ondřej Kaše", "25", 74, false, Position::Fielder),
];

/// Fifteen players: eleven active fielders, one active goalie and three
/// inactive players, one of them a goalie.  The team passes validation.
pub fn demo_players() -> Vec<Player> {
    DEMO_TEAM
        .iter()
        .map(|&(id, name, number, skill, active, position)| {
            Player::new(id)
                .with_name(name)
                .with_number(number)
                .with_skill(skill)
                .with_active(active)
                .with_position(position)
        })
        .collect()
}
