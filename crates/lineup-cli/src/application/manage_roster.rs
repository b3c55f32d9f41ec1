//! ManageRosterUseCase: roster edits requested from the command line.
//!
//! The core store is deliberately forgiving (deleting an unknown id is a
//! no-op, updating an unknown id inserts it).  A user typing an id on the
//! command line expects a typo to be reported instead, so this use case
//! checks ids before touching the store.

use lineup_core::{Player, PlayerDraft, PlayerId, Position, Roster, RosterError, Skill};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Errors returned by roster edits.
#[derive(Debug, Error, PartialEq)]
pub enum ManageRosterError {
    /// No player with this id is on the roster.
    #[error("no player with id {0:?}")]
    UnknownPlayer(PlayerId),

    /// The store refused the change.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Field changes for an existing player.  `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub number: Option<String>,
    /// Raw skill text; normalised like every other skill input.
    pub skill: Option<String>,
    /// Raw position text; anything other than `G` means fielder.
    pub position: Option<String>,
    pub active: Option<bool>,
}

impl PlayerPatch {
    fn apply(self, mut player: Player) -> Player {
        if let Some(name) = self.name {
            player.name = name;
        }
        if let Some(number) = self.number {
            player.number = number;
        }
        if let Some(skill) = self.skill {
            player.skill = Skill::from_text(&skill);
        }
        if let Some(position) = self.position {
            player.position = Position::parse(&position);
        }
        if let Some(active) = self.active {
            player.active = active;
        }
        player
    }
}

/// Generates a fresh player id.
pub fn new_player_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Applies user edits to a roster.
pub struct ManageRosterUseCase<'r> {
    roster: &'r mut Roster,
}

impl<'r> ManageRosterUseCase<'r> {
    pub fn new(roster: &'r mut Roster) -> Self {
        Self { roster }
    }

    /// Adds a player built from `draft`.  A blank id is replaced with a
    /// generated one.
    ///
    /// # Errors
    ///
    /// Returns [`ManageRosterError::Roster`] when the roster is full.
    pub fn add(&mut self, mut draft: PlayerDraft) -> Result<Player, ManageRosterError> {
        if draft.id.trim().is_empty() {
            draft.id = new_player_id();
        }
        let player = draft.into_player();
        self.roster.create_player(player.clone())?;
        info!(id = %player.id, "player added");
        Ok(player)
    }

    /// Changes the fields named in `patch` on the player with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ManageRosterError::UnknownPlayer`] if `id` is not on the roster.
    pub fn update(&mut self, id: &PlayerId, patch: PlayerPatch) -> Result<Player, ManageRosterError> {
        let current = self.existing(id)?.clone();
        let player = patch.apply(current);
        self.roster.update_player(player.clone());
        info!(%id, "player updated");
        Ok(player)
    }

    /// Removes the player with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ManageRosterError::UnknownPlayer`] if `id` is not on the roster.
    pub fn remove(&mut self, id: &PlayerId) -> Result<Player, ManageRosterError> {
        let removed = self.existing(id)?.clone();
        self.roster.delete_player(id);
        info!(%id, "player removed");
        Ok(removed)
    }

    /// Marks every player in `ids` active or inactive.  Nothing changes
    /// unless every id is known.  Players already in the requested state are
    /// left alone; returns how many were changed.
    ///
    /// # Errors
    ///
    /// Returns [`ManageRosterError::UnknownPlayer`] for the first unknown id.
    pub fn set_active(&mut self, ids: &[PlayerId], active: bool) -> Result<usize, ManageRosterError> {
        let mut changed = Vec::new();
        for id in ids {
            let player = self.existing(id)?;
            if player.active != active {
                changed.push(player.clone().with_active(active));
            }
        }
        let count = changed.len();
        for player in changed {
            self.roster.update_player(player);
        }
        info!(count, active, "activation changed");
        Ok(count)
    }

    fn existing(&self, id: &PlayerId) -> Result<&Player, ManageRosterError> {
        self.roster
            .get_player(id)
            .ok_or_else(|| ManageRosterError::UnknownPlayer(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::MAX_ROSTER_SIZE;

    fn draft(id: &str) -> PlayerDraft {
        PlayerDraft {
            id: id.to_string(),
            name: Some(format!("Player {id}")),
            active: true,
            ..PlayerDraft::default()
        }
    }

    // ── add ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_add_normalises_draft_fields() {
        let mut roster = Roster::new();
        let player = ManageRosterUseCase::new(&mut roster)
            .add(PlayerDraft {
                skill: Some("250".to_string()),
                position: Some("g".to_string()),
                ..draft("7")
            })
            .unwrap();

        assert_eq!(player.skill.value(), 100);
        assert!(player.is_goalie());
        assert_eq!(roster.get_player(&"7".into()), Some(&player));
    }

    #[test]
    fn test_add_generates_id_when_blank() {
        let mut roster = Roster::new();
        let player = ManageRosterUseCase::new(&mut roster).add(draft("  ")).unwrap();
        assert_eq!(player.id.as_str().len(), 32);
        assert_eq!(roster.player_count(), 1);
    }

    #[test]
    fn test_add_to_full_roster_fails() {
        let mut roster = Roster::new();
        let mut use_case = ManageRosterUseCase::new(&mut roster);
        for i in 0..MAX_ROSTER_SIZE {
            use_case.add(draft(&i.to_string())).unwrap();
        }
        assert_eq!(
            use_case.add(draft("extra")),
            Err(ManageRosterError::Roster(RosterError::CapacityExceeded))
        );
    }

    // ── update / remove ───────────────────────────────────────────────────────

    #[test]
    fn test_update_changes_only_patched_fields() {
        let mut roster = Roster::new();
        let mut use_case = ManageRosterUseCase::new(&mut roster);
        use_case.add(draft("1")).unwrap();

        let updated = use_case
            .update(
                &"1".into(),
                PlayerPatch {
                    number: Some("42".to_string()),
                    skill: Some("x".to_string()),
                    ..PlayerPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Player 1");
        assert_eq!(updated.number, "42");
        assert_eq!(updated.skill.value(), 50);
        assert!(updated.active);
    }

    #[test]
    fn test_update_unknown_player_fails_without_inserting() {
        let mut roster = Roster::new();
        let result = ManageRosterUseCase::new(&mut roster).update(&"ghost".into(), PlayerPatch::default());
        assert_eq!(result, Err(ManageRosterError::UnknownPlayer("ghost".into())));
        assert_eq!(roster.player_count(), 0);
    }

    #[test]
    fn test_remove_returns_removed_player() {
        let mut roster = Roster::new();
        let mut use_case = ManageRosterUseCase::new(&mut roster);
        use_case.add(draft("1")).unwrap();

        let removed = use_case.remove(&"1".into()).unwrap();

        assert_eq!(removed.name, "Player 1");
        assert_eq!(roster.player_count(), 0);
    }

    #[test]
    fn test_remove_unknown_player_fails() {
        let mut roster = Roster::new();
        let result = ManageRosterUseCase::new(&mut roster).remove(&"ghost".into());
        assert!(matches!(result, Err(ManageRosterError::UnknownPlayer(_))));
    }

    // ── set_active ────────────────────────────────────────────────────────────

    #[test]
    fn test_set_active_counts_only_changed_players() {
        let mut roster = Roster::new();
        roster.load_demo();
        let ids: Vec<PlayerId> = vec!["18rsxdk".into(), "18rspns".into()];

        let changed = ManageRosterUseCase::new(&mut roster).set_active(&ids, true).unwrap();

        assert_eq!(changed, 1);
        assert!(roster.get_player(&"18rsxdk".into()).unwrap().active);
    }

    #[test]
    fn test_set_active_with_unknown_id_changes_nothing() {
        let mut roster = Roster::new();
        roster.load_demo();
        let ids: Vec<PlayerId> = vec!["18rspns".into(), "nobody".into()];

        let result = ManageRosterUseCase::new(&mut roster).set_active(&ids, false);

        assert!(result.is_err());
        assert!(roster.get_player(&"18rspns".into()).unwrap().active);
    }
}
