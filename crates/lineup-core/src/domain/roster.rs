//! Roster store: the single owner of every player.
//!
//! [`Roster`] keeps players in insertion order (the scheduler uses that order
//! to break ties), enforces the [`MAX_ROSTER_SIZE`] capacity, notifies
//! listeners of every change, and hands an encoded snapshot to an injected
//! [`RosterPersistence`] after each change.
//!
//! # Listeners and deferred mutations (for beginners)
//!
//! Listeners run synchronously, in registration order, while the store is in
//! the middle of an operation.  They cannot touch the store directly: the
//! borrow checker forbids a `&mut Roster` inside the callback.  A listener that
//! wants to react with a change of its own calls
//! [`ListenerContext::defer`] instead.  Deferred mutations are queued and
//! applied first-in first-out once the current operation has finished
//! notifying every listener, so each listener always sees a consistent
//! roster.

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::lineup::{self, LineupError, Schedule};
use super::player::{Player, PlayerId};
use super::validate::{validate, validation_messages, Violation};
use crate::codec::{decode_roster, encode_roster, CodecError};

/// Most players a roster may hold, active or not.
pub const MAX_ROSTER_SIZE: usize = 32;

/// Deferred mutations applied per top-level operation before the rest of the
/// queue is dropped.  Stops two listeners from ping-ponging forever.
pub const MAX_DEFERRED_MUTATIONS: usize = 64;

/// Errors returned by roster operations.
#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    /// The roster already holds [`MAX_ROSTER_SIZE`] players.
    #[error("too many players in roster, maximum of {} allowed", MAX_ROSTER_SIZE)]
    CapacityExceeded,

    /// A stored snapshot could not be decoded; the roster was left unchanged.
    #[error("failed to decode roster: {0}")]
    Decode(#[from] CodecError),

    /// The persistence adapter could not read the stored snapshot.
    #[error("failed to read roster: {0}")]
    Persist(#[from] PersistError),
}

/// Failure reported by a [`RosterPersistence`] adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PersistError(pub String);

impl PersistError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// Where roster snapshots are kept between runs.
///
/// The store calls [`write`](RosterPersistence::write) after every change with
/// the full roster encoded by [`encode_roster`].  Implementations live outside
/// the core (files, URL fragments, in-memory buffers for tests).
#[cfg_attr(test, mockall::automock)]
pub trait RosterPersistence {
    /// Returns the last stored snapshot, or `None` when nothing was stored.
    fn read(&self) -> Result<Option<String>, PersistError>;

    /// Replaces the stored snapshot.
    fn write(&mut self, snapshot: &str) -> Result<(), PersistError>;
}

/// Kind of change a listener is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Load,
    Create,
    Update,
    Delete,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Load => "load",
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A change notification and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEvent {
    /// The whole roster was replaced; carries the new player list.
    Load(Vec<Player>),
    Create(Player),
    Update(Player),
    /// A delete was requested for this id.
    Delete(PlayerId),
}

impl RosterEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RosterEvent::Load(_) => EventKind::Load,
            RosterEvent::Create(_) => EventKind::Create,
            RosterEvent::Update(_) => EventKind::Update,
            RosterEvent::Delete(_) => EventKind::Delete,
        }
    }
}

/// A change a listener asks the store to make later.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(Player),
    Update(Player),
    Delete(PlayerId),
}

/// What a listener can see and do while it is being notified.
pub struct ListenerContext<'a> {
    players: &'a [Player],
    deferred: &'a mut Vec<Mutation>,
}

impl ListenerContext<'_> {
    /// The roster as it stands after the change being reported.
    pub fn players(&self) -> &[Player] {
        self.players
    }

    /// Queues `mutation` to run after the current operation completes.
    pub fn defer(&mut self, mutation: Mutation) {
        self.deferred.push(mutation);
    }
}

type Listener = Box<dyn FnMut(&RosterEvent, &mut ListenerContext<'_>)>;

/// The roster store.
#[derive(Default)]
pub struct Roster {
    players: Vec<Player>,
    listeners: Vec<Listener>,
    persistence: Option<Box<dyn RosterPersistence>>,
    pending: VecDeque<Mutation>,
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("players", &self.players)
            .field("listeners", &self.listeners.len())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl Roster {
    /// Creates an empty roster that is not persisted anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty roster that writes a snapshot to `persistence` after
    /// every change.  Call [`Roster::load`] to read the stored roster.
    pub fn with_persistence(persistence: Box<dyn RosterPersistence>) -> Self {
        Self {
            persistence: Some(persistence),
            ..Self::default()
        }
    }

    /// Creates a roster backed by `persistence` and loads its snapshot.
    ///
    /// # Errors
    ///
    /// Fails like [`Roster::load`].
    pub fn open(persistence: Box<dyn RosterPersistence>) -> Result<Self, RosterError> {
        let mut roster = Self::with_persistence(persistence);
        roster.load()?;
        Ok(roster)
    }

    /// Registers a listener.  Listeners are called in registration order.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&RosterEvent, &mut ListenerContext<'_>) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ── Read views ────────────────────────────────────────────────────────────

    /// Every player in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn get_player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| p.active)
    }

    pub fn active_fielders(&self) -> impl Iterator<Item = &Player> + '_ {
        self.active_players().filter(|p| !p.is_goalie())
    }

    pub fn active_goalies(&self) -> impl Iterator<Item = &Player> + '_ {
        self.active_players().filter(|p| p.is_goalie())
    }

    /// Every player ordered by name, case-insensitively.
    pub fn players_by_name(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        players
    }

    // ── Validation and scheduling ─────────────────────────────────────────────

    /// Roster rule violations as messages; empty when the roster is valid.
    pub fn validate(&self) -> Vec<String> {
        validation_messages(&self.players)
    }

    /// Roster rule violations as typed values.
    pub fn violations(&self) -> Vec<Violation> {
        validate(&self.players)
    }

    /// Schedules the active players.  See [`lineup::build_lineup`] for what
    /// happens when the roster is invalid.
    pub fn build_lineup(&self) -> Schedule {
        let (fielders, goalies) = self.snapshot();
        lineup::build_lineup(&fielders, &goalies)
    }

    /// Schedules the active players, refusing an invalid roster.
    ///
    /// # Errors
    ///
    /// Returns [`LineupError::InvalidRoster`] when [`Roster::validate`] is
    /// not empty.
    pub fn try_build_lineup(&self) -> Result<Schedule, LineupError> {
        let (fielders, goalies) = self.snapshot();
        lineup::try_build_lineup(&fielders, &goalies)
    }

    fn snapshot(&self) -> (Vec<Player>, Vec<Player>) {
        (
            self.active_fielders().cloned().collect(),
            self.active_goalies().cloned().collect(),
        )
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Adds `player`, replacing any player with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::CapacityExceeded`] without changing anything
    /// when the roster already holds [`MAX_ROSTER_SIZE`] players.
    pub fn create_player(&mut self, player: Player) -> Result<(), RosterError> {
        self.insert(player)?;
        self.drain_pending();
        Ok(())
    }

    /// Replaces the player with the same id, inserting it if absent.
    pub fn update_player(&mut self, player: Player) {
        self.replace(player);
        self.drain_pending();
    }

    /// Removes the player with `id`.  Removing an unknown id is a no-op
    /// apart from the notification.
    pub fn delete_player(&mut self, id: &PlayerId) {
        self.remove(id.clone());
        self.drain_pending();
    }

    /// Replaces the whole roster with the snapshot held by the persistence
    /// adapter.  A roster without persistence loads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Persist`] if the snapshot cannot be read,
    /// [`RosterError::Decode`] if any record is malformed, and
    /// [`RosterError::CapacityExceeded`] if it holds too many players.  The
    /// current roster is kept on every error.
    pub fn load(&mut self) -> Result<(), RosterError> {
        let snapshot = match &self.persistence {
            Some(persistence) => persistence.read()?,
            None => None,
        };
        let players = decode_roster(snapshot.as_deref().unwrap_or_default())?;
        self.replace_all(players)
    }

    /// Replaces the whole roster with `players`.  Later duplicates of an id
    /// overwrite earlier ones in place.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::CapacityExceeded`] and keeps the current roster
    /// if more than [`MAX_ROSTER_SIZE`] distinct players are given.
    pub fn replace_all(&mut self, players: Vec<Player>) -> Result<(), RosterError> {
        let mut next: Vec<Player> = Vec::with_capacity(players.len());
        for player in players {
            upsert(&mut next, player);
        }
        if next.len() > MAX_ROSTER_SIZE {
            return Err(RosterError::CapacityExceeded);
        }

        self.players = next;
        info!(count = self.players.len(), "roster loaded");
        self.notify(RosterEvent::Load(self.players.clone()));
        self.commit();
        self.drain_pending();
        Ok(())
    }

    /// Replaces the roster with the built-in demo team.
    pub fn load_demo(&mut self) {
        if let Err(e) = self.replace_all(super::demo::demo_players()) {
            warn!("demo roster rejected: {e}");
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn apply(&mut self, mutation: Mutation) -> Result<(), RosterError> {
        match mutation {
            Mutation::Create(player) => return self.insert(player),
            Mutation::Update(player) => self.replace(player),
            Mutation::Delete(id) => self.remove(id),
        }
        Ok(())
    }

    /// The only mutation that checks capacity.
    fn insert(&mut self, player: Player) -> Result<(), RosterError> {
        if self.players.len() >= MAX_ROSTER_SIZE {
            return Err(RosterError::CapacityExceeded);
        }
        upsert(&mut self.players, player.clone());
        self.changed(RosterEvent::Create(player));
        Ok(())
    }

    fn replace(&mut self, player: Player) {
        upsert(&mut self.players, player.clone());
        self.changed(RosterEvent::Update(player));
    }

    fn remove(&mut self, id: PlayerId) {
        self.players.retain(|p| p.id != id);
        self.changed(RosterEvent::Delete(id));
    }

    fn changed(&mut self, event: RosterEvent) {
        debug!(kind = %event.kind(), count = self.players.len(), "roster changed");
        self.notify(event);
        self.commit();
    }

    fn notify(&mut self, event: RosterEvent) {
        let mut deferred = Vec::new();
        let mut ctx = ListenerContext {
            players: &self.players,
            deferred: &mut deferred,
        };
        for listener in &mut self.listeners {
            listener(&event, &mut ctx);
        }
        self.pending.extend(deferred);
    }

    fn drain_pending(&mut self) {
        let mut applied = 0;
        while let Some(mutation) = self.pending.pop_front() {
            if applied == MAX_DEFERRED_MUTATIONS {
                warn!(
                    dropped = self.pending.len() + 1,
                    "deferred mutation limit reached; dropping the rest"
                );
                self.pending.clear();
                break;
            }
            applied += 1;
            if let Err(e) = self.apply(mutation) {
                warn!("deferred mutation rejected: {e}");
            }
        }
    }

    fn commit(&mut self) {
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        let snapshot = encode_roster(&self.players);
        match persistence.write(&snapshot) {
            Ok(()) => debug!(bytes = snapshot.len(), "roster committed"),
            Err(e) => warn!("failed to commit roster: {e}"),
        }
    }
}

/// Inserts `player`, or overwrites the player with the same id in place.
fn upsert(players: &mut Vec<Player>, player: Player) {
    match players.iter_mut().find(|p| p.id == player.id) {
        Some(existing) => *existing = player,
        None => players.push(player),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
