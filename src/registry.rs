//! Process-wide store of active matches.
//!
//! Each match lives behind its own mutex, so actions on one match are
//! applied one at a time while other matches proceed independently. The
//! outer map lock is only held to look up, insert, or remove an entry.

use crate::error::MatchError;
use crate::games::maze::{
    Action, ActionOutcome, ActionRecord, CombatantId, CombatantKind, CombatantProfile, Direction,
    Match, MatchId, MatchSettings, MatchSnapshot, MatchStatus, MatchSummary,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

type SharedMatch = Arc<Mutex<Match>>;

/// Keyed store of matches shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    matches: Arc<Mutex<HashMap<MatchId, SharedMatch>>>,
}

fn poisoned(what: &str) -> MatchError {
    MatchError::Internal(format!("{what} lock poisoned"))
}

impl MatchRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating match registry");
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, HashMap<MatchId, SharedMatch>>, MatchError> {
        self.matches.lock().map_err(|_| poisoned("registry"))
    }

    fn entry(&self, id: MatchId) -> Result<SharedMatch, MatchError> {
        self.table()?.get(&id).cloned().ok_or_else(|| {
            debug!(match_id = %id, "Match not found");
            MatchError::MatchNotFound(id)
        })
    }

    /// Runs `f` with exclusive access to one match.
    fn with_match<T>(
        &self,
        id: MatchId,
        f: impl FnOnce(&mut Match) -> Result<T, MatchError>,
    ) -> Result<T, MatchError> {
        let shared = self.entry(id)?;
        let mut game = shared.lock().map_err(|_| poisoned("match"))?;
        f(&mut game)
    }

    /// Creates and stores a new match.
    #[instrument(skip(self))]
    pub fn create_match(
        &self,
        settings: &MatchSettings,
    ) -> Result<(MatchId, MatchSnapshot), MatchError> {
        let game = Match::new(settings)?;
        let id = game.id();
        let snapshot = game.snapshot();
        self.table()?.insert(id, Arc::new(Mutex::new(game)));
        info!(match_id = %id, "Match registered");
        Ok((id, snapshot))
    }

    /// Stores an already-built match, e.g. one with a prepared maze.
    #[instrument(skip(self, game), fields(match_id = %game.id()))]
    pub fn insert(&self, game: Match) -> Result<MatchId, MatchError> {
        let id = game.id();
        self.table()?.insert(id, Arc::new(Mutex::new(game)));
        info!("Match registered");
        Ok(id)
    }

    /// Adds a combatant with bare metadata for its kind.
    pub fn add_combatant(
        &self,
        id: MatchId,
        name: &str,
        kind: CombatantKind,
    ) -> Result<(CombatantId, MatchStatus), MatchError> {
        self.add_combatant_with_profile(id, name, CombatantProfile::bare(kind))
    }

    /// Adds a combatant on the next free start cell.
    #[instrument(skip(self, profile), fields(kind = %profile.kind()))]
    pub fn add_combatant_with_profile(
        &self,
        id: MatchId,
        name: &str,
        profile: CombatantProfile,
    ) -> Result<(CombatantId, MatchStatus), MatchError> {
        self.with_match(id, |game| {
            let combatant_id = game.enlist(name, profile)?;
            Ok((combatant_id, game.status()))
        })
    }

    /// Records the external worker driving an AI combatant.
    pub fn assign_worker(
        &self,
        id: MatchId,
        combatant_id: CombatantId,
        worker_id: &str,
    ) -> Result<(), MatchError> {
        self.with_match(id, |game| game.assign_worker(combatant_id, worker_id))
    }

    /// Submits one action and returns its result with the new state.
    #[instrument(skip(self))]
    pub fn submit_action(
        &self,
        id: MatchId,
        combatant_id: CombatantId,
        action: Action,
        direction: Direction,
    ) -> Result<ActionOutcome, MatchError> {
        self.with_match(id, |game| {
            let result = game.process_action(combatant_id, action, direction)?;
            Ok(ActionOutcome::new(result, game.snapshot()))
        })
        .inspect_err(|err| warn!(error = %err, category = %err.category(), "Action rejected"))
    }

    /// Parses string inputs and submits the action.
    ///
    /// Inputs are parsed before the match is looked up, so malformed input
    /// is reported even for unknown matches.
    pub fn submit_raw(
        &self,
        id: MatchId,
        combatant_id: &str,
        action: &str,
        direction: &str,
    ) -> Result<ActionOutcome, MatchError> {
        let action = Action::parse(action)?;
        let direction = Direction::parse(direction)?;
        let combatant_id = CombatantId::parse(combatant_id)?;
        self.submit_action(id, combatant_id, action, direction)
    }

    /// Full snapshot of one match.
    #[instrument(skip(self))]
    pub fn state(&self, id: MatchId) -> Result<MatchSnapshot, MatchError> {
        self.with_match(id, |game| Ok(game.snapshot()))
    }

    /// Resolved actions of one match, oldest first.
    pub fn history(&self, id: MatchId) -> Result<Vec<ActionRecord>, MatchError> {
        self.with_match(id, |game| Ok(game.history().to_vec()))
    }

    /// Summaries of every stored match, oldest first.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<MatchSummary>, MatchError> {
        let entries: Vec<SharedMatch> = self.table()?.values().cloned().collect();
        let mut summaries = entries
            .iter()
            .map(|shared| {
                shared
                    .lock()
                    .map(|game| game.summary())
                    .map_err(|_| poisoned("match"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        summaries.sort_by_key(|summary| *summary.created_at());
        info!(count = summaries.len(), "Listed matches");
        Ok(summaries)
    }

    /// Destroys a match.
    #[instrument(skip(self))]
    pub fn remove(&self, id: MatchId) -> Result<(), MatchError> {
        self.table()?
            .remove(&id)
            .map(|_| info!(match_id = %id, "Match removed"))
            .ok_or(MatchError::MatchNotFound(id))
    }

    /// Number of stored matches.
    pub fn len(&self) -> Result<usize, MatchError> {
        Ok(self.table()?.len())
    }

    /// Whether the registry holds no matches.
    pub fn is_empty(&self) -> Result<bool, MatchError> {
        Ok(self.table()?.is_empty())
    }
}
