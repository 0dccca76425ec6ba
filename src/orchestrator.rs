//! Drives a match between seated strategies.

use crate::agent::{Intent, Strategy};
use crate::error::MatchError;
use crate::games::maze::{ActionResult, CombatantId, CombatantSnapshot, MatchId, MatchStatus};
use crate::registry::MatchRegistry;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Progress notifications emitted while a match runs.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A strategy's action was resolved.
    ActionResolved {
        /// Name of the acting strategy.
        player: String,
        /// What it did.
        intent: Intent,
        /// How it resolved.
        result: ActionResult,
    },
    /// A strategy declined to act.
    Forfeited {
        /// Name of the strategy.
        player: String,
    },
    /// The match reached a terminal state.
    GameOver {
        /// Name of the winning combatant.
        winner: Option<String>,
    },
}

/// Outcome of an orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SimulationReport {
    match_id: MatchId,
    /// Actions submitted, blocked ones included.
    turns_played: u32,
    winner: Option<CombatantSnapshot>,
    final_status: MatchStatus,
}

/// Runs a match by asking the seated strategy of the current turn owner for
/// an action and submitting it through the registry.
pub struct Orchestrator {
    seats: HashMap<CombatantId, Box<dyn Strategy>>,
    observer: Option<Box<dyn FnMut(&GameEvent)>>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Creates an orchestrator with no seats.
    pub fn new() -> Self {
        Self {
            seats: HashMap::new(),
            observer: None,
        }
    }

    /// Lets `strategy` play for `combatant`.
    pub fn seat(mut self, combatant: CombatantId, strategy: Box<dyn Strategy>) -> Self {
        self.seats.insert(combatant, strategy);
        self
    }

    /// Registers a callback for progress events.
    pub fn with_observer(mut self, observer: impl FnMut(&GameEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&mut self, event: GameEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }

    /// Plays until the match leaves PLAYING, a strategy stops, or
    /// `max_turns` actions have been submitted.
    #[instrument(skip(self, registry))]
    pub fn run(
        &mut self,
        registry: &MatchRegistry,
        match_id: MatchId,
        max_turns: u32,
    ) -> Result<SimulationReport, MatchError> {
        info!(seats = self.seats.len(), "Starting game orchestration");
        let mut turns_played = 0;

        while turns_played < max_turns {
            let snapshot = registry.state(match_id)?;
            if *snapshot.status() != MatchStatus::Playing {
                break;
            }

            let owner = snapshot
                .turn_owner()
                .as_ref()
                .copied()
                .ok_or_else(|| MatchError::Internal("playing match without turn owner".into()))?;
            let strategy = self.seats.get_mut(&owner).ok_or_else(|| {
                MatchError::Internal(format!("no strategy seated for combatant {owner}"))
            })?;
            let player = strategy.name().to_string();

            let Some(intent) = strategy.choose(&snapshot, owner) else {
                warn!(%player, "Strategy stopped playing");
                self.emit(GameEvent::Forfeited { player });
                break;
            };

            let outcome =
                registry.submit_action(match_id, owner, intent.action, intent.direction)?;
            turns_played += 1;
            debug!(%player, %intent, result = %outcome.result(), "Turn complete");
            self.emit(GameEvent::ActionResolved {
                player,
                intent,
                result: *outcome.result(),
            });
        }

        let last = registry.state(match_id)?;
        let winner = last.winner().clone();
        if *last.status() == MatchStatus::Finished {
            self.emit(GameEvent::GameOver {
                winner: winner.as_ref().map(|w| w.name().clone()),
            });
        }

        info!(
            turns_played,
            status = %last.status(),
            winner = winner.as_ref().map(|w| w.name().as_str()),
            "Orchestration finished"
        );
        Ok(SimulationReport {
            match_id,
            turns_played,
            winner,
            final_status: *last.status(),
        })
    }
}
