//! Match rules: the turn state machine and action resolution.
//!
//! A match waits for two combatants, starts the instant the second one
//! joins, and then accepts one action per turn from the combatant whose turn
//! it is. Turn ownership is `combatants[(turn - 1) % 2]`. Blocked moves do
//! not consume the turn; every other result does.

use super::action::ActionRecord;
use super::combatant::{Combatant, CombatantProfile};
use super::maze::Maze;
use super::settings::MatchSettings;
use super::snapshot::{MatchSnapshot, MatchSummary};
use super::types::{
    Action, ActionResult, AttackReach, CellState, CombatantId, Direction, MatchId, MatchMode,
    MatchStatus, Position,
};
use crate::error::MatchError;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, instrument, warn};

/// Number of combatants a match holds once it starts.
pub const MAX_COMBATANTS: usize = 2;

/// One contest between two combatants in a maze.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    mode: MatchMode,
    attack_reach: AttackReach,
    maze: Maze,
    combatants: Vec<Combatant>,
    status: MatchStatus,
    turn: u32,
    winner: Option<usize>,
    fault: Option<String>,
    history: Vec<ActionRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Match {
    /// Creates a match and generates its maze from the settings.
    #[instrument(
        skip(settings),
        fields(mode = %settings.mode(), width = settings.width(), height = settings.height())
    )]
    pub fn new(settings: &MatchSettings) -> Result<Self, MatchError> {
        settings.validate()?;

        let mut rng = match settings.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let maze = Maze::generate(
            settings.width(),
            settings.height(),
            settings.wall_probability(),
            settings.layout(),
            &mut rng,
        );

        let created =
            Self::with_maze(settings.mode(), maze).with_attack_reach(settings.attack_reach());
        info!(match_id = %created.id, "Match created");
        Ok(created)
    }

    /// Creates a match around a prepared maze.
    pub fn with_maze(mode: MatchMode, maze: Maze) -> Self {
        let now = Utc::now();
        Self {
            id: MatchId::new(),
            mode,
            attack_reach: AttackReach::default(),
            maze,
            combatants: Vec::with_capacity(MAX_COMBATANTS),
            status: MatchStatus::Waiting,
            turn: 0,
            winner: None,
            fault: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the attack travel rule.
    pub fn with_attack_reach(mut self, attack_reach: AttackReach) -> Self {
        self.attack_reach = attack_reach;
        self
    }

    /// Match id.
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Who plays.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Lifecycle state.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Current turn number. Zero until the match starts.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Attack travel rule in force.
    pub fn attack_reach(&self) -> AttackReach {
        self.attack_reach
    }

    /// The maze.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Combatants in join order.
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Looks up a combatant by id.
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    /// Index of the winner in join order.
    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    /// The winning combatant.
    pub fn winner(&self) -> Option<&Combatant> {
        self.winner.and_then(|index| self.combatants.get(index))
    }

    /// Fault recorded when the match entered the error state.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Every resolved action, oldest first.
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Adds a combatant at its own position.
    ///
    /// The second combatant starts the match on turn 1. The combatant's cell
    /// must be inside the maze and empty; it becomes occupied.
    #[instrument(
        skip(self, combatant),
        fields(match_id = %self.id, combatant_id = %combatant.id())
    )]
    pub fn add_combatant(&mut self, combatant: Combatant) -> Result<(), MatchError> {
        if self.combatants.len() >= MAX_COMBATANTS {
            warn!("Match already has two combatants");
            return Err(MatchError::CapacityExceeded(MAX_COMBATANTS));
        }

        let position = combatant.position();
        let cell = self.maze.cell_at(position)?;
        if cell != CellState::Empty {
            warn!(%position, %cell, "Spawn cell unavailable");
            return Err(MatchError::SpawnUnavailable { position, cell });
        }

        self.maze.set_cell(position, CellState::Occupied)?;
        info!(
            name = combatant.name(),
            kind = %combatant.kind(),
            %position,
            "Combatant joined"
        );
        self.combatants.push(combatant);

        if self.combatants.len() == MAX_COMBATANTS {
            self.status = MatchStatus::Playing;
            self.turn = 1;
            info!("Match started");
        }

        self.touch();
        Ok(())
    }

    /// Creates a combatant on the next free start cell and adds it.
    ///
    /// The first start cell is the top-left interior corner, the second the
    /// bottom-right one.
    pub fn enlist(
        &mut self,
        name: impl AsRef<str>,
        profile: CombatantProfile,
    ) -> Result<CombatantId, MatchError> {
        if self.combatants.len() >= MAX_COMBATANTS {
            return Err(MatchError::CapacityExceeded(MAX_COMBATANTS));
        }

        let (first, second) = self.maze.start_cells();
        let spawn = [first, second]
            .into_iter()
            .find(|&cell| self.maze.is_passable(cell))
            .unwrap_or(second);

        let combatant = Combatant::new(name, profile, spawn);
        let id = combatant.id();
        self.add_combatant(combatant)?;
        Ok(id)
    }

    /// Records the external worker driving an AI combatant.
    #[instrument(skip(self, worker_id), fields(match_id = %self.id))]
    pub fn assign_worker(
        &mut self,
        combatant_id: CombatantId,
        worker_id: impl Into<String>,
    ) -> Result<(), MatchError> {
        let combatant = self
            .combatants
            .iter_mut()
            .find(|c| c.id() == combatant_id)
            .ok_or(MatchError::UnknownCombatant(combatant_id))?;

        if !combatant.attach_worker(worker_id.into()) {
            return Err(MatchError::InvalidCombatantKind(combatant.kind().to_string()));
        }
        self.touch();
        Ok(())
    }

    /// Id of the combatant allowed to act. Requires both combatants.
    pub fn current_turn_owner(&self) -> Result<CombatantId, MatchError> {
        if self.combatants.len() != MAX_COMBATANTS {
            return Err(MatchError::TurnOwnerUndefined(self.combatants.len()));
        }
        let index = (self.turn.saturating_sub(1) as usize) % MAX_COMBATANTS;
        Ok(self.combatants[index].id())
    }

    /// Validates and resolves one action.
    ///
    /// Rejections leave the match untouched. A fault during resolution moves
    /// the match to [`MatchStatus::Error`] and is returned as
    /// [`MatchError::Internal`].
    #[instrument(skip(self), fields(match_id = %self.id, turn = self.turn))]
    pub fn process_action(
        &mut self,
        combatant_id: CombatantId,
        action: Action,
        direction: Direction,
    ) -> Result<ActionResult, MatchError> {
        match self.status {
            MatchStatus::Playing => {}
            MatchStatus::Finished => {
                warn!("Action submitted after match finished");
                return Err(MatchError::MatchFinished);
            }
            status => {
                warn!(%status, "Action submitted while not playing");
                return Err(MatchError::NotPlaying(status));
            }
        }

        let expected = self.current_turn_owner()?;
        if combatant_id != expected {
            warn!(%expected, "Combatant acted out of turn");
            return Err(MatchError::NotYourTurn {
                combatant: combatant_id,
                expected,
            });
        }

        let actor = self
            .combatants
            .iter()
            .position(|c| c.id() == combatant_id)
            .ok_or(MatchError::UnknownCombatant(combatant_id))?;

        let resolved = match action {
            Action::Move => self.resolve_move(actor, direction),
            Action::Attack => self.resolve_attack(actor, direction),
        };

        let result = match resolved {
            Ok(result) => result,
            Err(fault) => {
                error!(error = %fault, "Action resolution failed");
                self.status = MatchStatus::Error;
                self.fault = Some(fault.to_string());
                self.touch();
                return Err(MatchError::Internal(format!(
                    "action resolution failed: {fault}"
                )));
            }
        };

        let turn = self.turn;
        if result.consumes_turn() {
            self.turn += 1;
        }
        self.history.push(ActionRecord::new(
            turn,
            combatant_id,
            self.combatants[actor].kind(),
            action,
            direction,
            result,
            Utc::now(),
        ));
        self.touch();

        info!(%action, %direction, %result, next_turn = self.turn, "Action resolved");
        Ok(result)
    }

    fn resolve_move(
        &mut self,
        actor: usize,
        direction: Direction,
    ) -> Result<ActionResult, MatchError> {
        let from = self.combatants[actor].position();
        self.maze.cell_at(from)?;

        let to = self.maze.neighbor_in_direction(from, direction);
        if !self.maze.is_passable(to) {
            debug!(%from, %to, "Move blocked");
            return Ok(ActionResult::Blocked);
        }

        self.maze.set_cell(to, CellState::Occupied)?;
        self.maze.set_cell(from, CellState::Empty)?;
        self.combatants[actor].relocate(to);
        debug!(%from, %to, "Combatant moved");
        Ok(ActionResult::Success)
    }

    fn resolve_attack(
        &mut self,
        actor: usize,
        direction: Direction,
    ) -> Result<ActionResult, MatchError> {
        let origin = self.combatants[actor].position();
        let Some(target) = self.attack_target(origin, direction) else {
            debug!(%origin, "Attack left the maze");
            return Ok(ActionResult::Miss);
        };

        match self.maze.cell_at(target)? {
            CellState::Wall => {
                self.maze.set_cell(target, CellState::Empty)?;
                debug!(%target, "Wall destroyed");
                Ok(ActionResult::Success)
            }
            CellState::Occupied => {
                let victim = self
                    .combatants
                    .iter()
                    .position(|c| c.position() == target);
                match victim {
                    Some(victim) if victim != actor => {
                        self.status = MatchStatus::Finished;
                        self.winner = Some(actor);
                        info!(
                            winner = %self.combatants[actor].id(),
                            loser = %self.combatants[victim].id(),
                            "Combatant hit, match finished"
                        );
                        Ok(ActionResult::Hit)
                    }
                    _ => {
                        warn!(%target, "Occupied cell without a combatant");
                        Ok(ActionResult::Miss)
                    }
                }
            }
            CellState::Empty => Ok(ActionResult::Miss),
        }
    }

    /// Cell an attack from `origin` lands on, or `None` if it leaves the grid.
    fn attack_target(&self, origin: Position, direction: Direction) -> Option<Position> {
        let mut target = self.maze.neighbor_in_direction(origin, direction);
        if self.attack_reach == AttackReach::Line {
            while self.maze.is_passable(target) {
                target = self.maze.neighbor_in_direction(target, direction);
            }
        }
        self.maze.contains(target).then_some(target)
    }

    /// Read-only copy of the full match state.
    pub fn snapshot(&self) -> MatchSnapshot {
        let turn_owner = match self.status {
            MatchStatus::Playing => self.current_turn_owner().ok(),
            _ => None,
        };
        MatchSnapshot {
            id: self.id,
            mode: self.mode,
            status: self.status,
            turn: self.turn,
            turn_owner,
            maze: self.maze.snapshot(),
            combatants: self.combatants.iter().map(Combatant::snapshot).collect(),
            winner: self.winner().map(Combatant::snapshot),
            winner_index: self.winner,
            fault: self.fault.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Listing entry for this match.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary::new(
            self.id,
            self.mode,
            self.status,
            self.turn,
            self.combatants.iter().map(Combatant::snapshot).collect(),
            self.created_at,
            self.updated_at,
        )
    }
}
