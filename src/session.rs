// src/session.rs
//! The social wrapper around one engine: who sits at which color, who is
//! watching, and how the match ended.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::ArenaConfig;
use crate::error::{MoveError, SaveLoadError, SessionError};
use crate::game::{GameEngine, GameStatus, Outcome};
use crate::types::{Color, Move, Piece, Square};

/// An authenticated caller, as handed over by the surrounding layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self { Identity(id.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self { Identity::new(id) }
}

impl From<String> for Identity {
    fn from(id: String) -> Self { Identity(id) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub name: String,
    pub color: Color,
}

/// What became of a submitted move. Exactly one of success or rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Played { mv: Move, check: bool },
    Checkmate { mv: Move, winner: Identity },
    Stalemate { mv: Move },
    Rejected { reason: SessionError },
}

impl MoveResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, MoveResult::Rejected { .. })
    }

    pub fn rejection(&self) -> Option<&SessionError> {
        match self {
            MoveResult::Rejected { reason } => Some(reason),
            _ => None,
        }
    }

    /// Human-readable summary suitable for a notification.
    pub fn description(&self) -> String {
        match self {
            MoveResult::Played { mv, check: true } => format!("{} played, check", mv),
            MoveResult::Played { mv, check: false } => format!("{} played", mv),
            MoveResult::Checkmate { mv, winner } => format!("{} is checkmate, {} wins", mv, winner),
            MoveResult::Stalemate { mv } => format!("{} leads to stalemate, the game is drawn", mv),
            MoveResult::Rejected { reason } => format!("move rejected: {}", reason),
        }
    }
}

// --- Snapshot ---

/// Read-only projection of a session for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: String,
    pub names: BTreeMap<Identity, String>,
    pub colors: BTreeMap<Identity, Color>,
    pub observers: BTreeSet<Identity>,
    pub game_over: bool,
    pub winner: Option<Identity>,
    pub turn: Color,
    pub in_check: bool,
    pub last_move: Option<String>,
    /// Occupied squares only; absent keys are empty squares.
    pub board: BTreeMap<Square, Piece>,
}

impl GameView {
    pub fn to_json(&self) -> Result<String, SaveLoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the view as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveLoadError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|source| SaveLoadError::Io { path: path.display().to_string(), source })
    }
}

// --- Session ---

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    players: BTreeMap<Identity, Seat>,
    observers: BTreeSet<Identity>,
    game_over: bool,
    winner: Option<Identity>,
    engine: GameEngine,
    max_observers: usize,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Session::with_config(id, &ArenaConfig::default())
    }

    pub fn with_config(id: impl Into<String>, config: &ArenaConfig) -> Self {
        Session::with_engine(id, config, GameEngine::new())
    }

    /// Wraps an engine set up elsewhere, e.g. from a custom position.
    pub fn with_engine(id: impl Into<String>, config: &ArenaConfig, engine: GameEngine) -> Self {
        Session {
            id: id.into(),
            players: BTreeMap::new(),
            observers: BTreeSet::new(),
            game_over: engine.is_concluded(),
            winner: None,
            engine: engine.with_default_promotion(config.default_promotion),
            max_observers: config.max_observers,
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn engine(&self) -> &GameEngine { &self.engine }
    pub fn is_game_over(&self) -> bool { self.game_over }
    pub fn winner(&self) -> Option<&Identity> { self.winner.as_ref() }
    pub fn seat_of(&self, identity: &Identity) -> Option<&Seat> { self.players.get(identity) }
    pub fn players(&self) -> impl Iterator<Item = (&Identity, &Seat)> { self.players.iter() }
    pub fn observers(&self) -> impl Iterator<Item = &Identity> { self.observers.iter() }

    pub fn is_observer(&self, identity: &Identity) -> bool {
        self.observers.contains(identity)
    }

    /// The seated player's display name, else the raw identity.
    pub fn display_name(&self, identity: &Identity) -> String {
        self.players
            .get(identity)
            .map_or_else(|| identity.to_string(), |seat| seat.name.clone())
    }

    fn player_with(&self, color: Color) -> Option<&Identity> {
        self.players
            .iter()
            .find(|(_, seat)| seat.color == color)
            .map(|(identity, _)| identity)
    }

    // --- Seating ---

    /// Seats `identity` as White if White is free, otherwise Black.
    /// An observer taking a seat stops observing.
    pub fn seat_player(&mut self, identity: &Identity, name: &str) -> Result<Color, SessionError> {
        if self.players.contains_key(identity) {
            return Err(SessionError::AlreadySeated(identity.clone()));
        }
        if self.players.len() >= 2 {
            return Err(SessionError::SessionFull);
        }
        let color = if self.player_with(Color::White).is_none() { Color::White } else { Color::Black };

        self.observers.remove(identity);
        self.players.insert(identity.clone(), Seat { name: name.to_string(), color });
        // A position that started out mated credits whoever takes the winning seat.
        if self.winner.is_none() && self.engine.status() == GameStatus::Concluded(Outcome::Checkmate { winner: color }) {
            self.winner = Some(identity.clone());
        }
        tracing::info!(game = %self.id, player = %identity, %color, "player seated");
        Ok(color)
    }

    pub fn add_player(&mut self, identity: &Identity, name: &str) -> bool {
        self.seat_player(identity, name).is_ok()
    }

    /// Adds a spectator. Seated players cannot also observe.
    pub fn watch(&mut self, identity: &Identity) -> Result<(), SessionError> {
        if self.players.contains_key(identity) {
            return Err(SessionError::AlreadyPlayer(identity.clone()));
        }
        if !self.is_observer(identity) && self.observers.len() >= self.max_observers {
            return Err(SessionError::ObserversFull(self.max_observers));
        }
        if self.observers.insert(identity.clone()) {
            tracing::debug!(game = %self.id, observer = %identity, "observer joined");
        }
        Ok(())
    }

    pub fn add_observer(&mut self, identity: &Identity) -> bool {
        self.watch(identity).is_ok()
    }

    /// Frees the seat. The game itself carries on; nobody is declared the winner.
    pub fn remove_player(&mut self, identity: &Identity) -> bool {
        let removed = self.players.remove(identity).is_some();
        if removed {
            tracing::info!(game = %self.id, player = %identity, "player left");
        }
        removed
    }

    pub fn remove_observer(&mut self, identity: &Identity) -> bool {
        self.observers.remove(identity)
    }

    // --- Resignation ---

    /// Ends the game in favour of the other seated player. Returns the winner,
    /// which is `None` when nobody occupies the opposing seat.
    pub fn concede(&mut self, identity: &Identity) -> Result<Option<Identity>, SessionError> {
        if self.game_over {
            return Err(SessionError::GameAlreadyOver);
        }
        let color = self
            .players
            .get(identity)
            .map(|seat| seat.color)
            .ok_or_else(|| SessionError::NotSeated(identity.clone()))?;

        self.engine.resign(color).map_err(|e| match e {
            MoveError::GameOver => SessionError::GameAlreadyOver,
            other => SessionError::Move(other),
        })?;
        self.game_over = true;
        self.winner = self.player_with(color.opponent()).cloned();
        tracing::info!(game = %self.id, player = %identity, winner = ?self.winner, "player resigned");
        Ok(self.winner.clone())
    }

    pub fn resign(&mut self, identity: &Identity) -> bool {
        self.concede(identity).is_ok()
    }

    // --- Moves ---

    pub fn submit_move(&mut self, identity: &Identity, mv: Move) -> MoveResult {
        match self.try_move(identity, mv) {
            Ok(result) => result,
            Err(reason) => {
                tracing::debug!(game = %self.id, player = %identity, %mv, %reason, "move rejected");
                MoveResult::Rejected { reason }
            }
        }
    }

    fn try_move(&mut self, identity: &Identity, mv: Move) -> Result<MoveResult, SessionError> {
        if self.game_over {
            return Err(SessionError::GameAlreadyOver);
        }
        let color = self
            .players
            .get(identity)
            .map(|seat| seat.color)
            .ok_or_else(|| SessionError::NotSeated(identity.clone()))?;
        let turn = self.engine.turn();
        if color != turn {
            return Err(SessionError::WrongTurn { identity: identity.clone(), turn });
        }

        self.engine.apply_move(mv)?;

        let (executed, check) = self
            .engine
            .history()
            .last()
            .map_or((mv, false), |record| (record.mv, record.is_check));
        let result = match self.engine.status() {
            GameStatus::Concluded(Outcome::Checkmate { .. }) => {
                self.game_over = true;
                self.winner = Some(identity.clone());
                MoveResult::Checkmate { mv: executed, winner: identity.clone() }
            }
            GameStatus::Concluded(Outcome::Stalemate) => {
                self.game_over = true;
                self.winner = None;
                MoveResult::Stalemate { mv: executed }
            }
            _ => MoveResult::Played { mv: executed, check },
        };
        if self.game_over {
            tracing::info!(game = %self.id, winner = ?self.winner, "game over");
        }
        Ok(result)
    }

    // --- Snapshot ---

    pub fn snapshot(&self) -> GameView {
        let history = self.engine.history();
        GameView {
            game_id: self.id.clone(),
            names: self.players.iter().map(|(id, seat)| (id.clone(), seat.name.clone())).collect(),
            colors: self.players.iter().map(|(id, seat)| (id.clone(), seat.color)).collect(),
            observers: self.observers.clone(),
            game_over: self.game_over,
            winner: self.winner.clone(),
            turn: self.engine.turn(),
            in_check: self.engine.king_in_danger(self.engine.turn()),
            last_move: history.last().map(|record| record.annotated()),
            board: self.engine.board().pieces().collect(),
        }
    }
}
