// src/error.rs
//! Error kinds for every layer of the core.
//!
//! Each rejected operation is a no-op on board, engine and session state,
//! so every variant here is recoverable by the caller.

use std::io;

use crate::session::Identity;
use crate::types::{Color, Move, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("square ({row}, {column}) is off the board, rows and columns run 1..=8")]
    OutOfRange { row: u8, column: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("invalid square '{0}', expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),
    #[error("invalid move format: '{0}', use a form like 'e2e4' or 'a7a8q'")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no piece found at {0}")]
    NoPieceAtSource(Square),
    #[error("it is {expected}'s turn, but the piece on the source square is {found}")]
    WrongTurn { expected: Color, found: Color },
    #[error("illegal move '{0}'")]
    IllegalMove(Move),
    #[error("invalid promotion to {0:?}")]
    InvalidPromotion(PieceKind),
    #[error("the game has already concluded")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("both seats are taken")]
    SessionFull,
    #[error("{0} is already seated")]
    AlreadySeated(Identity),
    #[error("{0} is seated as a player and cannot observe")]
    AlreadyPlayer(Identity),
    #[error("observer limit of {0} reached")]
    ObserversFull(usize),
    #[error("{0} is not seated in this game")]
    NotSeated(Identity),
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("it is not {identity}'s turn, {turn} is to move")]
    WrongTurn { identity: Identity, turn: Color },
    #[error(transparent)]
    Move(#[from] MoveError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("no game with id '{0}'")]
    UnknownGame(String),
    #[error("a game with id '{0}' already exists")]
    DuplicateGame(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("a make-move command needs a move")]
    MissingMove,
    #[error("{0} is not part of this game")]
    NotInGame(Identity),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveLoadError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error with file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}
