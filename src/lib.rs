// src/lib.rs
//! Two-player chess with multiplayer sessions.
//!
//! `GameEngine` validates and applies moves on a mailbox `Board`; a `Session`
//! seats two players and any number of observers around one engine; a
//! `SessionDirectory` holds many sessions for concurrent callers, and
//! `command::dispatch` is the request/response entry point for a transport.

pub mod attack;
pub mod board;
pub mod command;
pub mod config;
pub mod directory;
pub mod error;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod session;
pub mod types;

pub use board::Board;
pub use command::{dispatch, Command, CommandKind, Response};
pub use config::ArenaConfig;
pub use directory::{SessionDirectory, SharedSession};
pub use error::{CommandError, DirectoryError, MoveError, NotationError, SaveLoadError, SessionError, SquareError};
pub use game::{GameEngine, GameStatus, MoveRecord, Outcome};
pub use session::{GameView, Identity, MoveResult, Seat, Session};
pub use types::{Color, Move, Piece, PieceKind, Square};
