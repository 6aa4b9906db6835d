// src/command.rs
//! Transport-neutral request/response boundary. A front end deserializes a
//! `Command`, hands it to `dispatch`, and serializes the `Response` back.

use serde::{Deserialize, Serialize};

use crate::directory::SessionDirectory;
use crate::error::CommandError;
use crate::session::{GameView, Identity, MoveResult};
use crate::types::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub identity: Identity,
    pub game_id: String,
    /// Display name used when Connect seats the caller; defaults to the identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub mv: Option<Move>,
}

impl Command {
    pub fn new(kind: CommandKind, identity: impl Into<Identity>, game_id: impl Into<String>) -> Self {
        Command { kind, identity: identity.into(), game_id: game_id.into(), name: None, mv: None }
    }

    pub fn with_move(mut self, mv: Move) -> Self {
        self.mv = Some(mv);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum Response {
    State(GameView),
    Notice(String),
    Error(String),
}

/// Executes one command against the directory. Failures come back as
/// `Response::Error` and leave every session unchanged.
pub fn dispatch(directory: &SessionDirectory, command: Command) -> Response {
    tracing::debug!(kind = ?command.kind, game = %command.game_id, identity = %command.identity, "dispatching");
    handle(directory, command).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "command failed");
        Response::Error(e.to_string())
    })
}

fn handle(directory: &SessionDirectory, command: Command) -> Result<Response, CommandError> {
    let Command { kind, identity, game_id, name, mv } = command;

    match kind {
        CommandKind::Connect => {
            let shared = directory.get_or_create(&game_id);
            let mut session = shared.write();
            if session.seat_of(&identity).is_none() {
                let name = name.unwrap_or_else(|| identity.to_string());
                if !session.add_player(&identity, &name) {
                    session.watch(&identity)?;
                }
            }
            Ok(Response::State(session.snapshot()))
        }
        CommandKind::MakeMove => {
            let mv = mv.ok_or(CommandError::MissingMove)?;
            directory.mutate(&game_id, |session| match session.submit_move(&identity, mv) {
                MoveResult::Rejected { reason } => Err(CommandError::from(reason)),
                _ => Ok(Response::State(session.snapshot())),
            })?
        }
        CommandKind::Leave => directory.mutate(&game_id, |session| {
            let name = session.display_name(&identity);
            let was_player = session.remove_player(&identity);
            let was_observer = session.remove_observer(&identity);
            if was_player || was_observer {
                Ok(Response::Notice(format!("{} left", name)))
            } else {
                Err(CommandError::NotInGame(identity.clone()))
            }
        })?,
        CommandKind::Resign => directory.mutate(&game_id, |session| {
            session.concede(&identity)?;
            Ok::<_, CommandError>(Response::Notice(format!("{} resigned", session.display_name(&identity))))
        })?,
    }
}
