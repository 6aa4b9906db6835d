// src/game.rs
//! The rules engine: one board, the side to move, and whether the game has
//! concluded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attack::is_square_attacked;
use crate::board::Board;
use crate::config::DEFAULT_PROMOTION;
use crate::error::MoveError;
use crate::movegen::pseudo_legal_moves;
use crate::types::{Color, Move, Piece, PieceKind, Square};

// --- Game Result Enums ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Resignation { winner: Color },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Concluded(Outcome),
}

// --- Event History ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// The move as executed; `promotion` is filled in whenever a pawn was promoted.
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub is_check: bool,
    pub is_checkmate: bool,
}

impl MoveRecord {
    pub fn player(&self) -> Color {
        self.piece.color
    }

    /// Coordinate notation with `+` or `#` appended.
    pub fn annotated(&self) -> String {
        let annotation = if self.is_checkmate { "#" } else if self.is_check { "+" } else { "" };
        format!("{}{}", self.mv, annotation)
    }
}

// --- Game State ---

#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    turn: Color,
    status: GameStatus,
    history: Vec<MoveRecord>,
    /// Pieces taken, indexed by the capturing color.
    captured: [Vec<Piece>; 2],
    default_promotion: PieceKind,
}

impl Default for GameEngine {
    fn default() -> Self { GameEngine::new() }
}

impl GameEngine {
    /// Creates a new game from the standard position, White to move.
    pub fn new() -> Self {
        GameEngine::from_board(Board::standard(), Color::White)
    }

    /// Starts from an arbitrary position. Nothing is validated: boards without
    /// kings, or with extra ones, are accepted. A position where `turn` is
    /// already mated or stalemated starts out concluded.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut game = GameEngine {
            board,
            turn,
            status: GameStatus::InProgress,
            history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
            default_promotion: DEFAULT_PROMOTION,
        };
        game.evaluate_side_to_move();
        game
    }

    /// Sets the piece a pawn becomes when a move reaches the last rank without a choice.
    pub fn with_default_promotion(mut self, kind: PieceKind) -> Self {
        if kind.is_promotion_target() {
            self.default_promotion = kind;
        }
        self
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn turn(&self) -> Color { self.turn }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn history(&self) -> &[MoveRecord] { &self.history }

    pub fn is_concluded(&self) -> bool {
        matches!(self.status, GameStatus::Concluded(_))
    }

    /// Pieces `color` has captured, in capture order.
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    // --- Legality ---

    /// Legal moves for the piece on `from`, whichever color it is.
    /// Returns `None` when the square is empty.
    pub fn legal_moves(&self, from: Square) -> Option<Vec<Move>> {
        let piece = self.board.get(from)?;
        let moves = pseudo_legal_moves(&self.board, from)
            .into_iter()
            .filter(|mv| leaves_king_safe(&self.board, mv, piece))
            .collect();
        Some(moves)
    }

    /// Every legal move available to `color`.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces_of(color)
            .flat_map(|(from, _)| self.legal_moves(from).unwrap_or_default())
            .collect()
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces_of(color)
            .any(|(from, _)| self.legal_moves(from).is_some_and(|moves| !moves.is_empty()))
    }

    // --- Check Detection ---

    /// Checks if the king of the specified color is currently attacked.
    ///
    /// # Panics
    ///
    /// If `color` has no king on the board. Move application never removes a
    /// king, so this means the engine was handed a broken position.
    pub fn in_check(&self, color: Color) -> bool {
        match self.board.king_square(color) {
            Some(king) => is_square_attacked(&self.board, king, color.opponent()),
            None => panic!("{} king not found on the board, cannot evaluate check", color),
        }
    }

    /// Like `in_check`, but `false` for a side with no king instead of panicking.
    pub fn king_in_danger(&self, color: Color) -> bool {
        king_attacked(&self.board, color).unwrap_or(false)
    }

    pub fn in_checkmate(&self, color: Color) -> bool {
        self.in_check(color) && !self.has_legal_move(color)
    }

    pub fn in_stalemate(&self, color: Color) -> bool {
        !self.in_check(color) && !self.has_legal_move(color)
    }

    // --- Move Application ---

    /// Validates and plays `mv` for the side to move. A rejected move leaves
    /// board, turn and history untouched.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.is_concluded() {
            return Err(MoveError::GameOver);
        }
        let piece = self.board.get(mv.from).ok_or(MoveError::NoPieceAtSource(mv.from))?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn { expected: self.turn, found: piece.color });
        }
        let promotes = piece.kind == PieceKind::Pawn && mv.to.row() == piece.color.last_row();
        if let Some(kind) = mv.promotion.filter(|_| promotes) {
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotion(kind));
            }
        }
        let is_legal = self
            .legal_moves(mv.from)
            .is_some_and(|moves| moves.iter().any(|legal| legal.same_path(&mv)));
        if !is_legal {
            return Err(MoveError::IllegalMove(mv));
        }

        // --- Commit ---
        let (placed, executed) = if promotes {
            let kind = mv.promotion.unwrap_or(self.default_promotion);
            (Piece::new(piece.color, kind), Move::with_promotion(mv.from, mv.to, kind))
        } else {
            (piece, Move::new(mv.from, mv.to))
        };

        self.board.take(mv.from);
        let captured = self.board.take(mv.to);
        self.board.place(mv.to, Some(placed));
        if let Some(taken) = captured {
            self.captured[piece.color.index()].push(taken);
        }
        self.turn = self.turn.opponent();

        let (is_check, stuck) = self.evaluate_side_to_move();
        let record = MoveRecord { mv: executed, piece, captured, is_check, is_checkmate: is_check && stuck };
        tracing::debug!(mv = %record.annotated(), player = %record.player(), "move applied");
        self.history.push(record);
        Ok(())
    }

    /// Checks whether the side to move is attacked and whether it has any
    /// reply, concluding the game when it has none. A side without a king
    /// never concludes.
    fn evaluate_side_to_move(&mut self) -> (bool, bool) {
        let defender = self.turn;
        let is_check = king_attacked(&self.board, defender).unwrap_or(false);
        let stuck = self.board.king_square(defender).is_some() && !self.has_legal_move(defender);
        if stuck {
            let outcome = if is_check {
                Outcome::Checkmate { winner: defender.opponent() }
            } else {
                Outcome::Stalemate
            };
            tracing::info!(?outcome, "game concluded");
            self.status = GameStatus::Concluded(outcome);
        }
        (is_check, stuck)
    }

    /// Ends the game with `color` conceding.
    pub fn resign(&mut self, color: Color) -> Result<Outcome, MoveError> {
        if self.is_concluded() {
            return Err(MoveError::GameOver);
        }
        let outcome = Outcome::Resignation { winner: color.opponent() };
        self.status = GameStatus::Concluded(outcome);
        tracing::info!(loser = %color, "resignation");
        Ok(outcome)
    }
}

/// Simulates `mv` on a copy of `board` and reports whether the mover's king
/// survives it. A side with no king on the board is never in danger.
fn leaves_king_safe(board: &Board, mv: &Move, piece: Piece) -> bool {
    let mut next = board.clone();
    next.take(mv.from);
    next.place(mv.to, Some(piece));

    let king = if piece.kind == PieceKind::King { Some(mv.to) } else { next.king_square(piece.color) };
    match king {
        Some(king) => !is_square_attacked(&next, king, piece.color.opponent()),
        None => true,
    }
}

/// `None` when `color` has no king on the board.
fn king_attacked(board: &Board, color: Color) -> Option<bool> {
    board
        .king_square(color)
        .map(|king| is_square_attacked(board, king, color.opponent()))
}

// Display trait for printing the board and game state
impl fmt::Display for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in [Color::White, Color::Black] {
            write!(f, "Captured by {}: ", color)?;
            let mut taken = self.captured_by(color).to_vec();
            taken.sort_by_key(|p| p.value());
            for piece in taken { write!(f, "{} ", piece)?; }
            writeln!(f)?;
        }
        writeln!(f, "---------------------")?;
        writeln!(f, "{}", self.board)?;

        match self.status {
            GameStatus::InProgress => writeln!(f, "Turn: {}", self.turn)?,
            GameStatus::Concluded(outcome) => writeln!(f, "Result: {:?}", outcome)?,
        }

        write!(f, "Moves:")?;
        for (i, pair) in self.history.chunks(2).enumerate() {
            write!(f, " {}.", i + 1)?;
            for record in pair { write!(f, " {}", record.annotated())?; }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, column: u8) -> Square {
        Square::new(row, column).unwrap()
    }

    fn piece(color: Color, kind: PieceKind) -> Option<Piece> {
        Some(Piece::new(color, kind))
    }

    fn play(game: &mut GameEngine, moves: &[&str]) {
        for text in moves {
            let mv: Move = text.parse().unwrap();
            game.apply_move(mv).unwrap_or_else(|e| panic!("{} rejected: {}", text, e));
        }
    }

    #[test]
    fn opening_pawn_move() {
        let mut game = GameEngine::new();
        game.apply_move(Move::new(sq(2, 5), sq(4, 5))).unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.board().get(sq(2, 5)), None);
        assert_eq!(game.board().get(sq(4, 5)), piece(Color::White, PieceKind::Pawn));
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn empty_square_has_no_legal_moves() {
        assert_eq!(GameEngine::new().legal_moves(sq(4, 4)), None);
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let mut game = GameEngine::new();
        let before = game.board().clone();

        assert_eq!(game.apply_move(Move::new(sq(4, 4), sq(5, 4))), Err(MoveError::NoPieceAtSource(sq(4, 4))));
        assert_eq!(
            game.apply_move(Move::new(sq(7, 5), sq(5, 5))),
            Err(MoveError::WrongTurn { expected: Color::White, found: Color::Black })
        );
        let bad = Move::new(sq(2, 5), sq(5, 5));
        assert_eq!(game.apply_move(bad), Err(MoveError::IllegalMove(bad)));

        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), Color::White);
        assert!(game.history().is_empty());
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut board = Board::empty();
        board.place(sq(7, 1), piece(Color::White, PieceKind::Pawn));
        let mut game = GameEngine::from_board(board, Color::White);
        game.apply_move(Move::new(sq(7, 1), sq(8, 1))).unwrap();
        assert_eq!(game.board().get(sq(8, 1)), piece(Color::White, PieceKind::Queen));
        assert_eq!(game.history()[0].mv.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn promotion_honours_choice_and_config() {
        let mut board = Board::empty();
        board.place(sq(2, 3), piece(Color::Black, PieceKind::Pawn));
        board.place(sq(7, 8), piece(Color::White, PieceKind::Pawn));
        let mut game = GameEngine::from_board(board, Color::White).with_default_promotion(PieceKind::Rook);

        game.apply_move(Move::new(sq(7, 8), sq(8, 8))).unwrap();
        assert_eq!(game.board().get(sq(8, 8)), piece(Color::White, PieceKind::Rook));

        game.apply_move(Move::with_promotion(sq(2, 3), sq(1, 3), PieceKind::Knight)).unwrap();
        assert_eq!(game.board().get(sq(1, 3)), piece(Color::Black, PieceKind::Knight));
    }

    #[test]
    fn king_promotion_is_rejected() {
        let mut board = Board::empty();
        board.place(sq(7, 1), piece(Color::White, PieceKind::Pawn));
        let mut game = GameEngine::from_board(board, Color::White);
        assert_eq!(
            game.apply_move(Move::with_promotion(sq(7, 1), sq(8, 1), PieceKind::King)),
            Err(MoveError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(game.board().get(sq(7, 1)), piece(Color::White, PieceKind::Pawn));
    }

    #[test]
    fn promotion_field_ignored_on_ordinary_moves() {
        let mut game = GameEngine::new();
        game.apply_move(Move::with_promotion(sq(2, 5), sq(4, 5), PieceKind::Queen)).unwrap();
        assert_eq!(game.board().get(sq(4, 5)), piece(Color::White, PieceKind::Pawn));
        assert_eq!(game.history()[0].mv.promotion, None);
    }

    #[test]
    fn non_promotion_kinds_ignored_on_ordinary_moves() {
        let mut game = GameEngine::new();
        game.apply_move(Move::with_promotion(sq(2, 5), sq(4, 5), PieceKind::King)).unwrap();
        assert_eq!(game.board().get(sq(4, 5)), piece(Color::White, PieceKind::Pawn));
        game.apply_move(Move::with_promotion(sq(7, 5), sq(5, 5), PieceKind::Pawn)).unwrap();
        assert_eq!(game.history()[1].mv, Move::new(sq(7, 5), sq(5, 5)));
    }

    #[test]
    fn pinned_rook_may_only_slide_along_the_pin() {
        let mut board = Board::empty();
        board.place(sq(1, 5), piece(Color::White, PieceKind::King));
        board.place(sq(2, 5), piece(Color::White, PieceKind::Rook));
        board.place(sq(8, 5), piece(Color::Black, PieceKind::Rook));
        let game = GameEngine::from_board(board, Color::White);

        let moves = game.legal_moves(sq(2, 5)).unwrap();
        assert_eq!(moves.len(), 6);
        assert!(moves.iter().all(|mv| mv.to.column() == 5));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let mut board = Board::empty();
        board.place(sq(1, 1), piece(Color::White, PieceKind::King));
        board.place(sq(8, 2), piece(Color::Black, PieceKind::Rook));
        let game = GameEngine::from_board(board, Color::White);
        let dests: Vec<Square> = game.legal_moves(sq(1, 1)).unwrap().into_iter().map(|mv| mv.to).collect();
        assert_eq!(dests, vec![sq(2, 1)]);
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let mut board = Board::empty();
        board.place(sq(1, 5), piece(Color::White, PieceKind::King));
        board.place(sq(2, 5), piece(Color::Black, PieceKind::Queen));
        board.place(sq(3, 5), piece(Color::Black, PieceKind::Rook));
        let game = GameEngine::from_board(board, Color::White);
        assert!(game.in_check(Color::White));
        assert!(!game.legal_moves(sq(1, 5)).unwrap().iter().any(|mv| mv.to == sq(2, 5)));
    }

    #[test]
    fn fools_mate_concludes_the_game() {
        let mut game = GameEngine::new();
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        assert!(game.in_check(Color::White));
        assert!(game.in_checkmate(Color::White));
        assert!(!game.in_stalemate(Color::White));
        assert_eq!(game.status(), GameStatus::Concluded(Outcome::Checkmate { winner: Color::Black }));
        assert_eq!(game.history().last().unwrap().annotated(), "d8h4#");

        let late = Move::new(sq(2, 1), sq(3, 1));
        assert_eq!(game.apply_move(late), Err(MoveError::GameOver));
    }

    #[test]
    fn stalemate_is_detected_after_the_move() {
        // Black king h8, White king f6; the queen stepping to g6 takes every flight square.
        let mut board = Board::empty();
        board.place(sq(8, 8), piece(Color::Black, PieceKind::King));
        board.place(sq(6, 6), piece(Color::White, PieceKind::King));
        board.place(sq(5, 7), piece(Color::White, PieceKind::Queen));
        let mut game = GameEngine::from_board(board, Color::White);

        game.apply_move(Move::new(sq(5, 7), sq(6, 7))).unwrap();
        assert!(game.in_stalemate(Color::Black));
        assert!(!game.in_checkmate(Color::Black));
        assert_eq!(game.status(), GameStatus::Concluded(Outcome::Stalemate));
    }

    #[test]
    fn mated_starting_position_is_concluded() {
        let mut board = Board::empty();
        board.place(sq(8, 7), piece(Color::Black, PieceKind::King));
        board.place(sq(7, 6), piece(Color::Black, PieceKind::Pawn));
        board.place(sq(7, 7), piece(Color::Black, PieceKind::Pawn));
        board.place(sq(7, 8), piece(Color::Black, PieceKind::Pawn));
        board.place(sq(8, 1), piece(Color::White, PieceKind::Rook));
        board.place(sq(1, 7), piece(Color::White, PieceKind::King));
        let mut game = GameEngine::from_board(board, Color::Black);

        assert_eq!(game.status(), GameStatus::Concluded(Outcome::Checkmate { winner: Color::White }));
        assert_eq!(game.apply_move(Move::new(sq(7, 8), sq(6, 8))), Err(MoveError::GameOver));
    }

    #[test]
    fn stalemated_starting_position_is_concluded() {
        let mut board = Board::empty();
        board.place(sq(8, 8), piece(Color::Black, PieceKind::King));
        board.place(sq(6, 6), piece(Color::White, PieceKind::King));
        board.place(sq(6, 7), piece(Color::White, PieceKind::Queen));
        let game = GameEngine::from_board(board, Color::Black);
        assert_eq!(game.status(), GameStatus::Concluded(Outcome::Stalemate));

        let kingless = GameEngine::from_board(Board::empty(), Color::White);
        assert_eq!(kingless.status(), GameStatus::InProgress);
    }

    #[test]
    fn king_in_danger_tolerates_missing_king() {
        let mut board = Board::empty();
        board.place(sq(1, 5), piece(Color::White, PieceKind::King));
        board.place(sq(8, 5), piece(Color::Black, PieceKind::Rook));
        let game = GameEngine::from_board(board, Color::White);
        assert!(game.king_in_danger(Color::White));
        assert!(!game.king_in_danger(Color::Black));
    }

    #[test]
    fn captures_are_recorded() {
        let mut game = GameEngine::new();
        play(&mut game, &["e2e4", "d7d5", "e4d5"]);
        assert_eq!(game.captured_by(Color::White), &[Piece::new(Color::Black, PieceKind::Pawn)]);
        assert!(game.captured_by(Color::Black).is_empty());
        assert_eq!(game.history()[2].captured, piece(Color::Black, PieceKind::Pawn));
    }

    #[test]
    fn resign_concludes_once() {
        let mut game = GameEngine::new();
        assert_eq!(game.resign(Color::White), Ok(Outcome::Resignation { winner: Color::Black }));
        assert_eq!(game.resign(Color::Black), Err(MoveError::GameOver));
    }

    #[test]
    #[should_panic(expected = "king not found")]
    fn in_check_without_king_panics() {
        let game = GameEngine::from_board(Board::empty(), Color::White);
        game.in_check(Color::White);
    }

    #[test]
    fn display_lists_moves() {
        let mut game = GameEngine::new();
        play(&mut game, &["e2e4", "e7e5", "g1f3"]);
        let text = game.to_string();
        assert!(text.contains("Moves: 1. e2e4 e7e5 2. g1f3"));
        assert!(text.contains("Turn: Black"));
    }
}
