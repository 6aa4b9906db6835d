// src/main.rs
//! Hot-seat terminal game: both players share one keyboard and one session.

use std::env;
use std::error::Error;
use std::io::{self, Write};

use chess_session::config::DEFAULT_VIEW_FILENAME;
use chess_session::{
    ArenaConfig, Color, Identity, Move, MoveResult, NotationError, SessionDirectory, SessionError, Square,
};
use tracing_subscriber::EnvFilter;

const GAME_ID: &str = "local";

// --- User Input ---

#[derive(Debug, PartialEq)]
enum Command {
    Resign,
    Board,
    Moves(Square),
    Save(String),
    Help,
    Quit,
}

#[derive(Debug, PartialEq)]
enum UserInput {
    Move(Move),
    Command(Command),
}

fn parse_user_input(input: &str) -> Result<UserInput, NotationError> {
    let mut words = input.split_whitespace();
    let head = words.next().unwrap_or_default().to_lowercase();
    let command = match head.as_str() {
        "resign" => Command::Resign,
        "board" => Command::Board,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "save" => Command::Save(words.next().unwrap_or(DEFAULT_VIEW_FILENAME).to_string()),
        "moves" => {
            let square = words.next().ok_or_else(|| NotationError::InvalidSquare(String::new()))?;
            Command::Moves(square.parse()?)
        }
        _ => return Ok(UserInput::Move(input.parse()?)),
    };
    Ok(UserInput::Command(command))
}

// --- Driver ---

struct HotSeat {
    directory: SessionDirectory,
    white: Identity,
    black: Identity,
}

impl HotSeat {
    fn new(config: ArenaConfig) -> Result<Self, Box<dyn Error>> {
        let directory = SessionDirectory::with_config(config);
        directory.create(GAME_ID)?;
        let white = Identity::new("white");
        let black = Identity::new("black");
        directory.mutate(GAME_ID, |session| -> Result<(), SessionError> {
            session.seat_player(&white, "White")?;
            session.seat_player(&black, "Black")?;
            Ok(())
        })??;
        Ok(HotSeat { directory, white, black })
    }

    fn player(&self, color: Color) -> &Identity {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn save(&self, filename: &str) {
        let view = match self.directory.read(GAME_ID, |session| session.snapshot()) {
            Ok(view) => view,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };
        match view.save(filename) {
            Ok(()) => println!("Game saved to '{}'.", filename),
            Err(e) => eprintln!("Error saving game: {}", e),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => ArenaConfig::load(&path)?,
        None => ArenaConfig::default(),
    };
    let game = HotSeat::new(config)?;

    println!("==============================");
    println!("|     Rust Chess Session     |");
    println!("==============================");
    print_help();

    'game_loop: loop {
        let (game_over, rendered, turn) = game.directory.read(GAME_ID, |session| {
            (session.is_game_over(), session.engine().to_string(), session.engine().turn())
        })?;

        println!("------------------------------------------");
        println!("{}", rendered);
        if game_over {
            let winner = game.directory.read(GAME_ID, |session| session.winner().cloned())?;
            match winner {
                Some(winner) => println!("\n=== GAME OVER: {} wins. ===", winner),
                None => println!("\n=== GAME OVER: no winner. ==="),
            }
            break 'game_loop;
        }

        print!("\n{}'s turn. Enter move (e.g. e2e4, a7a8q) or command: ", turn);
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting game.");
                break 'game_loop;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}. Try again or use 'quit'.", e);
                continue 'game_loop;
            }
        }

        let input = input_line.trim();
        if input.is_empty() {
            continue 'game_loop;
        }

        let mover = game.player(turn);
        match parse_user_input(input) {
            Ok(UserInput::Move(mv)) => {
                match game.directory.mutate(GAME_ID, |session| session.submit_move(mover, mv))? {
                    MoveResult::Rejected { reason } => println!("Error making move: {}", reason),
                    MoveResult::Played { check: true, .. } => println!("Check!"),
                    _ => {}
                }
            }
            Ok(UserInput::Command(command)) => match command {
                Command::Resign => {
                    if let Err(e) = game.directory.mutate(GAME_ID, |session| session.concede(mover))? {
                        println!("Error: {}", e);
                    }
                }
                Command::Board => {
                    let board = game.directory.read(GAME_ID, |session| session.engine().board().to_string())?;
                    println!("{}", board);
                }
                Command::Moves(square) => {
                    let moves = game.directory.read(GAME_ID, |session| session.engine().legal_moves(square))?;
                    match moves {
                        None => println!("No piece on {}.", square),
                        Some(moves) if moves.is_empty() => println!("The piece on {} cannot move.", square),
                        Some(moves) => {
                            let listed: Vec<String> = moves.iter().map(Move::to_string).collect();
                            println!("Legal moves from {}: {}", square, listed.join(" "));
                        }
                    }
                }
                Command::Save(filename) => game.save(&filename),
                Command::Help => print_help(),
                Command::Quit => {
                    println!("Exiting game.");
                    break 'game_loop;
                }
            },
            Err(e) => println!("Input Error: {}", e),
        }
    }

    println!("Saving final position to '{}'...", DEFAULT_VIEW_FILENAME);
    game.save(DEFAULT_VIEW_FILENAME);
    println!("\nGame session finished.");
    Ok(())
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  <move>         Enter a move in coordinate notation (e.g., e2e4, a7a8q)");
    println!("                 Promotion (q, r, b, n) is optional and defaults to the configured piece.");
    println!("  moves <sq>     List the legal moves of the piece on a square.");
    println!("  board          Show the board only.");
    println!("  resign         Forfeit the game (ends game).");
    println!("  save [file]    Save the game view as JSON (default: {}).", DEFAULT_VIEW_FILENAME);
    println!("  help           Show this help message.");
    println!("  quit / exit    Exit the game (saves the final position).");
    println!();
}
