use std::io::{self, BufRead, Write};
use std::string::String;

use rand::rngs::SmallRng;

use crate::core::{Board, Direction, Piece, Side};
use crate::protocol::MoveRequest;

use super::Player;

/// Human player typing `<piece> <direction>` lines, e.g. `A-P1 B` or
/// `B-H2 ForwardLeft`.
#[derive(Debug, Default)]
pub struct CliPlayer;

impl CliPlayer {
    pub fn new() -> Self {
        Self
    }
}

/// Parse one input line into a move for `side`.
pub fn parse_move(input: &str, side: Side) -> Result<MoveRequest, String> {
    let mut parts = input.split_whitespace();
    let piece_str = parts.next().ok_or("Empty input")?;
    let dir_str = parts
        .next()
        .ok_or("Missing direction - e.g. 'A-P1 Forward'")?;
    if parts.next().is_some() {
        return Err("Too many words - expected '<piece> <direction>'".into());
    }
    let piece: Piece = piece_str
        .parse()
        .map_err(|e| std::format!("Invalid piece '{}': {}", piece_str, e))?;
    if !piece.belongs_to(side) {
        return Err(std::format!("{} is not one of your pieces", piece));
    }
    let direction: Direction = dir_str
        .parse()
        .map_err(|e| std::format!("Invalid direction '{}': {}", dir_str, e))?;
    if !piece.kind.directions().contains(&direction) {
        return Err(std::format!("{} cannot move {}", piece, direction));
    }
    Ok(MoveRequest::new(piece.to_string(), direction.as_str()))
}

impl Player for CliPlayer {
    fn select_move(&mut self, _rng: &mut SmallRng, board: &Board, side: Side) -> Option<MoveRequest> {
        println!("\n{}", board);
        let stdin = io::stdin();
        loop {
            print!("Player {}, your move (e.g. {}-P1 Backward): ", side, side);
            let _ = io::stdout().flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            match parse_move(line.trim(), side) {
                Ok(request) => return Some(request),
                Err(e) => println!("{}", e),
            }
        }
    }

    fn handle_rejection(&mut self, message: &str) {
        println!("Server: {}", message);
    }

    fn handle_update(&mut self, board: &Board, current_turn: Side) {
        println!("\n{}\nPlayer {} to move.", board, current_turn);
    }
}
