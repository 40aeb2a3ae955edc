//! The parts of FEN needed to find the side to move.

use core::fmt;

use crate::Color;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Error when a FEN does not name the side to move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseFenError;

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid fen")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseFenError {}

/// Reads the side to move from the second field of a FEN.
///
/// The board itself is not validated.
///
/// # Examples
///
/// ```
/// use pgn_parser::{fen, Color};
///
/// assert_eq!(fen::side_to_move(fen::STARTING_FEN), Ok(Color::White));
/// assert_eq!(fen::side_to_move("8/8/8/8/8/8/8/K1k5 b - - 0 40"), Ok(Color::Black));
/// assert!(fen::side_to_move("8/8/8/8/8/8/8/K1k5").is_err());
/// ```
///
/// # Errors
///
/// Returns [`ParseFenError`] if the board is missing or the second field
/// is not `w` or `b`.
pub fn side_to_move(fen: &str) -> Result<Color, ParseFenError> {
    let mut fields = fen.split_ascii_whitespace();
    fields.next().ok_or(ParseFenError)?;
    let mut turn = fields.next().ok_or(ParseFenError)?.chars();
    match (turn.next().and_then(Color::from_char), turn.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(ParseFenError),
    }
}
