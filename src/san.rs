//! Read the move notation of movetext.
//!
//! Accepts Standard Algebraic Notation and its common relatives: long
//! algebraic notation (`e2-e4`, `Ng1xf3`), coordinate notation (`e2e4`),
//! castling, null moves (`--` and `Z0`), drops (`N@f3`, `@e4`) and
//! promotions with or without `=`.
//!
//! # Examples
//!
//! ```
//! use pgn_parser::{File, Rank, Role, san::Notation};
//!
//! let notation: Notation = "Nbxd7+".parse()?;
//! assert_eq!(notation.piece, Some(Role::Knight));
//! assert_eq!(notation.discriminator.as_deref(), Some("b"));
//! assert!(notation.strike);
//! assert_eq!(notation.file, Some(File::D));
//! assert_eq!(notation.rank, Some(Rank::Seventh));
//! assert_eq!(notation.to_string(), "Nbxd7+");
//! # Ok::<_, pgn_parser::san::ParseNotationError>(())
//! ```
//!
//! Promotions are normalized to the `=` form:
//!
//! ```
//! # use pgn_parser::{Role, san::Notation};
//! let notation: Notation = "e8Q".parse()?;
//! assert_eq!(notation.promotion, Some(Role::Queen));
//! assert_eq!(notation.notation, "e8=Q");
//! # Ok::<_, pgn_parser::san::ParseNotationError>(())
//! ```

use alloc::string::String;
use core::{fmt, str::FromStr};

use crate::{File, Rank, Role};

/// Error when parsing invalid move notation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseNotationError {
    /// The input is not a move.
    Syntax,
    /// A promotion to a king or pawn. `offset` is the position of the piece
    /// letter in the input.
    IllegalPromotion { role: Role, offset: usize },
}

impl fmt::Display for ParseNotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseNotationError::Syntax => f.write_str("invalid move notation"),
            ParseNotationError::IllegalPromotion { role, .. } => {
                write!(f, "illegal promotion to {}", role.upper_char())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseNotationError {}

/// Check (`+`) or checkmate (`#`) suffix.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Suffix {
    Check,
    Checkmate,
}

impl Suffix {
    pub const fn char(self) -> char {
        match self {
            Suffix::Check => '+',
            Suffix::Checkmate => '#',
        }
    }

    pub const fn from_char(ch: char) -> Option<Suffix> {
        match ch {
            '+' => Some(Suffix::Check),
            '#' => Some(Suffix::Checkmate),
            _ => None,
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Write::write_char(f, self.char())
    }
}

/// A move as written in movetext, split into its parts.
///
/// Parts that were not written are `None`: `e4` has no `piece`, castling has
/// neither `file` nor `rank`. The full canonical text is kept in
/// `notation`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
pub struct Notation {
    /// The piece letter, if written (`Pe4` has one, `e4` does not).
    pub piece: Option<Role>,
    /// Origin file and/or rank given to disambiguate, like `a` in `Rae1`,
    /// or the origin square of long algebraic notation.
    pub discriminator: Option<String>,
    /// Whether the capture marker `x` was written.
    pub strike: bool,
    /// Destination file.
    pub file: Option<File>,
    /// Destination rank.
    pub rank: Option<Rank>,
    pub promotion: Option<Role>,
    pub check: Option<Suffix>,
    /// Whether the piece is dropped from the hand (`N@f3`).
    pub drop: bool,
    /// The canonical text of the move, like `exd5`, `e8=Q+` or `Z0`.
    pub notation: String,
}

/// The canonical spelling of the null move.
pub const NULL_MOVE: &str = "Z0";

fn file_at(s: &[u8], i: usize) -> Option<File> {
    s.get(i).and_then(|&ch| File::from_char(char::from(ch)))
}

fn rank_at(s: &[u8], i: usize) -> Option<Rank> {
    s.get(i).and_then(|&ch| Rank::from_char(char::from(ch)))
}

fn suffix_at(s: &[u8], i: usize) -> Option<Suffix> {
    s.get(i).and_then(|&ch| Suffix::from_char(char::from(ch)))
}

impl Notation {
    /// Reads a move at the start of `s`, returning it together with the
    /// number of bytes consumed. Trailing input is left alone, so
    /// `aa10.` reads as `aa1`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseNotationError::Syntax`] if `s` does not start with a
    /// move, or [`ParseNotationError::IllegalPromotion`] for promotions to
    /// a king or pawn.
    pub fn parse_prefix(s: &[u8]) -> Result<(Notation, usize), ParseNotationError> {
        let mut notation = Notation::default();

        if s.starts_with(b"--") || s.starts_with(NULL_MOVE.as_bytes()) {
            notation.notation.push_str(NULL_MOVE);
            return Ok((notation, 2));
        }

        let castle: Option<&str> = if s.starts_with(b"O-O-O") {
            Some("O-O-O")
        } else if s.starts_with(b"O-O") {
            Some("O-O")
        } else {
            None
        };
        if let Some(castle) = castle {
            let mut i = castle.len();
            notation.check = suffix_at(s, i);
            if notation.check.is_some() {
                i += 1;
            }
            notation.notation.push_str(castle);
            notation.push_check();
            return Ok((notation, i));
        }

        let mut i = 0;
        notation.piece = s.first().and_then(|&ch| Role::from_upper_char(char::from(ch)));
        if notation.piece.is_some() {
            i += 1;
        }

        if s.get(i) == Some(&b'@') {
            let (Some(file), Some(rank)) = (file_at(s, i + 1), rank_at(s, i + 2)) else {
                return Err(ParseNotationError::Syntax);
            };
            i += 3;
            notation.drop = true;
            notation.file = Some(file);
            notation.rank = Some(rank);
            notation.check = suffix_at(s, i);
            if notation.check.is_some() {
                i += 1;
            }
            if let Some(piece) = notation.piece {
                notation.notation.push(piece.upper_char());
            }
            notation.notation.push('@');
            notation.push_square();
            notation.push_check();
            return Ok((notation, i));
        }

        let from_file = file_at(s, i);
        if from_file.is_some() {
            i += 1;
        }
        let from_rank = rank_at(s, i);
        if from_rank.is_some() {
            i += 1;
        }

        let before_separator = i;
        let separator = match s.get(i) {
            Some(&sep @ (b'x' | b'-')) => {
                i += 1;
                Some(sep)
            }
            _ => None,
        };

        let separator = match (file_at(s, i), rank_at(s, i + 1)) {
            (Some(file), Some(rank)) => {
                i += 2;
                notation.file = Some(file);
                notation.rank = Some(rank);
                if from_file.is_some() || from_rank.is_some() {
                    let mut discriminator = String::with_capacity(2);
                    discriminator.extend(from_file.map(File::char));
                    discriminator.extend(from_rank.map(Rank::char));
                    notation.discriminator = Some(discriminator);
                }
                separator
            }
            _ => {
                // The first coordinates were the destination.
                i = before_separator;
                let (Some(file), Some(rank)) = (from_file, from_rank) else {
                    return Err(ParseNotationError::Syntax);
                };
                notation.file = Some(file);
                notation.rank = Some(rank);
                None
            }
        };
        notation.strike = separator == Some(b'x');

        if matches!(notation.piece, None | Some(Role::Pawn)) {
            let explicit = s.get(i) == Some(&b'=');
            let offset = if explicit { i + 1 } else { i };
            match s
                .get(offset)
                .and_then(|&ch| Role::from_upper_char(char::from(ch)))
            {
                Some(role) if role.is_promotion_target() => {
                    notation.promotion = Some(role);
                    i = offset + 1;
                }
                Some(role) => return Err(ParseNotationError::IllegalPromotion { role, offset }),
                None if explicit => return Err(ParseNotationError::Syntax),
                None => (),
            }
        }

        notation.check = suffix_at(s, i);
        if notation.check.is_some() {
            i += 1;
        }

        if let Some(piece) = notation.piece {
            notation.notation.push(piece.upper_char());
        }
        if let Some(ref discriminator) = notation.discriminator {
            notation.notation.push_str(discriminator);
        }
        if let Some(separator) = separator {
            notation.notation.push(char::from(separator));
        }
        notation.push_square();
        if let Some(promotion) = notation.promotion {
            notation.notation.push('=');
            notation.notation.push(promotion.upper_char());
        }
        notation.push_check();

        Ok((notation, i))
    }

    /// Parses a complete move.
    ///
    /// # Errors
    ///
    /// Returns [`ParseNotationError`] if `s` is not a move, or if anything
    /// follows the move.
    pub fn from_ascii(s: &[u8]) -> Result<Notation, ParseNotationError> {
        let (notation, len) = Notation::parse_prefix(s)?;
        if len == s.len() {
            Ok(notation)
        } else {
            Err(ParseNotationError::Syntax)
        }
    }

    pub fn is_null(&self) -> bool {
        self.notation == NULL_MOVE
    }

    pub fn is_castle(&self) -> bool {
        self.notation.starts_with("O-O")
    }

    fn push_square(&mut self) {
        self.notation.extend(self.file.map(File::char));
        self.notation.extend(self.rank.map(Rank::char));
    }

    fn push_check(&mut self) {
        if let Some(check) = self.check {
            self.notation.push(check.char());
        }
    }
}

impl FromStr for Notation {
    type Err = ParseNotationError;

    fn from_str(s: &str) -> Result<Notation, ParseNotationError> {
        Notation::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Notation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap as _;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("notation", &self.notation)?;
        if let Some(piece) = self.piece {
            map.serialize_entry("piece", &piece.upper_char())?;
        }
        if self.strike {
            map.serialize_entry("strike", "x")?;
        }
        if let Some(file) = self.file {
            map.serialize_entry("file", &file.char())?;
        }
        if let Some(rank) = self.rank {
            map.serialize_entry("rank", &rank.char())?;
        }
        if let Some(check) = self.check {
            map.serialize_entry("check", &check.char())?;
        }
        if let Some(promotion) = self.promotion {
            let mut promotion_str = String::with_capacity(2);
            promotion_str.push('=');
            promotion_str.push(promotion.upper_char());
            map.serialize_entry("promotion", &promotion_str)?;
        }
        if let Some(ref discriminator) = self.discriminator {
            map.serialize_entry("discriminator", discriminator)?;
        }
        if self.drop {
            map.serialize_entry("drop", &true)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notation(s: &str) -> Notation {
        s.parse().expect("valid notation")
    }

    #[test]
    fn test_pawn_moves() {
        let e4 = notation("e4");
        assert_eq!(e4.piece, None);
        assert_eq!(e4.file, Some(File::E));
        assert_eq!(e4.rank, Some(Rank::Fourth));
        assert!(!e4.strike);
        assert_eq!(e4.notation, "e4");

        let pe4 = notation("Pe4");
        assert_eq!(pe4.piece, Some(Role::Pawn));
        assert_eq!(pe4.notation, "Pe4");

        let exd5 = notation("exd5");
        assert!(exd5.strike);
        assert_eq!(exd5.discriminator.as_deref(), Some("e"));
        assert_eq!(exd5.file, Some(File::D));
    }

    #[test]
    fn test_discriminators() {
        assert_eq!(notation("exg4").discriminator.as_deref(), Some("e"));
        assert_eq!(notation("Nce5").discriminator.as_deref(), Some("c"));
        assert_eq!(notation("B4f3").discriminator.as_deref(), Some("4"));
        assert_eq!(notation("Qh4xe1").discriminator.as_deref(), Some("h4"));
        assert_eq!(notation("Nf3").discriminator, None);
    }

    #[test]
    fn test_long_algebraic() {
        let lan = notation("e2-e4");
        assert_eq!(lan.discriminator.as_deref(), Some("e2"));
        assert_eq!(lan.file, Some(File::E));
        assert_eq!(lan.rank, Some(Rank::Fourth));
        assert!(!lan.strike);
        assert_eq!(lan.notation, "e2-e4");

        assert_eq!(notation("e2e4").notation, "e2e4");
        assert!(notation("e7xe5").strike);
        assert_eq!(notation("Ng1-f3").notation, "Ng1-f3");
        assert_eq!(notation("Ng1-f3").piece, Some(Role::Knight));
    }

    #[test]
    fn test_castles() {
        let short = notation("O-O");
        assert!(short.is_castle());
        assert_eq!(short.file, None);
        assert_eq!(short.rank, None);

        let long = notation("O-O-O+");
        assert_eq!(long.notation, "O-O-O+");
        assert_eq!(long.check, Some(Suffix::Check));
    }

    #[test]
    fn test_null_moves() {
        assert_eq!(notation("--"), notation("Z0"));
        assert!(notation("--").is_null());
        assert_eq!(notation("--").notation, "Z0");
    }

    #[test]
    fn test_drops() {
        let drop = notation("B@e7");
        assert!(drop.drop);
        assert_eq!(drop.piece, Some(Role::Bishop));
        assert_eq!(drop.file, Some(File::E));
        assert_eq!(drop.rank, Some(Rank::Seventh));
        assert_eq!(drop.notation, "B@e7");

        let pawn_drop = notation("@e4#");
        assert!(pawn_drop.drop);
        assert_eq!(pawn_drop.piece, None);
        assert_eq!(pawn_drop.notation, "@e4#");

        assert!("N@".parse::<Notation>().is_err());
    }

    #[test]
    fn test_promotions() {
        assert_eq!(notation("e8=Q").promotion, Some(Role::Queen));
        assert_eq!(notation("e8Q").notation, "e8=Q");
        assert_eq!(notation("e4=Q").notation, "e4=Q");
        assert_eq!(notation("bxa1=N#").notation, "bxa1=N#");

        assert_eq!(
            "c8=P".parse::<Notation>(),
            Err(ParseNotationError::IllegalPromotion {
                role: Role::Pawn,
                offset: 3
            })
        );
        assert_eq!(
            "c8K".parse::<Notation>(),
            Err(ParseNotationError::IllegalPromotion {
                role: Role::King,
                offset: 2
            })
        );
        assert_eq!("e8=".parse::<Notation>(), Err(ParseNotationError::Syntax));
    }

    #[test]
    fn test_checks() {
        assert_eq!(notation("Qh4#").check, Some(Suffix::Checkmate));
        assert_eq!(notation("Bb5+").check, Some(Suffix::Check));
        assert_eq!(notation("Bb5").check, None);
    }

    #[test]
    fn test_prefix() {
        let (aa1, len) = Notation::parse_prefix(b"aa10.").expect("valid prefix");
        assert_eq!(aa1.notation, "aa1");
        assert_eq!(len, 3);

        let (e4, len) = Notation::parse_prefix(b"e4!? e5").expect("valid prefix");
        assert_eq!(e4.notation, "e4");
        assert_eq!(len, 2);

        assert_eq!(
            Notation::parse_prefix(b"e4x").map(|(_, len)| len),
            Ok(2)
        );
    }

    #[test]
    fn test_invalid() {
        for s in ["", "x", ".", "e", "N", "Nx", "-", "e9", "i4", "nf3", "1"] {
            assert!(s.parse::<Notation>().is_err(), "{s:?} should be invalid");
        }
    }
}
