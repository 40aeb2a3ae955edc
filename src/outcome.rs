// This file is part of the pgn-parser library.
// Copyright (C) 2024-2026 The pgn-parser developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use core::{fmt, str::FromStr};

use crate::Color;

/// Outcome of a game that has ended.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum KnownOutcome {
    /// `1-0` or `0-1`.
    Decisive { winner: Color },
    /// `1/2-1/2`.
    Draw,
}

impl KnownOutcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            KnownOutcome::Decisive { winner } => Some(winner),
            KnownOutcome::Draw => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KnownOutcome::Decisive {
                winner: Color::White,
            } => "1-0",
            KnownOutcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            KnownOutcome::Draw => "1/2-1/2",
        }
    }
}

/// A game termination marker: `1-0`, `0-1`, `1/2-1/2` or `*`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Outcome {
    Known(KnownOutcome),
    /// `*`, game ongoing or result unknown.
    Unknown,
}

impl Outcome {
    /// Reads a termination marker at the start of `s`, returning it
    /// together with the number of bytes it spans.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_parser::{KnownOutcome, Outcome};
    ///
    /// assert_eq!(Outcome::parse_prefix(b"1/2-1/2 "), Some((Outcome::Known(KnownOutcome::Draw), 7)));
    /// assert_eq!(Outcome::parse_prefix(b"*"), Some((Outcome::Unknown, 1)));
    /// assert_eq!(Outcome::parse_prefix(b"1. e4"), None);
    /// ```
    pub fn parse_prefix(s: &[u8]) -> Option<(Outcome, usize)> {
        if s.starts_with(b"1-0") {
            Some((
                Outcome::Known(KnownOutcome::Decisive {
                    winner: Color::White,
                }),
                3,
            ))
        } else if s.starts_with(b"0-1") {
            Some((
                Outcome::Known(KnownOutcome::Decisive {
                    winner: Color::Black,
                }),
                3,
            ))
        } else if s.starts_with(b"1/2-1/2") {
            Some((Outcome::Known(KnownOutcome::Draw), 7))
        } else if s.starts_with(b"*") {
            Some((Outcome::Unknown, 1))
        } else {
            None
        }
    }

    /// Parses an entire termination marker.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOutcomeError`] if `s` is not exactly one of the four
    /// markers.
    pub fn from_ascii(s: &[u8]) -> Result<Outcome, ParseOutcomeError> {
        match Outcome::parse_prefix(s) {
            Some((outcome, len)) if len == s.len() => Ok(outcome),
            _ => Err(ParseOutcomeError),
        }
    }

    pub const fn known(self) -> Option<KnownOutcome> {
        match self {
            Outcome::Known(known) => Some(known),
            Outcome::Unknown => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Known(known) => known.as_str(),
            Outcome::Unknown => "*",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid game termination marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseOutcomeError;

impl fmt::Display for ParseOutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid outcome")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseOutcomeError {}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Outcome, ParseOutcomeError> {
        Outcome::from_ascii(s.as_bytes())
    }
}
