//! The `TimeControl` tag.
//!
//! A value is a colon separated sequence of periods. Each period is one of
//!
//! * `?` for unknown,
//! * `-` for no time control,
//! * `40/7200` for a number of moves in a number of seconds,
//! * `40/7200+30` or `40/7200d30` for the same with increment or delay,
//! * `5400`, `5400+30` or `5400d30` for sudden death, optionally with
//!   increment or delay,
//! * `*180` for an hourglass.
//!
//! # Examples
//!
//! ```
//! use pgn_parser::{TimeControl, TimeControlKind};
//!
//! let tc: TimeControl = "40/7200:3600+30".parse()?;
//! assert_eq!(tc.items.len(), 2);
//! assert_eq!(tc.items[0].kind, TimeControlKind::MovesInSeconds);
//! assert_eq!(tc.items[0].moves, Some(40));
//! assert_eq!(tc.items[1].kind, TimeControlKind::SecondsWithIncrement);
//! assert_eq!(tc.items[1].increment, Some(30));
//! # Ok::<_, pgn_parser::ParseTimeControlError>(())
//! ```

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum TimeControlKind {
    Unknown,
    Unlimited,
    MovesInSeconds,
    MovesInSecondsWithIncrement,
    MovesInSecondsWithDelay,
    SecondsWithIncrement,
    SecondsWithDelay,
    SuddenDeath,
    Hourglass,
}

impl TimeControlKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TimeControlKind::Unknown => "unknown",
            TimeControlKind::Unlimited => "unlimited",
            TimeControlKind::MovesInSeconds => "movesInSeconds",
            TimeControlKind::MovesInSecondsWithIncrement => "movesInSecondsWithIncrement",
            TimeControlKind::MovesInSecondsWithDelay => "movesInSecondsWithDelay",
            TimeControlKind::SecondsWithIncrement => "secondsWithIncrement",
            TimeControlKind::SecondsWithDelay => "secondsWithDelay",
            TimeControlKind::SuddenDeath => "suddenDeath",
            TimeControlKind::Hourglass => "hourglass",
        }
    }
}

impl fmt::Display for TimeControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One period of a time control.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimeControlItem {
    pub kind: TimeControlKind,
    pub moves: Option<u32>,
    pub seconds: Option<u32>,
    pub increment: Option<u32>,
    pub delay: Option<u32>,
    /// The period as written.
    pub value: String,
}

impl TimeControlItem {
    fn from_ascii(s: &[u8]) -> Result<TimeControlItem, ParseTimeControlError> {
        let mut item = TimeControlItem {
            kind: TimeControlKind::Unknown,
            moves: None,
            seconds: None,
            increment: None,
            delay: None,
            value: String::from_utf8_lossy(s).into_owned(),
        };

        match s {
            b"?" => return Ok(item),
            b"-" => {
                item.kind = TimeControlKind::Unlimited;
                return Ok(item);
            }
            [b'*', seconds @ ..] => {
                let (seconds, rest) = number(seconds)?;
                if !rest.is_empty() {
                    return Err(ParseTimeControlError);
                }
                item.kind = TimeControlKind::Hourglass;
                item.seconds = Some(seconds);
                return Ok(item);
            }
            _ => (),
        }

        let rest = match memchr::memchr(b'/', s) {
            Some(slash) => {
                let (moves, rest) = number(&s[..slash])?;
                if !rest.is_empty() {
                    return Err(ParseTimeControlError);
                }
                item.moves = Some(moves);
                &s[slash + 1..]
            }
            None => s,
        };

        let (seconds, rest) = number(rest)?;
        item.seconds = Some(seconds);

        let with_moves = item.moves.is_some();
        item.kind = match rest {
            [] if with_moves => TimeControlKind::MovesInSeconds,
            [] => TimeControlKind::SuddenDeath,
            [b'+', increment @ ..] => {
                item.increment = Some(full_number(increment)?);
                if with_moves {
                    TimeControlKind::MovesInSecondsWithIncrement
                } else {
                    TimeControlKind::SecondsWithIncrement
                }
            }
            [b'd', delay @ ..] => {
                item.delay = Some(full_number(delay)?);
                if with_moves {
                    TimeControlKind::MovesInSecondsWithDelay
                } else {
                    TimeControlKind::SecondsWithDelay
                }
            }
            _ => return Err(ParseTimeControlError),
        };
        Ok(item)
    }
}

fn number(s: &[u8]) -> Result<(u32, &[u8]), ParseTimeControlError> {
    let len = s.iter().take_while(|ch| ch.is_ascii_digit()).count();
    let n = btoi::btou(&s[..len]).map_err(|_| ParseTimeControlError)?;
    Ok((n, &s[len..]))
}

fn full_number(s: &[u8]) -> Result<u32, ParseTimeControlError> {
    match number(s)? {
        (n, []) => Ok(n),
        _ => Err(ParseTimeControlError),
    }
}

/// A parsed `TimeControl` tag value.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimeControl {
    /// The value as written.
    pub value: String,
    pub items: Vec<TimeControlItem>,
}

impl TimeControl {
    /// Parses a time control. All periods must be well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTimeControlError`] if any period is malformed,
    /// including an empty input.
    pub fn from_ascii(s: &[u8]) -> Result<TimeControl, ParseTimeControlError> {
        Ok(TimeControl {
            value: String::from_utf8_lossy(s).into_owned(),
            items: s
                .split(|&ch| ch == b':')
                .map(TimeControlItem::from_ascii)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl FromStr for TimeControl {
    type Err = ParseTimeControlError;

    fn from_str(s: &str) -> Result<TimeControl, ParseTimeControlError> {
        TimeControl::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Error when parsing a malformed time control.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseTimeControlError;

impl fmt::Display for ParseTimeControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid time control")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseTimeControlError {}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap as _, Serializer};

    use super::*;

    impl Serialize for TimeControlKind {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    impl Serialize for TimeControlItem {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            map.serialize_entry("kind", &self.kind)?;
            if let Some(moves) = self.moves {
                map.serialize_entry("moves", &moves)?;
            }
            if let Some(seconds) = self.seconds {
                map.serialize_entry("seconds", &seconds)?;
            }
            if let Some(increment) = self.increment {
                map.serialize_entry("increment", &increment)?;
            }
            if let Some(delay) = self.delay {
                map.serialize_entry("delay", &delay)?;
            }
            map.serialize_entry("value", &self.value)?;
            map.end()
        }
    }

    impl Serialize for TimeControl {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("value", &self.value)?;
            map.serialize_entry("items", &self.items)?;
            map.end()
        }
    }
}
