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

use alloc::{
    string::{String, ToString as _},
    vec::Vec,
};
use core::fmt::{self, Write as _};

/// Where in the input a parse error occurred.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Location {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Location {
    fn new(input: &str, mut offset: usize) -> Location {
        offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &input[..offset];
        let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |pos| pos + 1);
        Location {
            offset,
            line: memchr::memchr_iter(b'\n', before.as_bytes()).count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

/// Error when the input does not match the grammar.
///
/// Parsing stops at the first such error. The error keeps a copy of the
/// input, so that it can render the surrounding lines with [`ParseError::hint()`].
#[derive(Clone, Eq, PartialEq)]
pub struct ParseError {
    input: String,
    location: Option<Location>,
    expected: &'static [&'static str],
    found: Option<char>,
}

impl ParseError {
    pub(crate) fn new(input: &str, offset: usize, expected: &'static [&'static str]) -> ParseError {
        let location = Location::new(input, offset);
        ParseError {
            found: input[location.offset..].chars().next(),
            input: input.to_string(),
            location: Some(location),
            expected,
        }
    }

    /// The input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// 1-based line of the offending character.
    pub fn line(&self) -> Option<usize> {
        self.location.map(|loc| loc.line)
    }

    /// 1-based column of the offending character.
    pub fn column(&self) -> Option<usize> {
        self.location.map(|loc| loc.column)
    }

    /// Descriptions of what would have been accepted at the error
    /// location, like `"O-O"` or `[a-h]`.
    pub fn expected(&self) -> &[&'static str] {
        self.expected
    }

    /// The offending character, or `None` at the end of the input.
    pub fn found(&self) -> Option<char> {
        self.found
    }

    /// Up to two lines before and one line after the failing line, each
    /// prefixed with its line number. `**` marks the offending character.
    pub fn context(&self) -> Option<String> {
        let location = self.location?;
        let lines: Vec<&str> = self.input.split('\n').collect();
        let first = location.line.saturating_sub(3);
        let last = lines.len().min(location.line + 1);

        let mut context = String::new();
        for (i, content) in lines.iter().enumerate().take(last).skip(first) {
            let number = i + 1;
            if !context.is_empty() {
                context.push('\n');
            }
            let _ = write!(context, "{number}: ");
            if number == location.line {
                match content.char_indices().nth(location.column - 1) {
                    Some((split, _)) => {
                        context.push_str(&content[..split]);
                        context.push_str("**");
                        context.push_str(&content[split..]);
                    }
                    None => {
                        context.push_str(content);
                        context.push_str("**");
                    }
                }
            } else {
                context.push_str(content);
            }
        }
        Some(context)
    }

    /// A human readable hint pointing at the error.
    pub fn hint(&self) -> String {
        match (self.location, self.context()) {
            (Some(location), Some(context)) => alloc::format!(
                "Error at line {}, column {}:\n{}",
                location.line,
                location.column,
                context
            ),
            _ => alloc::format!(
                "Error parsing PGN (no location information available): {self}"
            ),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Expected ")?;
        match self.expected {
            [] => f.write_str("nothing")?,
            [single] => f.write_str(single)?,
            [first, second] => write!(f, "{first} or {second}")?,
            [init @ .., last] => {
                for item in init {
                    write!(f, "{item}, ")?;
                }
                write!(f, "or {last}")?;
            }
        }
        match self.found {
            Some(ch) => write!(f, " but \"{}\" found.", ch.escape_debug()),
            None => f.write_str(" but end of input found."),
        }
    }
}

impl fmt::Debug for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("location", &self.location)
            .field("expected", &self.expected)
            .field("found", &self.found)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
