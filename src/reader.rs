//! Tokenizer and grammar of PGN.
//!
//! The [`Reader`] walks the input once and reports each token to a
//! [`Visitor`]. Nesting of variations is tracked with an explicit stack, so
//! arbitrarily deep input does not exhaust the call stack.

use alloc::{vec, vec::Vec};
use core::ops::ControlFlow;

use tracing::trace;

use crate::{
    comment::RawComment,
    errors::ParseError,
    san::{Notation, ParseNotationError},
    tag::RawTag,
    visitor::{Skip, Visitor},
    Nag, Outcome, StartRule,
};

const EXPECTED_MOVE: &[&str] = &[
    "\"--\"",
    "\"O-O\"",
    "\"O-O-O\"",
    "\"Z0\"",
    "[BKNPQR]",
    "[a-h]",
];

const EXPECTED_MOVETEXT: &[&str] = &[
    "\"(\"",
    "\"--\"",
    "\";\"",
    "\"O-O\"",
    "\"O-O-O\"",
    "\"Z0\"",
    "\"{\"",
    "NAG",
    "[BKNPQR]",
    "[a-h]",
    "game termination",
    "move number",
    "whitespace",
];

const EXPECTED_TAG_NAME: &[&str] = &["tag name"];
const EXPECTED_QUOTE: &[&str] = &["\"\\\"\"", "whitespace"];
const EXPECTED_CLOSING_QUOTE: &[&str] = &["\"\\\"\"", "any character"];
const EXPECTED_BRACKET: &[&str] = &["\"]\"", "whitespace"];
const EXPECTED_CLOSING_BRACE: &[&str] = &["\"}\""];
const EXPECTED_CLOSING_PAREN: &[&str] = &["\")\""];
const EXPECTED_PROMOTION: &[&str] = &["[BNQR]"];
const EXPECTED_NAG: &[&str] = &["[0-9]"];
const EXPECTED_END: &[&str] = &["end of input", "whitespace"];

/// Reads games from an in-memory PGN.
///
/// # Examples
///
/// ```
/// use std::ops::ControlFlow;
/// use pgn_parser::{san::Notation, Reader, Visitor};
///
/// struct MoveCounter;
///
/// impl Visitor for MoveCounter {
///     type Tags = ();
///     type Movetext = usize;
///     type Output = usize;
///
///     fn begin_tags(&mut self) -> ControlFlow<usize> {
///         ControlFlow::Continue(())
///     }
///
///     fn begin_movetext(&mut self, _tags: ()) -> ControlFlow<usize, usize> {
///         ControlFlow::Continue(0)
///     }
///
///     fn san(&mut self, moves: &mut usize, _notation: Notation) -> ControlFlow<usize> {
///         *moves += 1;
///         ControlFlow::Continue(())
///     }
///
///     fn end_game(&mut self, moves: usize) -> usize {
///         moves
///     }
/// }
///
/// let mut reader = Reader::new("1. e4 e5 2. Nf3 (2. f4) Nc6 *\n\n1. d4 d5 *");
/// assert_eq!(reader.read_game(&mut MoveCounter)?, Some(5));
/// assert_eq!(reader.read_game(&mut MoveCounter)?, Some(2));
/// assert_eq!(reader.read_game(&mut MoveCounter)?, None);
/// # Ok::<_, pgn_parser::ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Reader<'a> {
        Reader { input, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> &'a [u8] {
        &self.input.as_bytes()[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.remaining().first().copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let head = self.peek();
        if head.is_some() {
            self.pos += 1;
        }
        head
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    fn error(&self, expected: &'static [&'static str]) -> ParseError {
        self.error_at(self.pos, expected)
    }

    fn error_at(&self, offset: usize, expected: &'static [&'static str]) -> ParseError {
        ParseError::new(self.input, offset, expected)
    }

    fn skip_bom(&mut self) {
        if self.pos == 0 && self.starts_with(b"\xef\xbb\xbf") {
            self.pos += 3;
        }
    }

    fn skip_until(&mut self, needle: u8) {
        self.pos = memchr::memchr(needle, self.remaining())
            .map_or(self.input.len(), |offset| self.pos + offset);
    }

    fn skip_line(&mut self) {
        self.skip_until(b'\n');
        self.bump();
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.input.as_bytes()[self.pos - 1] == b'\n'
    }

    /// Skips whitespace and `%` escape lines.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c' => {
                    self.bump();
                }
                b'%' if self.at_line_start() => self.skip_line(),
                _ => return,
            }
        }
    }

    fn skip_dots(&mut self) {
        while self.peek() == Some(b'.') {
            self.bump();
        }
    }

    fn read_tags<V: Visitor>(
        &mut self,
        visitor: &mut V,
        tags: &mut V::Tags,
    ) -> Result<ControlFlow<V::Output>, ParseError> {
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'[') {
                return Ok(ControlFlow::Continue(()));
            }
            self.bump();
            self.skip_whitespace();

            let name_start = self.pos;
            let name_len = self
                .remaining()
                .iter()
                .take_while(|&&ch| ch.is_ascii_alphanumeric() || ch == b'_')
                .count();
            if name_len == 0 {
                return Err(self.error(EXPECTED_TAG_NAME));
            }
            self.pos += name_len;
            let name = &self.input.as_bytes()[name_start..self.pos];

            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error(EXPECTED_QUOTE));
            }
            self.bump();

            let value_start = self.pos;
            loop {
                match memchr::memchr2(b'\\', b'"', self.remaining()) {
                    Some(offset) if self.remaining()[offset] == b'"' => {
                        self.pos += offset;
                        break;
                    }
                    Some(offset) => {
                        // Skip escaped character.
                        self.pos = (self.pos + offset + 2).min(self.input.len());
                    }
                    None => {
                        self.pos = self.input.len();
                        return Err(self.error(EXPECTED_CLOSING_QUOTE));
                    }
                }
            }
            let value = RawTag(&self.input.as_bytes()[value_start..self.pos]);
            self.bump();

            self.skip_whitespace();
            if self.peek() != Some(b']') {
                return Err(self.error(EXPECTED_BRACKET));
            }
            self.bump();

            if let ControlFlow::Break(output) = visitor.tag(tags, name, value) {
                return Ok(ControlFlow::Break(output));
            }
        }
    }

    fn read_move_number(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        let len = self
            .remaining()
            .iter()
            .take_while(|ch| ch.is_ascii_digit())
            .count();
        let number = btoi::btou_saturating(&self.remaining()[..len])
            .map_err(|_| self.error(EXPECTED_MOVETEXT))?;
        self.pos = start + len;
        self.skip_whitespace();
        self.skip_dots();
        self.skip_whitespace();
        self.skip_dots();
        Ok(number)
    }

    fn read_movetext<V: Visitor>(
        &mut self,
        visitor: &mut V,
        movetext: &mut V::Movetext,
        rule: StartRule,
    ) -> Result<ControlFlow<V::Output>, ParseError> {
        // One entry per open line, telling whether it already has a move
        // that annotations and variations can refer to.
        let mut lines: Vec<bool> = vec![false];

        macro_rules! visit {
            ($event:expr) => {
                if let ControlFlow::Break(output) = $event {
                    self.skip_movetext(lines.len() - 1);
                    return Ok(ControlFlow::Break(output));
                }
            };
        }

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };
            let top = lines.len() - 1;
            let has_move = lines[top];

            match ch {
                b'{' => {
                    let start = self.pos + 1;
                    let Some(len) = memchr::memchr(b'}', &self.input.as_bytes()[start..]) else {
                        return Err(self.error_at(self.input.len(), EXPECTED_CLOSING_BRACE));
                    };
                    self.pos = start + len + 1;
                    visit!(visitor.comment(
                        movetext,
                        RawComment(&self.input.as_bytes()[start..start + len])
                    ));
                }
                b';' => {
                    let start = self.pos + 1;
                    self.skip_until(b'\n');
                    let mut text = &self.input.as_bytes()[start..self.pos];
                    if let [init @ .., b'\r'] = text {
                        text = init;
                    }
                    visit!(visitor.line_comment(movetext, RawComment(text)));
                }
                b'(' if self.starts_with(b"(=)") => {
                    if !has_move {
                        return Err(self.error(EXPECTED_MOVE));
                    }
                    self.pos += 3;
                    visit!(visitor.draw_offer(movetext));
                }
                b'(' => {
                    if !has_move {
                        return Err(self.error(EXPECTED_MOVE));
                    }
                    self.bump();
                    match visitor.begin_variation(movetext) {
                        ControlFlow::Continue(Skip(true)) => {
                            self.skip_variation()?;
                            visit!(visitor.end_variation(movetext));
                        }
                        ControlFlow::Continue(Skip(false)) => lines.push(false),
                        ControlFlow::Break(output) => {
                            self.skip_movetext(lines.len());
                            return Ok(ControlFlow::Break(output));
                        }
                    }
                }
                b')' if top > 0 => {
                    if !has_move {
                        return Err(self.error(EXPECTED_MOVE));
                    }
                    self.bump();
                    lines.pop();
                    visit!(visitor.end_variation(movetext));
                }
                b'[' if top == 0 && rule == StartRule::Games => break,
                b'$' => {
                    let Some((nag, len)) = Nag::parse_prefix(self.remaining()) else {
                        return Err(self.error_at(self.pos + 1, EXPECTED_NAG));
                    };
                    if !has_move {
                        return Err(self.error(EXPECTED_MOVE));
                    }
                    self.pos += len;
                    visit!(visitor.nag(movetext, nag));
                }
                b'0'..=b'9' | b'*' => match Outcome::parse_prefix(self.remaining()) {
                    Some((outcome, len)) if top == 0 => {
                        self.pos += len;
                        visit!(visitor.outcome(movetext, outcome));
                        return Ok(ControlFlow::Continue(()));
                    }
                    _ if ch == b'*' => return Err(self.error(EXPECTED_MOVETEXT)),
                    _ => {
                        let number = self.read_move_number()?;
                        visit!(visitor.move_number(movetext, number));
                    }
                },
                _ => {
                    if let Some((nag, len)) = Nag::parse_prefix(self.remaining()) {
                        if !has_move {
                            return Err(self.error(EXPECTED_MOVE));
                        }
                        self.pos += len;
                        visit!(visitor.nag(movetext, nag));
                        continue;
                    }

                    if has_move && self.starts_with(b"e.p.") {
                        self.pos += 4;
                        continue;
                    }

                    match Notation::parse_prefix(self.remaining()) {
                        Ok((notation, len)) => {
                            self.pos += len;
                            lines[top] = true;
                            visit!(visitor.san(movetext, notation));
                        }
                        Err(ParseNotationError::IllegalPromotion { offset, .. }) => {
                            return Err(self.error_at(self.pos + offset, EXPECTED_PROMOTION));
                        }
                        Err(ParseNotationError::Syntax) => {
                            return Err(self.error(EXPECTED_MOVETEXT));
                        }
                    }
                }
            }
        }

        if lines.len() > 1 {
            return Err(self.error(EXPECTED_CLOSING_PAREN));
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Skips to the `)` closing the current variation.
    fn skip_variation(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            match ch {
                b'{' => {
                    self.skip_until(b'}');
                    if self.bump().is_none() {
                        return Err(self.error(EXPECTED_CLOSING_BRACE));
                    }
                }
                b';' => self.skip_line(),
                b'(' => {
                    self.bump();
                    depth += 1;
                }
                b')' => {
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(self.error(EXPECTED_CLOSING_PAREN))
    }

    /// Skips the rest of a game after a visitor stopped early, without
    /// validating it. `depth` is the number of open variations.
    fn skip_movetext(&mut self, mut depth: usize) {
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                return;
            };
            match ch {
                b'{' => {
                    self.skip_until(b'}');
                    self.bump();
                }
                b';' => self.skip_line(),
                b'(' => {
                    self.bump();
                    depth += 1;
                }
                b')' => {
                    self.bump();
                    depth = depth.saturating_sub(1);
                }
                b'[' if depth == 0 => return,
                _ => {
                    if depth == 0 {
                        if let Some((_, len)) = Outcome::parse_prefix(self.remaining()) {
                            self.pos += len;
                            return;
                        }
                    }
                    // Skip one token.
                    self.bump();
                    while let Some(ch) = self.peek() {
                        if matches!(ch, b' ' | b'\t' | b'\r' | b'\n' | b'{' | b'}' | b';' | b'(' | b')' | b'[') {
                            break;
                        }
                        self.bump();
                    }
                }
            }
        }
    }

    /// Skips the remaining tag pairs after a visitor stopped early.
    fn skip_tags(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'[') {
                return;
            }
            while let Some(ch) = self.bump() {
                match ch {
                    b'"' => loop {
                        match memchr::memchr2(b'\\', b'"', self.remaining()) {
                            Some(offset) if self.remaining()[offset] == b'"' => {
                                self.pos += offset + 1;
                                break;
                            }
                            Some(offset) => {
                                self.pos = (self.pos + offset + 2).min(self.input.len());
                            }
                            None => {
                                self.pos = self.input.len();
                                break;
                            }
                        }
                    },
                    b']' => break,
                    _ => (),
                }
            }
        }
    }

    /// Reads the next game of a multi-game input. Games end after their
    /// termination marker, or where the next game's tags begin.
    ///
    /// Returns `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for the first syntax error.
    pub fn read_game<V: Visitor>(&mut self, visitor: &mut V) -> Result<Option<V::Output>, ParseError> {
        self.skip_bom();
        self.skip_whitespace();
        if self.peek().is_none() {
            return Ok(None);
        }
        trace!(offset = self.pos, "reading game");

        let mut tags = match visitor.begin_tags() {
            ControlFlow::Continue(tags) => tags,
            ControlFlow::Break(output) => {
                self.skip_tags();
                self.skip_movetext(0);
                return Ok(Some(output));
            }
        };
        if let ControlFlow::Break(output) = self.read_tags(visitor, &mut tags)? {
            self.skip_tags();
            self.skip_movetext(0);
            return Ok(Some(output));
        }

        let mut movetext = match visitor.begin_movetext(tags) {
            ControlFlow::Continue(movetext) => movetext,
            ControlFlow::Break(output) => {
                self.skip_movetext(0);
                return Ok(Some(output));
            }
        };
        if let ControlFlow::Break(output) = self.read_movetext(visitor, &mut movetext, StartRule::Games)? {
            return Ok(Some(output));
        }

        self.skip_whitespace();
        Ok(Some(visitor.end_game(movetext)))
    }

    /// Reads the whole input as a single instance of `rule`: only tag
    /// pairs, only movetext, or one game. [`StartRule::Games`] reads a
    /// single game like [`StartRule::Game`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for the first syntax error, including any
    /// input left over after the rule is complete.
    pub fn read_rule<V: Visitor>(&mut self, rule: StartRule, visitor: &mut V) -> Result<V::Output, ParseError> {
        self.skip_bom();

        let mut tags = match visitor.begin_tags() {
            ControlFlow::Continue(tags) => tags,
            ControlFlow::Break(output) => return Ok(output),
        };
        if rule != StartRule::Pgn {
            if let ControlFlow::Break(output) = self.read_tags(visitor, &mut tags)? {
                return Ok(output);
            }
        }

        let mut movetext = match visitor.begin_movetext(tags) {
            ControlFlow::Continue(movetext) => movetext,
            ControlFlow::Break(output) => return Ok(output),
        };
        if rule != StartRule::Tags {
            let movetext_rule = match rule {
                StartRule::Games => StartRule::Game,
                other => other,
            };
            if let ControlFlow::Break(output) = self.read_movetext(visitor, &mut movetext, movetext_rule)? {
                return Ok(output);
            }
        }

        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.error(EXPECTED_END));
        }
        Ok(visitor.end_game(movetext))
    }
}
