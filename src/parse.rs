use alloc::{string::String, vec::Vec};

use tracing::{debug, debug_span, trace};

use crate::{
    builder::TreeBuilder, errors::ParseError, postprocess, reader::Reader, tree::ParseTree,
};

/// What the input is expected to contain.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum StartRule {
    /// Only tag pairs.
    Tags,
    /// Only movetext, without tag pairs.
    Pgn,
    /// Exactly one game: tag pairs followed by movetext.
    Game,
    /// Any number of games.
    #[default]
    Games,
}

/// Options for [`parse()`], [`parse_game()`] and [`parse_games()`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ParseOptions {
    pub start_rule: StartRule,
    /// Position to start from when assigning the side to move. Takes
    /// precedence over the `FEN` tag of each game.
    pub fen: Option<String>,
}

impl ParseOptions {
    pub fn new() -> ParseOptions {
        ParseOptions::default()
    }

    #[must_use]
    pub fn start_rule(mut self, start_rule: StartRule) -> ParseOptions {
        self.start_rule = start_rule;
        self
    }

    #[must_use]
    pub fn fen(mut self, fen: impl Into<String>) -> ParseOptions {
        self.fen = Some(fen.into());
        self
    }
}

/// Result of [`parse()`], depending on the [`StartRule`].
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    Games(Vec<ParseTree>),
    Game(ParseTree),
}

impl Parsed {
    /// All games, in order.
    pub fn into_games(self) -> Vec<ParseTree> {
        match self {
            Parsed::Games(games) => games,
            Parsed::Game(game) => alloc::vec![game],
        }
    }
}

/// Parses `input` according to `options`. [`StartRule::Games`] yields
/// [`Parsed::Games`], all other rules a single [`Parsed::Game`].
///
/// # Errors
///
/// Returns a [`ParseError`] at the first syntax error. Malformed values
/// that do not break the structure of the game are reported as
/// [`Message`](crate::Message)s of the resulting trees instead.
///
/// # Examples
///
/// ```
/// use pgn_parser::{parse, ParseOptions, Parsed, StartRule};
///
/// let parsed = parse("e4 e5 Nf3", &ParseOptions::new().start_rule(StartRule::Pgn))?;
/// let Parsed::Game(tree) = parsed else { unreachable!() };
/// assert_eq!(tree.moves.len(), 3);
/// assert!(tree.tags.is_none());
/// # Ok::<_, pgn_parser::ParseError>(())
/// ```
pub fn parse(input: &str, options: &ParseOptions) -> Result<Parsed, ParseError> {
    match options.start_rule {
        StartRule::Games => parse_games(input, options).map(Parsed::Games),
        _ => parse_game(input, options).map(Parsed::Game),
    }
}

fn logged<T>(result: Result<T, ParseError>) -> Result<T, ParseError> {
    if let Err(ref err) = result {
        debug!(line = err.line(), column = err.column(), "{err}");
    }
    result
}

/// Parses a single instance of the start rule: only tag pairs, only
/// movetext, or one game. [`StartRule::Games`] is read like
/// [`StartRule::Game`]. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns a [`ParseError`] at the first syntax error, including any input
/// after the end of the game.
///
/// # Examples
///
/// ```
/// use pgn_parser::{parse_game, Color, ParseOptions};
///
/// let tree = parse_game("  [White \"Me\"] 1. e4 e5 2. Nf3 *  ", &ParseOptions::default())?;
/// assert_eq!(tree.moves[2].turn, Color::White);
/// assert_eq!(tree.tags.as_ref().and_then(|tags| tags.result()), Some("*"));
/// # Ok::<_, pgn_parser::ParseError>(())
/// ```
pub fn parse_game(input: &str, options: &ParseOptions) -> Result<ParseTree, ParseError> {
    let rule = match options.start_rule {
        StartRule::Games => StartRule::Game,
        rule => rule,
    };
    let span = debug_span!("parse_game", ?rule, len = input.len());
    let _enter = span.enter();

    logged(
        Reader::new(input.trim())
            .read_rule(rule, &mut TreeBuilder::new(rule))
            .map(|game| postprocess::finish(game, rule, options.fen.as_deref())),
    )
}

/// Parses any number of games, regardless of the start rule in
/// `options`.
///
/// # Errors
///
/// Returns a [`ParseError`] at the first syntax error in any game.
///
/// # Examples
///
/// ```
/// use pgn_parser::{parse_games, ParseOptions};
///
/// let games = parse_games("[Event \"A\"]\n\n1. e4 *\n\n[Event \"B\"]\n\n1. d4 *\n", &ParseOptions::default())?;
/// assert_eq!(games.len(), 2);
/// assert_eq!(games[1].moves[0].notation.notation, "d4");
/// # Ok::<_, pgn_parser::ParseError>(())
/// ```
pub fn parse_games(input: &str, options: &ParseOptions) -> Result<Vec<ParseTree>, ParseError> {
    let span = debug_span!("parse_games", len = input.len());
    let _enter = span.enter();

    logged(read_games(input, options.fen.as_deref()))
}

fn read_games(input: &str, fen: Option<&str>) -> Result<Vec<ParseTree>, ParseError> {
    let mut reader = Reader::new(input);
    let mut builder = TreeBuilder::new(StartRule::Games);
    let mut games = Vec::new();
    while let Some(game) = reader.read_game(&mut builder)? {
        trace!(index = games.len(), offset = reader.position(), "read game");
        games.push(game);
    }

    // Trailing comments or a lone termination marker do not make a game.
    if games
        .last()
        .is_some_and(|game| !game.tagged && game.tree.moves.is_empty())
    {
        games.pop();
    }

    Ok(games
        .into_iter()
        .map(|game| postprocess::finish(game, StartRule::Games, fen))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule() {
        assert_eq!(ParseOptions::default().start_rule, StartRule::Games);
    }

    #[test]
    fn test_empty_games() {
        let options = ParseOptions::default();
        assert_eq!(parse_games("", &options), Ok(Vec::new()));
        assert_eq!(parse_games("  \n% escaped\n\n", &options), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_game_honours_rule() {
        let options = ParseOptions::new().start_rule(StartRule::Pgn);
        let tree = parse_game("  {before} 1. e4  ", &options).expect("valid movetext");
        assert_eq!(tree.moves[0].comment_move.as_deref(), Some("before"));
        assert!(tree.tags.is_none());

        let tree = parse_game("{before} 1. e4", &ParseOptions::default()).expect("valid game");
        assert!(tree.moves[0].comment_move.is_none());
        assert!(tree.game_comment.is_some());
    }

    #[test]
    fn test_parse_wraps_single_rules() {
        let options = ParseOptions::new().start_rule(StartRule::Tags);
        let parsed = parse("[White \"Me\"]\n[Black \"You\"]", &options).expect("valid tags");
        let Parsed::Game(tree) = parsed else {
            panic!("expected a single tree");
        };
        assert_eq!(tree.tags.map(|tags| tags.len()), Some(2));
        assert!(tree.moves.is_empty());
    }
}
