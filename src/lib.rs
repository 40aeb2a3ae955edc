//! A parser for chess games in [PGN](http://www.saremba.de/chessgml/standards/pgn/pgn-complete.htm).
//!
//! Games are read into a [`ParseTree`]: interpreted tag pairs, the main
//! line with nested variations, and comments with their embedded commands.
//! Values that are malformed but do not break the structure of a game are
//! kept, and reported as [`Message`]s. Syntax errors stop parsing with a
//! [`ParseError`].
//!
//! # Examples
//!
//! Parse a single game:
//!
//! ```
//! use pgn_parser::{parse_game, Color, Nag, ParseOptions, TagName};
//!
//! let tree = parse_game(r#"
//!     [White "Deep Blue"]
//!     [Black "Kasparov, Garry"]
//!     [WhiteElo "2200 (provisional)"]
//!
//!     1. e4 c5 2. c3 ?! { [%clk 1:59:58] } (2. Nf3) d5 1-0
//! "#, &ParseOptions::default())?;
//!
//! let tags = tree.tags.as_ref().expect("tags of a game");
//! assert_eq!(tags.get_str("Black"), Some("Kasparov, Garry"));
//! assert_eq!(tags.elo(TagName::WhiteElo).and_then(|elo| elo.int), Some(2200));
//! assert_eq!(tags.result(), Some("1-0"));
//!
//! let c3 = &tree.moves[2];
//! assert_eq!(c3.notation.notation, "c3");
//! assert_eq!(c3.turn, Color::White);
//! assert_eq!(c3.nags, [Nag::DUBIOUS_MOVE]);
//! assert_eq!(c3.comment_diag.as_ref().and_then(|diag| diag.clk.as_deref()), Some("1:59:58"));
//! assert_eq!(c3.variations[0][0].notation.notation, "Nf3");
//! # Ok::<_, pgn_parser::ParseError>(())
//! ```
//!
//! Syntax errors point at the offending character:
//!
//! ```
//! use pgn_parser::{parse_game, ParseOptions};
//!
//! let err = parse_game("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Xa4", &ParseOptions::default()).unwrap_err();
//! assert_eq!(err.line(), Some(1));
//! assert_eq!(err.column(), Some(34));
//! assert!(err.hint().ends_with("4. **Xa4"));
//! ```
//!
//! Process large inputs without building trees, using a [`Visitor`] and
//! a [`Reader`].
//!
//! # Logging
//!
//! Parsing emits [`tracing`](https://docs.rs/tracing/0.1) events: a span
//! per call, diagnostics at `DEBUG` and game boundaries at `TRACE`. No
//! subscriber is installed by this crate.
//!
//! # Feature flags
//!
//! * `std`: Implements `std::error::Error` for error types. Enabled by
//!   default. For `no_std` environments, this must be disabled with
//!   `default-features = false`.
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   for the parse tree, with the field names of the common JSON
//!   representation (`moveNumber`, `commentAfter`, ...).

#![no_std]
#![doc(html_root_url = "https://docs.rs/pgn-parser/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod builder;
mod color;
mod comment;
mod errors;
mod nag;
mod outcome;
mod parse;
mod postprocess;
mod reader;
mod role;
mod split;
mod square;
mod tag;
mod tags;
mod timecontrol;
mod tree;
mod visitor;

pub mod fen;
pub mod san;

pub use color::{Color, ParseColorError};
pub use comment::{CommandValue, DiagramComment, RawComment};
pub use errors::{Location, ParseError};
pub use nag::{InvalidNag, Nag};
pub use outcome::{KnownOutcome, Outcome, ParseOutcomeError};
pub use parse::{parse, parse_game, parse_games, ParseOptions, Parsed, StartRule};
pub use reader::Reader;
pub use role::Role;
pub use san::{Notation, Suffix};
pub use split::{split_games, SplitGame};
pub use square::{File, Rank};
pub use tag::{RawTag, TagKind, TagName, UnknownTagName};
pub use tags::{
    DatePart, Elo, ParseDateError, ParseTimeError, PgnDate, PgnTime, TagValue, Tags,
};
pub use timecontrol::{ParseTimeControlError, TimeControl, TimeControlItem, TimeControlKind};
pub use tree::{Message, ParseTree, PgnMove};
pub use visitor::{Skip, Visitor};
