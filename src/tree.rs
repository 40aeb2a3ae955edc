use alloc::{string::String, vec::Vec};
use core::mem;

use tracing::debug;

use crate::{comment::DiagramComment, san::Notation, tags::Tags, Color, Nag};

/// A non-fatal diagnostic about a tag or command value that was kept
/// despite not matching its expected format.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Message {
    /// The tag or command name, like `Date` or `clk`.
    pub key: String,
    /// The offending value.
    pub value: String,
    pub message: String,
}

impl Message {
    pub fn new(key: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Message {
        Message {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

pub(crate) fn report(messages: &mut Vec<Message>, message: Message) {
    debug!(key = %message.key, value = %message.value, "{}", message.message);
    messages.push(message);
}

/// A single half-move, together with everything attached to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PgnMove {
    /// The move number given in the movetext, if any. Often only present
    /// on white moves.
    pub move_number: Option<u32>,
    /// Side to move, derived from the start position and the depth of
    /// the move in its line.
    pub turn: Color,
    pub notation: Notation,
    /// Alternatives to this move, in order of appearance.
    pub variations: Vec<Vec<PgnMove>>,
    /// `(=)` followed the move.
    pub draw_offer: bool,
    pub nags: Vec<Nag>,
    /// Comment text that preceded the move.
    pub comment_move: Option<String>,
    /// Comment text that followed the move.
    pub comment_after: Option<String>,
    /// Commands embedded in comments around the move.
    pub comment_diag: Option<DiagramComment>,
}

impl PgnMove {
    pub fn new(notation: Notation) -> PgnMove {
        PgnMove {
            move_number: None,
            turn: Color::White,
            notation,
            variations: Vec::new(),
            draw_offer: false,
            nags: Vec::new(),
            comment_move: None,
            comment_after: None,
            comment_diag: None,
        }
    }
}

impl Drop for PgnMove {
    fn drop(&mut self) {
        // Variations can nest arbitrarily deep. Tear them down with an
        // explicit stack.
        let mut pending = mem::take(&mut self.variations);
        while let Some(mut line) = pending.pop() {
            for mut m in line.drain(..) {
                pending.append(&mut m.variations);
            }
        }
    }
}

/// The result of parsing a single game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseTree {
    /// The tag pairs. Absent when parsing only movetext and no result
    /// had to be recorded.
    pub tags: Option<Tags>,
    /// Comments before the first move of the game.
    pub game_comment: Option<DiagramComment>,
    /// The main line.
    pub moves: Vec<PgnMove>,
    /// Diagnostics collected while interpreting values.
    pub messages: Vec<Message>,
}

impl ParseTree {
    /// Number of moves in the main line and all variations.
    pub fn count_moves(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&[PgnMove]> = alloc::vec![&self.moves];
        while let Some(line) = stack.pop() {
            count += line.len();
            for m in line {
                stack.extend(m.variations.iter().map(Vec::as_slice));
            }
        }
        count
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap as _, Serializer};

    use super::*;

    impl Serialize for Message {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(3))?;
            map.serialize_entry("key", &self.key)?;
            map.serialize_entry("value", &self.value)?;
            map.serialize_entry("message", &self.message)?;
            map.end()
        }
    }

    impl Serialize for PgnMove {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            map.serialize_entry("moveNumber", &self.move_number)?;
            map.serialize_entry("notation", &self.notation)?;
            map.serialize_entry("variations", &self.variations)?;
            if !self.nags.is_empty() {
                map.serialize_entry("nags", &self.nags)?;
            }
            if self.draw_offer {
                map.serialize_entry("drawOffer", &true)?;
            }
            if let Some(ref comment) = self.comment_move {
                map.serialize_entry("commentMove", comment)?;
            }
            if let Some(ref comment) = self.comment_after {
                map.serialize_entry("commentAfter", comment)?;
            }
            if let Some(ref diag) = self.comment_diag {
                map.serialize_entry("commentDiag", diag)?;
            }
            map.serialize_entry("turn", &self.turn)?;
            map.end()
        }
    }

    impl Serialize for ParseTree {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            if let Some(ref tags) = self.tags {
                map.serialize_entry("tags", tags)?;
            }
            if let Some(ref comment) = self.game_comment {
                map.serialize_entry("gameComment", comment)?;
            }
            map.serialize_entry("moves", &self.moves)?;
            map.serialize_entry("messages", &self.messages)?;
            map.end()
        }
    }
}
