use alloc::{string::String, vec, vec::Vec};
use core::{mem, ops::ControlFlow};

use crate::{
    comment::{DiagramComment, RawComment},
    san::Notation,
    tag::RawTag,
    tags::Tags,
    tree::{Message, ParseTree, PgnMove},
    visitor::{Skip, Visitor},
    Nag, Outcome, StartRule,
};

/// Comments seen where no move can take them yet.
#[derive(Debug, Default)]
struct Pending {
    text: Option<String>,
    diag: DiagramComment,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.diag.is_empty()
    }

    fn push(&mut self, text: Option<String>, diag: DiagramComment) {
        if let Some(text) = text {
            append(&mut self.text, text);
        }
        self.diag.merge(diag);
    }
}

fn append(target: &mut Option<String>, text: String) {
    match target {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&text);
        }
        None => *target = Some(text),
    }
}

fn attach_after(m: &mut PgnMove, text: Option<String>, diag: DiagramComment) {
    if let Some(text) = text {
        append(&mut m.comment_after, text);
    }
    if !diag.is_empty() {
        m.comment_diag.get_or_insert_with(DiagramComment::default).merge(diag);
    }
}

#[derive(Debug, Default)]
struct Line {
    moves: Vec<PgnMove>,
    number: Option<u32>,
    pending: Pending,
    /// A variation was closed since the last move of this line.
    after_variation: bool,
}

impl Line {
    /// Hands comments still pending at the end of the line to its last move.
    fn flush(&mut self) {
        if let Some(last) = self.moves.last_mut() {
            let pending = mem::take(&mut self.pending);
            attach_after(last, pending.text, pending.diag);
        }
    }
}

/// A game under construction.
#[derive(Debug)]
pub(crate) struct Draft {
    tags: Tags,
    tagged: bool,
    messages: Vec<Message>,
    game_comment: Option<DiagramComment>,
    /// Open lines, main line first.
    lines: Vec<Line>,
    outcome: Option<Outcome>,
}

impl Draft {
    fn line(&mut self) -> &mut Line {
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        let top = self.lines.len() - 1;
        &mut self.lines[top]
    }

    fn last_move(&mut self) -> Option<&mut PgnMove> {
        self.line().moves.last_mut()
    }

    fn set_game_comment(&mut self, pending: Pending) {
        let mut diag = pending.diag;
        diag.comment = pending.text;
        self.game_comment
            .get_or_insert_with(DiagramComment::default)
            .merge(diag);
    }

    fn attach(&mut self, text: Option<String>, diag: DiagramComment) {
        let line = self.line();
        match line.moves.last_mut() {
            Some(last) if !line.after_variation && line.number.is_none() => {
                attach_after(last, text, diag);
            }
            _ => line.pending.push(text, diag),
        }
    }
}

/// A game as produced by [`TreeBuilder`], before post-processing.
#[derive(Debug)]
pub(crate) struct BuiltGame {
    pub tree: ParseTree,
    /// At least one tag pair was read.
    pub tagged: bool,
    pub outcome: Option<Outcome>,
}

/// Assembles a [`ParseTree`] from reader events.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    rule: StartRule,
}

impl TreeBuilder {
    pub fn new(rule: StartRule) -> TreeBuilder {
        TreeBuilder { rule }
    }
}

impl Visitor for TreeBuilder {
    type Tags = Draft;
    type Movetext = Draft;
    type Output = BuiltGame;

    fn begin_tags(&mut self) -> ControlFlow<BuiltGame, Draft> {
        ControlFlow::Continue(Draft::default())
    }

    fn tag(&mut self, draft: &mut Draft, name: &[u8], value: RawTag<'_>) -> ControlFlow<BuiltGame> {
        draft.tagged = true;
        let name = String::from_utf8_lossy(name);
        let value = value.decode_utf8_lossy();
        draft.tags.push(&name, &value, &mut draft.messages);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, draft: Draft) -> ControlFlow<BuiltGame, Draft> {
        ControlFlow::Continue(draft)
    }

    fn move_number(&mut self, draft: &mut Draft, number: u32) -> ControlFlow<BuiltGame> {
        draft.line().number = Some(number);
        ControlFlow::Continue(())
    }

    fn san(&mut self, draft: &mut Draft, notation: Notation) -> ControlFlow<BuiltGame> {
        let first_of_game = draft.lines.len() == 1 && draft.lines[0].moves.is_empty();
        let line = draft.line();
        let mut m = PgnMove::new(notation);
        m.move_number = line.number.take();
        line.after_variation = false;
        let pending = mem::take(&mut line.pending);

        if !pending.is_empty() {
            if first_of_game && self.rule != StartRule::Pgn {
                draft.set_game_comment(pending);
            } else {
                m.comment_move = pending.text;
                if !pending.diag.is_empty() {
                    m.comment_diag = Some(pending.diag);
                }
            }
        }

        draft.line().moves.push(m);
        ControlFlow::Continue(())
    }

    fn nag(&mut self, draft: &mut Draft, nag: Nag) -> ControlFlow<BuiltGame> {
        if let Some(last) = draft.last_move() {
            last.nags.push(nag);
        }
        ControlFlow::Continue(())
    }

    fn draw_offer(&mut self, draft: &mut Draft) -> ControlFlow<BuiltGame> {
        if let Some(last) = draft.last_move() {
            last.draw_offer = true;
        }
        ControlFlow::Continue(())
    }

    fn comment(&mut self, draft: &mut Draft, comment: RawComment<'_>) -> ControlFlow<BuiltGame> {
        let raw = String::from_utf8_lossy(comment.as_bytes());
        let mut diag = DiagramComment::default();
        let text = diag.read_commands(&raw, &mut draft.messages);
        draft.attach(text, diag);
        ControlFlow::Continue(())
    }

    fn line_comment(&mut self, draft: &mut Draft, comment: RawComment<'_>) -> ControlFlow<BuiltGame> {
        let raw = String::from_utf8_lossy(comment.as_bytes());
        if !raw.trim().is_empty() {
            draft.attach(Some(raw.into_owned()), DiagramComment::default());
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, draft: &mut Draft) -> ControlFlow<BuiltGame, Skip> {
        draft.lines.push(Line::default());
        ControlFlow::Continue(Skip(false))
    }

    fn end_variation(&mut self, draft: &mut Draft) -> ControlFlow<BuiltGame> {
        if draft.lines.len() > 1 {
            if let Some(mut variation) = draft.lines.pop() {
                variation.flush();
                let parent = draft.line();
                if let Some(last) = parent.moves.last_mut() {
                    last.variations.push(mem::take(&mut variation.moves));
                }
                parent.after_variation = true;
            }
        }
        ControlFlow::Continue(())
    }

    fn outcome(&mut self, draft: &mut Draft, outcome: Outcome) -> ControlFlow<BuiltGame> {
        draft.outcome = Some(outcome);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, mut draft: Draft) -> BuiltGame {
        while draft.lines.len() > 1 {
            let _ = self.end_variation(&mut draft);
        }

        let mut main = draft.lines.pop().unwrap_or_default();
        if main.moves.is_empty() {
            let pending = mem::take(&mut main.pending);
            if !pending.is_empty() {
                draft.set_game_comment(pending);
            }
        } else {
            main.flush();
        }

        let keep_tags = draft.tagged || matches!(self.rule, StartRule::Game | StartRule::Tags);
        BuiltGame {
            tree: ParseTree {
                tags: keep_tags.then_some(draft.tags),
                game_comment: draft.game_comment,
                moves: main.moves,
                messages: draft.messages,
            },
            tagged: draft.tagged,
            outcome: draft.outcome,
        }
    }
}

impl Default for Draft {
    fn default() -> Draft {
        Draft {
            tags: Tags::new(),
            tagged: false,
            messages: Vec::new(),
            game_comment: None,
            lines: vec![Line::default()],
            outcome: None,
        }
    }
}
