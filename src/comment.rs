//! Commands embedded in comments.
//!
//! Besides free text, a comment may contain commands of the form
//! `[%name value]`. Well-known commands are interpreted:
//!
//! * `[%cal Ge2e4,Rd7d5]` colored arrows,
//! * `[%csl Ye4,Bd5]` colored squares,
//! * `[%clk 1:59:58]`, `[%egt ..]`, `[%emt ..]`, `[%mct ..]` clock values,
//! * `[%eval -1.02]` engine evaluations.
//!
//! Any other command is kept by name.
//!
//! # Examples
//!
//! ```
//! use pgn_parser::DiagramComment;
//!
//! let mut diag = DiagramComment::default();
//! let mut messages = Vec::new();
//! let text = diag.read_commands("Start [%clk 0:10:10] [%cal Ge2e4] end", &mut messages);
//! assert_eq!(text.as_deref(), Some("Start end"));
//! assert_eq!(diag.clk.as_deref(), Some("0:10:10"));
//! assert_eq!(diag.color_arrows, Some(vec!["Ge2e4".to_owned()]));
//! assert!(messages.is_empty());
//! ```

use alloc::{
    borrow::ToOwned as _,
    collections::BTreeMap,
    format,
    string::String,
    vec::Vec,
};
use core::fmt;

use arrayvec::ArrayVec;

use crate::{
    square::is_square,
    tree::{report, Message},
};

/// A comment as it appears in the movetext, without the delimiters.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawComment<'a>(pub &'a [u8]);

impl<'a> RawComment<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl fmt::Debug for RawComment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// The value of a command that is not interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandValue {
    /// The command was given without a value, like `[%novelty]`.
    Flag,
    Text(String),
}

/// Commands collected from one or more comments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramComment {
    /// Free text, only used for comments before the first move.
    pub comment: Option<String>,
    pub color_arrows: Option<Vec<String>>,
    pub color_fields: Option<Vec<String>>,
    pub clk: Option<String>,
    pub egt: Option<String>,
    pub emt: Option<String>,
    pub mct: Option<String>,
    pub eval: Option<f64>,
    /// Commands without special meaning, and malformed values of the
    /// well-known ones.
    pub commands: BTreeMap<String, CommandValue>,
}

impl DiagramComment {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none()
            && self.color_arrows.is_none()
            && self.color_fields.is_none()
            && self.clk.is_none()
            && self.egt.is_none()
            && self.emt.is_none()
            && self.mct.is_none()
            && self.eval.is_none()
            && self.commands.is_empty()
    }

    /// Merges commands of a later comment into this one. Texts and lists
    /// are concatenated, other values are replaced.
    pub fn merge(&mut self, other: DiagramComment) {
        if let Some(text) = other.comment {
            append_text(&mut self.comment, &text);
        }
        if let Some(arrows) = other.color_arrows {
            self.color_arrows.get_or_insert_with(Vec::new).extend(arrows);
        }
        if let Some(fields) = other.color_fields {
            self.color_fields.get_or_insert_with(Vec::new).extend(fields);
        }
        self.clk = other.clk.or(self.clk.take());
        self.egt = other.egt.or(self.egt.take());
        self.emt = other.emt.or(self.emt.take());
        self.mct = other.mct.or(self.mct.take());
        self.eval = other.eval.or(self.eval);
        self.commands.extend(other.commands);
    }

    /// Reads all commands of the comment `raw` into `self` and returns the
    /// remaining text, with fragments trimmed and joined by a space.
    ///
    /// Whitespace at both ends of every fragment is dropped, including the
    /// leading space of the whole comment, so `{ first [%foo 1.0] second }`
    /// yields `first second`. Whitespace inside a fragment is kept.
    ///
    /// A `[` that does not start a well-formed command is part of the text.
    pub fn read_commands(&mut self, raw: &str, messages: &mut Vec<Message>) -> Option<String> {
        let bytes = raw.as_bytes();
        let mut text = None;
        let mut head = 0;
        let mut pos = 0;

        while let Some(offset) = memchr::memchr(b'[', &bytes[pos..]) {
            let open = pos + offset;
            pos = open + 1;
            if bytes.get(open + 1) != Some(&b'%') {
                continue;
            }
            let Some(len) = memchr::memchr(b']', &bytes[open..]) else {
                break;
            };
            let close = open + len;
            let body = &raw[open + 2..close];
            let name_len = body
                .bytes()
                .take_while(|&ch| ch.is_ascii_alphanumeric() || ch == b'_')
                .count();
            if name_len == 0 {
                continue;
            }

            append_text(&mut text, &raw[head..open]);
            self.read_command(&body[..name_len], body[name_len..].trim(), messages);
            head = close + 1;
            pos = head;
        }

        append_text(&mut text, &raw[head..]);
        text
    }

    fn read_command(&mut self, name: &str, value: &str, messages: &mut Vec<Message>) {
        let valid = match name {
            "clk" | "egt" | "emt" | "mct" => {
                let valid = check_clock(name, value, messages);
                if valid {
                    let slot = match name {
                        "clk" => &mut self.clk,
                        "egt" => &mut self.egt,
                        "emt" => &mut self.emt,
                        _ => &mut self.mct,
                    };
                    *slot = Some(value.to_owned());
                }
                valid
            }
            "eval" => match parse_eval(value) {
                Some(eval) => {
                    self.eval = Some(eval);
                    true
                }
                None => false,
            },
            "cal" => read_list(value, 5, &mut self.color_arrows),
            "csl" => read_list(value, 3, &mut self.color_fields),
            _ => {
                self.commands.insert(
                    name.to_owned(),
                    if value.is_empty() {
                        CommandValue::Flag
                    } else {
                        CommandValue::Text(value.to_owned())
                    },
                );
                true
            }
        };

        if !valid {
            report(
                messages,
                Message::new(
                    name,
                    value,
                    format!("Format of command: \"{name}\" not correct: \"{value}\""),
                ),
            );
            self.commands
                .insert(name.to_owned(), CommandValue::Text(value.to_owned()));
        }
    }
}

fn append_text(text: &mut Option<String>, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    match text {
        Some(text) => {
            text.push(' ');
            text.push_str(fragment);
        }
        None => *text = Some(fragment.to_owned()),
    }
}

fn is_color(ch: u8) -> bool {
    matches!(ch, b'R' | b'G' | b'Y' | b'B' | b'O' | b'C')
}

/// Reads a comma separated list of colored squares (`len == 3`) or arrows
/// (`len == 5`). An empty list is valid.
fn read_list(value: &str, len: usize, list: &mut Option<Vec<String>>) -> bool {
    let items: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();
    let valid = items.iter().all(|item| match item.as_bytes() {
        [color, squares @ ..] if squares.len() + 1 == len && is_color(*color) => {
            squares.chunks(2).all(is_square)
        }
        _ => false,
    });
    if valid {
        list.get_or_insert_with(Vec::new)
            .extend(items.into_iter().map(str::to_owned));
    }
    valid
}

fn parse_eval(value: &str) -> Option<f64> {
    let digits = value.strip_prefix(|ch| ch == '+' || ch == '-').unwrap_or(value);
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let well_formed = !int.is_empty()
        && int.bytes().all(|ch| ch.is_ascii_digit())
        && frac.bytes().all(|ch| ch.is_ascii_digit())
        && !digits.ends_with('.');
    if well_formed {
        value.parse().ok()
    } else {
        None
    }
}

/// Checks the shape of a clock value like `1:59:58` and reports unusual
/// but accepted forms.
fn check_clock(name: &str, value: &str, messages: &mut Vec<Message>) -> bool {
    let (time, millis) = match value.split_once('.') {
        Some((time, millis)) => (time, Some(millis)),
        None => (value, None),
    };
    if millis.is_some_and(|millis| millis.is_empty() || !millis.bytes().all(|ch| ch.is_ascii_digit())) {
        return false;
    }

    let mut parts: ArrayVec<&str, 3> = ArrayVec::new();
    for part in time.split(':') {
        if part.is_empty() || !part.bytes().all(|ch| ch.is_ascii_digit()) {
            return false;
        }
        if parts.try_push(part).is_err() {
            return false;
        }
    }

    let warning = match parts.as_slice() {
        [hours, minutes, seconds] => {
            if minutes.len() != 2 || seconds.len() != 2 {
                return false;
            }
            match (name, hours.len()) {
                ("mct", 1) => Some("Only 2 digits for hours normally used"),
                ("clk" | "egt" | "emt", 2) => Some("Only 1 digit for hours normally used"),
                _ => None,
            }
        }
        [minutes, seconds] => {
            if minutes.len() > 2 || seconds.len() != 2 {
                return false;
            }
            Some("No hours found")
        }
        [_seconds] => Some("Hours and minutes missing"),
        _ => return false,
    };

    if let Some(warning) = warning {
        report(messages, Message::new(name, value, warning));
    }
    if millis.is_some() {
        report(
            messages,
            Message::new(name, value, "Unusual use of millis in clock value"),
        );
    }
    true
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap as _, Serializer};

    use super::*;

    impl Serialize for CommandValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                CommandValue::Flag => serializer.serialize_bool(true),
                CommandValue::Text(text) => serializer.serialize_str(text),
            }
        }
    }

    impl Serialize for DiagramComment {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            if let Some(ref comment) = self.comment {
                map.serialize_entry("comment", comment)?;
            }
            if let Some(ref arrows) = self.color_arrows {
                map.serialize_entry("colorArrows", arrows)?;
            }
            if let Some(ref fields) = self.color_fields {
                map.serialize_entry("colorFields", fields)?;
            }
            for (name, clock) in [
                ("clk", &self.clk),
                ("egt", &self.egt),
                ("emt", &self.emt),
                ("mct", &self.mct),
            ] {
                if let Some(clock) = clock {
                    map.serialize_entry(name, clock)?;
                }
            }
            if let Some(eval) = self.eval {
                map.serialize_entry("eval", &eval)?;
            }
            for (name, value) in &self.commands {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn read(raw: &str) -> (Option<String>, DiagramComment, Vec<Message>) {
        let mut diag = DiagramComment::default();
        let mut messages = Vec::new();
        let text = diag.read_commands(raw, &mut messages);
        (text, diag, messages)
    }

    #[test]
    fn test_text_only() {
        let (text, diag, _) = read("  just   a comment ");
        assert_eq!(text.as_deref(), Some("just   a comment"));
        assert!(diag.is_empty());

        let (text, _, _) = read("");
        assert_eq!(text, None);
    }

    #[test]
    fn test_text_around_commands() {
        let (text, diag, messages) =
            read("Start [%clk 0:10:10] comment [%egt 0:10:10] up to end");
        assert_eq!(text.as_deref(), Some("Start comment up to end"));
        assert_eq!(diag.clk.as_deref(), Some("0:10:10"));
        assert_eq!(diag.egt.as_deref(), Some("0:10:10"));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_fragments_are_trimmed() {
        let (text, diag, messages) =
            read(" first comment [%foo 1.0] second comment [%bar any,string] ");
        assert_eq!(text.as_deref(), Some("first comment second comment"));
        assert_eq!(diag.commands.len(), 2);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_brackets_without_command() {
        let (text, diag, _) = read("see [this] and [%");
        assert_eq!(text.as_deref(), Some("see [this] and [%"));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_colors() {
        let (text, diag, messages) = read("[%csl Ya4, Gh8,Be1] [%cal Ye4e8,Rd1d8]");
        assert_eq!(text, None);
        assert_eq!(
            diag.color_fields,
            Some(vec!["Ya4".to_owned(), "Gh8".to_owned(), "Be1".to_owned()])
        );
        assert_eq!(
            diag.color_arrows,
            Some(vec!["Ye4e8".to_owned(), "Rd1d8".to_owned()])
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_empty_color_lists() {
        let (_, diag, messages) = read("[%csl Ge5][%cal ]");
        assert_eq!(diag.color_fields, Some(vec!["Ge5".to_owned()]));
        assert_eq!(diag.color_arrows, Some(vec![]));
        assert!(!diag.is_empty());
        assert!(messages.is_empty());
    }

    #[test]
    fn test_malformed_colors() {
        let (_, diag, messages) = read("[%csl Xa4]");
        assert_eq!(diag.color_fields, None);
        assert_eq!(
            diag.commands.get("csl"),
            Some(&CommandValue::Text("Xa4".to_owned()))
        );
        assert_eq!(
            messages[0].message,
            "Format of command: \"csl\" not correct: \"Xa4\""
        );
    }

    #[test]
    fn test_eval() {
        assert_eq!(read("[%eval -1.02]").1.eval, Some(-1.02));
        assert_eq!(read("[%eval 5]").1.eval, Some(5.0));
        assert_eq!(read("[%eval +0.35]").1.eval, Some(0.35));

        let (_, diag, messages) = read("[%eval #-3]");
        assert_eq!(diag.eval, None);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key, "eval");
    }

    #[test]
    fn test_unknown_commands() {
        let (_, diag, messages) = read("[%foo 1.0] [%bar any,string] [%novelty]");
        assert_eq!(
            diag.commands.get("foo"),
            Some(&CommandValue::Text("1.0".to_owned()))
        );
        assert_eq!(
            diag.commands.get("bar"),
            Some(&CommandValue::Text("any,string".to_owned()))
        );
        assert_eq!(diag.commands.get("novelty"), Some(&CommandValue::Flag));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_clock_warnings() {
        for (raw, expected) in [
            ("[%clk 1:59:58]", None),
            ("[%clk 01:59:58]", Some("Only 1 digit for hours normally used")),
            ("[%mct 1:10:42]", Some("Only 2 digits for hours normally used")),
            ("[%mct 01:10:42]", None),
            ("[%egt 59:58]", Some("No hours found")),
            ("[%emt 58]", Some("Hours and minutes missing")),
            ("[%clk 0:00:59.8]", Some("Unusual use of millis in clock value")),
        ] {
            let (_, diag, messages) = read(raw);
            assert_eq!(
                messages.first().map(|m| m.message.as_str()),
                expected,
                "{raw}"
            );
            assert!(diag.commands.is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_malformed_clock() {
        let (_, diag, messages) = read("[%clk 1:5x:00]");
        assert_eq!(diag.clk, None);
        assert_eq!(
            diag.commands.get("clk"),
            Some(&CommandValue::Text("1:5x:00".to_owned()))
        );
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_merge() {
        let (_, mut first, _) = read("[%cal Ye4e8] [%clk 1:00:00]");
        let (_, second, _) = read("[%cal Rd1d8] [%clk 0:59:00] [%csl Rd4]");
        first.merge(second);
        assert_eq!(
            first.color_arrows,
            Some(vec!["Ye4e8".to_owned(), "Rd1d8".to_owned()])
        );
        assert_eq!(first.color_fields, Some(vec!["Rd4".to_owned()]));
        assert_eq!(first.clk.as_deref(), Some("0:59:00"));
    }
}
