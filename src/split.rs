use alloc::{borrow::ToOwned as _, format, string::String, vec::Vec};

/// The text of one game from a multi-game input.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct SplitGame {
    /// The tag section, or empty.
    pub tags: String,
    /// The movetext section.
    pub pgn: String,
    /// Tags and movetext, separated by a blank line.
    pub all: String,
}

/// Splits a multi-game input into the text of its games, without parsing.
///
/// Line endings are normalized to `\n`. Sections are separated by blank
/// lines, and a section starting with `[` holds the tags of the next game.
///
/// # Examples
///
/// ```
/// use pgn_parser::split_games;
///
/// let games = split_games("[Event \"A\"]\r\n\r\n1. e4 *\r\n\r\n1. d4 *\r\n");
/// assert_eq!(games.len(), 2);
/// assert_eq!(games[0].tags, "[Event \"A\"]");
/// assert_eq!(games[0].all, "[Event \"A\"]\n\n1. e4 *");
/// assert_eq!(games[1].tags, "");
/// assert_eq!(games[1].all, "1. d4 *\n");
/// ```
pub fn split_games(input: &str) -> Vec<SplitGame> {
    let normalized = input.replace("\r\n", "\n");

    let mut games = Vec::new();
    let mut tags: Option<&str> = None;
    for section in sections(&normalized) {
        if section.starts_with('[') {
            tags = Some(section);
        } else if !section.is_empty() {
            let all = match tags {
                Some(tags) => format!("{tags}\n\n{section}"),
                None => section.to_owned(),
            };
            games.push(SplitGame {
                tags: tags.take().unwrap_or_default().to_owned(),
                pgn: section.to_owned(),
                all,
            });
        }
    }
    games
}

/// Splits at runs of two or more newlines.
fn sections(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut sections = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'\n' {
            i += 1;
        }
        if i - run_start >= 2 {
            sections.push(&s[start..run_start]);
            start = i;
        }
    }
    sections.push(&s[start..]);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections() {
        assert_eq!(sections("a\n\n\nb\nc\n\nd"), ["a", "b\nc", "d"]);
        assert_eq!(sections("\n\na"), ["", "a"]);
        assert_eq!(sections(""), [""]);
    }

    #[test]
    fn test_tags_without_movetext() {
        let games = split_games("[Event \"A\"]\n\n[Event \"B\"]\n\n1. e4 *");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].tags, "[Event \"B\"]");
    }

    #[test]
    fn test_movetext_only() {
        let games = split_games("1. e4 *\n\n\n\n1. d4 *");
        assert_eq!(games.len(), 2);
        assert!(games.iter().all(|game| game.tags.is_empty()));
        assert_eq!(games[1].pgn, "1. d4 *");
    }
}
