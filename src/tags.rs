//! Interpretation of tag pair values.
//!
//! Known tags are mapped to typed values according to their [`TagKind`].
//! Values that do not match the expected format are kept as text, and a
//! [`Message`] records the problem. Unknown tags are kept verbatim.

use alloc::{borrow::ToOwned as _, collections::BTreeMap, format, string::String, vec::Vec};
use core::{fmt, str::FromStr};

use crate::{
    tag::{TagKind, TagName},
    timecontrol::TimeControl,
    tree::{report, Message},
    Outcome,
};

/// A component of a [`PgnDate`], which may be replaced by question marks.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum DatePart {
    Known(u32),
    Unknown,
}

impl DatePart {
    pub const fn known(self) -> Option<u32> {
        match self {
            DatePart::Known(n) => Some(n),
            DatePart::Unknown => None,
        }
    }

    fn from_ascii(s: &[u8]) -> Result<DatePart, ParseDateError> {
        if s.iter().all(|&ch| ch == b'?') {
            Ok(DatePart::Unknown)
        } else if s.iter().all(u8::is_ascii_digit) {
            btoi::btou(s).map(DatePart::Known).map_err(|_| ParseDateError)
        } else {
            Err(ParseDateError)
        }
    }
}

/// A date like `2024.03.17`, `2024.??.??` or `2024-03-17`.
///
/// # Examples
///
/// ```
/// use pgn_parser::{DatePart, PgnDate};
///
/// let date: PgnDate = "2024/03/??".parse()?;
/// assert_eq!(date.year, DatePart::Known(2024));
/// assert_eq!(date.month, DatePart::Known(3));
/// assert_eq!(date.day, DatePart::Unknown);
/// assert_eq!(date.value, "2024.03.??");
/// # Ok::<_, pgn_parser::ParseDateError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PgnDate {
    /// The date normalized to `.` separators.
    pub value: String,
    pub year: DatePart,
    pub month: DatePart,
    pub day: DatePart,
}

impl PgnDate {
    /// Parses a date. The separators may be `.`, `-` or `/`, but must be
    /// the same twice.
    ///
    /// # Errors
    ///
    /// Returns [`ParseDateError`] if the input is not a 4 digit year, a 2
    /// digit month and a 2 digit day. Each part may be question marks
    /// instead.
    pub fn from_ascii(s: &[u8]) -> Result<PgnDate, ParseDateError> {
        let &[y0, y1, y2, y3, sep, m0, m1, sep2, d0, d1] = s else {
            return Err(ParseDateError);
        };
        if sep != sep2 || !matches!(sep, b'.' | b'-' | b'/') {
            return Err(ParseDateError);
        }
        let date = PgnDate {
            year: DatePart::from_ascii(&[y0, y1, y2, y3])?,
            month: DatePart::from_ascii(&[m0, m1])?,
            day: DatePart::from_ascii(&[d0, d1])?,
            value: String::from_utf8_lossy(&[y0, y1, y2, y3, b'.', m0, m1, b'.', d0, d1])
                .into_owned(),
        };
        Ok(date)
    }
}

impl FromStr for PgnDate {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<PgnDate, ParseDateError> {
        PgnDate::from_ascii(s.as_bytes())
    }
}

/// Error when parsing a malformed date.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseDateError;

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid date")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseDateError {}

/// A time of day, `HH:MM:SS`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PgnTime {
    pub value: String,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl PgnTime {
    /// Parses a time of day with exactly two digits per component.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTimeError`] for anything else.
    pub fn from_ascii(s: &[u8]) -> Result<PgnTime, ParseTimeError> {
        let &[h0, h1, b':', m0, m1, b':', s0, s1] = s else {
            return Err(ParseTimeError);
        };
        let two_digits = |hi: u8, lo: u8| -> Result<u32, ParseTimeError> {
            if hi.is_ascii_digit() && lo.is_ascii_digit() {
                Ok(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
            } else {
                Err(ParseTimeError)
            }
        };
        Ok(PgnTime {
            hour: two_digits(h0, h1)?,
            minute: two_digits(m0, m1)?,
            second: two_digits(s0, s1)?,
            value: String::from_utf8_lossy(s).into_owned(),
        })
    }
}

impl FromStr for PgnTime {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<PgnTime, ParseTimeError> {
        PgnTime::from_ascii(s.as_bytes())
    }
}

/// Error when parsing a malformed time of day.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseTimeError;

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid time")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseTimeError {}

/// A rating or other integer valued tag.
///
/// The value is kept as written. `int` holds its leading integer, if any,
/// so that `"2200 (provisional)"` is still usable as a rating.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Elo {
    pub value: String,
    pub int: Option<u32>,
}

impl Elo {
    pub fn new(value: &str) -> Elo {
        if value.is_empty() || value == "-" {
            return Elo {
                value: "-".to_owned(),
                int: None,
            };
        }
        let len = value.bytes().take_while(u8::is_ascii_digit).count();
        Elo {
            int: btoi::btou(&value.as_bytes()[..len]).ok(),
            value: value.to_owned(),
        }
    }
}

/// The interpreted value of a known tag.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TagValue {
    Text(String),
    Date(PgnDate),
    Time(PgnTime),
    Elo(Elo),
    TimeControl(TimeControl),
}

impl TagValue {
    /// The value as written (or normalized, for dates and results).
    pub fn as_str(&self) -> &str {
        match self {
            TagValue::Text(text) => text,
            TagValue::Date(date) => &date.value,
            TagValue::Time(time) => &time.value,
            TagValue::Elo(elo) => &elo.value,
            TagValue::TimeControl(tc) => &tc.value,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tag pairs of a game.
///
/// When a tag is given more than once, the last value wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tags {
    known: BTreeMap<TagName, TagValue>,
    unknown: BTreeMap<String, String>,
}

impl Tags {
    pub fn new() -> Tags {
        Tags::default()
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.unknown.is_empty()
    }

    pub fn get(&self, name: TagName) -> Option<&TagValue> {
        self.known.get(&name)
    }

    /// Looks up any tag by name. Known tags are matched ignoring ASCII
    /// case, unknown tags exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_parser::Tags;
    ///
    /// let mut tags = Tags::new();
    /// let mut messages = Vec::new();
    /// tags.push("whiteelo", "2700", &mut messages);
    /// tags.push("MyTag", "x", &mut messages);
    /// assert_eq!(tags.get_str("WhiteElo"), Some("2700"));
    /// assert_eq!(tags.get_str("MyTag"), Some("x"));
    /// assert_eq!(tags.get_str("mytag"), None);
    /// ```
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match TagName::from_name(name) {
            Some(known) => self.get(known).map(TagValue::as_str),
            None => self.unknown.get(name).map(String::as_str),
        }
    }

    pub fn date(&self, name: TagName) -> Option<&PgnDate> {
        match self.get(name)? {
            TagValue::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn time(&self, name: TagName) -> Option<&PgnTime> {
        match self.get(name)? {
            TagValue::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn elo(&self, name: TagName) -> Option<&Elo> {
        match self.get(name)? {
            TagValue::Elo(elo) => Some(elo),
            _ => None,
        }
    }

    pub fn time_control(&self) -> Option<&TimeControl> {
        match self.get(TagName::TimeControl)? {
            TagValue::TimeControl(tc) => Some(tc),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&str> {
        self.get(TagName::Result).map(TagValue::as_str)
    }

    pub fn fen(&self) -> Option<&str> {
        self.get(TagName::FEN).map(TagValue::as_str)
    }

    /// Known tags in a fixed order, seven tag roster first.
    pub fn known(&self) -> impl Iterator<Item = (TagName, &TagValue)> {
        self.known.iter().map(|(&name, value)| (name, value))
    }

    /// Tags that are not known to the parser, ordered by name.
    pub fn unknown(&self) -> impl Iterator<Item = (&str, &str)> {
        self.unknown
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Replaces the value of a known tag.
    pub fn insert(&mut self, name: TagName, value: TagValue) -> Option<TagValue> {
        self.known.insert(name, value)
    }

    pub(crate) fn set_result(&mut self, outcome: Outcome) {
        self.known
            .insert(TagName::Result, TagValue::Text(outcome.as_str().to_owned()));
    }

    /// Interprets a tag pair and stores it. Malformed values of known tags
    /// are stored as text, and a diagnostic is appended to `messages`.
    pub fn push(&mut self, name: &str, value: &str, messages: &mut Vec<Message>) {
        let Some(tag) = TagName::from_name(name) else {
            self.unknown.insert(name.to_owned(), value.to_owned());
            return;
        };

        let interpreted = match tag.kind() {
            TagKind::Text => Some(TagValue::Text(value.to_owned())),
            TagKind::Date => PgnDate::from_ascii(value.as_bytes()).ok().map(TagValue::Date),
            TagKind::Time => PgnTime::from_ascii(value.as_bytes()).ok().map(TagValue::Time),
            TagKind::Integer => Some(TagValue::Elo(Elo::new(value))),
            TagKind::Result => normalize_result(value).map(|r| TagValue::Text(r.to_owned())),
            TagKind::TimeControl if value.is_empty() => {
                report(
                    messages,
                    Message::new(tag.as_str(), value, "Tag TimeControl has to have a value"),
                );
                Some(TagValue::Text(String::new()))
            }
            TagKind::TimeControl => TimeControl::from_ascii(value.as_bytes())
                .ok()
                .map(TagValue::TimeControl),
        };

        let interpreted = interpreted.unwrap_or_else(|| {
            report(
                messages,
                Message::new(
                    tag.as_str(),
                    value,
                    format!("Format of tag: \"{tag}\" not correct: \"{value}\""),
                ),
            );
            TagValue::Text(value.to_owned())
        });
        self.known.insert(tag, interpreted);
    }
}

fn normalize_result(value: &str) -> Option<&'static str> {
    if value == "1/2" {
        return Some("1/2-1/2");
    }
    Outcome::from_ascii(value.as_bytes())
        .ok()
        .map(Outcome::as_str)
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap as _, Serializer};

    use super::*;

    struct Part<'a>(DatePart, &'a str);

    impl Serialize for Part<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0 {
                DatePart::Known(n) => serializer.serialize_u32(n),
                DatePart::Unknown => serializer.serialize_str(self.1),
            }
        }
    }

    impl Serialize for PgnDate {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(4))?;
            map.serialize_entry("value", &self.value)?;
            map.serialize_entry("year", &Part(self.year, "????"))?;
            map.serialize_entry("month", &Part(self.month, "??"))?;
            map.serialize_entry("day", &Part(self.day, "??"))?;
            map.end()
        }
    }

    impl Serialize for PgnTime {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(4))?;
            map.serialize_entry("value", &self.value)?;
            map.serialize_entry("hour", &self.hour)?;
            map.serialize_entry("minute", &self.minute)?;
            map.serialize_entry("second", &self.second)?;
            map.end()
        }
    }

    impl Serialize for Elo {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            map.serialize_entry("value", &self.value)?;
            if let Some(int) = self.int {
                map.serialize_entry("int", &int)?;
            }
            map.end()
        }
    }

    impl Serialize for TagValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                TagValue::Text(text) => serializer.serialize_str(text),
                TagValue::Date(date) => date.serialize(serializer),
                TagValue::Time(time) => time.serialize(serializer),
                TagValue::Elo(elo) => elo.serialize(serializer),
                TagValue::TimeControl(tc) => tc.serialize(serializer),
            }
        }
    }

    impl Serialize for Tags {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (name, value) in self.known() {
                map.serialize_entry(name.as_str(), value)?;
            }
            for (name, value) in self.unknown() {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_one(name: &str, value: &str) -> (Tags, Vec<Message>) {
        let mut tags = Tags::new();
        let mut messages = Vec::new();
        tags.push(name, value, &mut messages);
        (tags, messages)
    }

    #[test]
    fn test_dates() {
        for (value, normalized) in [
            ("2024.03.17", "2024.03.17"),
            ("2024-03-17", "2024.03.17"),
            ("2024/??/??", "2024.??.??"),
            ("????.??.??", "????.??.??"),
        ] {
            let date: PgnDate = value.parse().expect("valid date");
            assert_eq!(date.value, normalized);
        }

        for value in ["2024.03-17", "24.03.17", "2024.3.17", "2024.03.1?", "2024 03 17", ""] {
            assert_eq!(value.parse::<PgnDate>(), Err(ParseDateError), "{value:?}");
        }
    }

    #[test]
    fn test_time() {
        let time: PgnTime = "09:05:59".parse().expect("valid time");
        assert_eq!((time.hour, time.minute, time.second), (9, 5, 59));

        for value in ["9:05:59", "09:05", "09-05-59", "09:05:5x"] {
            assert_eq!(value.parse::<PgnTime>(), Err(ParseTimeError), "{value:?}");
        }
    }

    #[test]
    fn test_elo() {
        assert_eq!(Elo::new("2700").int, Some(2700));
        assert_eq!(Elo::new("1800 (provisional)").int, Some(1800));
        assert_eq!(Elo::new("foo").int, None);
        assert_eq!(Elo::new("foo").value, "foo");
        assert_eq!(Elo::new("").value, "-");
        assert_eq!(Elo::new("-").int, None);
    }

    #[test]
    fn test_malformed_date_message() {
        let (tags, messages) = push_one("Date", "2024.3.17");
        assert_eq!(tags.get_str("Date"), Some("2024.3.17"));
        assert_eq!(tags.date(TagName::Date), None);
        assert_eq!(
            messages,
            [Message::new(
                "Date",
                "2024.3.17",
                "Format of tag: \"Date\" not correct: \"2024.3.17\""
            )]
        );
    }

    #[test]
    fn test_result() {
        let (tags, messages) = push_one("Result", "1/2");
        assert_eq!(tags.result(), Some("1/2-1/2"));
        assert!(messages.is_empty());

        let (tags, messages) = push_one("Result", "1:0");
        assert_eq!(tags.result(), Some("1:0"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key, "Result");
    }

    #[test]
    fn test_elo_without_message() {
        let (tags, messages) = push_one("WhiteElo", "foo");
        assert_eq!(tags.elo(TagName::WhiteElo).map(|elo| elo.int), Some(None));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_time_control() {
        let (tags, messages) = push_one("TimeControl", "");
        assert_eq!(tags.get_str("TimeControl"), Some(""));
        assert_eq!(messages[0].message, "Tag TimeControl has to have a value");

        let (tags, messages) = push_one("TimeControl", "40/7200:3600");
        assert_eq!(tags.time_control().map(|tc| tc.items.len()), Some(2));
        assert!(messages.is_empty());

        let (tags, messages) = push_one("TimeControl", "40/7200:400+");
        assert_eq!(tags.time_control(), None);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_last_value_wins() {
        let mut tags = Tags::new();
        let mut messages = Vec::new();
        tags.push("White", "Me", &mut messages);
        tags.push("white", "You", &mut messages);
        assert_eq!(tags.get_str("White"), Some("You"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_unknown() {
        let (tags, _) = push_one("Custom", "anything goes");
        assert_eq!(tags.unknown().collect::<Vec<_>>(), [("Custom", "anything goes")]);
        assert_eq!(tags.known().count(), 0);
    }
}
