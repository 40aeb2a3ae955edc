use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{fmt, str::FromStr};

/// A tag value as it appears between the quotes.
///
/// Provides helper methods for decoding [backslash
/// escaped](http://www.saremba.de/chessgml/standards/pgn/pgn-complete.htm#c7)
/// values.
///
/// > A quote inside a string is represented by the backslash immediately
/// > followed by a quote. A backslash inside a string is represented by
/// > two adjacent backslashes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawTag<'a>(pub &'a [u8]);

impl<'a> RawTag<'a> {
    /// Returns the raw byte representation of the tag value.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Decodes `\"` and `\\`. Other backslashes are kept. Allocates only
    /// when the value actually contains escape sequences.
    pub fn decode(&self) -> Cow<'a, [u8]> {
        let mut decoded: Option<Vec<u8>> = None;
        let mut head = 0;
        for escape in memchr::memchr_iter(b'\\', self.0) {
            if escape < head {
                continue;
            }
            if let Some(&(b'\\' | b'"')) = self.0.get(escape + 1) {
                let buf = decoded.get_or_insert_with(|| Vec::with_capacity(self.0.len()));
                buf.extend_from_slice(&self.0[head..escape]);
                buf.push(self.0[escape + 1]);
                head = escape + 2;
            }
        }
        match decoded {
            Some(mut buf) => {
                buf.extend_from_slice(&self.0[head..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(self.0),
        }
    }

    /// Decodes the tag as UTF-8, replacing any invalid byte sequences with
    /// the placeholder � U+FFFD.
    pub fn decode_utf8_lossy(&self) -> Cow<'a, str> {
        match self.decode() {
            Cow::Borrowed(borrowed) => String::from_utf8_lossy(borrowed),
            Cow::Owned(owned) => Cow::Owned(String::from_utf8_lossy(&owned).into_owned()),
        }
    }
}

impl fmt::Debug for RawTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.decode_utf8_lossy())
    }
}

/// How the value of a known tag is interpreted.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum TagKind {
    /// Plain text.
    Text,
    /// `YYYY.MM.DD`.
    Date,
    /// `HH:MM:SS`.
    Time,
    /// An integer, optionally followed by other text.
    Integer,
    /// A game termination marker.
    Result,
    /// A sequence of time control periods.
    TimeControl,
}

macro_rules! tag_names {
    ($($name:ident => $kind:ident,)+) => {
        /// The name of a tag known to the parser, in its canonical spelling.
        #[allow(missing_docs, clippy::upper_case_acronyms)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
        pub enum TagName {
            $($name,)+
        }

        impl TagName {
            /// All known tag names, seven tag roster first.
            pub const ALL: &'static [TagName] = &[$(TagName::$name,)+];

            /// The canonical spelling, like `WhiteElo`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(TagName::$name => stringify!($name),)+
                }
            }

            pub const fn kind(self) -> TagKind {
                match self {
                    $(TagName::$name => TagKind::$kind,)+
                }
            }
        }
    }
}

tag_names! {
    Event => Text,
    Site => Text,
    Date => Date,
    Round => Text,
    White => Text,
    Black => Text,
    Result => Result,
    WhiteTitle => Text,
    BlackTitle => Text,
    WhiteElo => Integer,
    BlackElo => Integer,
    WhiteUSCF => Integer,
    BlackUSCF => Integer,
    WhiteNA => Text,
    BlackNA => Text,
    WhiteType => Text,
    BlackType => Text,
    EventDate => Date,
    EventSponsor => Text,
    Section => Text,
    Stage => Text,
    Board => Integer,
    Opening => Text,
    Variation => Text,
    SubVariation => Text,
    ECO => Text,
    NIC => Text,
    Time => Time,
    UTCTime => Time,
    UTCDate => Date,
    TimeControl => TimeControl,
    SetUp => Text,
    FEN => Text,
    Termination => Text,
    Annotator => Text,
    Mode => Text,
    PlyCount => Integer,
    Variant => Text,
    WhiteRatingDiff => Text,
    BlackRatingDiff => Text,
    WhiteFideId => Text,
    BlackFideId => Text,
    WhiteTeam => Text,
    BlackTeam => Text,
    Clock => Text,
    WhiteClock => Text,
    BlackClock => Text,
    Orientation => Text,
    PuzzleEngine => Text,
    PuzzleMakerVersion => Text,
    PuzzleCategory => Text,
    PuzzleWinner => Text,
}

impl TagName {
    /// Looks up a known tag name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_parser::TagName;
    ///
    /// assert_eq!(TagName::from_name("whiteELO"), Some(TagName::WhiteElo));
    /// assert_eq!(TagName::from_name("Setup"), Some(TagName::SetUp));
    /// assert_eq!(TagName::from_name("MyTag"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<TagName> {
        TagName::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown tag name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownTagName;

impl fmt::Display for UnknownTagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown tag name")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownTagName {}

impl FromStr for TagName {
    type Err = UnknownTagName;

    fn from_str(s: &str) -> Result<TagName, UnknownTagName> {
        TagName::from_name(s).ok_or(UnknownTagName)
    }
}
