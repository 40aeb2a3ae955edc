use core::{fmt, str::FromStr};

/// A numeric annotation glyph like `?`, `!!` or `$42`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Nag(pub u32);

/// Symbolic glyphs and their numeric equivalents. Longer glyphs come before
/// their prefixes.
const GLYPHS: &[(&str, Nag)] = &[
    ("+/=", Nag::WHITE_SLIGHT_ADVANTAGE),
    ("=/+", Nag::BLACK_SLIGHT_ADVANTAGE),
    ("+/-", Nag::WHITE_MODERATE_ADVANTAGE),
    ("-/+", Nag::BLACK_MODERATE_ADVANTAGE),
    ("!!", Nag::BRILLIANT_MOVE),
    ("??", Nag::BLUNDER),
    ("!?", Nag::SPECULATIVE_MOVE),
    ("?!", Nag::DUBIOUS_MOVE),
    ("+=", Nag::WHITE_SLIGHT_ADVANTAGE),
    ("=+", Nag::BLACK_SLIGHT_ADVANTAGE),
    ("+-", Nag::WHITE_DECISIVE_ADVANTAGE),
    ("-+", Nag::BLACK_DECISIVE_ADVANTAGE),
    ("!", Nag::GOOD_MOVE),
    ("?", Nag::MISTAKE),
    ("=", Nag::DRAWISH_POSITION),
    ("\u{25a1}", Nag::FORCED_MOVE), // □
    ("\u{221e}", Nag::UNCLEAR_POSITION), // ∞
    ("\u{2a72}", Nag::WHITE_SLIGHT_ADVANTAGE), // ⩲
    ("\u{2a71}", Nag::BLACK_SLIGHT_ADVANTAGE), // ⩱
    ("\u{b1}", Nag::WHITE_MODERATE_ADVANTAGE), // ±
    ("\u{2213}", Nag::BLACK_MODERATE_ADVANTAGE), // ∓
    ("\u{2a00}", Nag::ZUGZWANG), // ⨀
    ("\u{27f3}", Nag::DEVELOPMENT_ADVANTAGE), // ⟳
    ("\u{2192}", Nag::INITIATIVE), // →
    ("\u{2191}", Nag::ATTACK), // ↑
    ("\u{21c6}", Nag::COUNTERPLAY), // ⇆
];

impl Nag {
    /// Tries to parse a NAG from ASCII (or one of the common Unicode
    /// glyphs).
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_parser::Nag;
    ///
    /// assert_eq!(Nag::from_ascii(b"??"), Ok(Nag(4)));
    /// assert_eq!(Nag::from_ascii(b"$24"), Ok(Nag(24)));
    /// assert_eq!(Nag::from_ascii(b"+="), Ok(Nag(14)));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidNag`] error if the input is neither a known glyph
    /// (`?!`, `!`, `+-`, ...) nor a numeric annotation like `$0` or `$146`.
    pub fn from_ascii(s: &[u8]) -> Result<Nag, InvalidNag> {
        match Nag::parse_prefix(s) {
            Some((nag, len)) if len == s.len() => Ok(nag),
            _ => Err(InvalidNag),
        }
    }

    /// Reads a NAG at the start of `s`, returning it together with the
    /// number of bytes it spans. Symbolic glyphs match greedily, so `!?`
    /// is a single annotation. Numbers beyond `u32::MAX` saturate.
    pub fn parse_prefix(s: &[u8]) -> Option<(Nag, usize)> {
        if let Some(digits) = s.strip_prefix(b"$") {
            let len = digits.iter().take_while(|ch| ch.is_ascii_digit()).count();
            return btoi::btou_saturating(&digits[..len]).ok().map(|n| (Nag(n), len + 1));
        }

        GLYPHS
            .iter()
            .find(|(glyph, _)| s.starts_with(glyph.as_bytes()))
            .map(|&(glyph, nag)| (nag, glyph.len()))
    }

    /// A good move (`!`).
    pub const GOOD_MOVE: Nag = Nag(1);

    /// A mistake (`?`).
    pub const MISTAKE: Nag = Nag(2);

    /// A brilliant move (`!!`).
    pub const BRILLIANT_MOVE: Nag = Nag(3);

    /// A blunder (`??`).
    pub const BLUNDER: Nag = Nag(4);

    /// A speculative move (`!?`).
    pub const SPECULATIVE_MOVE: Nag = Nag(5);

    /// A dubious move (`?!`).
    pub const DUBIOUS_MOVE: Nag = Nag(6);

    /// A forced move (`□`).
    pub const FORCED_MOVE: Nag = Nag(7);

    /// A drawish position (`=`).
    pub const DRAWISH_POSITION: Nag = Nag(10);

    /// An unclear position (`∞`).
    pub const UNCLEAR_POSITION: Nag = Nag(13);

    /// White is slightly better (`+=`, `+/=`, `⩲`).
    pub const WHITE_SLIGHT_ADVANTAGE: Nag = Nag(14);

    /// Black is slightly better (`=+`, `=/+`, `⩱`).
    pub const BLACK_SLIGHT_ADVANTAGE: Nag = Nag(15);

    /// White is better (`+/-`, `±`).
    pub const WHITE_MODERATE_ADVANTAGE: Nag = Nag(16);

    /// Black is better (`-/+`, `∓`).
    pub const BLACK_MODERATE_ADVANTAGE: Nag = Nag(17);

    /// White is winning (`+-`).
    pub const WHITE_DECISIVE_ADVANTAGE: Nag = Nag(18);

    /// Black is winning (`-+`).
    pub const BLACK_DECISIVE_ADVANTAGE: Nag = Nag(19);

    /// Zugzwang (`⨀`).
    pub const ZUGZWANG: Nag = Nag(22);

    /// Development advantage (`⟳`).
    pub const DEVELOPMENT_ADVANTAGE: Nag = Nag(32);

    /// With the initiative (`→`).
    pub const INITIATIVE: Nag = Nag(36);

    /// With an attack (`↑`).
    pub const ATTACK: Nag = Nag(40);

    /// With counterplay (`⇆`).
    pub const COUNTERPLAY: Nag = Nag(132);
}

impl fmt::Display for Nag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl From<u8> for Nag {
    fn from(nag: u8) -> Nag {
        Nag(u32::from(nag))
    }
}

impl From<u32> for Nag {
    fn from(nag: u32) -> Nag {
        Nag(nag)
    }
}

impl From<Nag> for u32 {
    fn from(Nag(nag): Nag) -> u32 {
        nag
    }
}

impl FromStr for Nag {
    type Err = InvalidNag;

    fn from_str(s: &str) -> Result<Nag, InvalidNag> {
        Nag::from_ascii(s.as_bytes())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Nag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Error when parsing an invalid NAG.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct InvalidNag;

impl fmt::Display for InvalidNag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid nag")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidNag {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString as _;

    use super::*;

    #[test]
    fn test_nag() {
        assert_eq!(Nag::from_ascii(b"$1"), Ok(Nag(1)));
        assert_eq!(Nag::from_ascii(b"$12"), Ok(Nag(12)));
        assert_eq!(Nag::from_ascii(b"$123"), Ok(Nag(123)));
        assert_eq!(Nag::from_ascii(b"$256"), Ok(Nag(256)));
        assert_eq!(Nag::from_ascii(b"$1234"), Ok(Nag(1234)));
        assert_eq!(Nag::from_ascii(b"$99999999999"), Ok(Nag(u32::MAX)));
        assert_eq!(Nag::from_ascii(b"$"), Err(InvalidNag));
    }

    #[test]
    fn test_glyphs() {
        for (glyph, expected) in [
            ("?", "$2"),
            ("!", "$1"),
            ("??", "$4"),
            ("!!", "$3"),
            ("!?", "$5"),
            ("?!", "$6"),
            ("+=", "$14"),
            ("=+", "$15"),
            ("+/-", "$16"),
            ("-/+", "$17"),
            ("+-", "$18"),
            ("-+", "$19"),
            ("∞", "$13"),
            ("±", "$16"),
        ] {
            let nag: Nag = glyph.parse().expect("known glyph");
            assert_eq!(nag.to_string(), expected, "glyph {glyph}");
        }
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(Nag::parse_prefix(b"!? e5"), Some((Nag::SPECULATIVE_MOVE, 2)));
        assert_eq!(Nag::parse_prefix(b"$1$2"), Some((Nag(1), 2)));
        assert_eq!(Nag::parse_prefix(b"+/= "), Some((Nag(14), 3)));
        assert_eq!(Nag::parse_prefix(b"e4"), None);
        assert_eq!(Nag::parse_prefix(b"--"), None);
    }
}
