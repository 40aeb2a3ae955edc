use proptest::prelude::*;
use pgn_parser::{parse, parse_games, san::Notation, Color, ParseOptions, Parsed, PgnMove, StartRule};

fn pgn_options() -> ParseOptions {
    ParseOptions::new().start_rule(StartRule::Pgn)
}

#[test]
fn test_deeply_nested_variations() {
    const DEPTH: usize = 20_000;
    let input = format!("1. e4 {}{}", "(d4 ".repeat(DEPTH), ")".repeat(DEPTH));

    let Ok(Parsed::Game(tree)) = parse(&input, &pgn_options()) else {
        panic!("expected a single tree");
    };
    assert_eq!(tree.moves.len(), 1);
    assert_eq!(tree.count_moves(), DEPTH + 1);
}

#[test]
fn test_deeply_nested_unclosed_variation() {
    const DEPTH: usize = 20_000;
    let input = format!("1. e4 {}", "(d4 ".repeat(DEPTH));
    let err = parse(&input, &pgn_options()).unwrap_err();
    assert_eq!(err.found(), None);
}

fn assert_alternating(line: &[PgnMove], first: Color) {
    let mut turn = first;
    for m in line {
        assert_eq!(m.turn, turn);
        for variation in &m.variations {
            assert_alternating(variation, m.turn);
        }
        turn = !turn;
    }
}

proptest! {
    #[test]
    fn turns_alternate(
        variations in proptest::collection::vec(0usize..3, 1..40),
        black_first in any::<bool>(),
    ) {
        let mut input = String::new();
        for (i, &len) in variations.iter().enumerate() {
            input.push_str(if i % 2 == 0 { "e4 " } else { "e5 " });
            if len > 0 {
                input.push('(');
                for _ in 0..len {
                    input.push_str("d4 d5 ");
                }
                input.push_str(") ");
            }
        }

        let (options, first) = if black_first {
            (pgn_options().fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1"), Color::Black)
        } else {
            (pgn_options(), Color::White)
        };
        let Ok(Parsed::Game(tree)) = parse(&input, &options) else {
            panic!("expected a single tree");
        };
        prop_assert_eq!(tree.moves.len(), variations.len());
        assert_alternating(&tree.moves, first);
    }

    #[test]
    fn parse_games_never_panics(input in "\\PC*") {
        let _ = parse_games(&input, &ParseOptions::default());
    }

    #[test]
    fn pgn_like_input_never_panics(input in "[\\[\\]\"{}();%$!?=+#@*.0-9a-hxKQRBNOPZ \n-]{0,64}") {
        let _ = parse(&input, &pgn_options());
        let _ = parse_games(&input, &ParseOptions::default());
    }

    #[test]
    fn notation_prefix_stays_in_bounds(input in proptest::collection::vec(any::<u8>(), 0..16)) {
        if let Ok((notation, len)) = Notation::parse_prefix(&input) {
            prop_assert!(len > 0);
            prop_assert!(len <= input.len());
            prop_assert!(!notation.notation.is_empty());
        }
    }

    #[test]
    fn canonical_notation_round_trips(san in "[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8][+#]?") {
        let notation: Notation = san.parse().expect("valid san");
        prop_assert_eq!(notation.to_string(), san);
    }

    #[test]
    fn error_location_is_in_input(input in "1\\. e4 [a-zA-Z0-9(){} .]{0,32}") {
        if let Err(err) = parse(&input, &pgn_options()) {
            let location = err.location().expect("location");
            prop_assert!(location.offset <= input.len());
            prop_assert!(err.hint().contains("**"));
        }
    }
}
