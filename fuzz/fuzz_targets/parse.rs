#![no_main]

use std::ops::ControlFlow;

use libfuzzer_sys::fuzz_target;
use pgn_parser::{parse, parse_games, san::Notation, ParseOptions, Parsed, Reader, StartRule, Visitor};

struct MoveCounter;

impl Visitor for MoveCounter {
    type Tags = ();
    type Movetext = usize;
    type Output = usize;

    fn begin_tags(&mut self) -> ControlFlow<usize> {
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: ()) -> ControlFlow<usize, usize> {
        ControlFlow::Continue(0)
    }

    fn san(&mut self, moves: &mut usize, _notation: Notation) -> ControlFlow<usize> {
        *moves += 1;
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, moves: usize) -> usize {
        moves
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_games(input, &ParseOptions::default());

    // Every move the reader reports ends up in the tree.
    let options = ParseOptions::new().start_rule(StartRule::Pgn);
    let counted = Reader::new(input).read_rule(StartRule::Pgn, &mut MoveCounter);
    match parse(input, &options) {
        Ok(Parsed::Game(tree)) => assert_eq!(counted.ok(), Some(tree.count_moves())),
        Ok(Parsed::Games(_)) => unreachable!("single rule"),
        Err(err) => {
            assert!(counted.is_err());
            let _ = err.hint();
        }
    }
});
