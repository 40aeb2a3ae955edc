use alloc::{format, vec::Vec};

use crate::{
    builder::BuiltGame,
    fen,
    tags::Tags,
    tree::{report, Message, ParseTree, PgnMove},
    Color, Outcome, StartRule,
};

/// Completes a game read by the tree builder: records the termination
/// marker as `Result` tag and assigns the side to move to every move.
pub(crate) fn finish(game: BuiltGame, rule: StartRule, fen: Option<&str>) -> ParseTree {
    let BuiltGame { mut tree, outcome, .. } = game;
    if rule != StartRule::Tags {
        if let Some(outcome) = outcome {
            reconcile_result(&mut tree, outcome);
        }
    }
    assign_turns(&mut tree, fen);
    tree
}

fn reconcile_result(tree: &mut ParseTree, outcome: Outcome) {
    let tags = tree.tags.get_or_insert_with(Tags::new);
    if let Some(existing) = tags.result() {
        if existing != outcome.as_str() {
            report(
                &mut tree.messages,
                Message::new(
                    "Result",
                    existing,
                    "Result in tags is different to result in SAN",
                ),
            );
        }
    }
    tags.set_result(outcome);
}

fn assign_turns(tree: &mut ParseTree, fen: Option<&str>) {
    let ParseTree {
        tags,
        moves,
        messages,
        ..
    } = tree;

    let fen = fen
        .or_else(|| tags.as_ref().and_then(Tags::fen))
        .unwrap_or(fen::STARTING_FEN);
    let start = fen::side_to_move(fen).unwrap_or_else(|_| {
        report(
            messages,
            Message::new("FEN", fen, format!("Format of tag: \"FEN\" not correct: \"{fen}\"")),
        );
        Color::White
    });

    // Each variation starts with the same side as the move it replaces.
    let mut stack: Vec<(&mut [PgnMove], Color)> = alloc::vec![(moves.as_mut_slice(), start)];
    while let Some((line, first)) = stack.pop() {
        let mut turn = first;
        for m in line {
            m.turn = turn;
            for variation in &mut m.variations {
                stack.push((variation.as_mut_slice(), turn));
            }
            turn = !turn;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::TreeBuilder, Reader};

    fn finish_pgn(rule: StartRule, pgn: &str, fen: Option<&str>) -> ParseTree {
        let game = Reader::new(pgn)
            .read_rule(rule, &mut TreeBuilder::new(rule))
            .expect("valid pgn");
        finish(game, rule, fen)
    }

    #[test]
    fn test_turns() {
        let tree = finish_pgn(StartRule::Pgn, "1. e4 e5 (1... c5 2. Nf3 (2. c3 d5)) 2. Nf3", None);
        let turns: Vec<_> = tree.moves.iter().map(|m| m.turn).collect();
        assert_eq!(turns, [Color::White, Color::Black, Color::White]);
        let sicilian = &tree.moves[1].variations[0];
        assert_eq!(sicilian[0].turn, Color::Black);
        assert_eq!(sicilian[1].turn, Color::White);
        let alapin = &sicilian[1].variations[0];
        assert_eq!(alapin[0].turn, Color::White);
        assert_eq!(alapin[1].turn, Color::Black);
    }

    #[test]
    fn test_turns_from_fen() {
        let tree = finish_pgn(
            StartRule::Game,
            "[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 1\"] 1... Kd7 2. e4",
            None,
        );
        assert_eq!(tree.moves[0].turn, Color::Black);
        assert_eq!(tree.moves[1].turn, Color::White);

        let tree = finish_pgn(
            StartRule::Game,
            "[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 1\"] 1. e4",
            Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"),
        );
        assert_eq!(tree.moves[0].turn, Color::White);

        let tree = finish_pgn(StartRule::Pgn, "1... Kd7", Some("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1"));
        assert_eq!(tree.moves[0].turn, Color::Black);
    }

    #[test]
    fn test_fen_option_overrides_tag() {
        let tree = finish_pgn(
            StartRule::Game,
            "[FEN \"r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2\"] Nc6 3. d4",
            Some("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"),
        );
        assert_eq!(tree.moves[0].turn, Color::White);
        assert_eq!(tree.moves[1].turn, Color::Black);
        assert!(tree.messages.is_empty());
    }

    #[test]
    fn test_invalid_fen_option() {
        let tree = finish_pgn(
            StartRule::Game,
            "[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 1\"] 1. e4",
            Some("nonsense"),
        );
        assert_eq!(tree.moves[0].turn, Color::White);
        assert_eq!(tree.messages.len(), 1);
        assert_eq!(tree.messages[0].value, "nonsense");
    }

    #[test]
    fn test_invalid_fen() {
        let tree = finish_pgn(StartRule::Game, "[FEN \"nonsense\"] 1. e4", None);
        assert_eq!(tree.moves[0].turn, Color::White);
        assert_eq!(tree.messages.len(), 1);
        assert_eq!(tree.messages[0].key, "FEN");
    }

    #[test]
    fn test_result_reconciliation() {
        let tree = finish_pgn(StartRule::Pgn, "1. f4 e5 2. g4 Qh4# 0-1", None);
        assert_eq!(tree.tags.as_ref().and_then(Tags::result), Some("0-1"));
        assert!(tree.messages.is_empty());

        let tree = finish_pgn(StartRule::Game, "[Result \"1-0\"] 1. f4 e5 2. g4 Qh4# 0-1", None);
        assert_eq!(tree.tags.as_ref().and_then(Tags::result), Some("0-1"));
        assert_eq!(
            tree.messages,
            [Message::new(
                "Result",
                "1-0",
                "Result in tags is different to result in SAN"
            )]
        );

        let tree = finish_pgn(StartRule::Pgn, "1. f4 e5 2. g4 Qh4#", None);
        assert!(tree.tags.is_none());
    }
}
