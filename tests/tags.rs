use pgn_parser::{
    parse, DatePart, ParseOptions, ParseTree, Parsed, StartRule, TagName, TagValue, TimeControlKind,
};

fn tags(input: &str) -> ParseTree {
    match parse(input, &ParseOptions::new().start_rule(StartRule::Tags)) {
        Ok(Parsed::Game(tree)) => tree,
        Ok(Parsed::Games(_)) => panic!("expected a single tree"),
        Err(err) => panic!("{input:?} should parse: {}", err.hint()),
    }
}

#[test]
fn test_seven_tag_roster() {
    let tree = tags(
        r#"[Event "F/S Return Match"]
           [Site "Belgrade, Serbia JUG"]
           [Date "1992.11.04"]
           [Round "29"]
           [White "Fischer, Robert J."]
           [Black "Spassky, Boris V."]
           [Result "1/2-1/2"]"#,
    );
    let tags = tree.tags.expect("tags");
    assert_eq!(tags.len(), 7);
    assert_eq!(tags.get_str("Site"), Some("Belgrade, Serbia JUG"));
    assert_eq!(tags.get_str("site"), Some("Belgrade, Serbia JUG"));
    assert_eq!(tags.result(), Some("1/2-1/2"));

    let date = tags.date(TagName::Date).expect("date");
    assert_eq!(date.year, DatePart::Known(1992));
    assert_eq!(date.month, DatePart::Known(11));
    assert_eq!(date.day, DatePart::Known(4));
    assert!(tree.messages.is_empty());
    assert!(tree.moves.is_empty());
}

#[test]
fn test_escaped_values() {
    let tree = tags(r#"[Annotator "The \"Sage\" of \\Riga"]"#);
    assert_eq!(
        tree.tags.and_then(|tags| tags.get_str("Annotator").map(str::to_owned)),
        Some(r#"The "Sage" of \Riga"#.to_owned())
    );
}

#[test]
fn test_unknown_tags() {
    let tree = tags("[MyTag \"my value\"]\n[Board \"3\"]");
    let tags = tree.tags.expect("tags");
    assert_eq!(tags.unknown().collect::<Vec<_>>(), [("MyTag", "my value")]);
    assert_eq!(tags.get_str("MyTag"), Some("my value"));
    assert_eq!(tags.elo(TagName::Board).and_then(|board| board.int), Some(3));
}

#[test]
fn test_partial_dates() {
    let tree = tags("[Date \"2023.??.??\"]\n[EventDate \"2023-05-17\"]\n[UTCDate \"2023/05/17\"]");
    let tags = tree.tags.expect("tags");

    let date = tags.date(TagName::Date).expect("date");
    assert_eq!(date.year, DatePart::Known(2023));
    assert_eq!(date.month, DatePart::Unknown);
    assert_eq!(date.day, DatePart::Unknown);

    assert_eq!(
        tags.date(TagName::EventDate).map(|date| date.value.as_str()),
        Some("2023.05.17")
    );
    assert_eq!(
        tags.date(TagName::UTCDate).map(|date| date.value.as_str()),
        Some("2023.05.17")
    );
    assert!(tree.messages.is_empty());
}

#[test]
fn test_malformed_date() {
    let tree = tags("[Date \"2023.05-17\"]");
    assert_eq!(
        tree.tags.as_ref().and_then(|tags| tags.get(TagName::Date)),
        Some(&TagValue::Text("2023.05-17".to_owned()))
    );
    assert_eq!(tree.messages.len(), 1);
    assert_eq!(tree.messages[0].key, "Date");
    assert_eq!(
        tree.messages[0].message,
        "Format of tag: \"Date\" not correct: \"2023.05-17\""
    );
}

#[test]
fn test_times() {
    let tree = tags("[Time \"09:30:00\"]\n[UTCTime \"9:30\"]");
    let tags = tree.tags.expect("tags");
    let time = tags.time(TagName::Time).expect("time");
    assert_eq!((time.hour, time.minute, time.second), (9, 30, 0));
    assert_eq!(tags.time(TagName::UTCTime), None);
    assert_eq!(tags.get_str("UTCTime"), Some("9:30"));
    assert_eq!(tree.messages.len(), 1);
    assert_eq!(tree.messages[0].key, "UTCTime");
}

#[test]
fn test_elos() {
    let tree = tags("[WhiteElo \"foo\"]\n[BlackElo \"\"]\n[WhiteUSCF \"1800\"]");
    let tags = tree.tags.expect("tags");

    let white = tags.elo(TagName::WhiteElo).expect("elo");
    assert_eq!(white.value, "foo");
    assert_eq!(white.int, None);

    let black = tags.elo(TagName::BlackElo).expect("elo");
    assert_eq!(black.value, "-");
    assert_eq!(black.int, None);

    assert_eq!(tags.elo(TagName::WhiteUSCF).and_then(|elo| elo.int), Some(1800));
}

#[test]
fn test_results() {
    let tree = tags("[Result \"1/2\"]");
    assert_eq!(tree.tags.as_ref().and_then(|tags| tags.result()), Some("1/2-1/2"));
    assert!(tree.messages.is_empty());

    let tree = tags("[Result \"1:0\"]");
    assert_eq!(tree.tags.as_ref().and_then(|tags| tags.result()), Some("1:0"));
    assert_eq!(tree.messages.len(), 1);
    assert_eq!(tree.messages[0].key, "Result");
    assert_eq!(tree.messages[0].value, "1:0");
}

#[test]
fn test_time_control() {
    let tree = tags("[TimeControl \"40/7200:3600+30\"]");
    let tags = tree.tags.expect("tags");
    let time_control = tags.time_control().expect("time control");
    assert_eq!(time_control.items.len(), 2);
    assert_eq!(time_control.items[0].kind, TimeControlKind::MovesInSeconds);
    assert_eq!(time_control.items[0].moves, Some(40));
    assert_eq!(time_control.items[1].kind, TimeControlKind::SecondsWithIncrement);
    assert_eq!(time_control.items[1].increment, Some(30));
}

#[test]
fn test_empty_time_control() {
    let tree = tags("[TimeControl \"\"]");
    assert_eq!(tree.messages.len(), 1);
    assert_eq!(tree.messages[0].message, "Tag TimeControl has to have a value");
    assert_eq!(
        tree.tags.as_ref().and_then(|tags| tags.get_str("TimeControl")),
        Some("")
    );
}

#[test]
fn test_clock_tags_are_text() {
    let tree = tags("[WhiteClock \"1:25:50\"]\n[Clock \"W/0:45:56\"]");
    let tags = tree.tags.expect("tags");
    assert_eq!(
        tags.get(TagName::WhiteClock),
        Some(&TagValue::Text("1:25:50".to_owned()))
    );
    assert_eq!(tags.get_str("Clock"), Some("W/0:45:56"));
    assert!(tree.messages.is_empty());
}

#[test]
fn test_tags_rule_rejects_movetext() {
    let err = parse("[White \"Me\"]\n1. e4", &ParseOptions::new().start_rule(StartRule::Tags))
        .unwrap_err();
    assert_eq!((err.line(), err.column()), (Some(2), Some(1)));
}

#[test]
fn test_tag_syntax_errors() {
    let options = ParseOptions::new().start_rule(StartRule::Tags);

    let err = parse("[White Me]", &options).unwrap_err();
    assert_eq!(err.column(), Some(8));
    assert_eq!(err.found(), Some('M'));

    let err = parse("[White \"Me]", &options).unwrap_err();
    assert_eq!(err.found(), None);

    let err = parse("[\"Me\"]", &options).unwrap_err();
    assert_eq!(err.expected(), ["tag name"]);
}
