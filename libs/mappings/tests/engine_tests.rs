use std::collections::BTreeMap;

use mappings::{Context, ErrorKind, Mappable, Options, Record, Rule, Value, field};

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct Column {
    title: String,
    wip_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct Card {
    id: u64,
    stage: String,
    card_type: String,
    labels: Vec<String>,
    estimate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct Board {
    id: u64,
    title: String,
    columns: Vec<Column>,
    cards: Vec<Card>,
    meta: BTreeMap<String, String>,
}

fn column(title: &str, wip_limit: u32) -> Column {
    Column {
        title: title.into(),
        wip_limit,
    }
}

fn board() -> Board {
    Board {
        id: 42,
        title: "Roadmap".into(),
        columns: vec![
            column("todo", 0),
            column("doing", 3),
            column("done", 0),
        ],
        cards: vec![
            Card {
                id: 1,
                stage: "todo".into(),
                card_type: "task".into(),
                labels: vec!["infra".into()],
                estimate: Some(1.5),
            },
            Card {
                id: 2,
                stage: "doing".into(),
                card_type: "bug".into(),
                labels: vec![],
                estimate: None,
            },
        ],
        meta: BTreeMap::from([("owner".to_owned(), "ops".to_owned())]),
    }
}

fn strict() -> Context {
    Context::with_options(Options {
        strict: true,
        ..Options::default()
    })
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn nested_record_round_trips_through_tree() {
    let cx = Context::new();
    let node = cx.flatten(&board()).unwrap();
    let back: Board = cx.unflatten(&node).unwrap();
    assert_eq!(back, board());
}

#[test]
fn nested_record_round_trips_through_json() {
    let cx = Context::new();
    let bytes = cx.marshal(&board()).unwrap();
    let back: Board = cx.unmarshal(&bytes).unwrap();
    assert_eq!(back, board());
}

#[test]
fn round_trip_with_renames_on_both_sides() {
    let mut cx = Context::new();
    cx.create_mapping::<Card>()
        .field(field!(Card, card_type))
        .unwrap()
        .wire_name("card-type")
        .unwrap();
    cx.create_mapping::<Column>()
        .field(field!(Column, wip_limit))
        .unwrap()
        .wire_name("wiplimit")
        .unwrap();

    let bytes = cx.marshal(&board()).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\"card-type\":\"bug\""));
    assert!(text.contains("\"wiplimit\":3"));
    assert!(!text.contains("card_type"));

    let back: Board = cx.unmarshal(&bytes).unwrap();
    assert_eq!(back, board());
}

// ── Wire names ───────────────────────────────────────────────────

#[test]
fn wire_name_remapping_hides_source_identifier() {
    let mut cx = Context::new();
    cx.create_mapping::<Card>()
        .field(field!(Card, stage))
        .unwrap()
        .wire_name("state")
        .unwrap();

    let card = Card {
        stage: "active".into(),
        ..Card::default()
    };
    let node = cx.flatten(&card).unwrap();
    let record = node.as_record().unwrap();
    assert_eq!(record.get("state"), Some(&Value::from("active")));
    assert!(record.get("stage").is_none());
}

// ── Type-level override ──────────────────────────────────────────

#[test]
fn type_rule_wins_regardless_of_field_contents() {
    let mut cx = Context::new();
    cx.create_mapping::<Column>()
        .flatten_with(|_| Value::from("column"));

    for col in board().columns {
        assert_eq!(cx.flatten(&col).unwrap(), Value::from("column"));
    }

    let node = cx.flatten(&board()).unwrap();
    assert_eq!(
        node.as_record().unwrap()["columns"],
        Value::Sequence(vec![Value::from("column"); 3])
    );
}

#[test]
fn type_rule_directions_are_independent() {
    let mut cx = Context::new();
    cx.create_mapping::<Column>()
        .unflatten_with(|node| Column {
            title: node.as_str().unwrap_or("?").to_owned(),
            wip_limit: 0,
        });

    // Flatten is still structural.
    let node = cx.flatten(&column("x", 2)).unwrap();
    assert!(node.as_record().is_some());

    // Unflatten goes through the rule, even for a record node.
    let back: Column = cx.unflatten(&node).unwrap();
    assert_eq!(back.title, "?");
}

#[test]
fn type_rule_takes_precedence_over_field_entries() {
    let mut cx = Context::new();
    let mut mapping = cx.create_mapping::<Column>();
    mapping
        .field(field!(Column, title))
        .unwrap()
        .wire_name("name")
        .unwrap();
    mapping.set_rule(
        Rule::new()
            .flatten(|c: &Column| Value::from(c.title.clone()))
            .unflatten(|n| Column {
                title: n.as_str().unwrap_or_default().to_owned(),
                wip_limit: 0,
            }),
    );

    let todo = column("todo", 0);
    assert_eq!(cx.flatten(&todo).unwrap(), Value::from("todo"));
    assert_eq!(cx.unflatten::<Column>(&Value::from("todo")).unwrap(), todo);
}

#[test]
fn removing_mapping_restores_structural_defaults() {
    let mut cx = Context::new();
    cx.create_mapping::<Column>()
        .flatten_with(|_| Value::Null);
    cx.remove_mapping::<Column>();

    let node = cx.flatten(&Column::default()).unwrap();
    assert!(node.as_record().is_some());
}

// ── Zero fill ────────────────────────────────────────────────────

#[test]
fn missing_renamed_key_leaves_zero_value() {
    let mut cx = Context::new();
    cx.create_mapping::<Card>()
        .field(field!(Card, stage))
        .unwrap()
        .wire_name("state")
        .unwrap();

    let mut record = Record::new();
    record.insert("id".into(), Value::Int(9));
    let card: Card = cx.unflatten(&Value::Record(record)).unwrap();
    assert_eq!(card.stage, "");
    assert_eq!(card.id, 9);
}

#[test]
fn empty_json_object_yields_default_record() {
    let board: Board = Context::new().unmarshal(b"{}").unwrap();
    assert_eq!(board, Board::default());
}

// ── Sequences ────────────────────────────────────────────────────

#[test]
fn sequence_order_is_preserved() {
    let cx = Context::new();
    let items = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
    let node = cx.flatten(&items).unwrap();
    let back: Vec<String> = cx.unflatten(&node).unwrap();
    assert_eq!(back, items);
}

#[test]
fn element_rule_applies_to_every_element() {
    let mut cx = Context::new();
    cx.create_mapping::<u32>()
        .flatten_with(|v| Value::from(v * 10));

    let node = cx.flatten(&vec![1u32, 2, 3]).unwrap();
    assert_eq!(
        node,
        Value::Sequence(vec![Value::Int(10), Value::Int(20), Value::Int(30)])
    );
}

#[test]
fn lenient_unflatten_drops_bad_cards_only() {
    let json = br#"{"cards": [{"id": 1}, {"id": "two"}, {"id": 3}]}"#;
    let board: Board = Context::new().unmarshal(json).unwrap();
    let ids: Vec<u64> = board.cards.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn strict_unflatten_reports_first_bad_card() {
    let json = br#"{"cards": [{"id": 1}, {"id": "two"}, {"id": "three"}]}"#;
    let err = strict().unmarshal::<Board>(json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScalarCoercion);
    assert_eq!(err.path().to_string(), "$.cards[1].id");
}

// ── Failures ─────────────────────────────────────────────────────

#[test]
fn record_field_mismatch_fails_even_when_lenient() {
    let json = br#"{"columns": "not-a-list"}"#;
    let err = Context::new().unmarshal::<Board>(json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.path().to_string(), "$.columns");
}

#[test]
fn malformed_json_is_a_codec_failure() {
    let err = Context::new().unmarshal::<Board>(b"{\"id\": ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
}

#[test]
fn failure_produces_no_partial_output() {
    let json = br#"{"id": 1, "title": 5}"#;
    let result = Context::new().unmarshal::<Board>(json);
    assert!(result.is_err());
}

#[test]
fn opaque_type_without_rule_is_unsupported() {
    struct Handle;
    impl Mappable for Handle {}

    let err = Context::new().flatten(&Handle).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedShape);
    assert!(err.message().contains("Handle"));
}
