use mappings::{Context, ErrorKind, Options, Value};
use winch::{AccountState, Board, Kind, Timestamp, User};

fn cx() -> Context {
    winch::context(Options::default()).unwrap()
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

// ── Timestamp rule ───────────────────────────────────────────────

#[test]
fn timestamp_flattens_to_layout_string() {
    let cx = cx();
    let ts = Timestamp::parse("2021-06-01T00:00:00+00:00").unwrap();
    assert_eq!(
        cx.flatten(&ts).unwrap(),
        Value::from("2021-06-01T00:00:00+00:00")
    );
}

#[test]
fn layout_string_unflattens_to_timestamp() {
    let ts: Timestamp = cx()
        .unflatten(&Value::from("2021-06-01T00:00:00+00:00"))
        .unwrap();
    let expected = chrono::DateTime::parse_from_rfc3339("2021-06-01T00:00:00Z").unwrap();
    assert_eq!(ts.0, expected);
}

#[test]
fn unparsable_timestamp_becomes_sentinel() {
    let cx = cx();
    let ts: Timestamp = cx.unflatten(&Value::from("not-a-date")).unwrap();
    assert_eq!(ts, Timestamp::sentinel());
    assert_eq!(
        cx.flatten(&ts).unwrap(),
        Value::from(winch::timestamp::SENTINEL)
    );
}

#[test]
fn non_string_timestamp_becomes_sentinel() {
    let ts: Timestamp = cx().unflatten(&Value::Bool(true)).unwrap();
    assert_eq!(ts, Timestamp::sentinel());
}

// ── Account state rule ───────────────────────────────────────────

#[test]
fn account_state_flattens_to_names() {
    let cx = cx();
    for (state, name) in [
        (AccountState::Active, "active"),
        (AccountState::Inactive, "inactive"),
        (AccountState::Closed, "closed"),
    ] {
        assert_eq!(cx.flatten(&state).unwrap(), Value::from(name));
    }
}

#[test]
fn account_state_unflattens_from_names() {
    let cx = cx();
    for (name, state) in [
        ("active", AccountState::Active),
        ("inactive", AccountState::Inactive),
        ("closed", AccountState::Closed),
    ] {
        assert_eq!(cx.unflatten::<AccountState>(&Value::from(name)).unwrap(), state);
    }
}

#[test]
fn unknown_account_state_is_active() {
    let cx = cx();
    assert_eq!(
        cx.unflatten::<AccountState>(&Value::from("banned")).unwrap(),
        AccountState::Active
    );
    assert_eq!(
        cx.unflatten::<AccountState>(&Value::Int(2)).unwrap(),
        AccountState::Active
    );
}

// ── Wire names ───────────────────────────────────────────────────

#[test]
fn board_uses_hyphenated_wire_names() {
    let out = text(winch::sample(&cx(), Kind::Board).unwrap());
    for key in ["\"owned-by\"", "\"created-by\"", "\"created-when\"", "\"card-type\"", "\"wiplimit\""] {
        assert!(out.contains(key), "missing {key} in {out}");
    }
    for key in ["owned_by", "created_by", "created_when", "card_type", "wip_limit"] {
        assert!(!out.contains(key), "leaked {key} in {out}");
    }
}

#[test]
fn user_document_round_trips() {
    let cx = cx();
    let json = br#"{"id": 5, "state": "closed", "created-when": "2020-02-29T12:00:00-05:00"}"#;
    let user: User = cx.unmarshal(json).unwrap();
    assert_eq!(user.id, 5);
    assert_eq!(user.state, AccountState::Closed);
    assert_eq!(user.created_when.format(), "2020-02-29T12:00:00-05:00");

    let back: User = cx.unmarshal(&cx.marshal(&user).unwrap()).unwrap();
    assert_eq!(back, user);
}

#[test]
fn sample_board_round_trips() {
    let cx = cx();
    let bytes = cx.marshal(&winch::sample_board()).unwrap();
    let back: Board = cx.unmarshal(&bytes).unwrap();
    assert_eq!(back, winch::sample_board());
}

// ── Normalize ────────────────────────────────────────────────────

#[test]
fn normalize_fills_missing_and_drops_unknown_keys() {
    let out = winch::normalize(&cx(), Kind::Column, br#"{"title": "todo", "color": "red"}"#).unwrap();
    assert_eq!(text(out), r#"{"title":"todo","wiplimit":0}"#);
}

#[test]
fn normalize_user_writes_sentinel_for_bad_timestamp() {
    let out = winch::normalize(&cx(), Kind::User, br#"{"id": 1, "created-when": "soon"}"#).unwrap();
    assert_eq!(
        text(out),
        r#"{"created-when":"0000-01-01T00:00:00+00:00","id":1,"state":"active"}"#
    );
}

#[test]
fn lenient_normalize_drops_bad_cards() {
    let json = br#"{"cards": [{"id": 1}, {"id": "x"}], "title": "t"}"#;
    let out = text(winch::normalize(&cx(), Kind::Board, json).unwrap());
    assert!(out.contains(r#""cards":[{"card-type":"","data":"","id":1,"stage":""}]"#));
}

#[test]
fn strict_normalize_reports_bad_card() {
    let strict = winch::context(Options {
        strict: true,
        ..Options::default()
    })
    .unwrap();
    let json = br#"{"cards": [{"id": 1}, {"id": "x"}]}"#;
    let err = winch::normalize(&strict, Kind::Board, json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScalarCoercion);
    assert_eq!(err.path().to_string(), "$.cards[1].id");
}

#[test]
fn pretty_option_indents_output() {
    let pretty = winch::context(Options {
        pretty: true,
        ..Options::default()
    })
    .unwrap();
    let out = text(winch::sample(&pretty, Kind::Profile).unwrap());
    assert!(out.starts_with("{\n"));
    assert!(out.contains("\"alias\": \"Countess\""));
}
