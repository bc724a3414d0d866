//! Board service documents and their JSON wire mappings.

pub mod domain;
pub mod timestamp;

use chrono::DateTime;
use mappings::{Context, Mappable, Options, field};

pub use domain::{AccountState, Board, Card, Column, Profile, User};
pub use timestamp::Timestamp;

/// Document kinds the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    User,
    Profile,
    Board,
    Card,
    Column,
}

/// Register the scalar rules and wire names used on the wire.
pub fn register_mappings(cx: &mut Context) -> mappings::Result<()> {
    cx.create_mapping::<Timestamp>().set_rule(timestamp::rule());
    cx.create_mapping::<AccountState>().set_rule(AccountState::rule());

    cx.create_mapping::<User>()
        .field(field!(User, created_when))?
        .wire_name("created-when")?;

    let mut board = cx.create_mapping::<Board>();
    board.field(field!(Board, owned_by))?.wire_name("owned-by")?;
    board.field(field!(Board, created_by))?.wire_name("created-by")?;
    board
        .field(field!(Board, created_when))?
        .wire_name("created-when")?;

    cx.create_mapping::<Card>()
        .field(field!(Card, card_type))?
        .wire_name("card-type")?;

    cx.create_mapping::<Column>()
        .field(field!(Column, wip_limit))?
        .wire_name("wiplimit")?;

    tracing::debug!(mappings = cx.len(), "registered wire mappings");
    Ok(())
}

/// Fresh context with every mapping registered.
pub fn context(options: Options) -> mappings::Result<Context> {
    let mut cx = Context::with_options(options);
    register_mappings(&mut cx)?;
    Ok(cx)
}

/// Decode `input` as a `kind` document and encode it again.
///
/// The output uses canonical wire names, drops unknown keys and fills
/// missing ones with zero values.
pub fn normalize(cx: &Context, kind: Kind, input: &[u8]) -> mappings::Result<Vec<u8>> {
    fn round<T: Mappable>(cx: &Context, input: &[u8]) -> mappings::Result<Vec<u8>> {
        let value: T = cx.unmarshal(input)?;
        cx.marshal(&value)
    }

    match kind {
        Kind::User => round::<User>(cx, input),
        Kind::Profile => round::<Profile>(cx, input),
        Kind::Board => round::<Board>(cx, input),
        Kind::Card => round::<Card>(cx, input),
        Kind::Column => round::<Column>(cx, input),
    }
}

/// Encode the built-in sample of `kind`.
pub fn sample(cx: &Context, kind: Kind) -> mappings::Result<Vec<u8>> {
    match kind {
        Kind::User => cx.marshal(&sample_user()),
        Kind::Profile => cx.marshal(&sample_profile()),
        Kind::Board => cx.marshal(&sample_board()),
        Kind::Card => cx.marshal(&sample_card(1, "todo", "task")),
        Kind::Column => cx.marshal(&sample_column("doing", 3)),
    }
}

fn sample_time() -> Timestamp {
    DateTime::parse_from_rfc3339("2021-06-01T00:00:00+00:00")
        .map(Timestamp)
        .unwrap_or_default()
}

pub fn sample_user() -> User {
    User {
        id: 1,
        state: AccountState::Active,
        created_when: sample_time(),
    }
}

pub fn sample_profile() -> Profile {
    Profile {
        email: "ada@example.com".into(),
        username: "ada".into(),
        alias: "Countess".into(),
    }
}

fn sample_column(title: &str, wip_limit: u32) -> Column {
    Column {
        title: title.into(),
        wip_limit,
    }
}

fn sample_card(id: u64, stage: &str, card_type: &str) -> Card {
    Card {
        id,
        stage: stage.into(),
        card_type: card_type.into(),
        data: String::new(),
    }
}

pub fn sample_board() -> Board {
    Board {
        id: 7,
        title: "Release".into(),
        columns: vec![
            sample_column("todo", 0),
            sample_column("doing", 3),
            sample_column("done", 0),
        ],
        cards: vec![
            sample_card(1, "todo", "task"),
            sample_card(2, "doing", "bug"),
        ],
        owned_by: 1,
        created_by: 1,
        created_when: sample_time(),
    }
}
