use mappings::{Mappable, Rule, Value};

use crate::timestamp::Timestamp;

// ═══════════════════════════════════════════════════════════════
//  Accounts
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountState {
    #[default]
    Active,
    Inactive,
    Closed,
}

impl AccountState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Closed => "closed",
        }
    }

    /// Unknown names fall back to `Active`.
    pub fn parse(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            "closed" => Self::Closed,
            _ => Self::Active,
        }
    }

    pub fn rule() -> Rule<Self> {
        Rule::new()
            .flatten(|state: &Self| Value::from(state.as_str()))
            .unflatten(|node| Self::parse(node.as_str().unwrap_or_default()))
    }
}

impl Mappable for AccountState {}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
pub struct User {
    pub id: u64,
    pub state: AccountState,
    pub created_when: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
pub struct Profile {
    pub email: String,
    pub username: String,
    pub alias: String,
}

// ═══════════════════════════════════════════════════════════════
//  Boards
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
pub struct Column {
    pub title: String,
    pub wip_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
pub struct Card {
    pub id: u64,
    pub stage: String,
    pub card_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
pub struct Board {
    pub id: u64,
    pub title: String,
    pub columns: Vec<Column>,
    pub cards: Vec<Card>,
    /// User id.
    pub owned_by: u64,
    /// User id.
    pub created_by: u64,
    pub created_when: Timestamp,
}
