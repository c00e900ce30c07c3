//! Named integer sequences backing the human-readable ids.
//!
//! One row per sequence name; `seq` holds the last id handed out. Rows are
//! created on first use and only ever incremented.

use std::fmt;

use sea_orm::entity::prelude::*;

use crate::EngineError;

/// Entity kinds that get their ids from a counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sequence {
    User,
    Budget,
    Category,
    Transaction,
    Goal,
}

impl Sequence {
    pub const ALL: [Sequence; 5] = [
        Self::User,
        Self::Budget,
        Self::Category,
        Self::Transaction,
        Self::Goal,
    ];

    /// Counter name as stored in the `counters` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "userID",
            Self::Budget => "budgetID",
            Self::Category => "categoryID",
            Self::Transaction => "transactionID",
            Self::Goal => "goalID",
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Sequence {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(EngineError::InvalidInput(
                "sequence name must not be empty".to_string(),
            ));
        }
        Self::ALL
            .into_iter()
            .find(|sequence| sequence.as_str() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown sequence: {value}")))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
