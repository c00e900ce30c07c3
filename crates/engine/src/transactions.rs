//! Transaction records.
//!
//! A transaction is a single money movement owned by one user. Its amount is
//! stored non-negative; the kind decides whether it adds to income or to
//! expenses (see [`crate::aggregate`]).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Contribution towards a savings goal.
    Goal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Goal => "goal",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "goal" => Ok(Self::Goal),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    /// `YYYY-MM-DD`. Kept as text: rows written before date validation may
    /// hold anything, and readers must tolerate that.
    pub date: String,
    pub description: String,
}

/// Input for [`crate::Engine::add_transaction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub category_id: i64,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub date: String,
    pub description: String,
}

/// Sparse update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub category_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<MoneyCents>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.kind.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}

/// A transaction joined with the icon of its category.
///
/// `icon` is `None` when the category no longer exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithIcon {
    pub transaction: Transaction,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: String,
    pub amount_minor: i64,
    pub date: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_id: ActiveValue::Set(tx.transaction_id),
            user_id: ActiveValue::Set(tx.user_id),
            category_id: ActiveValue::Set(tx.category_id),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            date: ActiveValue::Set(tx.date.clone()),
            description: ActiveValue::Set(tx.description.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = TransactionKind::try_from(model.kind.as_str()).map_err(|_| {
            EngineError::Decode(format!(
                "transaction {} has unknown type \"{}\"",
                model.transaction_id, model.kind
            ))
        })?;
        Ok(Self {
            transaction_id: model.transaction_id,
            user_id: model.user_id,
            category_id: model.category_id,
            kind,
            amount: MoneyCents::new(model.amount_minor),
            date: model.date,
            description: model.description,
        })
    }
}
