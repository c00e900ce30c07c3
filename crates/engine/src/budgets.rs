//! Spending budgets.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, Period};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: i64,
    pub user_id: i64,
    pub name: String,
    pub initial_balance: MoneyCents,
    pub limit: MoneyCents,
    pub period: Period,
}

impl Budget {
    /// Compares the starting balance against the limit.
    pub fn limit_status(&self) -> LimitStatus {
        if self.initial_balance > self.limit {
            LimitStatus::Exceeded
        } else {
            LimitStatus::WithinRange
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    Exceeded,
    WithinRange,
}

/// Input for [`crate::Engine::create_budget`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBudget {
    pub user_id: i64,
    pub name: String,
    pub initial_balance: MoneyCents,
    pub limit: MoneyCents,
    pub period: Period,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub initial_balance: Option<MoneyCents>,
    pub limit: Option<MoneyCents>,
    pub period: Option<Period>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.initial_balance.is_none()
            && self.limit.is_none()
            && self.period.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub budget_id: i64,
    pub user_id: i64,
    pub name: String,
    pub initial_balance_minor: i64,
    pub limit_minor: i64,
    pub period: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            budget_id: ActiveValue::Set(budget.budget_id),
            user_id: ActiveValue::Set(budget.user_id),
            name: ActiveValue::Set(budget.name.clone()),
            initial_balance_minor: ActiveValue::Set(budget.initial_balance.cents()),
            limit_minor: ActiveValue::Set(budget.limit.cents()),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let period = Period::try_from(model.period.as_str()).map_err(|_| {
            EngineError::Decode(format!(
                "budget {} has unknown period \"{}\"",
                model.budget_id, model.period
            ))
        })?;
        Ok(Self {
            budget_id: model.budget_id,
            user_id: model.user_id,
            name: model.name,
            initial_balance: MoneyCents::new(model.initial_balance_minor),
            limit: MoneyCents::new(model.limit_minor),
            period,
        })
    }
}
