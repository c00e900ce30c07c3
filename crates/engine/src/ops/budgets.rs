use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Statement,
    TransactionTrait, prelude::*,
};

use crate::{
    Budget, BudgetPatch, EngineError, LimitStatus, NewBudget, ResultEngine, Sequence, budgets,
    util::{ensure_amount, normalize_required_name},
};

use super::{Engine, sequences::allocate, with_tx};

impl Engine {
    pub async fn create_budget(&self, new_budget: NewBudget) -> ResultEngine<Budget> {
        let name = normalize_required_name(&new_budget.name, "budget name")?;
        ensure_amount(new_budget.initial_balance, "initial balance")?;
        ensure_amount(new_budget.limit, "limit")?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let budget_id = allocate(&db_tx, Sequence::Budget).await?;
                self.require_user(&db_tx, new_budget.user_id).await?;

                let budget = Budget {
                    budget_id,
                    user_id: new_budget.user_id,
                    name,
                    initial_balance: new_budget.initial_balance,
                    limit: new_budget.limit,
                    period: new_budget.period,
                };
                budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
                Ok(budget)
            })
        })
        .await
    }

    pub async fn budget(&self, budget_id: i64) -> ResultEngine<Budget> {
        let model = self
            .bounded(Self::find_budget(&self.database, budget_id))
            .await?;
        Budget::try_from(model)
    }

    /// Budgets of `user_id`, oldest first.
    pub async fn list_budgets(&self, user_id: i64) -> ResultEngine<Vec<Budget>> {
        let models = self
            .bounded(async {
                Ok(budgets::Entity::find()
                    .filter(budgets::Column::UserId.eq(user_id))
                    .order_by_asc(budgets::Column::BudgetId)
                    .all(&self.database)
                    .await?)
            })
            .await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    pub async fn update_budget(&self, budget_id: i64, patch: BudgetPatch) -> ResultEngine<Budget> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput("no fields to update".to_string()));
        }
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "budget name"))
            .transpose()?;
        if let Some(amount) = patch.initial_balance {
            ensure_amount(amount, "initial balance")?;
        }
        if let Some(amount) = patch.limit {
            ensure_amount(amount, "limit")?;
        }

        self.bounded(async {
            with_tx!(self, |db_tx| {
                Self::find_budget(&db_tx, budget_id).await?;

                let mut model = budgets::ActiveModel {
                    budget_id: ActiveValue::Unchanged(budget_id),
                    ..Default::default()
                };
                if let Some(name) = name {
                    model.name = ActiveValue::Set(name);
                }
                if let Some(amount) = patch.initial_balance {
                    model.initial_balance_minor = ActiveValue::Set(amount.cents());
                }
                if let Some(amount) = patch.limit {
                    model.limit_minor = ActiveValue::Set(amount.cents());
                }
                if let Some(period) = patch.period {
                    model.period = ActiveValue::Set(period.as_str().to_string());
                }
                Budget::try_from(model.update(&db_tx).await?)
            })
        })
        .await
    }

    /// Deletes the budget and detaches the categories that pointed at it.
    pub async fn delete_budget(&self, budget_id: i64) -> ResultEngine<()> {
        self.bounded(async {
            with_tx!(self, |db_tx| {
                Self::find_budget(&db_tx, budget_id).await?;

                db_tx
                    .execute(Statement::from_sql_and_values(
                        db_tx.get_database_backend(),
                        "UPDATE categories SET budget_id = NULL WHERE budget_id = ?;",
                        vec![budget_id.into()],
                    ))
                    .await?;
                budgets::Entity::delete_by_id(budget_id).exec(&db_tx).await?;
                Ok(())
            })
        })
        .await
    }

    /// `Exceeded` when the initial balance is above the limit.
    pub async fn check_budget_limit(&self, budget_id: i64) -> ResultEngine<LimitStatus> {
        Ok(self.budget(budget_id).await?.limit_status())
    }

    pub(super) async fn find_budget<C: ConnectionTrait>(
        db: &C,
        budget_id: i64,
    ) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(budget_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("budget {budget_id}")))
    }
}
