use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};

use crate::{
    Category, DateWindow, EngineError, NewTransaction, Period, PeriodWindow, ResultEngine,
    Sequence, Transaction, TransactionKind, TransactionPatch, TransactionWithIcon, WindowBounds,
    aggregate::record_in_window, categories, format_iso_date, sort_newest_first, transactions,
    util::{ensure_amount, validate_date},
};

use super::{Engine, sequences::allocate, with_tx};

impl Engine {
    /// Records a transaction for `new_tx.user_id`.
    ///
    /// The amount must be non-negative, the date a canonical `YYYY-MM-DD`
    /// and the category one of the user's own.
    pub async fn add_transaction(&self, new_tx: NewTransaction) -> ResultEngine<Transaction> {
        ensure_amount(new_tx.amount, "amount")?;
        let date = validate_date(&new_tx.date)?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let transaction_id = allocate(&db_tx, Sequence::Transaction).await?;
                self.require_user(&db_tx, new_tx.user_id).await?;
                self.require_category(&db_tx, new_tx.user_id, new_tx.category_id)
                    .await?;

                let tx = Transaction {
                    transaction_id,
                    user_id: new_tx.user_id,
                    category_id: new_tx.category_id,
                    kind: new_tx.kind,
                    amount: new_tx.amount,
                    date,
                    description: new_tx.description.trim().to_string(),
                };
                transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
                tracing::debug!(
                    transaction_id,
                    user_id = tx.user_id,
                    kind = tx.kind.as_str(),
                    "transaction added"
                );
                Ok(tx)
            })
        })
        .await
    }

    /// Applies the non-empty fields of `patch` to a transaction owned by
    /// `user_id`.
    pub async fn edit_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput("no fields to update".to_string()));
        }
        if let Some(amount) = patch.amount {
            ensure_amount(amount, "amount")?;
        }
        let date = patch.date.as_deref().map(validate_date).transpose()?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                Self::find_owned_transaction(&db_tx, user_id, transaction_id).await?;
                if let Some(category_id) = patch.category_id {
                    self.require_category(&db_tx, user_id, category_id).await?;
                }

                let mut model = transactions::ActiveModel {
                    transaction_id: ActiveValue::Unchanged(transaction_id),
                    ..Default::default()
                };
                if let Some(category_id) = patch.category_id {
                    model.category_id = ActiveValue::Set(category_id);
                }
                if let Some(kind) = patch.kind {
                    model.kind = ActiveValue::Set(kind.as_str().to_string());
                }
                if let Some(amount) = patch.amount {
                    model.amount_minor = ActiveValue::Set(amount.cents());
                }
                if let Some(date) = date {
                    model.date = ActiveValue::Set(date);
                }
                if let Some(description) = &patch.description {
                    model.description = ActiveValue::Set(description.trim().to_string());
                }
                Transaction::try_from(model.update(&db_tx).await?)
            })
        })
        .await
    }

    pub async fn delete_transaction(&self, user_id: i64, transaction_id: i64) -> ResultEngine<()> {
        self.bounded(async {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::TransactionId.eq(transaction_id))
                .filter(transactions::Column::UserId.eq(user_id))
                .exec(&self.database)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!(
                    "transaction {transaction_id}"
                )));
            }
            Ok(())
        })
        .await
    }

    /// All transactions of `user_id`, newest first.
    pub async fn list_transactions(&self, user_id: i64) -> ResultEngine<Vec<Transaction>> {
        let mut records = self
            .bounded(Self::load_transactions(&self.database, user_id, None, None))
            .await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Transactions of `user_id` with the given kind, newest first.
    pub async fn transactions_by_kind(
        &self,
        user_id: i64,
        kind: TransactionKind,
    ) -> ResultEngine<Vec<Transaction>> {
        let kinds = [kind];
        let mut records = self
            .bounded(Self::load_transactions(
                &self.database,
                user_id,
                Some(&kinds[..]),
                None,
            ))
            .await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Transactions of `user_id` inside the `period` containing `anchor`,
    /// newest first, together with the resolved window.
    pub async fn transactions_in_period(
        &self,
        user_id: i64,
        period: Period,
        anchor: NaiveDate,
    ) -> ResultEngine<(PeriodWindow, Vec<Transaction>)> {
        let period_window = period.resolve(anchor)?;
        let window = DateWindow::from(period_window);
        let records = self
            .bounded(Self::load_transactions(
                &self.database,
                user_id,
                None,
                Some(&window),
            ))
            .await?;

        let mut in_window: Vec<Transaction> = records
            .into_iter()
            .filter(|record| record_in_window(record, &window))
            .collect();
        sort_newest_first(&mut in_window);
        Ok((period_window, in_window))
    }

    /// A transaction and its category, if the category still exists.
    pub async fn transaction_with_category(
        &self,
        transaction_id: i64,
    ) -> ResultEngine<(Transaction, Option<Category>)> {
        let (model, category) = self
            .bounded(async {
                let model = transactions::Entity::find_by_id(transaction_id)
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound(format!("transaction {transaction_id}"))
                    })?;
                let category = categories::Entity::find_by_id(model.category_id)
                    .one(&self.database)
                    .await?;
                Ok((model, category))
            })
            .await?;
        Ok((Transaction::try_from(model)?, category.map(Category::from)))
    }

    /// Transactions of `user_id`, newest first, each with its category icon.
    pub async fn transactions_with_icons(
        &self,
        user_id: i64,
    ) -> ResultEngine<Vec<TransactionWithIcon>> {
        let (mut records, icons) = self
            .bounded(async {
                let records =
                    Self::load_transactions(&self.database, user_id, None, None).await?;
                let icons: HashMap<i64, String> = categories::Entity::find()
                    .filter(categories::Column::UserId.eq(user_id))
                    .all(&self.database)
                    .await?
                    .into_iter()
                    .map(|model| (model.category_id, model.icon))
                    .collect();
                Ok((records, icons))
            })
            .await?;
        sort_newest_first(&mut records);

        Ok(records
            .into_iter()
            .map(|transaction| {
                let icon = icons.get(&transaction.category_id).cloned();
                TransactionWithIcon { transaction, icon }
            })
            .collect())
    }

    /// Loads `user_id`'s rows, narrowed in SQL by kind and by date range.
    ///
    /// The date filter compares text, which matches date order only for
    /// canonical dates; callers re-check the window on parsed dates.
    pub(super) async fn load_transactions<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        kinds: Option<&[TransactionKind]>,
        window: Option<&DateWindow>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::TransactionId);
        if let Some(kinds) = kinds {
            query = query.filter(
                transactions::Column::Kind.is_in(kinds.iter().map(|kind| kind.as_str())),
            );
        }
        if let Some(window) = window {
            query = query.filter(transactions::Column::Date.gte(format_iso_date(window.start)));
            query = match window.bounds {
                WindowBounds::HalfOpen => {
                    query.filter(transactions::Column::Date.lt(format_iso_date(window.end)))
                }
                WindowBounds::Closed => {
                    query.filter(transactions::Column::Date.lte(format_iso_date(window.end)))
                }
            };
        }

        query
            .all(db)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn find_owned_transaction<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        transaction_id: i64,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {transaction_id}")))
    }
}
