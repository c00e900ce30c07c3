use chrono::NaiveDate;

use crate::{
    DateWindow, EXPENSE_KINDS, INCOME_KINDS, MoneyCents, Period, ResultEngine, TransactionKind,
    aggregate::{balance, sum_by_kinds},
};

use super::Engine;

impl Engine {
    /// Total amount of `user_id`'s transactions whose kind is in `kinds`,
    /// optionally restricted to `window`. No matching rows sums to zero.
    pub async fn sum_by_kinds_and_user(
        &self,
        user_id: i64,
        kinds: &[TransactionKind],
        window: Option<DateWindow>,
    ) -> ResultEngine<MoneyCents> {
        let records = self
            .bounded(Self::load_transactions(
                &self.database,
                user_id,
                Some(kinds),
                window.as_ref(),
            ))
            .await?;
        sum_by_kinds(&records, user_id, kinds, window.as_ref())
    }

    pub async fn total_income(
        &self,
        user_id: i64,
        window: Option<DateWindow>,
    ) -> ResultEngine<MoneyCents> {
        self.sum_by_kinds_and_user(user_id, INCOME_KINDS, window)
            .await
    }

    /// Expenses include goal contributions, see [`EXPENSE_KINDS`].
    pub async fn total_expense(
        &self,
        user_id: i64,
        window: Option<DateWindow>,
    ) -> ResultEngine<MoneyCents> {
        self.sum_by_kinds_and_user(user_id, EXPENSE_KINDS, window)
            .await
    }

    /// Income minus expenses, computed from one read of the user's rows.
    pub async fn balance(
        &self,
        user_id: i64,
        window: Option<DateWindow>,
    ) -> ResultEngine<MoneyCents> {
        let records = self
            .bounded(Self::load_transactions(
                &self.database,
                user_id,
                None,
                window.as_ref(),
            ))
            .await?;
        balance(&records, user_id, window.as_ref())
    }

    /// Balance over the `period` containing `anchor`.
    pub async fn balance_in_period(
        &self,
        user_id: i64,
        period: Period,
        anchor: NaiveDate,
    ) -> ResultEngine<MoneyCents> {
        let window = DateWindow::from(period.resolve(anchor)?);
        self.balance(user_id, Some(window)).await
    }
}
