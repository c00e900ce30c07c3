use sea_orm::{ConnectionTrait, DatabaseTransaction, EntityTrait};

use crate::{Engine, EngineError, ResultEngine};

mod aggregates;
mod budgets;
mod categories;
mod goals;
mod sequences;
mod settings;
mod transactions;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

impl Engine {
    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i64,
    ) -> ResultEngine<crate::users::Model> {
        crate::users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {user_id}")))
    }

    /// Category `category_id` if it belongs to `user_id`.
    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
        category_id: i64,
    ) -> ResultEngine<crate::categories::Model> {
        crate::categories::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id}")))
    }
}
