use sea_orm::{ConnectionTrait, EntityTrait, Statement, TransactionTrait};

use crate::{EngineError, ResultEngine, SettingFlag, Settings, settings};

use super::{Engine, with_tx};

impl Engine {
    pub async fn settings(&self, user_id: i64) -> ResultEngine<Settings> {
        self.bounded(async {
            settings::Entity::find_by_id(user_id)
                .one(&self.database)
                .await?
                .map(Settings::from)
                .ok_or_else(|| EngineError::KeyNotFound(format!("settings of user {user_id}")))
        })
        .await
    }

    /// Flips one flag in a single `UPDATE` and returns the new settings.
    pub async fn toggle_setting(&self, user_id: i64, flag: SettingFlag) -> ResultEngine<Settings> {
        let column = flag.column();
        let sql = format!("UPDATE settings SET {column} = NOT {column} WHERE user_id = ?;");

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let result = db_tx
                    .execute(Statement::from_sql_and_values(
                        db_tx.get_database_backend(),
                        sql.as_str(),
                        vec![user_id.into()],
                    ))
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(EngineError::KeyNotFound(format!(
                        "settings of user {user_id}"
                    )));
                }

                settings::Entity::find_by_id(user_id)
                    .one(&db_tx)
                    .await?
                    .map(Settings::from)
                    .ok_or_else(|| EngineError::KeyNotFound(format!("settings of user {user_id}")))
            })
        })
        .await
    }
}
