use sea_orm::{ConnectionTrait, Statement};

use crate::{EngineError, ResultEngine, Sequence};

use super::Engine;

/// Create-or-increment in one statement, so two callers can never read the
/// same value.
const NEXT_ID_SQL: &str = "INSERT INTO counters (name, seq) VALUES (?, 1) \
     ON CONFLICT(name) DO UPDATE SET seq = counters.seq + 1 \
     RETURNING seq;";

impl Engine {
    /// Mints the next id of `sequence`.
    ///
    /// The first id of a fresh sequence is `1`. Store errors and timeouts
    /// are reported as [`EngineError::AllocationFailed`]; nothing is retried.
    ///
    /// Creation methods (`register_user`, `add_transaction`, ...) allocate
    /// inside their own DB transaction instead, so a failed insert does not
    /// burn an id. Use this for records created outside the engine.
    pub async fn next_id(&self, sequence: Sequence) -> ResultEngine<i64> {
        match tokio::time::timeout(self.query_timeout, allocate(&self.database, sequence)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::AllocationFailed(format!(
                "{sequence}: timed out after {} ms",
                self.query_timeout.as_millis()
            ))),
        }
    }

    /// Same as [`Engine::next_id`], with the sequence given by its stored
    /// name (`"userID"`, `"transactionID"`, ...).
    pub async fn next_id_named(&self, name: &str) -> ResultEngine<i64> {
        let sequence = Sequence::try_from(name)?;
        self.next_id(sequence).await
    }
}

/// Allocates on `db`, which may be an open transaction.
pub(super) async fn allocate<C: ConnectionTrait>(db: &C, sequence: Sequence) -> ResultEngine<i64> {
    let failed = |reason: String| EngineError::AllocationFailed(format!("{sequence}: {reason}"));

    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            NEXT_ID_SQL,
            vec![sequence.as_str().into()],
        ))
        .await
        .map_err(|err| failed(err.to_string()))?
        .ok_or_else(|| failed("counter statement returned no row".to_string()))?;
    let id: i64 = row
        .try_get("", "seq")
        .map_err(|err| failed(err.to_string()))?;

    tracing::debug!(sequence = %sequence, id, "allocated id");
    Ok(id)
}
