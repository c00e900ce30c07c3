use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run_with_listener, spawn_with_listener};

mod budgets;
mod categories;
mod goals;
mod server;
mod settings;
mod statistics;
mod transactions;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{
            Role, UserLogin, UserRegister, UserSummary, UserUpdate, UserView, UserWithSettings,
        };
    }

    pub mod settings {
        pub use api_types::settings::SettingsView;
    }

    pub mod budget {
        pub use api_types::budget::{BudgetLimit, BudgetNew, BudgetUpdate, BudgetView, LimitStatus};
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            PeriodTransactions, TransactionDetail, TransactionKind, TransactionNew,
            TransactionUpdate, TransactionView, TransactionWithIcon,
        };
    }

    pub mod stats {
        pub use api_types::stats::{Balance, TotalExpense, TotalIncome};
    }

    pub mod goal {
        pub use api_types::goal::{
            GoalNew, GoalReminder, GoalReminderNew, GoalStatus, GoalUpdate, GoalView, ReminderDue,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::AllocationFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::InvalidPeriod(_) | EngineError::DateParse(_) => StatusCode::BAD_REQUEST,
        EngineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        EngineError::StorageUnavailable(_) | EngineError::Decode(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidInput(_) | EngineError::InvalidAmount(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::StorageUnavailable(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Decode(reason) => {
            tracing::error!("undecodable row: {reason}");
            "internal server error".to_string()
        }
        EngineError::AllocationFailed(reason) => {
            tracing::error!("id allocation failed: {reason}");
            "could not allocate an id, try again".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::*;

    fn status(err: EngineError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn allocation_failure_maps_to_503() {
        assert_eq!(
            status(EngineError::AllocationFailed("x".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn bad_period_and_date_map_to_400() {
        assert_eq!(
            status(EngineError::InvalidPeriod("year".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(EngineError::DateParse("2024-3-1".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn timeout_maps_to_504() {
        assert_eq!(status(EngineError::Timeout(10_000)), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        assert_eq!(
            status(EngineError::StorageUnavailable(DbErr::Custom("disk".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        assert_eq!(
            status(EngineError::KeyNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        assert_eq!(
            status(EngineError::ExistingKey("x".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn engine_validation_maps_to_422() {
        assert_eq!(
            status(EngineError::InvalidAmount("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(EngineError::InvalidInput("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn credentials_and_forbidden_map_to_401_and_403() {
        assert_eq!(status(EngineError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(EngineError::Forbidden("x".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
