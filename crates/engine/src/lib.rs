//! Domain engine for CashWise.
//!
//! The engine owns the database connection and exposes one async method per
//! operation. The pieces with real logic are the sequence allocator
//! ([`Engine::next_id`]) and the aggregation helpers in [`aggregate`] and
//! [`period`]; everything else is typed CRUD over SeaORM entities.

use std::{future::Future, time::Duration};

use argon2::Params;
use sea_orm::DatabaseConnection;

pub use aggregate::{
    DateWindow, EXPENSE_KINDS, INCOME_KINDS, WINDOW_BOUNDS, WindowBounds, balance,
    sort_newest_first, sum_by_kinds,
};
pub use budgets::{Budget, BudgetPatch, LimitStatus, NewBudget};
pub use categories::{Category, CategoryPatch, DEFAULT_ICON, NewCategory};
pub use counters::Sequence;
pub use error::EngineError;
pub use goals::{Goal, GoalPatch, GoalReminder, GoalStatus, NewGoal};
pub use money::MoneyCents;
pub use period::{
    MONTH_END, MonthEnd, Period, PeriodWindow, format_iso_date, parse_iso_date, resolve_period,
};
pub use settings::{SettingFlag, Settings};
pub use transactions::{
    NewTransaction, Transaction, TransactionKind, TransactionPatch, TransactionWithIcon,
};
pub use users::{NewUser, User, UserPatch, UserRole};

pub mod aggregate;
mod budgets;
mod categories;
mod counters;
mod error;
mod goals;
mod money;
mod ops;
mod password;
pub mod period;
mod settings;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Default bound applied to every storage round-trip.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    query_timeout: Duration,
    password_params: Params,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Timeout applied to each operation's storage work.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Runs `fut` under the configured query timeout.
    async fn bounded<T, F>(&self, fut: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.query_timeout.as_millis())),
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    query_timeout: Option<Duration>,
    password_cost: Option<(u32, u32)>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the per-operation storage timeout (default 10 seconds).
    pub fn query_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.query_timeout = Some(timeout);
        self
    }

    /// Override the argon2 memory (KiB) and iteration cost used for new
    /// password hashes.
    pub fn password_cost(mut self, memory_kib: u32, iterations: u32) -> EngineBuilder {
        self.password_cost = Some((memory_kib, iterations));
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let query_timeout = self.query_timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT);
        if query_timeout.is_zero() {
            return Err(EngineError::InvalidInput(
                "query timeout must be > 0".to_string(),
            ));
        }

        let password_params = match self.password_cost {
            Some((memory_kib, iterations)) => Params::new(memory_kib, iterations, 1, None)
                .map_err(|err| EngineError::InvalidInput(format!("invalid password cost: {err}")))?,
            None => Params::default(),
        };

        Ok(Engine {
            database: self.database,
            query_timeout,
            password_params,
        })
    }
}
