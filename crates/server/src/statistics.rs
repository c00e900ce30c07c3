//! Statistics API endpoints

use api_types::stats::{Balance, TotalExpense, TotalIncome};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{DateWindow, Period, parse_iso_date};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

#[derive(Deserialize)]
pub struct RangeQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct BalanceQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    period: Option<String>,
    date: Option<String>,
}

pub(crate) fn map_period(period: Period) -> api_types::Period {
    match period {
        Period::Day => api_types::Period::Day,
        Period::Week => api_types::Period::Week,
        Period::Month => api_types::Period::Month,
    }
}

/// Both ends or neither.
fn date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateWindow>, ServerError> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some(DateWindow::parse(start, end)?)),
        _ => Err(ServerError::Generic(
            "startDate and endDate must be given together".to_string(),
        )),
    }
}

pub async fn total_income(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<TotalIncome>, ServerError> {
    let window = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let total = state.engine.total_income(query.user_id, window).await?;

    Ok(Json(TotalIncome {
        user_id: query.user_id,
        total_income_minor: total.cents(),
    }))
}

pub async fn total_expense(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<TotalExpense>, ServerError> {
    let window = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let total = state.engine.total_expense(query.user_id, window).await?;

    Ok(Json(TotalExpense {
        user_id: query.user_id,
        total_expense_minor: total.cents(),
    }))
}

/// Balance over everything, an explicit date range, or the period
/// containing `date`. Range and period cannot be combined.
pub async fn balance(
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<Balance>, ServerError> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;

    let balance = match (range, query.period.as_deref(), query.date.as_deref()) {
        (range, None, None) => state.engine.balance(query.user_id, range).await?,
        (None, Some(period), Some(date)) => {
            let period = Period::try_from(period)?;
            let anchor = parse_iso_date(date)?;
            state
                .engine
                .balance_in_period(query.user_id, period, anchor)
                .await?
        }
        (Some(_), _, _) => {
            return Err(ServerError::Generic(
                "use either startDate/endDate or period/date".to_string(),
            ));
        }
        (None, _, _) => {
            return Err(ServerError::Generic(
                "period and date must be given together".to_string(),
            ));
        }
    };

    Ok(Json(Balance {
        user_id: query.user_id,
        balance_minor: balance.cents(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_a_range_is_rejected() {
        assert!(date_range(Some("2024-03-01"), None).is_err());
        assert!(date_range(None, Some("2024-03-01")).is_err());
    }

    #[test]
    fn missing_range_means_no_window() {
        assert!(matches!(date_range(None, None), Ok(None)));
    }

    #[test]
    fn full_range_parses() {
        let window = date_range(Some("2024-03-01"), Some("2024-04-01"));
        assert!(matches!(window, Ok(Some(_))));
    }
}
