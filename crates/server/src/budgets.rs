//! Budget API endpoints

use api_types::{
    Message,
    budget::{BudgetLimit, BudgetNew, BudgetUpdate, BudgetView, LimitStatus},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{MoneyCents, Period};

use crate::{ServerError, server::ServerState, statistics::map_period, users::UserQuery};

fn unmap_period(period: api_types::Period) -> Period {
    match period {
        api_types::Period::Day => Period::Day,
        api_types::Period::Week => Period::Week,
        api_types::Period::Month => Period::Month,
    }
}

fn budget_view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        budget_id: budget.budget_id,
        user_id: budget.user_id,
        name: budget.name,
        initial_balance_minor: budget.initial_balance.cents(),
        limit_minor: budget.limit.cents(),
        period: map_period(budget.period),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(engine::NewBudget {
            user_id: payload.user_id,
            name: payload.name,
            initial_balance: MoneyCents::new(payload.initial_balance_minor),
            limit: MoneyCents::new(payload.limit_minor),
            period: unmap_period(payload.period),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(budget_view(budget))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state.engine.list_budgets(query.user_id).await?;
    Ok(Json(budgets.into_iter().map(budget_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(budget_id): Path<i64>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(budget_id).await?;
    Ok(Json(budget_view(budget)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(budget_id): Path<i64>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(
            budget_id,
            engine::BudgetPatch {
                name: payload.name,
                initial_balance: payload.initial_balance_minor.map(MoneyCents::new),
                limit: payload.limit_minor.map(MoneyCents::new),
                period: payload.period.map(unmap_period),
            },
        )
        .await?;

    Ok(Json(budget_view(budget)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(budget_id): Path<i64>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_budget(budget_id).await?;
    Ok(Json(Message::new("budget deleted")))
}

pub async fn check_limit(
    State(state): State<ServerState>,
    Path(budget_id): Path<i64>,
) -> Result<Json<BudgetLimit>, ServerError> {
    let status = match state.engine.check_budget_limit(budget_id).await? {
        engine::LimitStatus::Exceeded => LimitStatus::Exceeded,
        engine::LimitStatus::WithinRange => LimitStatus::WithinRange,
    };
    Ok(Json(BudgetLimit { budget_id, status }))
}
