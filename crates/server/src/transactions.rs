//! Transactions API endpoints

use api_types::{
    Message,
    transaction::{
        PeriodTransactions, TransactionDetail, TransactionKind as ApiKind, TransactionNew,
        TransactionUpdate, TransactionView, TransactionWithIcon,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{MoneyCents, Period, parse_iso_date};
use serde::Deserialize;

use crate::{
    ServerError, categories::category_view, server::ServerState, statistics::map_period,
    users::UserQuery,
};

#[derive(Deserialize)]
pub struct KindQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    #[serde(rename = "type")]
    kind: ApiKind,
}

#[derive(Deserialize)]
pub struct PeriodQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    period: String,
    date: String,
}

#[derive(Deserialize)]
pub struct DetailQuery {
    #[serde(rename = "transactionID")]
    transaction_id: i64,
}

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Goal => ApiKind::Goal,
    }
}

fn unmap_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Goal => engine::TransactionKind::Goal,
    }
}

fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        transaction_id: tx.transaction_id,
        user_id: tx.user_id,
        category_id: tx.category_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        date: tx.date,
        description: tx.description,
    }
}

fn transaction_list(txs: Vec<engine::Transaction>) -> Json<Vec<TransactionView>> {
    Json(txs.into_iter().map(transaction_view).collect())
}

pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .add_transaction(engine::NewTransaction {
            user_id: payload.user_id,
            category_id: payload.category_id,
            kind: unmap_kind(payload.kind),
            amount: MoneyCents::new(payload.amount_minor),
            date: payload.date,
            description: payload.description.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(transaction_id): Path<i64>,
    Query(query): Query<UserQuery>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .edit_transaction(
            query.user_id,
            transaction_id,
            engine::TransactionPatch {
                category_id: payload.category_id,
                kind: payload.kind.map(unmap_kind),
                amount: payload.amount_minor.map(MoneyCents::new),
                date: payload.date,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(transaction_view(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(transaction_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .delete_transaction(query.user_id, transaction_id)
        .await?;
    Ok(Json(Message::new("transaction deleted")))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state.engine.list_transactions(query.user_id).await?;
    Ok(transaction_list(txs))
}

pub async fn by_kind(
    State(state): State<ServerState>,
    Query(query): Query<KindQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state
        .engine
        .transactions_by_kind(query.user_id, unmap_kind(query.kind))
        .await?;
    Ok(transaction_list(txs))
}

pub async fn in_period(
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodTransactions>, ServerError> {
    let period = Period::try_from(query.period.as_str())?;
    let anchor = parse_iso_date(&query.date)?;
    let (window, txs) = state
        .engine
        .transactions_in_period(query.user_id, period, anchor)
        .await?;

    Ok(Json(PeriodTransactions {
        period: map_period(period),
        start_date: window.start_str(),
        end_date: window.end_str(),
        transactions: txs.into_iter().map(transaction_view).collect(),
    }))
}

pub async fn detail(
    State(state): State<ServerState>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<TransactionDetail>, ServerError> {
    let (tx, category) = state
        .engine
        .transaction_with_category(query.transaction_id)
        .await?;

    Ok(Json(TransactionDetail {
        transaction: transaction_view(tx),
        category: category.map(category_view),
    }))
}

pub async fn with_icons(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<TransactionWithIcon>>, ServerError> {
    let txs = state.engine.transactions_with_icons(query.user_id).await?;

    Ok(Json(
        txs.into_iter()
            .map(|entry| TransactionWithIcon {
                transaction: transaction_view(entry.transaction),
                icon: entry.icon,
            })
            .collect(),
    ))
}
