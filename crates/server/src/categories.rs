//! Category API endpoints

use api_types::{
    Message,
    category::{CategoryNew, CategoryUpdate, CategoryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, users::UserQuery};

#[derive(Deserialize)]
pub struct NameQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    name: String,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    #[serde(rename = "categoryID")]
    category_id: i64,
}

pub(crate) fn category_view(category: engine::Category) -> CategoryView {
    CategoryView {
        category_id: category.category_id,
        user_id: category.user_id,
        budget_id: category.budget_id,
        name: category.name,
        description: category.description,
        icon: category.icon,
    }
}

fn category_list(categories: Vec<engine::Category>) -> Json<Vec<CategoryView>> {
    Json(categories.into_iter().map(category_view).collect())
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(engine::NewCategory {
            user_id: payload.user_id,
            budget_id: payload.budget_id,
            name: payload.name,
            description: payload.description.unwrap_or_default(),
            icon: payload.icon,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
    Query(query): Query<UserQuery>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            query.user_id,
            category_id,
            engine::CategoryPatch {
                budget_id: payload.budget_id,
                name: payload.name,
                description: payload.description,
                icon: payload.icon,
            },
        )
        .await?;

    Ok(Json(category_view(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .delete_category(query.user_id, category_id)
        .await?;
    Ok(Json(Message::new("category deleted")))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(query.user_id).await?;
    Ok(category_list(categories))
}

pub async fn by_name(
    State(state): State<ServerState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories_by_name(query.user_id, &query.name)
        .await?;
    Ok(category_list(categories))
}

pub async fn get(
    State(state): State<ServerState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .category(query.user_id, query.category_id)
        .await?;
    Ok(Json(category_view(category)))
}
