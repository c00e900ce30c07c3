//! User API endpoints

use api_types::{
    Message,
    user::{Role, UserLogin, UserRegister, UserSummary, UserUpdate, UserView, UserWithSettings},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, settings::settings_view};

#[derive(Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userID")]
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct ActorQuery {
    #[serde(rename = "actorID")]
    actor_id: i64,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    email: String,
}

fn map_role(role: engine::UserRole) -> Role {
    match role {
        engine::UserRole::User => Role::User,
        engine::UserRole::Admin => Role::Admin,
    }
}

pub(crate) fn user_view(user: engine::User) -> UserView {
    UserView {
        user_id: user.user_id,
        full_name: user.full_name,
        email: user.email,
        profile_picture: user.profile_picture,
        role: map_role(user.role),
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let role = payload.role.map(|role| match role {
        Role::User => engine::UserRole::User,
        Role::Admin => engine::UserRole::Admin,
    });
    let user = state
        .engine
        .register_user(engine::NewUser {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            profile_picture: payload.profile_picture.unwrap_or_default(),
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.login(&payload.email, &payload.password).await?;
    Ok(Json(user_view(user)))
}

pub async fn update(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_user(
            query.user_id,
            engine::UserPatch {
                full_name: payload.full_name,
                email: payload.email,
                password: payload.password,
                profile_picture: payload.profile_picture,
            },
        )
        .await?;

    Ok(Json(user_view(user)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_user(query.actor_id, user_id).await?;
    Ok(Json(Message::new("user deleted")))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserSummary>, ServerError> {
    let user = state.engine.user_by_id(user_id).await?;
    Ok(Json(UserSummary {
        user_id: user.user_id,
        full_name: user.full_name,
    }))
}

pub async fn by_email(
    State(state): State<ServerState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserView>, ServerError> {
    if query.email.trim().is_empty() {
        return Err(ServerError::Generic("email is required".to_string()));
    }
    let user = state.engine.user_by_email(&query.email).await?;
    Ok(Json(user_view(user)))
}

pub async fn with_settings(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserWithSettings>, ServerError> {
    let (user, settings) = state.engine.user_and_settings(query.user_id).await?;
    Ok(Json(UserWithSettings {
        user: user_view(user),
        settings: settings_view(settings),
    }))
}
