use api_types::settings::SettingsView;
use axum::{
    Json,
    extract::{Query, State},
};
use engine::SettingFlag;

use crate::{ServerError, server::ServerState, users::UserQuery};

pub(crate) fn settings_view(settings: engine::Settings) -> SettingsView {
    SettingsView {
        user_id: settings.user_id,
        dark_theme: settings.dark_theme,
        terms_condition: settings.terms_condition,
        notification: settings.notification,
    }
}

async fn toggle(
    state: &ServerState,
    user_id: i64,
    flag: SettingFlag,
) -> Result<Json<SettingsView>, ServerError> {
    let settings = state.engine.toggle_setting(user_id, flag).await?;
    Ok(Json(settings_view(settings)))
}

pub async fn toggle_dark_theme(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SettingsView>, ServerError> {
    toggle(&state, query.user_id, SettingFlag::DarkTheme).await
}

pub async fn toggle_terms_condition(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SettingsView>, ServerError> {
    toggle(&state, query.user_id, SettingFlag::TermsCondition).await
}

pub async fn toggle_notification(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SettingsView>, ServerError> {
    toggle(&state, query.user_id, SettingFlag::Notification).await
}
