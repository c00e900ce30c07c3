//! Goal API endpoints

use api_types::{
    Message,
    goal::{GoalNew, GoalReminder, GoalReminderNew, GoalStatus, GoalUpdate, GoalView, ReminderDue},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{MoneyCents, parse_iso_date};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, users::UserQuery};

#[derive(Deserialize)]
pub struct ReminderQuery {
    #[serde(rename = "userID")]
    user_id: i64,
    /// Defaults to today (UTC).
    date: Option<String>,
}

fn goal_view(goal: engine::Goal) -> GoalView {
    GoalView {
        goal_id: goal.goal_id,
        user_id: goal.user_id,
        name: goal.name,
        target_minor: goal.target.cents(),
        current_minor: goal.current.cents(),
        deadline: goal.deadline,
        status: match goal.status {
            engine::GoalStatus::InProgress => GoalStatus::InProgress,
            engine::GoalStatus::Completed => GoalStatus::Completed,
        },
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(engine::NewGoal {
            user_id: payload.user_id,
            name: payload.name,
            target: MoneyCents::new(payload.target_minor),
            current: MoneyCents::new(payload.current_minor.unwrap_or_default()),
            deadline: payload.deadline,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(goal_view(goal))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.list_goals(query.user_id).await?;
    Ok(Json(goals.into_iter().map(goal_view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(goal_id): Path<i64>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .update_goal(
            goal_id,
            engine::GoalPatch {
                name: payload.name,
                target: payload.target_minor.map(MoneyCents::new),
                current: payload.current_minor.map(MoneyCents::new),
                deadline: payload.deadline,
            },
        )
        .await?;

    Ok(Json(goal_view(goal)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(goal_id): Path<i64>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_goal(goal_id).await?;
    Ok(Json(Message::new("goal deleted")))
}

pub async fn send_reminder(
    State(state): State<ServerState>,
    Path(goal_id): Path<i64>,
    Json(body): Json<GoalReminderNew>,
) -> Result<Json<GoalReminder>, ServerError> {
    let reminder = state
        .engine
        .send_goal_reminder(goal_id, body.reminder.as_deref())
        .await?;
    Ok(Json(GoalReminder {
        goal_id: reminder.goal_id,
        user_id: reminder.user_id,
        message: reminder.message,
    }))
}

pub async fn reminder_due(
    State(state): State<ServerState>,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<ReminderDue>, ServerError> {
    let today = match query.date.as_deref() {
        Some(date) => parse_iso_date(date)?,
        None => Utc::now().date_naive(),
    };
    let due = state.engine.goal_reminder_due(query.user_id, today).await?;
    Ok(Json(ReminderDue {
        user_id: query.user_id,
        due,
    }))
}
