//! Savings goals.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }

    /// Status implied by the saved amount.
    pub fn from_progress(current: MoneyCents, target: MoneyCents) -> Self {
        if current >= target {
            Self::Completed
        } else {
            Self::InProgress
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: i64,
    pub user_id: i64,
    pub name: String,
    pub target: MoneyCents,
    pub current: MoneyCents,
    pub deadline: String,
    pub status: GoalStatus,
}

/// Input for [`crate::Engine::create_goal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGoal {
    pub user_id: i64,
    pub name: String,
    pub target: MoneyCents,
    pub current: MoneyCents,
    pub deadline: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target: Option<MoneyCents>,
    pub current: Option<MoneyCents>,
    pub deadline: Option<String>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.target.is_none()
            && self.current.is_none()
            && self.deadline.is_none()
    }
}

/// What [`crate::Engine::send_goal_reminder`] reports back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalReminder {
    pub goal_id: i64,
    pub user_id: i64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub goal_id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub deadline: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            goal_id: ActiveValue::Set(goal.goal_id),
            user_id: ActiveValue::Set(goal.user_id),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target.cents()),
            current_minor: ActiveValue::Set(goal.current.cents()),
            deadline: ActiveValue::Set(goal.deadline.clone()),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = GoalStatus::try_from(model.status.as_str()).map_err(|_| {
            EngineError::Decode(format!(
                "goal {} has unknown status \"{}\"",
                model.goal_id, model.status
            ))
        })?;
        Ok(Self {
            goal_id: model.goal_id,
            user_id: model.user_id,
            name: model.name,
            target: MoneyCents::new(model.target_minor),
            current: MoneyCents::new(model.current_minor),
            deadline: model.deadline,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_progress() {
        assert_eq!(
            GoalStatus::from_progress(MoneyCents::new(0), MoneyCents::new(100)),
            GoalStatus::InProgress
        );
        assert_eq!(
            GoalStatus::from_progress(MoneyCents::new(100), MoneyCents::new(100)),
            GoalStatus::Completed
        );
    }

    #[test]
    fn status_parses_stored_labels() {
        assert_eq!(GoalStatus::try_from("in progress").unwrap(), GoalStatus::InProgress);
        assert_eq!(GoalStatus::try_from("completed").unwrap(), GoalStatus::Completed);
        assert!(GoalStatus::try_from("done").is_err());
    }
}
