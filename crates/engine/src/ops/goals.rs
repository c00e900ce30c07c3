use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};

use crate::{
    DateWindow, EngineError, Goal, GoalPatch, GoalReminder, GoalStatus, MoneyCents, NewGoal,
    Period, ResultEngine, Sequence, TransactionKind, goals, settings,
    util::{ensure_amount, normalize_required_name, validate_date},
};

use super::{Engine, sequences::allocate, with_tx};

impl Engine {
    /// Creates a goal. Its status follows the saved amount: `completed`
    /// once `current` reaches `target`, `in progress` before that.
    pub async fn create_goal(&self, new_goal: NewGoal) -> ResultEngine<Goal> {
        let name = normalize_required_name(&new_goal.name, "goal name")?;
        ensure_positive_target(new_goal.target)?;
        ensure_amount(new_goal.current, "current amount")?;
        let deadline = validate_date(&new_goal.deadline)?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let goal_id = allocate(&db_tx, Sequence::Goal).await?;
                self.require_user(&db_tx, new_goal.user_id).await?;

                let goal = Goal {
                    goal_id,
                    user_id: new_goal.user_id,
                    name,
                    target: new_goal.target,
                    current: new_goal.current,
                    deadline,
                    status: GoalStatus::from_progress(new_goal.current, new_goal.target),
                };
                goals::ActiveModel::from(&goal).insert(&db_tx).await?;
                Ok(goal)
            })
        })
        .await
    }

    pub async fn goal(&self, goal_id: i64) -> ResultEngine<Goal> {
        let model = self
            .bounded(Self::find_goal(&self.database, goal_id))
            .await?;
        Goal::try_from(model)
    }

    pub async fn list_goals(&self, user_id: i64) -> ResultEngine<Vec<Goal>> {
        let models = self
            .bounded(async {
                Ok(goals::Entity::find()
                    .filter(goals::Column::UserId.eq(user_id))
                    .order_by_asc(goals::Column::GoalId)
                    .all(&self.database)
                    .await?)
            })
            .await?;
        models.into_iter().map(Goal::try_from).collect()
    }

    /// Applies the non-empty fields of `patch` and recomputes the status.
    pub async fn update_goal(&self, goal_id: i64, patch: GoalPatch) -> ResultEngine<Goal> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput("no fields to update".to_string()));
        }
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "goal name"))
            .transpose()?;
        if let Some(target) = patch.target {
            ensure_positive_target(target)?;
        }
        if let Some(current) = patch.current {
            ensure_amount(current, "current amount")?;
        }
        let deadline = patch.deadline.as_deref().map(validate_date).transpose()?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let existing = Goal::try_from(Self::find_goal(&db_tx, goal_id).await?)?;
                let target = patch.target.unwrap_or(existing.target);
                let current = patch.current.unwrap_or(existing.current);

                let mut model = goals::ActiveModel {
                    goal_id: ActiveValue::Unchanged(goal_id),
                    status: ActiveValue::Set(
                        GoalStatus::from_progress(current, target).as_str().to_string(),
                    ),
                    ..Default::default()
                };
                if let Some(name) = name {
                    model.name = ActiveValue::Set(name);
                }
                if let Some(target) = patch.target {
                    model.target_minor = ActiveValue::Set(target.cents());
                }
                if let Some(current) = patch.current {
                    model.current_minor = ActiveValue::Set(current.cents());
                }
                if let Some(deadline) = deadline {
                    model.deadline = ActiveValue::Set(deadline);
                }
                Goal::try_from(model.update(&db_tx).await?)
            })
        })
        .await
    }

    pub async fn delete_goal(&self, goal_id: i64) -> ResultEngine<()> {
        self.bounded(async {
            let result = goals::Entity::delete_by_id(goal_id)
                .exec(&self.database)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("goal {goal_id}")));
            }
            Ok(())
        })
        .await
    }

    /// Logs a reminder for the goal and returns what was sent.
    ///
    /// A caller-supplied `reminder` text is sent as is (trimmed); without
    /// one the message is built from the goal's progress. Delivery is a
    /// log line; there is no mail or push channel.
    pub async fn send_goal_reminder(
        &self,
        goal_id: i64,
        reminder: Option<&str>,
    ) -> ResultEngine<GoalReminder> {
        let goal = self.goal(goal_id).await?;
        let message = match reminder.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => text.to_string(),
            None => progress_message(&goal),
        };

        tracing::info!(goal_id, user_id = goal.user_id, %message, "goal reminder");
        Ok(GoalReminder {
            goal_id,
            user_id: goal.user_id,
            message,
        })
    }

    /// A reminder is due when `user_id` has notifications on and has not
    /// put anything towards a goal during the month containing `today`.
    pub async fn goal_reminder_due(&self, user_id: i64, today: NaiveDate) -> ResultEngine<bool> {
        let window = DateWindow::from(Period::Month.resolve(today)?);
        let kinds = [TransactionKind::Goal];

        self.bounded(async {
            let settings = settings::Entity::find_by_id(user_id)
                .one(&self.database)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("settings of user {user_id}")))?;
            if !settings.notification {
                return Ok(false);
            }

            let contributions =
                Self::load_transactions(&self.database, user_id, Some(&kinds[..]), Some(&window))
                    .await?;
            Ok(!contributions
                .iter()
                .any(|record| crate::aggregate::record_in_window(record, &window)))
        })
        .await
    }

    async fn find_goal<C: ConnectionTrait>(db: &C, goal_id: i64) -> ResultEngine<goals::Model> {
        goals::Entity::find_by_id(goal_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("goal {goal_id}")))
    }
}

fn progress_message(goal: &Goal) -> String {
    let remaining = goal.target - goal.current;
    if remaining > MoneyCents::ZERO {
        format!(
            "Goal \"{}\": {} left to save before {}",
            goal.name, remaining, goal.deadline
        )
    } else {
        format!("Goal \"{}\" is complete", goal.name)
    }
}

fn ensure_positive_target(target: MoneyCents) -> ResultEngine<()> {
    ensure_amount(target, "target amount")?;
    if target == MoneyCents::ZERO {
        return Err(EngineError::InvalidAmount(
            "target amount must be > 0".to_string(),
        ));
    }
    Ok(())
}
