//! JSON bodies of the CashWise HTTP API.
//!
//! Field names follow the wire format clients already use: camelCase, with
//! ids spelled `userID`, `categoryID`, `transactionID`, `budgetID`, `goalID`.
//! Amounts are integer minor units (`*Minor`), dates are `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        #[default]
        User,
        Admin,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserRegister {
        pub full_name: String,
        pub email: String,
        pub password: String,
        #[serde(default)]
        pub profile_picture: Option<String>,
        #[serde(default)]
        pub role: Option<Role>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserLogin {
        pub email: String,
        pub password: String,
    }

    /// Partial update: absent fields are left as they are.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserUpdate {
        #[serde(default)]
        pub full_name: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub password: Option<String>,
        #[serde(default)]
        pub profile_picture: Option<String>,
    }

    /// A user as returned by the API. Never carries the password hash.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub full_name: String,
        pub email: String,
        pub profile_picture: String,
        pub role: Role,
    }

    /// Public lookup by id: only id and name.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserSummary {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub full_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserWithSettings {
        pub user: UserView,
        pub settings: super::settings::SettingsView,
    }
}

pub mod settings {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettingsView {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub dark_theme: bool,
        pub terms_condition: bool,
        pub notification: bool,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LimitStatus {
        Exceeded,
        WithinRange,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub name: String,
        pub initial_balance_minor: i64,
        pub limit_minor: i64,
        pub period: Period,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUpdate {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub initial_balance_minor: Option<i64>,
        #[serde(default)]
        pub limit_minor: Option<i64>,
        #[serde(default)]
        pub period: Option<Period>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        #[serde(rename = "budgetID")]
        pub budget_id: i64,
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub name: String,
        pub initial_balance_minor: i64,
        pub limit_minor: i64,
        pub period: Period,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetLimit {
        #[serde(rename = "budgetID")]
        pub budget_id: i64,
        pub status: LimitStatus,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryNew {
        #[serde(rename = "userID")]
        pub user_id: i64,
        #[serde(rename = "budgetID", default)]
        pub budget_id: Option<i64>,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        /// Defaults to `default-icon.png`.
        #[serde(default)]
        pub icon: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpdate {
        #[serde(rename = "budgetID", default)]
        pub budget_id: Option<i64>,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        #[serde(rename = "categoryID")]
        pub category_id: i64,
        #[serde(rename = "userID")]
        pub user_id: i64,
        #[serde(rename = "budgetID")]
        pub budget_id: Option<i64>,
        pub name: String,
        pub description: String,
        pub icon: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionKind {
        Income,
        Expense,
        Goal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        #[serde(rename = "userID")]
        pub user_id: i64,
        #[serde(rename = "categoryID")]
        pub category_id: i64,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        /// `YYYY-MM-DD`
        pub date: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        #[serde(rename = "categoryID", default)]
        pub category_id: Option<i64>,
        #[serde(rename = "type", default)]
        pub kind: Option<TransactionKind>,
        #[serde(default)]
        pub amount_minor: Option<i64>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        #[serde(rename = "transactionID")]
        pub transaction_id: i64,
        #[serde(rename = "userID")]
        pub user_id: i64,
        #[serde(rename = "categoryID")]
        pub category_id: i64,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub date: String,
        pub description: String,
    }

    /// A transaction with its category icon; `icon` is `null` when the
    /// category was deleted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionWithIcon {
        #[serde(flatten)]
        pub transaction: TransactionView,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDetail {
        pub transaction: TransactionView,
        pub category: Option<super::category::CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PeriodTransactions {
        pub period: Period,
        pub start_date: String,
        /// Exclusive.
        pub end_date: String,
        pub transactions: Vec<TransactionView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TotalIncome {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub total_income_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TotalExpense {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub total_expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Balance {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub balance_minor: i64,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum GoalStatus {
        #[serde(rename = "in progress")]
        InProgress,
        #[serde(rename = "completed")]
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalNew {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub name: String,
        pub target_minor: i64,
        #[serde(default)]
        pub current_minor: Option<i64>,
        /// `YYYY-MM-DD`
        pub deadline: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalUpdate {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub target_minor: Option<i64>,
        #[serde(default)]
        pub current_minor: Option<i64>,
        #[serde(default)]
        pub deadline: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalView {
        #[serde(rename = "goalID")]
        pub goal_id: i64,
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub name: String,
        pub target_minor: i64,
        pub current_minor: i64,
        pub deadline: String,
        pub status: GoalStatus,
    }

    /// Body of a reminder request. Without `reminder` the text is built
    /// from the goal's progress.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalReminderNew {
        #[serde(default)]
        pub reminder: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalReminder {
        #[serde(rename = "goalID")]
        pub goal_id: i64,
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderDue {
        #[serde(rename = "userID")]
        pub user_id: i64,
        pub due: bool,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reminder_text_is_optional() {
        let with_text: goal::GoalReminderNew =
            serde_json::from_value(json!({ "reminder": "Save 50 this week" })).unwrap();
        assert_eq!(with_text.reminder.as_deref(), Some("Save 50 this week"));

        let empty: goal::GoalReminderNew = serde_json::from_value(json!({})).unwrap();
        assert!(empty.reminder.is_none());
    }

    #[test]
    fn transaction_uses_wire_field_names() {
        let view = transaction::TransactionView {
            transaction_id: 3,
            user_id: 1,
            category_id: 2,
            kind: transaction::TransactionKind::Goal,
            amount_minor: 1000,
            date: "2024-03-15".to_string(),
            description: "rainy day".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "transactionID": 3,
                "userID": 1,
                "categoryID": 2,
                "type": "goal",
                "amountMinor": 1000,
                "date": "2024-03-15",
                "description": "rainy day",
            })
        );
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let body: category::CategoryNew =
            serde_json::from_value(json!({"userID": 1, "name": "Food"})).unwrap();
        assert_eq!(body.budget_id, None);
        assert_eq!(body.icon, None);

        let update: user::UserUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.full_name.is_none() && update.password.is_none());
    }

    #[test]
    fn goal_status_keeps_the_space() {
        assert_eq!(
            serde_json::to_value(goal::GoalStatus::InProgress).unwrap(),
            json!("in progress")
        );
    }
}
