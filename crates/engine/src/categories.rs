//! Spending categories, scoped per user.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Icon assigned when a category is created without one.
pub const DEFAULT_ICON: &str = "default-icon.png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub user_id: i64,
    pub budget_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Input for [`crate::Engine::create_category`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub user_id: i64,
    pub budget_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub budget_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.budget_id.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.icon.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: i64,
    pub user_id: i64,
    pub budget_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::BudgetId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Budget,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            category_id: ActiveValue::Set(category.category_id),
            user_id: ActiveValue::Set(category.user_id),
            budget_id: ActiveValue::Set(category.budget_id),
            name: ActiveValue::Set(category.name.clone()),
            description: ActiveValue::Set(category.description.clone()),
            icon: ActiveValue::Set(category.icon.clone()),
        }
    }
}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            category_id: model.category_id,
            user_id: model.user_id,
            budget_id: model.budget_id,
            name: model.name,
            description: model.description,
            icon: model.icon,
        }
    }
}
