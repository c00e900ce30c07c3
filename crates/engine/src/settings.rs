//! Per-user preference flags.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: i64,
    pub dark_theme: bool,
    pub terms_condition: bool,
    pub notification: bool,
}

impl Settings {
    /// Settings created alongside a new user.
    pub fn defaults(user_id: i64) -> Self {
        Self {
            user_id,
            dark_theme: false,
            terms_condition: false,
            notification: true,
        }
    }
}

/// A boolean preference that can be flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingFlag {
    DarkTheme,
    TermsCondition,
    Notification,
}

impl SettingFlag {
    /// Column backing the flag.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::DarkTheme => "dark_theme",
            Self::TermsCondition => "terms_condition",
            Self::Notification => "notification",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub dark_theme: bool,
    pub terms_condition: bool,
    pub notification: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Settings> for ActiveModel {
    fn from(settings: &Settings) -> Self {
        Self {
            user_id: ActiveValue::Set(settings.user_id),
            dark_theme: ActiveValue::Set(settings.dark_theme),
            terms_condition: ActiveValue::Set(settings.terms_condition),
            notification: ActiveValue::Set(settings.notification),
        }
    }
}

impl From<Model> for Settings {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            dark_theme: model.dark_theme,
            terms_condition: model.terms_condition,
            notification: model.notification,
        }
    }
}
