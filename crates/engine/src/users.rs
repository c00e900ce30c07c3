//! Users table.
//!
//! The password hash never leaves the engine: [`User`] has no field for it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::InvalidInput(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub profile_picture: String,
    pub role: UserRole,
}

/// Input for [`crate::Engine::register_user`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: String,
    pub role: Option<UserRole>,
}

/// Sparse update; `None` fields are left untouched. A new `password` is
/// re-hashed before it is stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.profile_picture.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub profile_picture: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::settings::Entity")]
    Settings,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = UserRole::try_from(model.role.as_str()).map_err(|_| {
            EngineError::Decode(format!(
                "user {} has unknown role \"{}\"",
                model.user_id, model.role
            ))
        })?;
        Ok(Self {
            user_id: model.user_id,
            full_name: model.full_name,
            email: model.email,
            profile_picture: model.profile_picture,
            role,
        })
    }
}
