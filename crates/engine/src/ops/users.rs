use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Statement,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, NewUser, ResultEngine, Sequence, Settings, User, UserPatch, UserRole,
    password::{hash_password_blocking, verify_password_blocking},
    settings, users,
    util::{normalize_email, normalize_required_name},
};

use super::{Engine, sequences::allocate, with_tx};

impl Engine {
    /// Registers a user and creates their default settings.
    ///
    /// The email is trimmed and lowercased before the uniqueness check.
    pub async fn register_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let full_name = normalize_required_name(&new_user.full_name, "full name")?;
        let email = normalize_email(&new_user.email)?;
        let password_hash =
            hash_password_blocking(&self.password_params, &new_user.password).await?;
        let role = new_user.role.unwrap_or_default();

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let user_id = allocate(&db_tx, Sequence::User).await?;

                if Self::find_user_by_email(&db_tx, &email).await?.is_some() {
                    return Err(EngineError::ExistingKey(email));
                }

                users::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    full_name: ActiveValue::Set(full_name),
                    email: ActiveValue::Set(email),
                    password_hash: ActiveValue::Set(password_hash),
                    profile_picture: ActiveValue::Set(new_user.profile_picture.trim().to_string()),
                    role: ActiveValue::Set(role.as_str().to_string()),
                }
                .insert(&db_tx)
                .await?;

                let defaults = Settings::defaults(user_id);
                settings::ActiveModel::from(&defaults).insert(&db_tx).await?;

                let model = self.require_user(&db_tx, user_id).await?;
                User::try_from(model)
            })
        })
        .await
    }

    /// Checks the password against the stored hash.
    ///
    /// Unknown email and wrong password both yield
    /// [`EngineError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = normalize_email(email).map_err(|_| EngineError::InvalidCredentials)?;
        let model = self
            .bounded(Self::find_user_by_email(&self.database, &email))
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if !verify_password_blocking(password, &model.password_hash).await? {
            return Err(EngineError::InvalidCredentials);
        }
        User::try_from(model)
    }

    /// Applies the non-empty fields of `patch`.
    pub async fn update_user(&self, user_id: i64, patch: UserPatch) -> ResultEngine<User> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput("no fields to update".to_string()));
        }
        let full_name = patch
            .full_name
            .as_deref()
            .map(|name| normalize_required_name(name, "full name"))
            .transpose()?;
        let email = patch.email.as_deref().map(normalize_email).transpose()?;
        let password_hash = match patch.password.as_deref() {
            Some(password) => Some(hash_password_blocking(&self.password_params, password).await?),
            None => None,
        };

        self.bounded(async {
            with_tx!(self, |db_tx| {
                self.require_user(&db_tx, user_id).await?;

                if let Some(email) = &email
                    && let Some(other) = Self::find_user_by_email(&db_tx, email).await?
                    && other.user_id != user_id
                {
                    return Err(EngineError::ExistingKey(email.clone()));
                }

                let mut model = users::ActiveModel {
                    user_id: ActiveValue::Unchanged(user_id),
                    ..Default::default()
                };
                if let Some(full_name) = full_name {
                    model.full_name = ActiveValue::Set(full_name);
                }
                if let Some(email) = email {
                    model.email = ActiveValue::Set(email);
                }
                if let Some(password_hash) = password_hash {
                    model.password_hash = ActiveValue::Set(password_hash);
                }
                if let Some(picture) = &patch.profile_picture {
                    model.profile_picture = ActiveValue::Set(picture.trim().to_string());
                }
                let updated = model.update(&db_tx).await?;
                User::try_from(updated)
            })
        })
        .await
    }

    /// Deletes `user_id` and everything they own. Only admins may do this.
    pub async fn delete_user(&self, actor_id: i64, user_id: i64) -> ResultEngine<()> {
        self.bounded(async {
            with_tx!(self, |db_tx| {
                let actor = users::Entity::find_by_id(actor_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::Forbidden(format!("unknown actor {actor_id}")))?;
                if actor.role != UserRole::Admin.as_str() {
                    return Err(EngineError::Forbidden(
                        "only admins can delete users".to_string(),
                    ));
                }
                self.require_user(&db_tx, user_id).await?;

                let backend = db_tx.get_database_backend();
                for sql in [
                    "DELETE FROM settings WHERE user_id = ?;",
                    "DELETE FROM transactions WHERE user_id = ?;",
                    "DELETE FROM categories WHERE user_id = ?;",
                    "DELETE FROM goals WHERE user_id = ?;",
                    "DELETE FROM budgets WHERE user_id = ?;",
                    "DELETE FROM users WHERE user_id = ?;",
                ] {
                    db_tx
                        .execute(Statement::from_sql_and_values(
                            backend,
                            sql,
                            vec![user_id.into()],
                        ))
                        .await?;
                }

                tracing::info!(actor_id, user_id, "user deleted");
                Ok(())
            })
        })
        .await
    }

    pub async fn user_by_id(&self, user_id: i64) -> ResultEngine<User> {
        let model = self
            .bounded(self.require_user(&self.database, user_id))
            .await?;
        User::try_from(model)
    }

    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let model = self
            .bounded(Self::find_user_by_email(&self.database, &email))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {email}")))?;
        User::try_from(model)
    }

    /// The user together with their settings.
    pub async fn user_and_settings(&self, user_id: i64) -> ResultEngine<(User, Settings)> {
        self.bounded(async {
            let model = self.require_user(&self.database, user_id).await?;
            let settings = settings::Entity::find_by_id(user_id)
                .one(&self.database)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("settings of user {user_id}")))?;
            Ok((User::try_from(model)?, Settings::from(settings)))
        })
        .await
    }

    async fn find_user_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?)
    }
}
