use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};

use crate::{
    Category, CategoryPatch, DEFAULT_ICON, EngineError, NewCategory, ResultEngine, Sequence,
    categories,
    util::normalize_required_name,
};

use super::{Engine, sequences::allocate, with_tx};

impl Engine {
    /// Creates a category for `user_id`. A missing or blank icon becomes
    /// [`DEFAULT_ICON`]; a `budget_id`, if given, must exist and belong to
    /// the same user.
    pub async fn create_category(&self, new_category: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&new_category.name, "category name")?;
        let icon = icon_or_default(new_category.icon.as_deref());

        self.bounded(async {
            with_tx!(self, |db_tx| {
                let category_id = allocate(&db_tx, Sequence::Category).await?;
                self.require_user(&db_tx, new_category.user_id).await?;
                if let Some(budget_id) = new_category.budget_id {
                    self.require_owned_budget(&db_tx, new_category.user_id, budget_id)
                        .await?;
                }

                let category = Category {
                    category_id,
                    user_id: new_category.user_id,
                    budget_id: new_category.budget_id,
                    name,
                    description: new_category.description.trim().to_string(),
                    icon,
                };
                categories::ActiveModel::from(&category).insert(&db_tx).await?;
                Ok(category)
            })
        })
        .await
    }

    pub async fn update_category(
        &self,
        user_id: i64,
        category_id: i64,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        if patch.is_empty() {
            return Err(EngineError::InvalidInput("no fields to update".to_string()));
        }
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "category name"))
            .transpose()?;

        self.bounded(async {
            with_tx!(self, |db_tx| {
                self.require_category(&db_tx, user_id, category_id).await?;
                if let Some(budget_id) = patch.budget_id {
                    self.require_owned_budget(&db_tx, user_id, budget_id).await?;
                }

                let mut model = categories::ActiveModel {
                    category_id: ActiveValue::Unchanged(category_id),
                    ..Default::default()
                };
                if let Some(budget_id) = patch.budget_id {
                    model.budget_id = ActiveValue::Set(Some(budget_id));
                }
                if let Some(name) = name {
                    model.name = ActiveValue::Set(name);
                }
                if let Some(description) = &patch.description {
                    model.description = ActiveValue::Set(description.trim().to_string());
                }
                if let Some(icon) = &patch.icon {
                    model.icon = ActiveValue::Set(icon_or_default(Some(icon.as_str())));
                }
                Ok(Category::from(model.update(&db_tx).await?))
            })
        })
        .await
    }

    /// Deletes the category. Transactions that used it keep their
    /// `category_id` and show no icon from then on.
    pub async fn delete_category(&self, user_id: i64, category_id: i64) -> ResultEngine<()> {
        self.bounded(async {
            with_tx!(self, |db_tx| {
                self.require_category(&db_tx, user_id, category_id).await?;
                categories::Entity::delete_by_id(category_id)
                    .exec(&db_tx)
                    .await?;
                Ok(())
            })
        })
        .await
    }

    pub async fn category(&self, user_id: i64, category_id: i64) -> ResultEngine<Category> {
        self.bounded(async {
            categories::Entity::find_by_id(category_id)
                .one(&self.database)
                .await?
                .filter(|model| model.user_id == user_id)
                .map(Category::from)
                .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id}")))
        })
        .await
    }

    pub async fn list_categories(&self, user_id: i64) -> ResultEngine<Vec<Category>> {
        self.bounded(async {
            Ok(categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::CategoryId)
                .all(&self.database)
                .await?
                .into_iter()
                .map(Category::from)
                .collect())
        })
        .await
    }

    /// Categories of `user_id` named exactly `name`.
    pub async fn categories_by_name(&self, user_id: i64, name: &str) -> ResultEngine<Vec<Category>> {
        let name = normalize_required_name(name, "category name")?;
        self.bounded(async {
            Ok(categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .filter(categories::Column::Name.eq(name))
                .order_by_asc(categories::Column::CategoryId)
                .all(&self.database)
                .await?
                .into_iter()
                .map(Category::from)
                .collect())
        })
        .await
    }

    async fn require_owned_budget(
        &self,
        db: &DatabaseTransaction,
        user_id: i64,
        budget_id: i64,
    ) -> ResultEngine<()> {
        let budget = Self::find_budget(db, budget_id).await?;
        if budget.user_id != user_id {
            return Err(EngineError::KeyNotFound(format!("budget {budget_id}")));
        }
        Ok(())
    }
}

fn icon_or_default(icon: Option<&str>) -> String {
    icon.map(str::trim)
        .filter(|icon| !icon.is_empty())
        .unwrap_or(DEFAULT_ICON)
        .to_string()
}
