use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::model::{CategoryResolution, CategoryValues, PropertySelection, ValidatedCategory};
use crate::property::{update_base, PropertyHandler};
use crate::store;

/// Normalizes category properties: every value ends up pointing at a category
/// row in the owning task's account, created on first use.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryHandler;

impl CategoryHandler {
    /// Turns a validated value into a persistable one, inserting the category
    /// when validation found no unique match.
    pub async fn resolve_or_create<C: ConnectionTrait>(
        &self,
        db: &C,
        validated: ValidatedCategory,
    ) -> Result<CategoryValues, AppError> {
        let ValidatedCategory {
            mut values,
            scope,
            resolution,
        } = validated;

        let (Some(scope), Some(CategoryResolution::New { name, color })) = (scope, resolution)
        else {
            return Ok(values);
        };

        let name = name.ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "category id {} does not exist in account {}/{} and no category name was supplied",
                values.category_id.unwrap_or_default(),
                scope.name,
                scope.kind
            ))
        })?;
        let category_id = store::insert_category(db, &scope, &name, color).await?;
        tracing::info!(
            category_id,
            name = %name,
            account_name = %scope.name,
            account_type = %scope.kind,
            "created category"
        );
        values.category_id = Some(category_id);
        values.category_name = Some(name);
        values.category_color = color;
        Ok(values)
    }

    /// Tags a task with a category. Never checks for an existing pair.
    pub async fn link<C: ConnectionTrait>(
        &self,
        db: &C,
        task_id: i64,
        category_id: i64,
    ) -> Result<i64, AppError> {
        let relation_id = store::insert_relation(db, task_id, category_id).await?;
        tracing::info!(relation_id, task_id, category_id, "linked task to category");
        Ok(relation_id)
    }
}

impl PropertyHandler for CategoryHandler {
    type Values = CategoryValues;
    type Validated = ValidatedCategory;

    async fn validate_values<C: ConnectionTrait>(
        &self,
        db: &C,
        _is_new: bool,
        mut values: CategoryValues,
        _is_sync_adapter: bool,
    ) -> Result<ValidatedCategory, AppError> {
        if !values.references_category() {
            return Err(AppError::InvalidArgument(
                "neither an id nor a category name was supplied".to_string(),
            ));
        }

        let Some(scope) = store::lookup_task_account(db, values.task_id).await? else {
            tracing::debug!(task_id = values.task_id, "task has no owning account");
            return Ok(ValidatedCategory {
                values,
                scope: None,
                resolution: None,
            });
        };

        let matches = store::find_categories(
            db,
            values.category_id,
            values.category_name.as_deref(),
            &scope,
        )
        .await?;
        tracing::debug!(
            task_id = values.task_id,
            matches = matches.len(),
            "looked up category"
        );

        let resolution = match <[_; 1]>::try_from(matches) {
            Ok([existing]) => {
                values.category_id = Some(existing.id);
                values.category_name = Some(existing.name.clone());
                values.category_color = existing.color;
                CategoryResolution::Existing {
                    id: existing.id,
                    name: existing.name,
                    color: existing.color,
                }
            }
            // Ambiguous matches are handled like a miss.
            Err(_) => CategoryResolution::New {
                name: values.category_name.clone(),
                color: values.category_color,
            },
        };

        Ok(ValidatedCategory {
            values,
            scope: Some(scope),
            resolution: Some(resolution),
        })
    }

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        values: CategoryValues,
        is_sync_adapter: bool,
    ) -> Result<i64, AppError> {
        let validated = self
            .validate_values(db, true, values, is_sync_adapter)
            .await?;
        let values = self.resolve_or_create(db, validated).await?;
        let category_id = values.category_id.ok_or_else(|| {
            AppError::NotFound(format!(
                "task id {} has no owning account to resolve the category in",
                values.task_id
            ))
        })?;
        self.link(db, values.task_id, category_id).await?;

        let property_id = store::insert_property(db, &values).await?;
        tracing::info!(
            property_id,
            task_id = values.task_id,
            category_id,
            "stored category property"
        );
        Ok(property_id)
    }

    /// Leaves existing relation rows untouched, even when the category changes.
    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        values: CategoryValues,
        selection: PropertySelection,
        is_sync_adapter: bool,
    ) -> Result<u64, AppError> {
        update_base(db, values.task_id, selection, is_sync_adapter).await?;
        let validated = self
            .validate_values(db, true, values, is_sync_adapter)
            .await?;
        let category_resolved = validated.resolution.is_some();
        let values = self.resolve_or_create(db, validated).await?;

        let updated =
            store::update_properties(db, selection, &values, category_resolved).await?;
        tracing::info!(?selection, updated, "updated category property");
        Ok(updated)
    }
}
