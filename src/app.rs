use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{category, category_mapping, property, task};
use crate::error::AppError;
use crate::handler::CategoryHandler;
use crate::model::{
    AccountScope, CategoryValues, PropertySelection, TaskInput, ValidatedCategory,
};
use crate::property::PropertyHandler;

pub struct App {
    db: DatabaseConnection,
    is_sync_adapter: bool,
    categories: CategoryHandler,
}

#[derive(Serialize)]
pub struct TaskDetail {
    pub task: task::Model,
    pub categories: Vec<category::Model>,
    pub properties: Vec<property::Model>,
}

impl App {
    pub fn new(db: DatabaseConnection, is_sync_adapter: bool) -> Self {
        Self {
            db,
            is_sync_adapter,
            categories: CategoryHandler,
        }
    }

    pub async fn add_task(&self, input: TaskInput) -> Result<task::Model, AppError> {
        ensure_non_empty("task title", &input.title)?;
        ensure_non_empty("account name", &input.account.name)?;
        ensure_non_empty("account type", &input.account.kind)?;
        let active = task::ActiveModel {
            title: Set(input.title),
            account_name: Set(input.account.name),
            account_type: Set(input.account.kind),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let insert = task::Entity::insert(active).exec(&self.db).await?;
        let created = task::Entity::find_by_id(insert.last_insert_id)
            .one(&self.db)
            .await?;
        created.ok_or_else(|| AppError::NotFound("task not found after insert".to_string()))
    }

    pub async fn list_tasks(&self) -> Result<Vec<task::Model>, AppError> {
        Ok(task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_task(&self, id: i64) -> Result<task::Model, AppError> {
        task::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task id {id}")))
    }

    /// The task with every category it is tagged with (each listed once) and
    /// its stored category properties.
    pub async fn get_task_detail(&self, id: i64) -> Result<TaskDetail, AppError> {
        let task = self.get_task(id).await?;
        let linked = category_mapping::Entity::find()
            .filter(category_mapping::Column::TaskId.eq(id))
            .order_by_asc(category_mapping::Column::Id)
            .find_also_related(category::Entity)
            .all(&self.db)
            .await?;
        let mut seen = HashSet::new();
        let categories = linked
            .into_iter()
            .filter_map(|(_, category)| category)
            .filter(|category| seen.insert(category.id))
            .collect();
        let properties = property::Entity::find()
            .filter(property::Column::TaskId.eq(id))
            .order_by_asc(property::Column::Id)
            .all(&self.db)
            .await?;
        Ok(TaskDetail {
            task,
            categories,
            properties,
        })
    }

    /// Dry run of category resolution; nothing is written.
    pub async fn check_category(
        &self,
        values: CategoryValues,
    ) -> Result<ValidatedCategory, AppError> {
        self.categories
            .validate_values(&self.db, true, values, self.is_sync_adapter)
            .await
    }

    pub async fn set_category(&self, values: CategoryValues) -> Result<property::Model, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<property::Model, AppError> = async {
            let property_id = self
                .categories
                .insert(&txn, values, self.is_sync_adapter)
                .await?;
            property::Entity::find_by_id(property_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("property not found after insert".to_string()))
        }
        .await;

        finalize_transaction(txn, result).await
    }

    pub async fn update_category(
        &self,
        property_id: i64,
        values: CategoryValues,
    ) -> Result<property::Model, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<property::Model, AppError> = async {
            let updated = self
                .categories
                .update(
                    &txn,
                    values,
                    PropertySelection::Id(property_id),
                    self.is_sync_adapter,
                )
                .await?;
            if updated == 0 {
                return Err(AppError::NotFound(format!("property id {property_id}")));
            }
            property::Entity::find_by_id(property_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("property id {property_id}")))
        }
        .await;

        finalize_transaction(txn, result).await
    }

    pub async fn list_categories(
        &self,
        scope: Option<&AccountScope>,
    ) -> Result<Vec<category::Model>, AppError> {
        let mut select = category::Entity::find();
        if let Some(scope) = scope {
            select = select
                .filter(category::Column::AccountName.eq(scope.name.as_str()))
                .filter(category::Column::AccountType.eq(scope.kind.as_str()));
        }
        Ok(select
            .order_by_asc(category::Column::AccountName)
            .order_by_asc(category::Column::AccountType)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_relations(
        &self,
        task_id: Option<i64>,
    ) -> Result<Vec<category_mapping::Model>, AppError> {
        let mut select = category_mapping::Entity::find();
        if let Some(task_id) = task_id {
            select = select.filter(category_mapping::Column::TaskId.eq(task_id));
        }
        Ok(select
            .order_by_asc(category_mapping::Column::Id)
            .all(&self.db)
            .await?)
    }
}

/// Commits on success; on error the transaction is rolled back so a category
/// created earlier in the same call does not survive.
async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(error = %err, "rolling back");
            if let Err(rollback_err) = txn.rollback().await {
                return Err(rollback_err.into());
            }
            Err(err)
        }
    }
}

fn ensure_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{label} cannot be empty")));
    }
    Ok(())
}
