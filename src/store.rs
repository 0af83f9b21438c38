use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{category, category_mapping, property, task};
use crate::error::AppError;
use crate::model::{AccountScope, CategoryValues, PropertySelection};

pub async fn lookup_task_account<C: ConnectionTrait>(
    db: &C,
    task_id: i64,
) -> Result<Option<AccountScope>, AppError> {
    let task = task::Entity::find_by_id(task_id).one(db).await?;
    Ok(task.map(|task| AccountScope {
        name: task.account_name,
        kind: task.account_type,
    }))
}

/// Categories in `scope` whose id equals `id` or whose name equals `name`.
pub async fn find_categories<C: ConnectionTrait>(
    db: &C,
    id: Option<i64>,
    name: Option<&str>,
    scope: &AccountScope,
) -> Result<Vec<category::Model>, AppError> {
    let mut matches = Condition::any();
    if let Some(id) = id {
        matches = matches.add(category::Column::Id.eq(id));
    }
    if let Some(name) = name {
        matches = matches.add(category::Column::Name.eq(name));
    }
    if matches.is_empty() {
        return Ok(Vec::new());
    }

    Ok(category::Entity::find()
        .filter(matches)
        .filter(category::Column::AccountName.eq(scope.name.as_str()))
        .filter(category::Column::AccountType.eq(scope.kind.as_str()))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}

pub async fn insert_category<C: ConnectionTrait>(
    db: &C,
    scope: &AccountScope,
    name: &str,
    color: Option<i32>,
) -> Result<i64, AppError> {
    let active = category::ActiveModel {
        account_name: Set(scope.name.clone()),
        account_type: Set(scope.kind.clone()),
        name: Set(name.to_string()),
        color: Set(color),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let insert = category::Entity::insert(active).exec(db).await?;
    Ok(insert.last_insert_id)
}

pub async fn insert_relation<C: ConnectionTrait>(
    db: &C,
    task_id: i64,
    category_id: i64,
) -> Result<i64, AppError> {
    let active = category_mapping::ActiveModel {
        task_id: Set(task_id),
        category_id: Set(category_id),
        ..Default::default()
    };
    let insert = category_mapping::Entity::insert(active).exec(db).await?;
    Ok(insert.last_insert_id)
}

pub async fn insert_property<C: ConnectionTrait>(
    db: &C,
    values: &CategoryValues,
) -> Result<i64, AppError> {
    let active = property::ActiveModel {
        task_id: Set(values.task_id),
        category_id: Set(values.category_id),
        category_name: Set(values.category_name.clone()),
        category_color: Set(values.category_color),
        ..Default::default()
    };
    let insert = property::Entity::insert(active).exec(db).await?;
    Ok(insert.last_insert_id)
}

pub async fn find_properties<C: ConnectionTrait>(
    db: &C,
    selection: PropertySelection,
) -> Result<Vec<property::Model>, AppError> {
    Ok(property::Entity::find()
        .filter(selection_condition(selection))
        .order_by_asc(property::Column::Id)
        .all(db)
        .await?)
}

/// Writes the task id and the category fields. With `category_resolved` the
/// three category columns are overwritten, `None` included; otherwise absent
/// fields keep their stored value.
pub async fn update_properties<C: ConnectionTrait>(
    db: &C,
    selection: PropertySelection,
    values: &CategoryValues,
    category_resolved: bool,
) -> Result<u64, AppError> {
    let mut update = property::Entity::update_many()
        .col_expr(property::Column::TaskId, Expr::value(values.task_id));
    if category_resolved || values.category_id.is_some() {
        update = update.col_expr(property::Column::CategoryId, Expr::value(values.category_id));
    }
    if category_resolved || values.category_name.is_some() {
        update = update.col_expr(
            property::Column::CategoryName,
            Expr::value(values.category_name.clone()),
        );
    }
    if category_resolved || values.category_color.is_some() {
        update = update.col_expr(
            property::Column::CategoryColor,
            Expr::value(values.category_color),
        );
    }
    let result = update
        .filter(selection_condition(selection))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

fn selection_condition(selection: PropertySelection) -> Condition {
    match selection {
        PropertySelection::Id(id) => Condition::all().add(property::Column::Id.eq(id)),
        PropertySelection::Task(task_id) => {
            Condition::all().add(property::Column::TaskId.eq(task_id))
        }
    }
}
