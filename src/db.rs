use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Schema, Statement};
use url::Url;

use crate::entities::{category, category_mapping, property, task};
use crate::error::AppError;

pub fn resolve_db_path(home: &Path) -> PathBuf {
    home.join("taskcat.db")
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// The lock serializes whole CLI invocations, which keeps two processes from
/// both deciding that the same category is missing and creating it twice.
pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let mut url = Url::from_file_path(path).map_err(|_| {
        AppError::InvalidArgument(format!("invalid sqlite path: {}", path.display()))
    })?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    tracing::debug!(url = %sqlite_url, "connecting to store");
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await?;

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut task_stmt = schema.create_table_from_entity(task::Entity);
    task_stmt.if_not_exists();
    db.execute(builder.build(&task_stmt)).await?;

    let mut category_stmt = schema.create_table_from_entity(category::Entity);
    category_stmt.if_not_exists();
    db.execute(builder.build(&category_stmt)).await?;

    let mut mapping_stmt = schema.create_table_from_entity(category_mapping::Entity);
    mapping_stmt.if_not_exists();
    db.execute(builder.build(&mapping_stmt)).await?;

    let mut property_stmt = schema.create_table_from_entity(property::Entity);
    property_stmt.if_not_exists();
    db.execute(builder.build(&property_stmt)).await?;

    // Not unique: duplicate names within one account are legal rows.
    let mut category_index = Index::create()
        .name("idx_categories_account_name")
        .table(category::Entity)
        .col(category::Column::AccountName)
        .col(category::Column::AccountType)
        .col(category::Column::Name)
        .to_owned();
    category_index.if_not_exists();
    db.execute(builder.build(&category_index)).await?;

    let mut mapping_index = Index::create()
        .name("idx_categories_mapping_task")
        .table(category_mapping::Entity)
        .col(category_mapping::Column::TaskId)
        .to_owned();
    mapping_index.if_not_exists();
    db.execute(builder.build(&mapping_index)).await?;

    let mut property_index = Index::create()
        .name("idx_properties_task")
        .table(property::Entity)
        .col(property::Column::TaskId)
        .to_owned();
    property_index.if_not_exists();
    db.execute(builder.build(&property_index)).await?;

    Ok(())
}
