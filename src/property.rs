use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::model::PropertySelection;
use crate::store;

/// Hooks every property kind implements. The dispatch layer picks one
/// handler per property type and only talks to it through these entry points.
#[allow(async_fn_in_trait)]
pub trait PropertyHandler {
    /// The value bag a caller hands in for this property kind.
    type Values;
    type Validated;

    async fn validate_values<C: ConnectionTrait>(
        &self,
        db: &C,
        is_new: bool,
        values: Self::Values,
        is_sync_adapter: bool,
    ) -> Result<Self::Validated, AppError>;

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        values: Self::Values,
        is_sync_adapter: bool,
    ) -> Result<i64, AppError>;

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        values: Self::Values,
        selection: PropertySelection,
        is_sync_adapter: bool,
    ) -> Result<u64, AppError>;
}

/// Generic bookkeeping shared by all property updates. Returns how many
/// property rows the selection matches.
///
/// Only a sync adapter may re-attach a property to a different task.
pub async fn update_base<C: ConnectionTrait>(
    db: &C,
    task_id: i64,
    selection: PropertySelection,
    is_sync_adapter: bool,
) -> Result<u64, AppError> {
    let rows = store::find_properties(db, selection).await?;
    if !is_sync_adapter {
        if let Some(row) = rows.iter().find(|row| row.task_id != task_id) {
            return Err(AppError::InvalidArgument(format!(
                "property id {} belongs to task id {}; moving it to task id {} requires sync adapter privileges",
                row.id, row.task_id, task_id
            )));
        }
    }
    tracing::debug!(?selection, matched = rows.len(), "property update selection");
    Ok(rows.len() as u64)
}
