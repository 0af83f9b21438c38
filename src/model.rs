use serde::{Deserialize, Serialize};

/// The (account name, account type) pair that partitions categories.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountScope {
    pub name: String,
    pub kind: String,
}

/// A category property value as it travels through one insert or update.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryValues {
    pub task_id: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_color: Option<i32>,
}

impl CategoryValues {
    pub fn named(task_id: i64, name: &str, color: Option<i32>) -> Self {
        Self {
            task_id,
            category_id: None,
            category_name: Some(name.to_string()),
            category_color: color,
        }
    }

    pub fn by_id(task_id: i64, category_id: i64) -> Self {
        Self {
            task_id,
            category_id: Some(category_id),
            category_name: None,
            category_color: None,
        }
    }

    pub fn references_category(&self) -> bool {
        self.category_id.is_some() || self.category_name.is_some()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryResolution {
    Existing {
        id: i64,
        name: String,
        color: Option<i32>,
    },
    New {
        name: Option<String>,
        color: Option<i32>,
    },
}

/// Output of validation. `scope` and `resolution` are only set when the task
/// resolved to an owning account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidatedCategory {
    pub values: CategoryValues,
    pub scope: Option<AccountScope>,
    pub resolution: Option<CategoryResolution>,
}

impl ValidatedCategory {
    pub fn is_new_category(&self) -> bool {
        matches!(self.resolution, Some(CategoryResolution::New { .. }))
    }

    pub fn account(&self) -> Option<&AccountScope> {
        self.scope.as_ref()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertySelection {
    Id(i64),
    Task(i64),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub account: AccountScope,
}
