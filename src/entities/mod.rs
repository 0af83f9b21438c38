pub mod category;
pub mod category_mapping;
pub mod property;
pub mod task;
