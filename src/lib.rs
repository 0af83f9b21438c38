//! Account-scoped category assignment for tasks.
//!
//! [`handler::CategoryHandler`] resolves a proposed category to a row in the
//! task's account, creating it on first use, and tags the task through the
//! `categories_mapping` join table. [`app::App`] wraps each mutation in a
//! transaction for the CLI.

pub mod app;
pub mod cli;
pub mod db;
pub mod entities;
pub mod error;
pub mod handler;
pub mod model;
pub mod property;
pub mod store;
pub mod util;
