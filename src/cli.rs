use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "taskcat",
    version,
    about = "Tag tasks with account-scoped categories stored in SQLite"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Directory holding taskcat.db (defaults to $TASKCAT_HOME or ~/.taskcat)"
    )]
    pub home: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Act with sync adapter privileges"
    )]
    pub sync_adapter: bool,
    #[arg(long, global = true, help = "Print JSON instead of text")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add(TaskAdd),
    List,
    Show(TaskShow),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Set(CategorySet),
    Update(CategoryUpdate),
    Check(CategorySet),
    List(CategoryList),
    Relations(CategoryRelations),
}

#[derive(Args, Debug)]
pub struct TaskAdd {
    pub title: String,
    #[arg(long)]
    pub account_name: String,
    #[arg(long)]
    pub account_type: String,
}

#[derive(Args, Debug)]
pub struct TaskShow {
    pub id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct CategoryFields {
    #[arg(long = "id", value_name = "ID", help = "Existing category id")]
    pub category_id: Option<i64>,
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
    #[arg(
        long,
        value_name = "COLOR",
        help = "#RRGGBB, #AARRGGBB, 0x-prefixed hex or decimal"
    )]
    pub color: Option<String>,
}

#[derive(Args, Debug)]
pub struct CategorySet {
    pub task_id: i64,
    #[command(flatten)]
    pub fields: CategoryFields,
}

#[derive(Args, Debug)]
pub struct CategoryUpdate {
    pub property_id: i64,
    pub task_id: i64,
    #[command(flatten)]
    pub fields: CategoryFields,
}

#[derive(Args, Debug)]
pub struct CategoryList {
    #[arg(long, requires = "account_type")]
    pub account_name: Option<String>,
    #[arg(long, requires = "account_name")]
    pub account_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct CategoryRelations {
    #[arg(long = "task", value_name = "ID")]
    pub task_id: Option<i64>,
}
