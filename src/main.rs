use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskcat::app::App;
use taskcat::cli::{
    CategoryCommand, CategoryFields, CategoryList, CategoryRelations, CategorySet,
    CategoryUpdate, Cli, Command, TaskAdd, TaskCommand, TaskShow,
};
use taskcat::db;
use taskcat::error::AppError;
use taskcat::model::{AccountScope, CategoryValues, TaskInput};
use taskcat::util::{
    format_category_line, format_relation_line, format_resolution, format_task_detail,
    format_task_line, parse_color,
};

const HOME_ENV: &str = "TASKCAT_HOME";
const LOG_ENV: &str = "TASKCAT_LOG";

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), AppError> {
    let Cli {
        home,
        sync_adapter,
        json,
        command,
    } = Cli::parse();

    let home = resolve_home(home)?;
    let db_path = db::resolve_db_path(&home);
    db::ensure_parent_dir(&db_path)?;
    let mut lock = db::open_lock(&db_path)?;
    let _guard = lock.write()?;

    let db = db::connect(&db_path).await?;
    db::ensure_schema(&db).await?;
    tracing::debug!(path = %db_path.display(), sync_adapter, "store ready");
    let app = App::new(db, sync_adapter);
    let output = Output { json };

    match command {
        Command::Task(command) => handle_task(&app, command, output).await,
        Command::Category(command) => handle_category(&app, command, output).await,
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(self, value: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

async fn handle_task(app: &App, command: TaskCommand, output: Output) -> Result<(), AppError> {
    match command {
        TaskCommand::Add(args) => handle_task_add(app, args, output).await,
        TaskCommand::List => handle_task_list(app, output).await,
        TaskCommand::Show(args) => handle_task_show(app, args, output).await,
    }
}

async fn handle_category(
    app: &App,
    command: CategoryCommand,
    output: Output,
) -> Result<(), AppError> {
    match command {
        CategoryCommand::Set(args) => handle_category_set(app, args, output).await,
        CategoryCommand::Update(args) => handle_category_update(app, args, output).await,
        CategoryCommand::Check(args) => handle_category_check(app, args, output).await,
        CategoryCommand::List(args) => handle_category_list(app, args, output).await,
        CategoryCommand::Relations(args) => handle_category_relations(app, args, output).await,
    }
}

async fn handle_task_add(app: &App, args: TaskAdd, output: Output) -> Result<(), AppError> {
    let task = app
        .add_task(TaskInput {
            title: args.title,
            account: AccountScope {
                name: args.account_name,
                kind: args.account_type,
            },
        })
        .await?;
    output.emit(&task, || format!("Created task ID: {}: {}", task.id, task.title))
}

async fn handle_task_list(app: &App, output: Output) -> Result<(), AppError> {
    let tasks = app.list_tasks().await?;
    output.emit(&tasks, || {
        if tasks.is_empty() {
            return "No tasks.".to_string();
        }
        tasks
            .iter()
            .map(format_task_line)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn handle_task_show(app: &App, args: TaskShow, output: Output) -> Result<(), AppError> {
    let detail = app.get_task_detail(args.id).await?;
    output.emit(&detail, || format_task_detail(&detail))
}

async fn handle_category_set(
    app: &App,
    args: CategorySet,
    output: Output,
) -> Result<(), AppError> {
    let values = category_values(args.task_id, args.fields)?;
    let property = app.set_category(values).await?;
    output.emit(&property, || {
        format!(
            "Stored category property ID: {} (category ID {}: {})",
            property.id,
            property.category_id.unwrap_or_default(),
            property.category_name.as_deref().unwrap_or("-")
        )
    })
}

async fn handle_category_update(
    app: &App,
    args: CategoryUpdate,
    output: Output,
) -> Result<(), AppError> {
    let values = category_values(args.task_id, args.fields)?;
    let property = app.update_category(args.property_id, values).await?;
    output.emit(&property, || {
        format!(
            "Updated category property ID: {} (category ID {}: {})",
            property.id,
            property
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            property.category_name.as_deref().unwrap_or("-")
        )
    })
}

async fn handle_category_check(
    app: &App,
    args: CategorySet,
    output: Output,
) -> Result<(), AppError> {
    let values = category_values(args.task_id, args.fields)?;
    let validated = app.check_category(values).await?;
    output.emit(&validated, || format_resolution(&validated))
}

async fn handle_category_list(
    app: &App,
    args: CategoryList,
    output: Output,
) -> Result<(), AppError> {
    let scope = match (args.account_name, args.account_type) {
        (Some(name), Some(kind)) => Some(AccountScope { name, kind }),
        _ => None,
    };
    let categories = app.list_categories(scope.as_ref()).await?;
    output.emit(&categories, || {
        if categories.is_empty() {
            return "No categories.".to_string();
        }
        categories
            .iter()
            .map(format_category_line)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn handle_category_relations(
    app: &App,
    args: CategoryRelations,
    output: Output,
) -> Result<(), AppError> {
    let relations = app.list_relations(args.task_id).await?;
    output.emit(&relations, || {
        if relations.is_empty() {
            return "No relations.".to_string();
        }
        relations
            .iter()
            .map(format_relation_line)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn category_values(task_id: i64, fields: CategoryFields) -> Result<CategoryValues, AppError> {
    let category_color = fields.color.as_deref().map(parse_color).transpose()?;
    Ok(CategoryValues {
        task_id,
        category_id: fields.category_id,
        category_name: fields.name,
        category_color,
    })
}

fn resolve_home(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(home) = flag {
        return Ok(home);
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home).join(".taskcat"));
    }

    Err(AppError::InvalidArgument(format!(
        "unable to resolve the taskcat home; pass --home or set {HOME_ENV}"
    )))
}
