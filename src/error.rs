use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}", labeled("Not found", .0))]
    NotFound(String),
    #[error("{}", labeled("Invalid argument", .0))]
    InvalidArgument(String),
}

fn labeled(label: &str, message: &str) -> String {
    if message.contains('\n') {
        format!("{label}:\n{message}")
    } else {
        format!("{label}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_messages_start_on_their_own_line() {
        let err = AppError::NotFound("task id 1\ntask id 2".to_string());
        assert_eq!(err.to_string(), "Not found:\ntask id 1\ntask id 2");
        let err = AppError::InvalidArgument("bad color".to_string());
        assert_eq!(err.to_string(), "Invalid argument: bad color");
    }
}
