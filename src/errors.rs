// errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems reading the property dataset at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("row {row}, column {column}: {reason}")]
    MalformedRow {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("unsupported dataset format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError(Box::new(err))
    }
}

/// Errors raised while answering an HTTP request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Internal(_) => 500,
        }
    }
}

/// Anything that ends the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("invalid argument: {0}")]
    BadArgument(String),

    #[error("invalid bind address '{0}'")]
    BindAddr(String),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}
