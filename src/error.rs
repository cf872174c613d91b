use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown distribution family: {0}")]
    UnknownFamily(String),

    #[error("Unknown chart theme: {0}")]
    UnknownTheme(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
