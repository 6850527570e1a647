use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not start backend client: {0}")]
    Engine(#[from] browser_engine::TransportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown panel {0:?} (use left or right)")]
    UnknownPanel(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
}
