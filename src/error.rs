use crate::render::RenderError;
use crate::source::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlanceError {
    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("no score source configured (use --endpoint, --payload-dir or --payload)")]
    NoSource,

    #[error("both an endpoint and a payload directory are configured; pick one")]
    ConflictingSources,

    #[error("missing --file")]
    MissingFile,

    #[error("server error: {0}")]
    Server(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlanceError>;
