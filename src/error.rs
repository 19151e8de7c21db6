use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed response document: {0}")]
    MalformedResponse(String),

    #[error("Render error ({format}): {message}")]
    Render {
        format: &'static str,
        message: String,
    },

    #[error("Feature not enabled: {0}. Recompile with --features {0}")]
    FeatureDisabled(String),
}
