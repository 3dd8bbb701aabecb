/// Errors that can occur while running the pipeline.
///
/// Only `Config` is fatal to a run. `Http` and `Resolution` are scoped to the
/// single page, item or download in flight; the enclosing loop logs them and
/// moves on to the next unit of work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("resolver page missing data: {0}")]
    Resolution(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }
}
