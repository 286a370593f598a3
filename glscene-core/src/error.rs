use std::path::PathBuf;

/// Errors raised while setting a scene up. Fetch outcomes are never errors;
/// they are reported as data on the response.
#[derive(Debug, thiserror::Error)]
pub enum GlSceneError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("graphics context unavailable: {0}")]
    Context(String),
}

pub type Result<T> = std::result::Result<T, GlSceneError>;
