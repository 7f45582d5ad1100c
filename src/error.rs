use crate::config::ConfigError;

/// Errors that stop the renderer from starting
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The host could not provide a drawing surface
    #[error("no drawing surface available ({width}x{height})")]
    SurfaceUnavailable { width: usize, height: usize },

    /// Terminal I/O failed
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
