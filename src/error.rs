/// Error types for configuration loading and scene assembly.
///
/// Stepping the simulation never fails; these only surface while a host
/// builds a scene or reads tuning files.
use hecs::Entity;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown body: {0:?}")]
    UnknownBody(Entity),

    #[error("Agent has no body parts")]
    EmptyBody,
}
