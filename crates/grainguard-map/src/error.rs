use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("no map token configured")]
    MissingToken,

    #[error(transparent)]
    InvalidToken(#[from] grainguard_core::CoreError),

    #[error("map engine failed to start: {0}")]
    EngineInit(String),

    #[error("map is already initialized")]
    AlreadyInitialized,

    #[error("map has been destroyed")]
    Destroyed,

    #[error("no facility with id '{0}' on the map")]
    UnknownFacility(String),
}
