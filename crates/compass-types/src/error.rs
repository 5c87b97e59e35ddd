use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompassError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Insufficient points: found {found}, need at least {required}")]
    InsufficientPoints { found: usize, required: usize },

    #[error("Requested time {requested} is outside the data range [{min}, {max}]")]
    OutOfRange { requested: f64, min: f64, max: f64 },

    #[error("Dataset does not include mandatory field {0}")]
    MissingField(String),

    #[error("Time coordinate is not strictly increasing at index {index}")]
    NonMonotonicTime { index: usize },

    #[error("psi_n is not strictly increasing at index {index}")]
    NonMonotonicFlux { index: usize },

    #[error("Flux profile column {column} has zero span between axis and boundary")]
    DegenerateFlux { column: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CompassResult<T> = Result<T, CompassError>;
