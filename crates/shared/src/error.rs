use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinate is not a finite number")]
    NonFinite,
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("zoom {0} must be positive")]
    NonPositiveZoom(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("flight duration must be positive, got {0}ms")]
    Duration(f64),
    #[error("phase fractions must be in (0, 1) and leave room for the zoom-in phase (zoom out {zoom_out}, draw {draw})")]
    PhaseSplit { zoom_out: f64, draw: f64 },
    #[error("arc needs at least one sample")]
    ArcSamples,
    #[error("arc height ratio must be finite, got {0}")]
    ArcHeight(f64),
    #[error("intro view: {0}")]
    IntroView(#[from] GeometryError),
    #[error("crossfade step must be positive and no longer than the fade ({step_ms}ms of {duration_ms}ms)")]
    Crossfade { duration_ms: f64, step_ms: f64 },
    #[error("invalid config document: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityError {
    #[error("city needs a title")]
    EmptyId,
    #[error("\"{0}\" is reserved for the introduction")]
    ReservedId(String),
    #[error("a city with id \"{0}\" already exists")]
    DuplicateId(String),
}
