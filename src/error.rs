/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Error)]
pub enum ElevatorError {
    #[error("floor {floor} is outside the building (1..={n_floors})")]
    FloorOutOfRange { floor: u8, n_floors: u8 },

    #[error("travel speed must be a finite, non-negative number of seconds per floor, got {0}")]
    InvalidTravelSpeed(f64),

    #[error("failed to read configuration file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ElevatorResult<T> = Result<T, ElevatorError>;
