/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::{ElevatorError, ElevatorResult};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub doors: DoorConfig,
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub n_floors: u8,
    pub floor_distance: f64,
    pub travel_speed: f64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DoorConfig {
    pub open_time: f64,
    pub dwell_time: f64,
    pub close_time: f64,
    pub offset: f64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub frame_interval_ms: u64,
}

impl Default for ElevatorConfig {
    fn default() -> ElevatorConfig {
        ElevatorConfig {
            n_floors: 6,
            floor_distance: 2.2,
            travel_speed: 2.0,
        }
    }
}

impl Default for DoorConfig {
    fn default() -> DoorConfig {
        DoorConfig {
            open_time: 2.0,
            dwell_time: 1.0,
            close_time: 2.0,
            offset: 0.3,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            frame_interval_ms: 16,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> ElevatorResult<Config> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> ElevatorResult<Config> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> ElevatorResult<()> {
        if self.elevator.n_floors == 0 {
            return Err(ElevatorError::InvalidConfig(
                "elevator.n_floors must be at least 1".into(),
            ));
        }
        if !(self.elevator.floor_distance.is_finite() && self.elevator.floor_distance > 0.0) {
            return Err(ElevatorError::InvalidConfig(format!(
                "elevator.floor_distance must be positive, got {}",
                self.elevator.floor_distance
            )));
        }

        let times = [
            ("elevator.travel_speed", self.elevator.travel_speed),
            ("doors.open_time", self.doors.open_time),
            ("doors.dwell_time", self.doors.dwell_time),
            ("doors.close_time", self.doors.close_time),
        ];
        for (name, value) in times {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ElevatorError::InvalidConfig(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        if !self.doors.offset.is_finite() {
            return Err(ElevatorError::InvalidConfig(
                "doors.offset must be finite".into(),
            ));
        }
        if self.simulation.frame_interval_ms == 0 {
            return Err(ElevatorError::InvalidConfig(
                "simulation.frame_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
