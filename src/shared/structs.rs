/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match *self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Stage of the dispatch cycle. Only `Idle` accepts a new leg.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "traveling")]
    Traveling,
    #[serde(rename = "doorsOpening")]
    DoorsOpening,
    #[serde(rename = "dwelling")]
    Dwelling,
    #[serde(rename = "doorsClosing")]
    DoorsClosing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Phase::Idle => "idle",
            Phase::Traveling => "traveling",
            Phase::DoorsOpening => "doors opening",
            Phase::Dwelling => "dwelling",
            Phase::DoorsClosing => "doors closing",
        };
        write!(f, "{}", name)
    }
}

/**
 * Read-only status readout of the elevator.
 *
 * # Fields
 * - `floor`:           Most recently reached floor.
 * - `direction`:       Current scan direction.
 * - `phase`:           Current stage of the dispatch cycle.
 * - `travel_time`:     Accumulated seconds spent moving between floors.
 * - `travel_speed`:    Seconds per floor used for the next leg.
 * - `visited`:         Every floor arrived at, in order, duplicates included.
 * - `destinations`:    Pending floors in service order.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    pub floor: u8,
    pub direction: Direction,
    pub phase: Phase,
    #[serde(rename = "travelTime")]
    pub travel_time: f64,
    #[serde(rename = "travelSpeed")]
    pub travel_speed: f64,
    pub visited: Vec<u8>,
    pub destinations: Vec<u8>,
}

impl ElevatorState {
    pub fn new(travel_speed: f64) -> ElevatorState {
        ElevatorState {
            floor: 1,
            direction: Direction::Up,
            phase: Phase::Idle,
            travel_time: 0.0,
            travel_speed,
            visited: Vec::new(),
            destinations: Vec::new(),
        }
    }
}

fn join_floors(floors: &[u8]) -> String {
    floors
        .iter()
        .map(|floor| floor.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl fmt::Display for ElevatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current Floor: {} | Direction: {} | Total Travel Time: {:.2} seconds | Floors visited: {} | Destination Floors: {}",
            self.floor,
            self.direction,
            self.travel_time,
            join_floors(&self.visited),
            join_floors(&self.destinations),
        )
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
