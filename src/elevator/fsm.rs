/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, trace};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{DoorConfig, ElevatorConfig};
use crate::elevator::requests::{sort_floors, update_direction};
use crate::elevator::timer::MotionTimer;
use crate::error::{ElevatorError, ElevatorResult};
use crate::shared::{Direction, ElevatorState, Phase};

/***************************************/
/*       Public data structures        */
/***************************************/

/// What the animation driver should interpolate for one phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Travel {
        from_floor: u8,
        to_floor: u8,
        car_y: f64,
        duration: f64,
    },
    OpenDoors {
        left_x: f64,
        right_x: f64,
        duration: f64,
    },
    CloseDoors {
        delay: f64,
        duration: f64,
    },
}

/// An animation request. `phase` is the phase that ends when the motion completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub generation: u64,
    pub phase: Phase,
    pub motion: Motion,
}

/**
 * Dispatch state machine for a single elevator car.
 *
 * The `ElevatorFSM` owns the semantic state of the car: the destination queue, the
 * current floor, the scan direction and the animation phase. It never touches the
 * scene. Instead every transition that needs motion returns a `Cue`, and the animation
 * driver reports back through `on_phase_start` and `on_phase_complete`.
 *
 * # Fields
 * - `n_floors`:                The number of floors in the building.
 * - `floor_distance`:          Height between two neighbouring floors.
 * - `default_travel_speed`:    Seconds per floor restored on reset.
 * - `travel_speed`:            Seconds per floor used for the next leg.
 * - `doors`:                   Door animation timings and leaf offset.
 * - `queue`:                   Destination floors in service order. The head is the active leg's target.
 * - `visited`:                 Every floor arrived at, in order.
 * - `floor`:                   The most recently reached floor.
 * - `direction`:               Scan direction, recomputed right before each leg.
 * - `phase`:                   Current stage of the dispatch cycle.
 * - `generation`:              Token of the current cycle. Signals carrying another token are stale.
 * - `timer`:                   Accumulated travel time.
 */
pub struct ElevatorFSM {
    n_floors: u8,
    floor_distance: f64,
    default_travel_speed: f64,
    travel_speed: f64,
    doors: DoorConfig,

    queue: Vec<u8>,
    visited: Vec<u8>,
    floor: u8,
    direction: Direction,
    phase: Phase,
    generation: u64,
    timer: MotionTimer,
}

impl ElevatorFSM {
    pub fn new(config: &ElevatorConfig, doors: &DoorConfig) -> ElevatorFSM {
        ElevatorFSM {
            n_floors: config.n_floors,
            floor_distance: config.floor_distance,
            default_travel_speed: config.travel_speed,
            travel_speed: config.travel_speed,
            doors: doors.clone(),
            queue: Vec::new(),
            visited: Vec::new(),
            floor: 1,
            direction: Direction::Up,
            phase: Phase::Idle,
            generation: 0,
            timer: MotionTimer::new(),
        }
    }

    /***************************************/
    /*              Commands               */
    /***************************************/

    /// Adds `floor` to the queue. Returns the cue for a new leg when the car was idle.
    pub fn request_floor(&mut self, floor: u8) -> ElevatorResult<Option<Cue>> {
        if floor < 1 || floor > self.n_floors {
            return Err(ElevatorError::FloorOutOfRange {
                floor,
                n_floors: self.n_floors,
            });
        }
        if floor == self.floor || self.queue.contains(&floor) {
            debug!("Ignoring request for floor {}", floor);
            return Ok(None);
        }

        let reference_floor = self.queue.first().copied().unwrap_or(self.floor);
        self.queue.push(floor);
        self.queue = sort_floors(&self.queue, reference_floor, self.direction);
        debug!("Queued floor {}, destinations: {:?}", floor, self.queue);

        if self.phase == Phase::Idle {
            return Ok(self.dispatch());
        }
        Ok(None)
    }

    pub fn set_travel_speed(&mut self, seconds_per_floor: f64) -> ElevatorResult<()> {
        if !(seconds_per_floor.is_finite() && seconds_per_floor >= 0.0) {
            return Err(ElevatorError::InvalidTravelSpeed(seconds_per_floor));
        }
        self.travel_speed = seconds_per_floor;
        Ok(())
    }

    /// Returns to the initial state. Signals from any earlier cycle become stale.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.floor = 1;
        self.direction = Direction::Up;
        self.phase = Phase::Idle;
        self.travel_speed = self.default_travel_speed;
        self.timer.reset();
        self.generation += 1;
        info!("Elevator reset");
    }

    pub fn tick(&mut self, delta_seconds: f64) {
        self.timer.tick(delta_seconds, self.phase == Phase::Traveling);
    }

    /***************************************/
    /*          Animation signals          */
    /***************************************/

    /// Called when a delayed motion actually starts moving. Ends the dwell.
    pub fn on_phase_start(&mut self, generation: u64, phase: Phase) {
        if generation != self.generation {
            trace!("Stale start signal for {} (generation {})", phase, generation);
            return;
        }
        if phase == Phase::DoorsClosing && self.phase == Phase::Dwelling {
            self.phase = Phase::DoorsClosing;
            debug!("Doors closing at floor {}", self.floor);
        }
    }

    /// Called when the motion for `phase` has finished. Returns the next cue, if any.
    pub fn on_phase_complete(&mut self, generation: u64, phase: Phase) -> Option<Cue> {
        if generation != self.generation {
            trace!("Stale completion for {} (generation {})", phase, generation);
            return None;
        }

        match (phase, self.phase) {
            (Phase::Traveling, Phase::Traveling) => {
                let target = *self.queue.first()?;
                self.floor = target;
                self.visited.push(target);
                self.phase = Phase::DoorsOpening;
                info!("Arrived at floor {}", target);

                Some(self.cue(Motion::OpenDoors {
                    left_x: self.doors.offset,
                    right_x: -self.doors.offset,
                    duration: self.doors.open_time,
                }))
            }
            (Phase::DoorsOpening, Phase::DoorsOpening) => {
                self.phase = Phase::Dwelling;
                debug!("Doors open at floor {}", self.floor);

                Some(self.cue(Motion::CloseDoors {
                    delay: self.doors.dwell_time,
                    duration: self.doors.close_time,
                }))
            }
            (Phase::DoorsClosing, Phase::Dwelling | Phase::DoorsClosing) => {
                if !self.queue.is_empty() {
                    self.queue.remove(0);
                }
                self.phase = Phase::Idle;
                debug!("Doors closed at floor {}", self.floor);
                self.dispatch()
            }
            _ => {
                trace!("Unexpected completion for {} while {}", phase, self.phase);
                None
            }
        }
    }

    /***************************************/
    /*             Read access             */
    /***************************************/
    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn queue(&self) -> &[u8] {
        &self.queue
    }

    pub fn visited(&self) -> &[u8] {
        &self.visited
    }

    pub fn travel_time(&self) -> f64 {
        self.timer.elapsed()
    }

    pub fn travel_speed(&self) -> f64 {
        self.travel_speed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn n_floors(&self) -> u8 {
        self.n_floors
    }

    pub fn is_requested(&self, floor: u8) -> bool {
        self.queue.contains(&floor)
    }

    /// One entry per floor, lowest first: whether that floor's button is lit.
    pub fn button_states(&self) -> Vec<bool> {
        (1..=self.n_floors)
            .map(|floor| self.is_requested(floor))
            .collect()
    }

    /// Car height when resting at `floor`.
    pub fn car_height(&self, floor: u8) -> f64 {
        f64::from(floor.saturating_sub(1)) * self.floor_distance
    }

    pub fn state(&self) -> ElevatorState {
        ElevatorState {
            floor: self.floor,
            direction: self.direction,
            phase: self.phase,
            travel_time: self.timer.elapsed(),
            travel_speed: self.travel_speed,
            visited: self.visited.clone(),
            destinations: self.queue.clone(),
        }
    }

    /***************************************/
    /*          Private functions          */
    /***************************************/
    fn dispatch(&mut self) -> Option<Cue> {
        while self.queue.first() == Some(&self.floor) {
            self.queue.remove(0);
        }
        let target = match self.queue.first() {
            Some(&floor) => floor,
            None => {
                self.phase = Phase::Idle;
                return None;
            }
        };

        self.direction = update_direction(self.direction, self.floor, &self.queue, self.n_floors);
        self.phase = Phase::Traveling;
        self.generation += 1;

        let floors = f64::from(target.abs_diff(self.floor));
        let duration = self.travel_speed * floors;
        info!(
            "Travelling {} from floor {} to floor {} ({:.2}s)",
            self.direction, self.floor, target, duration
        );

        Some(self.cue(Motion::Travel {
            from_floor: self.floor,
            to_floor: target,
            car_y: self.car_height(target),
            duration,
        }))
    }

    fn cue(&self, motion: Motion) -> Cue {
        let phase = match motion {
            Motion::Travel { .. } => Phase::Traveling,
            Motion::OpenDoors { .. } => Phase::DoorsOpening,
            Motion::CloseDoors { .. } => Phase::DoorsClosing,
        };
        Cue {
            generation: self.generation,
            phase,
            motion,
        }
    }
}
