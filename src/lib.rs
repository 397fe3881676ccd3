//! Single-car elevator simulation: a scan-ordered destination queue, a dispatch
//! state machine and the tween timeline that animates the car and its doors.
//!
//! ```rust,ignore
//! use elevator_sim::{Config, NoopObserver, Simulation};
//!
//! let mut sim = Simulation::new(&Config::default(), NoopObserver);
//! sim.request_floor(4)?;
//! while !sim.is_idle() {
//!     sim.tick(1.0 / 60.0);
//! }
//! println!("{}", sim.state());
//! ```

pub mod config;
pub mod console;
pub mod elevator;
pub mod error;
pub mod shared;

pub use config::Config;
pub use elevator::{Command, ElevatorFSM, NoopObserver, SceneObserver, Simulation, StatusUpdate};
pub use error::{ElevatorError, ElevatorResult};
pub use shared::{Direction, ElevatorState, Phase};
