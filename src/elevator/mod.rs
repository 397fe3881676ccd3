pub mod animation;
pub mod fsm;
pub mod observer;
pub mod requests;
pub mod simulation;
pub mod timer;

mod fsm_tests;

pub use animation::{Animator, Pose, TweenSignal};
pub use fsm::{Cue, ElevatorFSM, Motion};
pub use observer::{NoopObserver, SceneObserver};
pub use requests::{sort_floors, update_direction};
pub use simulation::{Command, Simulation, StatusUpdate};
pub use timer::MotionTimer;
