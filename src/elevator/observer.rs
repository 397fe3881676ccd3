//! Scene observer trait for the rendering collaborator.

use crate::elevator::animation::Pose;
use crate::shared::{ElevatorState, Phase};

/// Callbacks invoked by [`Simulation`][crate::elevator::Simulation] whenever the
/// car is sent somewhere new or the dispatch cycle changes stage.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SceneObserver {
    /// Called when a motion is scheduled. `target` is the pose the scene should
    /// interpolate towards; the door leaves share `target.car_y`.
    fn on_position_target(&mut self, _target: Pose) {}

    /// Called once per phase change, after the state machine has moved on.
    fn on_phase_change(&mut self, _phase: Phase) {}

    /// Called after every tick with the current interpolated pose.
    fn on_frame(&mut self, _pose: Pose) {}

    /// Called whenever the status readout changed.
    fn on_status(&mut self, _state: &ElevatorState) {}
}

/// A [`SceneObserver`] that does nothing.
pub struct NoopObserver;

impl SceneObserver for NoopObserver {}
