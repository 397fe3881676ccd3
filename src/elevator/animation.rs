/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::fsm::{Cue, Motion};
use crate::shared::Phase;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Interpolated scene values. Door leaves share the car's height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub car_y: f64,
    pub left_door_x: f64,
    pub right_door_x: f64,
}

impl Pose {
    /// Car at the ground floor with both doors shut.
    pub fn rest() -> Pose {
        Pose::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenSignal {
    Started { generation: u64, phase: Phase },
    /// `overshoot` is the part of the frame left over after the motion finished.
    Completed {
        generation: u64,
        phase: Phase,
        overshoot: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    CarY,
    LeftDoorX,
    RightDoorX,
}

#[derive(Debug, Clone)]
struct Tween {
    generation: u64,
    phase: Phase,
    property: Property,
    from: f64,
    to: f64,
    delay: f64,
    duration: f64,
    elapsed: f64,
    started: bool,
    finished: bool,
    reports: bool,
}

/**
 * Tween timeline driving the car and both door leaves.
 *
 * `play` turns a `Cue` into tweens, `advance` moves them forward by a frame and reports
 * when a cue's motion starts and completes. Each tween captures its start value the
 * moment its delay has elapsed, so consecutive motions chain from wherever the previous
 * one left the pose.
 *
 * # Fields
 * - `pose`:    Current interpolated values.
 * - `tweens`:  Running and delayed tweens, in the order they were played.
 */
#[derive(Debug, Default)]
pub struct Animator {
    pose: Pose,
    tweens: Vec<Tween>,
}

impl Animator {
    pub fn new() -> Animator {
        Animator {
            pose: Pose::rest(),
            tweens: Vec::new(),
        }
    }

    /// Schedules the motion of `cue` and returns the pose it will end in.
    pub fn play(&mut self, cue: &Cue) -> Pose {
        self.play_from(cue, 0.0)
    }

    /// Like `play`, but the motion counts as already `head_start` seconds under way.
    /// Chaining a cue with the previous completion's overshoot keeps phases frame-exact.
    pub fn play_from(&mut self, cue: &Cue, head_start: f64) -> Pose {
        let head_start = if head_start.is_finite() {
            head_start.max(0.0)
        } else {
            0.0
        };
        let first = self.tweens.len();
        let mut target = self.pose;

        match cue.motion {
            Motion::Travel { car_y, duration, .. } => {
                self.push(cue, Property::CarY, car_y, 0.0, duration, true);
                target.car_y = car_y;
            }
            Motion::OpenDoors {
                left_x,
                right_x,
                duration,
            } => {
                self.push(cue, Property::LeftDoorX, left_x, 0.0, duration, true);
                self.push(cue, Property::RightDoorX, right_x, 0.0, duration, false);
                target.left_door_x = left_x;
                target.right_door_x = right_x;
            }
            Motion::CloseDoors { delay, duration } => {
                self.push(cue, Property::LeftDoorX, 0.0, delay, duration, true);
                self.push(cue, Property::RightDoorX, 0.0, delay, duration, false);
                target.left_door_x = 0.0;
                target.right_door_x = 0.0;
            }
        }

        for tween in self.tweens[first..].iter_mut() {
            tween.elapsed = head_start;
        }
        target
    }

    pub fn advance(&mut self, delta_seconds: f64) -> Vec<TweenSignal> {
        let delta = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };
        let mut signals = Vec::new();

        for tween in self.tweens.iter_mut() {
            tween.elapsed += delta;

            if !tween.started {
                if tween.elapsed < tween.delay {
                    continue;
                }
                tween.started = true;
                tween.from = read(&self.pose, tween.property);
                if tween.reports {
                    signals.push(TweenSignal::Started {
                        generation: tween.generation,
                        phase: tween.phase,
                    });
                }
            }

            let progress = if tween.duration <= 0.0 {
                1.0
            } else {
                ((tween.elapsed - tween.delay) / tween.duration).min(1.0)
            };

            if progress >= 1.0 {
                write(&mut self.pose, tween.property, tween.to);
                tween.finished = true;
                if tween.reports {
                    signals.push(TweenSignal::Completed {
                        generation: tween.generation,
                        phase: tween.phase,
                        overshoot: (tween.elapsed - tween.delay - tween.duration).max(0.0),
                    });
                }
            } else {
                let value = tween.from + (tween.to - tween.from) * ease_out_quad(progress);
                write(&mut self.pose, tween.property, value);
            }
        }

        self.tweens.retain(|tween| !tween.finished);
        signals
    }

    /// Drops every pending tween without reporting it.
    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    pub fn snap(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    fn push(
        &mut self,
        cue: &Cue,
        property: Property,
        to: f64,
        delay: f64,
        duration: f64,
        reports: bool,
    ) {
        self.tweens.push(Tween {
            generation: cue.generation,
            phase: cue.phase,
            property,
            from: read(&self.pose, property),
            to,
            delay: delay.max(0.0),
            duration,
            elapsed: 0.0,
            started: false,
            finished: false,
            reports,
        });
    }
}

/***************************************/
/*          Private functions          */
/***************************************/
fn read(pose: &Pose, property: Property) -> f64 {
    match property {
        Property::CarY => pose.car_y,
        Property::LeftDoorX => pose.left_door_x,
        Property::RightDoorX => pose.right_door_x,
    }
}

fn write(pose: &mut Pose, property: Property, value: f64) {
    match property {
        Property::CarY => pose.car_y = value,
        Property::LeftDoorX => pose.left_door_x = value,
        Property::RightDoorX => pose.right_door_x = value,
    }
}

fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/***************************************/
/*             Unit tests              */
/***************************************/
