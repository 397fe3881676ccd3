/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::elevator::animation::{Animator, Pose, TweenSignal};
use crate::elevator::fsm::{Cue, ElevatorFSM};
use crate::elevator::observer::SceneObserver;
use crate::error::ElevatorResult;
use crate::shared::{ElevatorState, Phase};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    RequestFloor(u8),
    SetTravelSpeed(f64),
    Reset,
}

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Status published by the simulation thread.
 *
 * # Fields
 * - `commands`:    Number of commands handled so far, rejected ones included.
 * - `state`:       Status readout after the last handled event.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub commands: u64,
    pub state: ElevatorState,
}

enum Event {
    CommandReceived(Command),
    Frame(Instant),
    Terminate,
}

/**
 * Couples the dispatch state machine to the animation driver and a scene observer.
 *
 * Everything runs on one thread. Commands and ticks are handled one at a time, and
 * the state machine only advances on animation signals collected during a tick.
 *
 * # Fields
 * - `fsm`:         The dispatch state machine.
 * - `animator`:    The tween timeline moving the car and the doors.
 * - `observer`:    Rendering collaborator notified of targets, phases and status.
 * - `last_phase`:  Phase last reported to the observer.
 * - `last_state`:  Status last reported to the observer.
 */
pub struct Simulation<O: SceneObserver> {
    fsm: ElevatorFSM,
    animator: Animator,
    observer: O,
    last_phase: Phase,
    last_state: ElevatorState,
}

impl<O: SceneObserver> Simulation<O> {
    pub fn new(config: &Config, observer: O) -> Simulation<O> {
        let fsm = ElevatorFSM::new(&config.elevator, &config.doors);
        let last_state = fsm.state();

        Simulation {
            fsm,
            animator: Animator::new(),
            observer,
            last_phase: Phase::Idle,
            last_state,
        }
    }

    /***************************************/
    /*              Commands               */
    /***************************************/
    pub fn request_floor(&mut self, floor: u8) -> ElevatorResult<()> {
        let cue = self.fsm.request_floor(floor)?;
        self.play(cue);
        self.publish();
        Ok(())
    }

    pub fn set_travel_speed(&mut self, seconds_per_floor: f64) -> ElevatorResult<()> {
        self.fsm.set_travel_speed(seconds_per_floor)?;
        self.publish();
        Ok(())
    }

    /// Cancels all motion before clearing state, then snaps the scene to its rest pose.
    pub fn reset(&mut self) {
        self.animator.cancel_all();
        self.fsm.reset();
        self.animator.snap(Pose::rest());
        self.observer.on_position_target(Pose::rest());
        self.publish();
    }

    pub fn handle_command(&mut self, command: Command) {
        let result = match command {
            Command::RequestFloor(floor) => self.request_floor(floor),
            Command::SetTravelSpeed(speed) => self.set_travel_speed(speed),
            Command::Reset => {
                self.reset();
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Rejected {:?}: {}", command, e);
        }
    }

    /// Advances the travel timer and the animation by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f64) {
        self.fsm.tick(delta_seconds);

        for signal in self.animator.advance(delta_seconds) {
            match signal {
                TweenSignal::Started { generation, phase } => {
                    self.fsm.on_phase_start(generation, phase);
                }
                TweenSignal::Completed {
                    generation,
                    phase,
                    overshoot,
                } => {
                    let cue = self.fsm.on_phase_complete(generation, phase);
                    self.play_from(cue, overshoot);
                }
            }
            self.publish_phase();
        }

        self.observer.on_frame(self.animator.pose());
        self.publish();
    }

    /***************************************/
    /*             Read access             */
    /***************************************/
    pub fn state(&self) -> ElevatorState {
        self.fsm.state()
    }

    pub fn pose(&self) -> Pose {
        self.animator.pose()
    }

    pub fn button_states(&self) -> Vec<bool> {
        self.fsm.button_states()
    }

    pub fn fsm(&self) -> &ElevatorFSM {
        &self.fsm
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// True when no leg is in flight and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.fsm.phase() == Phase::Idle && self.fsm.queue().is_empty()
    }

    /***************************************/
    /*              Main loop              */
    /***************************************/

    /// Runs until terminated, ticking once per `frame_interval` with the real elapsed time.
    ///
    /// An update is sent on start, after every handled command and whenever the state changes.
    pub fn run(
        mut self,
        frame_interval: Duration,
        command_rx: cbc::Receiver<Command>,
        status_tx: cbc::Sender<StatusUpdate>,
        terminate_rx: cbc::Receiver<()>,
    ) {
        let ticker = cbc::tick(frame_interval);
        let mut last_frame = Instant::now();
        let mut last_sent = StatusUpdate {
            commands: 0,
            state: self.state(),
        };
        let _ = status_tx.send(last_sent.clone());

        loop {
            match Self::wait_for_event(&command_rx, &ticker, &terminate_rx) {
                Event::CommandReceived(command) => {
                    self.handle_command(command);
                    last_sent.commands += 1;
                    last_sent.state = self.state();
                    let _ = status_tx.send(last_sent.clone());
                    continue;
                }
                Event::Frame(now) => {
                    let delta = now.saturating_duration_since(last_frame).as_secs_f64();
                    last_frame = now;
                    self.tick(delta);
                }
                Event::Terminate => {
                    info!("Simulation terminated");
                    return;
                }
            }

            let state = self.state();
            if state != last_sent.state {
                last_sent.state = state;
                let _ = status_tx.send(last_sent.clone());
            }
        }
    }

    fn wait_for_event(
        command_rx: &cbc::Receiver<Command>,
        ticker: &cbc::Receiver<Instant>,
        terminate_rx: &cbc::Receiver<()>,
    ) -> Event {
        cbc::select! {
            recv(terminate_rx) -> _ => Event::Terminate,
            recv(command_rx) -> command => {
                match command {
                    Ok(command) => Event::CommandReceived(command),
                    Err(e) => {
                        debug!("Command channel closed: {}", e);
                        Event::Terminate
                    }
                }
            },
            recv(ticker) -> instant => {
                match instant {
                    Ok(instant) => Event::Frame(instant),
                    Err(_) => Event::Terminate,
                }
            },
        }
    }

    /***************************************/
    /*          Private functions          */
    /***************************************/
    fn play(&mut self, cue: Option<Cue>) {
        self.play_from(cue, 0.0);
    }

    fn play_from(&mut self, cue: Option<Cue>, head_start: f64) {
        if let Some(cue) = cue {
            let target = self.animator.play_from(&cue, head_start);
            self.observer.on_position_target(target);
        }
    }

    fn publish_phase(&mut self) {
        let phase = self.fsm.phase();
        if phase != self.last_phase {
            debug!("Phase {} -> {}", self.last_phase, phase);
            self.last_phase = phase;
            self.observer.on_phase_change(phase);
        }
    }

    fn publish(&mut self) {
        self.publish_phase();
        let state = self.fsm.state();
        if state != self.last_state {
            self.observer.on_status(&state);
            self.last_state = state;
        }
    }
}
