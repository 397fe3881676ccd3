/*
 * Unit tests for the dispatch state machine
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 * Animation signals are fed by hand, so no tween timeline is involved.
 *
 * Tests:
 * - test_fsm_init
 * - test_fsm_request_while_idle_dispatches
 * - test_fsm_ignores_current_and_queued_floors
 * - test_fsm_rejects_out_of_range_floors
 * - test_fsm_full_cycle
 * - test_fsm_mid_travel_request_does_not_preempt
 * - test_fsm_down_sweep_anchors_on_committed_stop
 * - test_fsm_visited_grows_once_per_leg
 * - test_fsm_reverses_at_top_floor
 * - test_fsm_stale_signals_after_reset
 * - test_fsm_signal_for_wrong_phase_is_ignored
 * - test_fsm_reset_from_every_phase
 * - test_fsm_travel_timer
 * - test_fsm_travel_speed
 * - test_fsm_button_states
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::config::{DoorConfig, ElevatorConfig};
    use crate::elevator::fsm::{Cue, ElevatorFSM, Motion};
    use crate::error::ElevatorError;
    use crate::shared::Direction::{Down, Up};
    use crate::shared::Phase::{Dwelling, DoorsClosing, DoorsOpening, Idle, Traveling};

    fn setup_fsm() -> ElevatorFSM {
        // Default configuration
        let config = ElevatorConfig {
            n_floors: 6,
            floor_distance: 2.2,
            travel_speed: 2.0,
        };
        let doors = DoorConfig {
            open_time: 2.0,
            dwell_time: 1.0,
            close_time: 2.0,
            offset: 0.3,
        };
        ElevatorFSM::new(&config, &doors)
    }

    /// Feeds the signals of one complete arrival cycle and returns the follow-up cue.
    fn finish_leg(fsm: &mut ElevatorFSM) -> Option<Cue> {
        let generation = fsm.generation();
        fsm.on_phase_complete(generation, Traveling);
        fsm.on_phase_complete(generation, DoorsOpening);
        fsm.on_phase_start(generation, DoorsClosing);
        fsm.on_phase_complete(generation, DoorsClosing)
    }

    fn travel_target(cue: Option<Cue>) -> u8 {
        match cue.map(|cue| cue.motion) {
            Some(Motion::Travel { to_floor, .. }) => to_floor,
            other => panic!("Expected a travel cue, got {:?}", other),
        }
    }

    #[test]
    fn test_fsm_init() {
        // Purpose: Verify that the FSM is in the expected initial state after creation

        // Arrange
        let fsm = setup_fsm();

        // Assert
        assert_eq!(fsm.floor(), 1);
        assert_eq!(fsm.direction(), Up);
        assert_eq!(fsm.phase(), Idle);
        assert!(fsm.queue().is_empty());
        assert!(fsm.visited().is_empty());
        assert_eq!(fsm.travel_time(), 0.0);
    }

    #[test]
    fn test_fsm_request_while_idle_dispatches() {
        // Purpose: An enqueue while idle starts the leg on the same call

        // Arrange
        let mut fsm = setup_fsm();

        // Act
        let cue = fsm.request_floor(4).unwrap().unwrap();

        // Assert
        assert_eq!(fsm.phase(), Traveling);
        assert_eq!(fsm.queue(), &[4]);
        assert_eq!(cue.phase, Traveling);
        assert_eq!(cue.generation, fsm.generation());
        match cue.motion {
            Motion::Travel {
                from_floor,
                to_floor,
                car_y,
                duration,
            } => {
                assert_eq!(from_floor, 1);
                assert_eq!(to_floor, 4);
                assert!((car_y - 6.6).abs() < 1e-9);
                assert_eq!(duration, 6.0);
            }
            other => panic!("Expected a travel cue, got {:?}", other),
        }
    }

    #[test]
    fn test_fsm_ignores_current_and_queued_floors() {
        let mut fsm = setup_fsm();
        fsm.request_floor(4).unwrap();

        let current = fsm.request_floor(1).unwrap();
        let duplicate = fsm.request_floor(4).unwrap();

        assert!(current.is_none());
        assert!(duplicate.is_none());
        assert_eq!(fsm.queue(), &[4]);
    }

    #[test]
    fn test_fsm_rejects_out_of_range_floors() {
        // Arrange
        let mut fsm = setup_fsm();

        // Act
        let below = fsm.request_floor(0);
        let above = fsm.request_floor(7);

        // Assert
        assert!(matches!(
            below,
            Err(ElevatorError::FloorOutOfRange { floor: 0, n_floors: 6 })
        ));
        assert!(matches!(
            above,
            Err(ElevatorError::FloorOutOfRange { floor: 7, n_floors: 6 })
        ));
        assert!(fsm.queue().is_empty());
        assert_eq!(fsm.phase(), Idle);
    }

    #[test]
    fn test_fsm_full_cycle() {
        // Purpose: Walk through Traveling -> DoorsOpening -> Dwelling -> DoorsClosing -> Idle

        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(3).unwrap();
        let generation = fsm.generation();

        // Act & Assert: arrival
        let open = fsm.on_phase_complete(generation, Traveling).unwrap();
        assert_eq!(fsm.phase(), DoorsOpening);
        assert_eq!(fsm.floor(), 3);
        assert_eq!(fsm.visited(), &[3]);
        assert_eq!(
            open.motion,
            Motion::OpenDoors {
                left_x: 0.3,
                right_x: -0.3,
                duration: 2.0
            }
        );

        // Doors open, dwell begins
        let close = fsm.on_phase_complete(generation, DoorsOpening).unwrap();
        assert_eq!(fsm.phase(), Dwelling);
        assert_eq!(close.phase, DoorsClosing);
        assert_eq!(
            close.motion,
            Motion::CloseDoors {
                delay: 1.0,
                duration: 2.0
            }
        );

        // Dwell over, doors start closing
        fsm.on_phase_start(generation, DoorsClosing);
        assert_eq!(fsm.phase(), DoorsClosing);

        // Doors closed with nothing left to do
        let next = fsm.on_phase_complete(generation, DoorsClosing);
        assert!(next.is_none());
        assert_eq!(fsm.phase(), Idle);
        assert!(fsm.queue().is_empty());
    }

    #[test]
    fn test_fsm_mid_travel_request_does_not_preempt() {
        // Purpose: Request 5, then 3 while travelling to 5. 5 stays first, 3 is served next.

        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(5).unwrap();

        // Act
        let cue = fsm.request_floor(3).unwrap();

        // Assert
        assert!(cue.is_none());
        assert_eq!(fsm.queue(), &[5, 3]);

        let next = finish_leg(&mut fsm);
        assert_eq!(fsm.floor(), 5);
        assert_eq!(travel_target(next), 3);
        assert_eq!(fsm.direction(), Down);
        assert_eq!(fsm.queue(), &[3]);
    }

    #[test]
    fn test_fsm_down_sweep_anchors_on_committed_stop() {
        // Arrange: at the top floor, heading down to 2
        let mut fsm = setup_fsm();
        fsm.request_floor(6).unwrap();
        finish_leg(&mut fsm);
        fsm.request_floor(2).unwrap();
        assert_eq!(fsm.direction(), Down);

        // Act
        fsm.request_floor(4).unwrap();
        fsm.request_floor(1).unwrap();
        fsm.request_floor(5).unwrap();

        // Assert: floors <= 2 descending, then the rest ascending
        assert_eq!(fsm.queue(), &[2, 1, 4, 5]);
    }

    #[test]
    fn test_fsm_visited_grows_once_per_leg() {
        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(2).unwrap();
        fsm.request_floor(4).unwrap();

        // Act
        let mut lengths = Vec::new();
        while fsm.phase() != Idle {
            finish_leg(&mut fsm);
            lengths.push(fsm.visited().len());
        }
        fsm.request_floor(2).unwrap();
        finish_leg(&mut fsm);

        // Assert
        assert_eq!(lengths, vec![1, 2]);
        assert_eq!(fsm.visited(), &[2, 4, 2]);
    }

    #[test]
    fn test_fsm_reverses_at_top_floor() {
        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(6).unwrap();
        finish_leg(&mut fsm);
        assert_eq!(fsm.direction(), Up);

        // Act
        let cue = fsm.request_floor(2).unwrap();

        // Assert
        assert_eq!(travel_target(cue), 2);
        assert_eq!(fsm.direction(), Down);
    }

    #[test]
    fn test_fsm_stale_signals_after_reset() {
        // Purpose: Completion signals of a cancelled cycle must not touch the fresh state

        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(4).unwrap();
        let stale = fsm.generation();

        // Act
        fsm.reset();
        let cue = fsm.on_phase_complete(stale, Traveling);
        fsm.on_phase_start(stale, DoorsClosing);

        // Assert
        assert!(cue.is_none());
        assert_ne!(fsm.generation(), stale);
        assert_eq!(fsm.floor(), 1);
        assert!(fsm.visited().is_empty());
        assert_eq!(fsm.phase(), Idle);
    }

    #[test]
    fn test_fsm_signal_for_wrong_phase_is_ignored() {
        let mut fsm = setup_fsm();
        fsm.request_floor(4).unwrap();
        let generation = fsm.generation();

        let early_doors = fsm.on_phase_complete(generation, DoorsOpening);
        let early_close = fsm.on_phase_complete(generation, DoorsClosing);

        assert!(early_doors.is_none());
        assert!(early_close.is_none());
        assert_eq!(fsm.phase(), Traveling);
        assert_eq!(fsm.queue(), &[4]);
    }

    #[test]
    fn test_fsm_reset_from_every_phase() {
        for steps in 0..5 {
            // Arrange: advance `steps` signals into a cycle with more work queued
            let mut fsm = setup_fsm();
            fsm.request_floor(3).unwrap();
            fsm.request_floor(5).unwrap();
            fsm.set_travel_speed(7.0).unwrap();
            let generation = fsm.generation();
            let signals = [
                (true, Traveling),
                (true, DoorsOpening),
                (false, DoorsClosing),
                (true, DoorsClosing),
            ];
            for &(complete, phase) in signals.iter().take(steps) {
                if complete {
                    fsm.on_phase_complete(generation, phase);
                } else {
                    fsm.on_phase_start(generation, phase);
                }
            }
            fsm.tick(0.5);

            // Act
            fsm.reset();

            // Assert
            assert!(fsm.queue().is_empty(), "steps = {}", steps);
            assert!(fsm.visited().is_empty(), "steps = {}", steps);
            assert_eq!(fsm.floor(), 1);
            assert_eq!(fsm.direction(), Up);
            assert_eq!(fsm.phase(), Idle);
            assert_eq!(fsm.travel_time(), 0.0);
            assert_eq!(fsm.travel_speed(), 2.0);
        }
    }

    #[test]
    fn test_fsm_travel_timer() {
        // Purpose: Speed 2, floor 1 -> 4 takes 6 seconds; the readout settles on 6 once stopped

        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(4).unwrap();
        let generation = fsm.generation();

        // Act
        for _ in 0..61 {
            fsm.tick(0.1);
        }
        let while_moving = fsm.travel_time();
        fsm.on_phase_complete(generation, Traveling);
        fsm.tick(0.1);

        // Assert
        assert!(while_moving > 6.0);
        assert_eq!(fsm.travel_time(), 6.0);

        // Doors do not count as travel
        fsm.on_phase_complete(generation, DoorsOpening);
        fsm.tick(1.0);
        assert_eq!(fsm.travel_time(), 6.0);
    }

    #[test]
    fn test_fsm_travel_speed() {
        // Arrange
        let mut fsm = setup_fsm();
        fsm.request_floor(2).unwrap();

        // Act
        fsm.set_travel_speed(10.0).unwrap();
        fsm.request_floor(5).unwrap();
        let next = finish_leg(&mut fsm).unwrap();

        // Assert: the change only applies from the next leg on
        match next.motion {
            Motion::Travel { duration, .. } => assert_eq!(duration, 30.0),
            other => panic!("Expected a travel cue, got {:?}", other),
        }
        assert!(matches!(
            fsm.set_travel_speed(-1.0),
            Err(ElevatorError::InvalidTravelSpeed(_))
        ));
        assert!(fsm.set_travel_speed(f64::NAN).is_err());
        assert_eq!(fsm.travel_speed(), 10.0);
    }

    #[test]
    fn test_fsm_button_states() {
        let mut fsm = setup_fsm();
        fsm.request_floor(2).unwrap();
        fsm.request_floor(6).unwrap();

        let buttons = fsm.button_states();

        assert_eq!(buttons, vec![false, true, false, false, false, true]);
        assert!(fsm.is_requested(6));
        assert!(!fsm.is_requested(1));
    }
}
