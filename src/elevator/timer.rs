/**
 * Accumulates the time the car spends moving between floors.
 *
 * While the car travels every tick adds its delta. Once the car stops the total is
 * rounded to whole seconds to cancel frame drift; rounding an integral value is a no-op.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionTimer {
    elapsed: f64,
}

impl MotionTimer {
    pub fn new() -> MotionTimer {
        MotionTimer { elapsed: 0.0 }
    }

    pub fn tick(&mut self, delta_seconds: f64, traveling: bool) {
        if traveling {
            if delta_seconds.is_finite() && delta_seconds > 0.0 {
                self.elapsed += delta_seconds;
            }
        } else {
            self.elapsed = self.elapsed.round();
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod timer_tests {
    use super::MotionTimer;

    #[test]
    fn test_timer_accumulates_only_while_traveling() {
        // Arrange
        let mut timer = MotionTimer::new();

        // Act
        timer.tick(0.25, true);
        timer.tick(0.25, true);
        timer.tick(0.5, false);

        // Assert
        assert_eq!(timer.elapsed(), 1.0);
    }

    #[test]
    fn test_timer_rounds_drift_once_stopped() {
        let mut timer = MotionTimer::new();
        for _ in 0..61 {
            timer.tick(0.1, true);
        }
        assert!(timer.elapsed() > 6.0);

        timer.tick(0.016, false);

        assert_eq!(timer.elapsed(), 6.0);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let mut timer = MotionTimer::new();
        timer.tick(2.6, true);

        timer.tick(0.016, false);
        timer.tick(0.016, false);
        timer.tick(0.016, false);

        assert_eq!(timer.elapsed(), 3.0);
    }

    #[test]
    fn test_invalid_deltas_are_ignored() {
        let mut timer = MotionTimer::new();

        timer.tick(-1.0, true);
        timer.tick(f64::NAN, true);
        timer.tick(f64::INFINITY, true);

        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_reset_clears_elapsed() {
        let mut timer = MotionTimer::new();
        timer.tick(4.0, true);

        timer.reset();

        assert_eq!(timer, MotionTimer::new());
    }
}
