//! Direction policy
//!
//! Decides which end of the dial the timer runs toward and how a physical pointer
//! angle maps onto progress for the active mode.

use serde::{Deserialize, Serialize};

use crate::conversion::{angle_to_value, FULL_TURN};

/// Which way the timer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sweeps back toward an empty dial
    #[default]
    Countdown,
    /// Sweeps forward toward a full dial
    CountUp,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Countdown => write!(f, "Countdown"),
            Mode::CountUp => write!(f, "Count up"),
        }
    }
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Countdown => Mode::CountUp,
            Mode::CountUp => Mode::Countdown,
        }
    }

    /// Progress value the dial animates toward when left alone
    pub fn finish_value(self) -> f64 {
        match self {
            Mode::Countdown => 0.0,
            Mode::CountUp => 1.0,
        }
    }

    /// Progress value at the opposite extreme from the finish
    pub fn start_value(self) -> f64 {
        1.0 - self.finish_value()
    }

    /// Progress value selected by a pointer at `angle` degrees
    ///
    /// Angles are measured from 12 o'clock in the pointer's own frame. The mapping is
    /// anchored at the finish value, so count-up reads the same angle mirrored.
    pub fn value_for_angle(self, angle: f64) -> f64 {
        (self.finish_value() - angle_to_value(angle))
            .abs()
            .clamp(0.0, 1.0)
    }

    /// Rotation about the vertical axis the dial face is shown at (0° or 180°)
    pub fn display_rotation(self) -> f64 {
        match self {
            Mode::Countdown => 0.0,
            Mode::CountUp => 180.0,
        }
    }
}

/// Re-express the last drag angle after the dial orientation mirrors
pub fn on_mode_changed(previous_last_angle: f64) -> f64 {
    FULL_TURN - previous_last_angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_and_start_are_opposites() {
        for mode in [Mode::Countdown, Mode::CountUp] {
            assert_eq!(mode.finish_value() + mode.start_value(), 1.0);
        }
        assert_eq!(Mode::Countdown.finish_value(), 0.0);
        assert_eq!(Mode::CountUp.finish_value(), 1.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Mode::Countdown.toggled(), Mode::CountUp);
        assert_eq!(Mode::Countdown.toggled().toggled(), Mode::Countdown);
    }

    #[test]
    fn test_value_for_angle_mirrors_between_modes() {
        assert_eq!(Mode::Countdown.value_for_angle(90.0), 0.25);
        assert_eq!(Mode::CountUp.value_for_angle(90.0), 0.75);
        assert_eq!(Mode::Countdown.value_for_angle(360.0), 1.0);
        assert_eq!(Mode::CountUp.value_for_angle(360.0), 0.0);
        assert_eq!(Mode::CountUp.value_for_angle(0.0), 1.0);
    }

    #[test]
    fn test_on_mode_changed_mirrors_angle() {
        assert_eq!(on_mode_changed(0.0), 360.0);
        assert_eq!(on_mode_changed(90.0), 270.0);
        assert_eq!(on_mode_changed(on_mode_changed(42.0)), 42.0);
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: Mode,
        }
        let text = toml::to_string(&Wrapper { mode: Mode::CountUp }).unwrap();
        assert_eq!(text.trim(), "mode = \"countup\"");
        let parsed: Wrapper = toml::from_str("mode = \"countdown\"").unwrap();
        assert_eq!(parsed.mode, Mode::Countdown);
    }
}
