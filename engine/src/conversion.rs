//! Angle / value / time conversion
//!
//! Pure mappings between the three representations of a dial position: the angle in
//! degrees, the normalized progress value, and the elapsed seconds of the cycle.
//! Callers clamp their inputs; these functions trust them.

/// Length of one full sweep of the dial, in seconds (60 minutes)
pub const CYCLE_SECONDS: u32 = 60 * 60;

/// Degrees in one full turn of the dial
pub const FULL_TURN: f64 = 360.0;

/// Seconds represented by a progress value, rounded to the display resolution
pub fn value_to_seconds(value: f64) -> u32 {
    (value * CYCLE_SECONDS as f64).round() as u32
}

/// Canonical (count-up) dial angle for a progress value
pub fn value_to_angle(value: f64) -> f64 {
    (value * FULL_TURN) % FULL_TURN
}

/// Progress value for a canonical dial angle
pub fn angle_to_value(angle: f64) -> f64 {
    angle / FULL_TURN
}

/// Format seconds as "MM:SS"
///
/// A full cycle reads "60:00" rather than wrapping back to zero.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_value_to_seconds_extremes() {
        assert_eq!(value_to_seconds(0.0), 0);
        assert_eq!(value_to_seconds(1.0), 3600);
        assert_eq!(value_to_seconds(0.5), 1800);
    }

    #[test]
    fn test_value_to_seconds_rounds() {
        // 0.1 s and 0.6 s past the minute
        assert_eq!(value_to_seconds(60.1 / 3600.0), 60);
        assert_eq!(value_to_seconds(60.6 / 3600.0), 61);
    }

    #[test]
    fn test_value_to_angle_wraps_full_turn() {
        assert_eq!(value_to_angle(0.25), 90.0);
        assert_eq!(value_to_angle(1.0), 0.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1800), "30:00");
        assert_eq!(format_clock(599), "09:59");
        assert_eq!(format_clock(CYCLE_SECONDS), "60:00");
    }

    proptest! {
        #[test]
        fn angle_value_round_trip(value in 0.0f64..1.0) {
            let back = angle_to_value(value_to_angle(value));
            prop_assert!((back - value).abs() < 1e-9);
        }

        #[test]
        fn seconds_match_rounded_cycle_fraction(value in 0.0f64..=1.0) {
            prop_assert_eq!(value_to_seconds(value), (value * 3600.0).round() as u32);
            prop_assert!(value_to_seconds(value) <= CYCLE_SECONDS);
        }
    }
}
