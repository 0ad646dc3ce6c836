//! Dial timer engine
//!
//! Angle/value/time conversion, the countdown and count-up direction policy, the
//! playback state machine, pointer dragging, settings persistence and the wall clock.

pub mod conversion;
pub mod dial;
pub mod direction;
pub mod drag;
pub mod oneshot;
pub mod playback;
pub mod settings;
pub mod wall_clock;

pub use conversion::{
    angle_to_value, format_clock, value_to_angle, value_to_seconds, CYCLE_SECONDS,
};
pub use dial::DialTimer;
pub use direction::{on_mode_changed, Mode};
pub use drag::{correct_wraparound, pointer_angle, DialGeometry, DragHandler};
pub use oneshot::{OneShotTimer, TimerHandle};
pub use playback::{Animation, Playback, PlaybackObserver, PlaybackState, ProgressUpdate};
pub use settings::{ConfigError, Settings, SettingsStore, TableStore, Theme};
pub use wall_clock::{read_wall_clock, ClockZone, WallTime};
