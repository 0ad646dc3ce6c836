//! Dial timer
//!
//! Ties mode, playback and drag handling together and is the one object the
//! application holds.

use std::time::Instant;

use crate::conversion::{CYCLE_SECONDS, FULL_TURN};
use crate::direction::Mode;
use crate::drag::{DialGeometry, DragHandler};
use crate::playback::{Playback, PlaybackObserver, PlaybackState, ProgressUpdate};
use crate::settings::{ConfigError, SettingsStore, KEY_MODE};

pub struct DialTimer<O> {
    playback: Playback<O>,
    drag: DragHandler,
}

impl<O: PlaybackObserver> DialTimer<O> {
    /// Fresh timer at an empty dial. Starts running if the mode finishes elsewhere.
    ///
    /// Drag memory starts in countdown orientation and is mirrored into `mode`, so a
    /// timer built in count-up matches one toggled into it.
    pub fn new(mode: Mode, observer: O, now: Instant) -> Self {
        let mut timer = Self {
            playback: Playback::new(Mode::Countdown, observer),
            drag: DragHandler::new(),
        };
        timer.set_mode(mode, now);
        timer
    }

    /// Timer in the mode last saved to `store`
    pub fn restore<S: SettingsStore>(store: &S, observer: O, now: Instant) -> Self {
        let mode = store.get(KEY_MODE).unwrap_or_default();
        log::debug!("restored mode {:?}", mode);
        Self::new(mode, observer, now)
    }

    pub fn mode(&self) -> Mode {
        self.playback.mode()
    }

    pub fn value(&self) -> f64 {
        self.playback.value()
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn progress(&self) -> ProgressUpdate {
        self.playback.progress()
    }

    pub fn last_angle(&self) -> f64 {
        self.drag.last_angle()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn observer(&self) -> &O {
        self.playback.observer()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        self.playback.observer_mut()
    }

    /// Preset the dial to `seconds` of running time and start it
    ///
    /// Out-of-range input is clamped; zero or less leaves the dial alone.
    pub fn apply_initial_offset(&mut self, seconds: i64, now: Instant) {
        let seconds = seconds.clamp(0, CYCLE_SECONDS as i64);
        if seconds == 0 {
            return;
        }
        let angle = seconds as f64 / CYCLE_SECONDS as f64 * FULL_TURN;
        let value = self.mode().value_for_angle(angle);
        log::info!("initial offset {}s", seconds);
        self.playback.set_value(value);
        self.playback.start_animation(now);
    }

    /// Switch to `mode`, re-orienting drag memory and restarting playback
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        if mode != self.mode() {
            self.drag.mirror_last_angle();
        }
        self.playback.set_mode(mode);
        self.playback.start_animation(now);
    }

    /// Flip the mode and persist the new one
    pub fn toggle_mode<S: SettingsStore>(
        &mut self,
        store: &mut S,
        now: Instant,
    ) -> Result<Mode, ConfigError> {
        let mode = self.mode().toggled();
        self.set_mode(mode, now);
        log::info!("mode switched to {}", mode);
        store.set(KEY_MODE, &mode)?;
        Ok(mode)
    }

    pub fn pointer_down(&mut self, geometry: &DialGeometry, x: f32, y: f32, now: Instant) -> bool {
        self.drag
            .pointer_down(geometry, x, y, &mut self.playback, now)
    }

    pub fn pointer_moved(&mut self, geometry: &DialGeometry, x: f32, y: f32) {
        self.drag.pointer_moved(geometry, x, y, &mut self.playback);
    }

    pub fn pointer_up(&mut self, now: Instant) {
        self.drag.pointer_up(&mut self.playback, now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.playback.tick(now);
    }
}
