//! Playback state machine
//!
//! Owns the progress value and drives it toward the finish value of the active mode.
//! Every write goes through [`Playback::commit`], which clamps the value and reports it
//! to the observer, so the display can never drift from the committed value.

use std::time::{Duration, Instant};

use crate::conversion::{format_clock, value_to_angle, value_to_seconds, CYCLE_SECONDS};
use crate::direction::Mode;
use crate::oneshot::OneShotTimer;

/// Snapshot of the dial handed to the renderer on every value change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Fraction of the dial swept (0.0-1.0)
    pub value: f64,
    /// Canonical dial angle in degrees
    pub angle: f64,
    /// Seconds shown on the readout
    pub seconds: u32,
}

impl ProgressUpdate {
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            angle: value_to_angle(value),
            seconds: value_to_seconds(value),
        }
    }

    /// Readout text, "MM:SS"
    pub fn label(&self) -> String {
        format_clock(self.seconds)
    }
}

/// Receives value changes and alarms from a [`Playback`]
pub trait PlaybackObserver {
    /// Called after every committed value write
    fn on_progress(&mut self, update: ProgressUpdate);

    /// Called once when an animation reaches its finish value on its own
    fn on_alarm(&mut self);
}

impl PlaybackObserver for () {
    fn on_progress(&mut self, _update: ProgressUpdate) {}
    fn on_alarm(&mut self) {}
}

/// A linear sweep from one value to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub from: f64,
    pub target: f64,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Animation {
    /// Interpolated value at `now`
    pub fn value_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.target;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        self.from + (self.target - self.from) * t
    }
}

/// What the playback is currently doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    Idle,
    Animating(Animation),
    Dragging,
}

/// Time needed to sweep between two progress values at real-time speed
pub fn sweep_duration(from: f64, to: f64) -> Duration {
    let millis = CYCLE_SECONDS as f64 * 1000.0 * (to - from).abs();
    Duration::from_millis(millis.round() as u64)
}

pub struct Playback<O> {
    value: f64,
    mode: Mode,
    state: PlaybackState,
    arrival: OneShotTimer,
    observer: O,
}

impl<O: PlaybackObserver> Playback<O> {
    pub fn new(mode: Mode, observer: O) -> Self {
        Self {
            value: 0.0,
            mode,
            state: PlaybackState::Idle,
            arrival: OneShotTimer::new(),
            observer,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress(&self) -> ProgressUpdate {
        ProgressUpdate::from_value(self.value)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Whether an arrival is scheduled
    pub fn has_pending_arrival(&self) -> bool {
        self.arrival.is_pending()
    }

    /// Change the finish direction. Does not restart the animation.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Jump to `value` and go idle
    pub fn set_value(&mut self, value: f64) {
        self.arrival.cancel();
        self.state = PlaybackState::Idle;
        self.commit(value);
    }

    /// Start sweeping toward the finish value of the current mode
    ///
    /// Stays idle when the dial already sits on the finish value.
    pub fn start_animation(&mut self, now: Instant) {
        let target = self.mode.finish_value();
        let duration = sweep_duration(self.value, target);

        self.arrival.cancel();
        if duration.is_zero() {
            self.state = PlaybackState::Idle;
            return;
        }

        self.arrival.schedule(now, duration);
        self.state = PlaybackState::Animating(Animation {
            from: self.value,
            target,
            started_at: now,
            duration,
        });
        log::debug!(
            "animating {:.4} -> {} over {:?}",
            self.value,
            target,
            duration
        );
    }

    /// Halt an in-flight animation where it currently is
    pub fn stop_animation(&mut self, now: Instant) {
        if let PlaybackState::Animating(animation) = self.state {
            self.arrival.cancel();
            self.state = PlaybackState::Idle;
            self.commit(animation.value_at(now));
        }
    }

    pub fn begin_drag(&mut self, now: Instant) {
        self.stop_animation(now);
        self.state = PlaybackState::Dragging;
    }

    /// Write a dragged value. Ignored unless a drag is in progress.
    pub fn update_drag(&mut self, value: f64) -> bool {
        if self.state != PlaybackState::Dragging {
            log::debug!("drag update ignored while {:?}", self.state);
            return false;
        }
        self.commit(value);
        true
    }

    /// Release the drag and resume toward the finish value
    pub fn end_drag(&mut self, now: Instant) {
        if self.state == PlaybackState::Dragging {
            self.state = PlaybackState::Idle;
            self.start_animation(now);
        }
    }

    /// Advance the animation to `now`, firing the alarm on arrival
    pub fn tick(&mut self, now: Instant) {
        let PlaybackState::Animating(animation) = self.state else {
            return;
        };

        if self.arrival.poll(now).is_some() {
            self.state = PlaybackState::Idle;
            self.commit(animation.target);
            log::info!("timer reached {}", self.progress().label());
            self.observer.on_alarm();
            return;
        }

        let value = animation.value_at(now);
        if value != self.value {
            self.commit(value);
        }
    }

    fn commit(&mut self, value: f64) {
        self.value = value.clamp(0.0, 1.0);
        self.observer.on_progress(ProgressUpdate::from_value(self.value));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Observer that keeps everything it is told
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub updates: Vec<ProgressUpdate>,
        pub alarms: u32,
    }

    impl PlaybackObserver for Recorder {
        fn on_progress(&mut self, update: ProgressUpdate) {
            self.updates.push(update);
        }

        fn on_alarm(&mut self) {
            self.alarms += 1;
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_set_value_clamps() {
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.set_value(1.7);
        assert_eq!(playback.value(), 1.0);
        playback.set_value(-0.2);
        assert_eq!(playback.value(), 0.0);
        assert_eq!(playback.observer().updates.len(), 2);
    }

    #[test]
    fn test_start_at_finish_stays_idle() {
        let now = Instant::now();
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.start_animation(now);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(!playback.has_pending_arrival());
    }

    #[test]
    fn test_countdown_half_way() {
        let start = Instant::now();
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.set_value(1.0);
        playback.start_animation(start);

        match playback.state() {
            PlaybackState::Animating(animation) => {
                assert_eq!(animation.target, 0.0);
                assert_eq!(animation.duration, secs(3600));
            }
            other => panic!("expected animation, got {:?}", other),
        }

        playback.tick(start + secs(1800));
        assert!((playback.value() - 0.5).abs() < 1e-9);
        assert_eq!(playback.progress().label(), "30:00");
        assert_eq!(playback.observer().alarms, 0);
    }

    #[test]
    fn test_alarm_fires_once_on_arrival() {
        let start = Instant::now();
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.set_value(0.1);
        playback.start_animation(start);

        playback.tick(start + secs(360));
        playback.tick(start + secs(400));
        playback.tick(start + secs(500));

        assert_eq!(playback.value(), 0.0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(playback.observer().alarms, 1);
        assert_eq!(playback.observer().updates.last().map(|u| u.seconds), Some(0));
    }

    #[test]
    fn test_stop_animation_freezes_value_and_is_idempotent() {
        let start = Instant::now();
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.set_value(0.5);
        playback.start_animation(start);

        playback.stop_animation(start + secs(900));
        let after_first = (playback.value(), playback.state(), playback.observer().updates.len());
        assert!((playback.value() - 0.25).abs() < 1e-9);
        assert!(!playback.has_pending_arrival());

        playback.stop_animation(start + secs(1200));
        let after_second = (playback.value(), playback.state(), playback.observer().updates.len());
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_drag_interrupts_alarm() {
        let start = Instant::now();
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        playback.set_value(0.01);
        playback.start_animation(start);

        playback.begin_drag(start + secs(10));
        assert_eq!(playback.state(), PlaybackState::Dragging);
        playback.tick(start + secs(60));
        assert_eq!(playback.observer().alarms, 0);
        assert!(!playback.has_pending_arrival());
    }

    #[test]
    fn test_update_drag_requires_dragging() {
        let mut playback = Playback::new(Mode::Countdown, Recorder::default());
        assert!(!playback.update_drag(0.4));
        assert_eq!(playback.value(), 0.0);

        playback.begin_drag(Instant::now());
        assert!(playback.update_drag(0.4));
        assert_eq!(playback.value(), 0.4);
        assert!(!playback.has_pending_arrival());
    }

    #[test]
    fn test_countup_drag_resumes_toward_full() {
        let start = Instant::now();
        let mut playback = Playback::new(Mode::CountUp, Recorder::default());
        playback.begin_drag(start);
        playback.update_drag(0.25);
        playback.end_drag(start);

        match playback.state() {
            PlaybackState::Animating(animation) => {
                assert_eq!(animation.target, 1.0);
                assert_eq!(animation.from, 0.25);
                assert_eq!(animation.duration, sweep_duration(0.25, 1.0));
                assert_eq!(animation.duration, secs(2700));
            }
            other => panic!("expected animation, got {:?}", other),
        }
    }

    #[test]
    fn test_end_drag_at_finish_goes_idle() {
        let now = Instant::now();
        let mut playback = Playback::new(Mode::CountUp, Recorder::default());
        playback.begin_drag(now);
        playback.update_drag(1.0);
        playback.end_drag(now);
        assert_eq!(playback.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_end_drag_without_drag_is_noop() {
        let now = Instant::now();
        let mut playback = Playback::new(Mode::CountUp, Recorder::default());
        playback.end_drag(now);
        assert_eq!(playback.state(), PlaybackState::Idle);
    }
}
