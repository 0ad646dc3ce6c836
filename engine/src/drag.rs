//! Drag interaction
//!
//! Turns pointer positions into dial angles and feeds them to the playback while a
//! drag is held. Coordinates are window space with y pointing up.

use std::time::Instant;

use crate::conversion::FULL_TURN;
use crate::direction::on_mode_changed;
use crate::playback::{Playback, PlaybackObserver};

/// Width of the band on either side of 12 o'clock where seam crossings are caught
const SEAM_BAND: f64 = 90.0;

/// Where the dial sits on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl DialGeometry {
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }

    /// Whether a point falls on the dial face
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Pointer angle at `(x, y)`, see [`pointer_angle`]
    pub fn angle_at(&self, x: f32, y: f32) -> f64 {
        // pointer_angle expects screen y growing downward
        pointer_angle((x - self.cx) as f64, (self.cy - y) as f64)
    }
}

/// Angle in [0, 360) of the offset `(dx, dy)` from the dial centre
///
/// `dy` grows downward. Straight up is 0° and the angle grows toward 9 o'clock.
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    (dx.atan2(dy).to_degrees() + 180.0).rem_euclid(FULL_TURN)
}

/// Snap a sample that jumped across 12 o'clock to the extreme it came from
///
/// A drag near the top going from just past 0° to just under 360° is treated as
/// running backward into 0°, and the reverse as running forward into 360°.
pub fn correct_wraparound(last_angle: f64, target_angle: f64) -> f64 {
    if last_angle < SEAM_BAND && target_angle > FULL_TURN - SEAM_BAND {
        0.0
    } else if last_angle > FULL_TURN - SEAM_BAND && target_angle < SEAM_BAND {
        FULL_TURN
    } else {
        target_angle
    }
}

/// Pointer drag state plus the angle memory used to resolve seam crossings
#[derive(Debug, Default)]
pub struct DragHandler {
    last_angle: f64,
    dragging: bool,
}

impl DragHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_angle(&self) -> f64 {
        self.last_angle
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Mirror the remembered angle after the mode flips the dial
    pub fn mirror_last_angle(&mut self) {
        self.last_angle = on_mode_changed(self.last_angle);
    }

    /// Pointer pressed. Starts a drag when the point is on the dial.
    pub fn pointer_down<O: PlaybackObserver>(
        &mut self,
        geometry: &DialGeometry,
        x: f32,
        y: f32,
        playback: &mut Playback<O>,
        now: Instant,
    ) -> bool {
        if !geometry.contains(x, y) {
            return false;
        }
        self.dragging = true;
        playback.begin_drag(now);
        log::debug!("drag started at ({:.1}, {:.1})", x, y);
        true
    }

    /// Pointer moved. Anywhere on screen counts once a drag has started.
    pub fn pointer_moved<O: PlaybackObserver>(
        &mut self,
        geometry: &DialGeometry,
        x: f32,
        y: f32,
        playback: &mut Playback<O>,
    ) {
        if !self.dragging {
            return;
        }
        let angle = self.track(geometry.angle_at(x, y));
        let value = playback.mode().value_for_angle(angle);
        playback.update_drag(value);
    }

    /// Pointer released. Hands the dial back to the animation.
    pub fn pointer_up<O: PlaybackObserver>(&mut self, playback: &mut Playback<O>, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        playback.end_drag(now);
        log::debug!("drag released at {}", playback.progress().label());
    }

    /// Apply seam correction to a raw sample and remember the result
    pub fn track(&mut self, target_angle: f64) -> f64 {
        let angle = correct_wraparound(self.last_angle, target_angle);
        self.last_angle = angle;
        angle
    }
}
