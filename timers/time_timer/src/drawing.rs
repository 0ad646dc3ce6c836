//! Drawing module - dial face, sweep, readout and notifications
//!
//! Renders the timer with nannou's Draw API. Everything on the dial is laid out in
//! countdown orientation and mirrored horizontally by the flip animation.

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use dial_engine::{DialGeometry, ProgressUpdate, Theme, WallTime};
use nannou::prelude::*;

/// Time the dial takes to mirror after a mode switch
const FLIP_DURATION: Duration = Duration::from_millis(1500);

const fn rgb(red: u8, green: u8, blue: u8) -> Srgb<u8> {
    Srgb {
        red,
        green,
        blue,
        standard: PhantomData,
    }
}

/// Colours for one theme
pub struct Palette {
    pub background: Srgb<u8>,
    pub face: Srgb<u8>,
    pub sweep: Srgb<u8>,
    pub knob: Srgb<u8>,
    pub tick_major: Srgb<u8>,
    pub tick_minor: Srgb<u8>,
    pub text_primary: Srgb<u8>,
    pub text_secondary: Srgb<u8>,
    pub toast_bg: Srgb<u8>,
}

pub const DARK: Palette = Palette {
    background: rgb(26, 26, 26),
    face: rgb(44, 44, 44),
    sweep: rgb(193, 21, 53),
    knob: rgb(240, 240, 240),
    tick_major: rgb(200, 200, 200),
    tick_minor: rgb(110, 110, 110),
    text_primary: rgb(240, 240, 240),
    text_secondary: rgb(160, 160, 160),
    toast_bg: rgb(50, 50, 50),
};

pub const LIGHT: Palette = Palette {
    background: rgb(245, 245, 240),
    face: rgb(225, 225, 220),
    sweep: rgb(162, 22, 48),
    knob: rgb(40, 40, 40),
    tick_major: rgb(40, 40, 40),
    tick_minor: rgb(140, 140, 140),
    text_primary: rgb(20, 20, 20),
    text_secondary: rgb(90, 90, 90),
    toast_bg: rgb(210, 210, 205),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}

/// A toast notification message
pub struct ToastMessage {
    pub text: String,
    pub created_at: Instant,
    pub duration_secs: f32,
}

impl ToastMessage {
    pub fn new(text: String, duration_secs: f32) -> Self {
        Self {
            text,
            created_at: Instant::now(),
            duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs_f32() > self.duration_secs
    }
}

/// Mirror of the dial face about its vertical axis, eased toward a target rotation
pub struct FlipAnimation {
    from: f64,
    to: f64,
    started_at: Instant,
}

impl FlipAnimation {
    /// At rest at `rotation` degrees
    pub fn at_rest(rotation: f64) -> Self {
        Self {
            from: rotation,
            to: rotation,
            started_at: Instant::now(),
        }
    }

    /// Head for `rotation`, starting from wherever the face is now
    pub fn retarget(&mut self, rotation: f64, now: Instant) {
        self.from = self.rotation_at(now);
        self.to = rotation;
        self.started_at = now;
    }

    pub fn rotation_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f64() / FLIP_DURATION.as_secs_f64()).min(1.0);
        self.from + (self.to - self.from) * ease_out_back(t)
    }

    /// Horizontal scale that fakes the rotation in 2D
    pub fn scale_x(&self, now: Instant) -> f32 {
        self.rotation_at(now).to_radians().cos() as f32
    }
}

fn ease_out_back(t: f64) -> f64 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

/// Where the dial goes in the window
pub struct DialLayout {
    pub center: Point2,
    pub radius: f32,
}

impl DialLayout {
    pub fn calculate(window_rect: Rect) -> Self {
        let vmin = window_rect.w().min(window_rect.h());
        DialLayout {
            center: window_rect.xy(),
            radius: vmin * 0.35,
        }
    }

    pub fn geometry(&self) -> DialGeometry {
        DialGeometry::new(self.center.x, self.center.y, self.radius)
    }

    /// Point at `angle` degrees counter-clockwise from 12 o'clock, mirrored by `scale_x`
    fn point(&self, angle: f32, radius: f32, scale_x: f32) -> Point2 {
        let theta = PI / 2.0 + angle.to_radians();
        self.center + vec2(theta.cos() * radius * scale_x, theta.sin() * radius)
    }
}

/// Draw the dial face, tick marks, minute numbers, sweep and knob
pub fn draw_dial(
    draw: &Draw,
    layout: &DialLayout,
    readout: &ProgressUpdate,
    scale_x: f32,
    palette: &Palette,
) {
    let radius = layout.radius;

    draw.ellipse()
        .xy(layout.center)
        .w_h(radius * 2.0 * scale_x.abs(), radius * 2.0)
        .color(palette.face);

    // Swept sector
    let sweep = readout.value as f32 * 360.0;
    if sweep > 0.0 {
        let segments = ((sweep / 3.0).ceil() as usize).max(2);
        let points = std::iter::once(layout.center).chain((0..=segments).map(|i| {
            let angle = sweep * i as f32 / segments as f32;
            layout.point(angle, radius, scale_x)
        }));
        draw.polygon().color(palette.sweep).points(points);
    }

    // 60 minute ticks, major every 5
    for i in 0..60 {
        let angle = i as f32 * 6.0;
        let is_major = i % 5 == 0;
        let inner = if is_major { radius * 0.88 } else { radius * 0.94 };
        let (color, weight) = if is_major {
            (palette.tick_major, 2.5)
        } else {
            (palette.tick_minor, 1.0)
        };
        draw.line()
            .start(layout.point(angle, inner, scale_x))
            .end(layout.point(angle, radius, scale_x))
            .color(color)
            .weight(weight);
    }

    // Minute numbers just outside the face
    for minute in (0..60).step_by(5) {
        let pos = layout.point(minute as f32 * 6.0, radius * 1.09, scale_x);
        draw.text(&minute.to_string())
            .xy(pos)
            .color(palette.text_secondary)
            .font_size((radius * 0.07).max(10.0) as u32)
            .w(radius * 0.3);
    }

    draw_ring(draw, layout, radius, 1.5, palette.tick_minor, scale_x);

    // Knob at the leading edge of the sweep
    let knob = layout.point(sweep, radius, scale_x);
    draw.line()
        .start(layout.center)
        .end(knob)
        .color(palette.knob)
        .weight(2.0);
    draw.ellipse()
        .xy(knob)
        .radius((radius * 0.045).max(6.0))
        .color(palette.knob);
}

/// Draw the "MM:SS" readout in the middle of the dial
pub fn draw_readout(draw: &Draw, layout: &DialLayout, readout: &ProgressUpdate, palette: &Palette) {
    let hub = layout.radius * 0.32;
    draw.ellipse()
        .xy(layout.center)
        .radius(hub)
        .color(palette.background);

    draw.text(&readout.label())
        .xy(layout.center)
        .color(palette.text_primary)
        .font_size((layout.radius * 0.16).max(14.0) as u32)
        .w(hub * 2.0);
}

/// Draw the wall clock in the top-left corner
pub fn draw_wall_clock(draw: &Draw, wall_time: &WallTime, window_rect: Rect, palette: &Palette) {
    let pos = pt2(window_rect.left() + 90.0, window_rect.top() - 30.0);
    draw.text(&wall_time.format_time())
        .xy(pos)
        .color(palette.text_primary)
        .font_size(22)
        .w(160.0);
    draw.text(&wall_time.tz_abbrev)
        .xy(pos + vec2(0.0, -22.0))
        .color(palette.text_secondary)
        .font_size(12)
        .w(160.0);
}

/// Draw the version string in the bottom-right corner
pub fn draw_version(draw: &Draw, version: &str, window_rect: Rect, palette: &Palette) {
    draw.text(version)
        .xy(pt2(window_rect.right() - 70.0, window_rect.bottom() + 16.0))
        .color(palette.text_secondary)
        .font_size(11)
        .w(130.0);
}

/// Draw a ring (circle outline) using line segments
fn draw_ring(draw: &Draw, layout: &DialLayout, radius: f32, weight: f32, color: Srgb<u8>, scale_x: f32) {
    let segments = 120;
    let points: Vec<Point2> = (0..=segments)
        .map(|i| layout.point(i as f32 / segments as f32 * 360.0, radius, scale_x))
        .collect();

    draw.polyline().weight(weight).color(color).points(points);
}

/// Draw toast notifications
pub fn draw_toasts(draw: &Draw, toasts: &[ToastMessage], window_rect: Rect, palette: &Palette) {
    let toast_width = 280.0;
    let toast_height = 36.0;
    let padding = 10.0;
    let margin = 15.0;

    for (i, toast) in toasts.iter().enumerate() {
        let elapsed = toast.created_at.elapsed().as_secs_f32();
        let progress = elapsed / toast.duration_secs;

        // Fade out over the last fifth
        let alpha = if progress > 0.8 {
            ((1.0 - progress).max(0.0) / 0.2 * 255.0) as u8
        } else {
            255u8
        };

        let y_offset = (i as f32) * (toast_height + margin);
        let pos = pt2(
            window_rect.x(),
            window_rect.top() - toast_height / 2.0 - margin - y_offset,
        );

        let bg = palette.toast_bg;
        draw.rect()
            .xy(pos)
            .w_h(toast_width, toast_height)
            .color(srgba(bg.red, bg.green, bg.blue, alpha));

        let fg = palette.text_primary;
        draw.text(&toast.text)
            .xy(pos)
            .color(srgba(fg.red, fg.green, fg.blue, alpha))
            .font_size(14)
            .w(toast_width - padding * 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_back_endpoints() {
        assert!(ease_out_back(0.0).abs() < 1e-9);
        assert!((ease_out_back(1.0) - 1.0).abs() < 1e-9);
        // overshoots before settling
        assert!(ease_out_back(0.8) > 1.0);
    }

    #[test]
    fn test_flip_settles_on_target() {
        let start = Instant::now();
        let mut flip = FlipAnimation::at_rest(0.0);
        flip.retarget(180.0, start);
        assert!((flip.rotation_at(start + FLIP_DURATION) - 180.0).abs() < 1e-9);
        assert!((flip.scale_x(start + FLIP_DURATION) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_layout_point_mirrors() {
        let layout = DialLayout::calculate(Rect::from_w_h(800.0, 600.0));
        assert!((layout.radius - 210.0).abs() < 1e-3);
        // a quarter turn counter-clockwise lands at 9 o'clock, mirrored at 3 o'clock
        let left = layout.point(90.0, 100.0, 1.0);
        let right = layout.point(90.0, 100.0, -1.0);
        assert!((left.x + 100.0).abs() < 1e-3);
        assert!((right.x - 100.0).abs() < 1e-3);
    }
}
