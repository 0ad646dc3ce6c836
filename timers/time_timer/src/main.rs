//! Time Timer
//!
//! A 60-minute dial timer: drag the knob around the face to set it, and it runs back
//! down (countdown) or up to a full dial (count-up), sounding the alarm on arrival.

mod drawing;
mod ui;

use std::io::Write;
use std::time::Instant;

use clap::Parser;
use dial_engine::settings::{KEY_ALARM_SOUND, KEY_CLOCK_TIMEZONE, KEY_THEME};
use dial_engine::{
    read_wall_clock, ClockZone, ConfigError, DialTimer, PlaybackObserver, ProgressUpdate,
    Settings, SettingsStore, TableStore, Theme, WallTime,
};
use nannou::prelude::*;
use nannou_egui::{self, Egui};

use crate::drawing::{
    draw_dial, draw_readout, draw_toasts, draw_version, draw_wall_clock, DialLayout,
    FlipAnimation, Palette, ToastMessage,
};
use crate::ui::{draw_timer_panel, PanelState, PanelView};

const APP_NAME: &str = "time_timer";
const ALARM_TOAST_SECS: f32 = 6.0;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seconds to preset on the dial at startup (0-3600)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    init: i64,
}

fn main() {
    env_logger::init();
    nannou::app(model).update(update).run();
}

/// Receives every committed dial value and alarm from the engine
#[derive(Debug)]
struct DialDisplay {
    readout: ProgressUpdate,
    alarms_pending: u32,
}

impl Default for DialDisplay {
    fn default() -> Self {
        Self {
            readout: ProgressUpdate::from_value(0.0),
            alarms_pending: 0,
        }
    }
}

impl PlaybackObserver for DialDisplay {
    fn on_progress(&mut self, update: ProgressUpdate) {
        self.readout = update;
    }

    fn on_alarm(&mut self) {
        self.alarms_pending += 1;
    }
}

/// Application state
struct Model {
    /// The dial engine
    timer: DialTimer<DialDisplay>,
    /// Persisted settings
    store: TableStore,
    theme: Theme,
    alarm_sound: String,
    clock_zone: ClockZone,
    wall_time: WallTime,
    /// Mirror animation played on mode switches
    flip: FlipAnimation,
    toasts: Vec<ToastMessage>,
    panel_state: PanelState,
    /// egui integration
    egui: Egui,
}

fn log_save_error(what: &str, result: Result<(), ConfigError>) {
    if let Err(e) = result {
        log::warn!("Failed to save {}: {}", what, e);
    }
}

fn toggle_mode(model: &mut Model) {
    let now = Instant::now();
    if let Err(e) = model.timer.toggle_mode(&mut model.store, now) {
        log::warn!("Failed to save mode: {}", e);
    }
    model
        .flip
        .retarget(model.timer.mode().display_rotation(), now);
}

fn toggle_theme(model: &mut Model) {
    model.theme = model.theme.toggled();
    log_save_error("theme", model.store.set(KEY_THEME, &model.theme));
}

fn set_alarm_sound(model: &mut Model, sound: String) {
    log::info!("alarm sound set to {}", sound);
    model.alarm_sound = sound;
    log_save_error("alarm sound", model.store.set(KEY_ALARM_SOUND, &model.alarm_sound));
}

fn set_clock_zone(model: &mut Model, zone: ClockZone) {
    model.clock_zone = zone;
    model.wall_time = read_wall_clock(zone);
    let name = zone.setting_name().unwrap_or_default();
    log_save_error("clock zone", model.store.set(KEY_CLOCK_TIMEZONE, &name));
}

fn ring_alarm(model: &mut Model) {
    log::info!("alarm: {}", model.alarm_sound);
    print!("\x07");
    if let Err(e) = std::io::stdout().flush() {
        log::debug!("Could not ring terminal bell: {}", e);
    }
    model.toasts.push(ToastMessage::new(
        format!("Time's up · {}", model.alarm_sound),
        ALARM_TOAST_SECS,
    ));
}

fn open_store() -> TableStore {
    match TableStore::open(APP_NAME) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("Settings unavailable, not persisting: {}", e);
            TableStore::in_memory()
        }
    }
}

fn model(app: &App) -> Model {
    let args = Args::parse();

    // Escape cancels drags instead of quitting
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("Time Timer")
        .size(800, 800)
        .min_size(320, 320)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let store = open_store();
    let settings = Settings::load(&store);
    let clock_zone = ClockZone::from_setting(settings.clock_timezone.as_deref());

    let now = Instant::now();
    let mut timer = DialTimer::restore(&store, DialDisplay::default(), now);
    timer.apply_initial_offset(args.init, now);

    Model {
        flip: FlipAnimation::at_rest(timer.mode().display_rotation()),
        timer,
        store,
        theme: settings.theme,
        alarm_sound: settings.alarm_sound,
        clock_zone,
        wall_time: read_wall_clock(clock_zone),
        toasts: Vec::new(),
        panel_state: PanelState::new(clock_zone),
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    model.timer.tick(Instant::now());

    let alarms = std::mem::take(&mut model.timer.observer_mut().alarms_pending);
    if alarms > 0 {
        ring_alarm(model);
    }

    model.wall_time = read_wall_clock(model.clock_zone);
    model.toasts.retain(|t| !t.is_expired());

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();
    let panel_view = PanelView {
        mode: model.timer.mode(),
        theme: model.theme,
        alarm_sound: &model.alarm_sound,
    };
    let result = draw_timer_panel(&ctx, &mut model.panel_state, &panel_view);
    drop(ctx);

    if result.toggle_mode {
        toggle_mode(model);
    }
    if result.toggle_theme {
        toggle_theme(model);
    }
    if let Some(sound) = result.alarm_sound {
        set_alarm_sound(model, sound);
    }
    if let Some(zone) = result.clock_zone {
        set_clock_zone(model, zone);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let palette = Palette::for_theme(model.theme);
    let now = Instant::now();

    draw.background().color(palette.background);

    let layout = DialLayout::calculate(window_rect);
    let readout = &model.timer.observer().readout;
    draw_dial(&draw, &layout, readout, model.flip.scale_x(now), palette);
    draw_readout(&draw, &layout, readout, palette);

    draw_wall_clock(&draw, &model.wall_time, window_rect, palette);
    draw_version(
        &draw,
        concat!("v", env!("CARGO_PKG_VERSION")),
        window_rect,
        palette,
    );
    draw_toasts(&draw, &model.toasts, window_rect, palette);

    draw.to_frame(app, &frame).unwrap();

    model.egui.draw_to_frame(&frame).unwrap();
}

/// What a key press asks the timer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hotkey {
    ToggleMode,
    ToggleTheme,
    ReleaseDrag,
}

/// Map a key to its action. Keys typed into an egui field are not hotkeys.
fn hotkey_for(key: Key, egui_wants_keyboard: bool) -> Option<Hotkey> {
    if egui_wants_keyboard {
        return None;
    }
    match key {
        Key::M => Some(Hotkey::ToggleMode),
        Key::L => Some(Hotkey::ToggleTheme),
        Key::Escape => Some(Hotkey::ReleaseDrag),
        _ => None,
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let wants_keyboard = model.egui.ctx().wants_keyboard_input();
    match hotkey_for(key, wants_keyboard) {
        Some(Hotkey::ToggleMode) => toggle_mode(model),
        Some(Hotkey::ToggleTheme) => toggle_theme(model),
        Some(Hotkey::ReleaseDrag) => {
            if model.timer.is_dragging() {
                model.timer.pointer_up(Instant::now());
            }
        }
        None => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the panel belong to egui
    if model.egui.ctx().wants_pointer_input() {
        return;
    }
    if button == MouseButton::Left {
        let pos = app.mouse.position();
        let geometry = DialLayout::calculate(app.window_rect()).geometry();
        model
            .timer
            .pointer_down(&geometry, pos.x, pos.y, Instant::now());
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.timer.pointer_up(Instant::now());
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let geometry = DialLayout::calculate(app.window_rect()).geometry();
    model.timer.pointer_moved(&geometry, pos.x, pos.y);
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle raw events for keyboard and mouse input
    model.egui.handle_raw_event(event);

    // Touch drags behave like mouse drags
    if let nannou::winit::event::WindowEvent::Touch(touch) = event {
        let window_rect = app.window_rect();
        let geometry = DialLayout::calculate(window_rect).geometry();

        // Convert touch position to nannou coordinates
        let pos_x = touch.location.x as f32 - window_rect.w() / 2.0;
        let pos_y = window_rect.h() / 2.0 - touch.location.y as f32;
        let now = Instant::now();

        match touch.phase {
            nannou::winit::event::TouchPhase::Started => {
                if !model.egui.ctx().wants_pointer_input() {
                    model.timer.pointer_down(&geometry, pos_x, pos_y, now);
                }
            }
            nannou::winit::event::TouchPhase::Moved => {
                model.timer.pointer_moved(&geometry, pos_x, pos_y);
            }
            nannou::winit::event::TouchPhase::Ended
            | nannou::winit::event::TouchPhase::Cancelled => {
                model.timer.pointer_up(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkeys_map_when_egui_is_idle() {
        assert_eq!(hotkey_for(Key::M, false), Some(Hotkey::ToggleMode));
        assert_eq!(hotkey_for(Key::L, false), Some(Hotkey::ToggleTheme));
        assert_eq!(hotkey_for(Key::Escape, false), Some(Hotkey::ReleaseDrag));
        assert_eq!(hotkey_for(Key::Q, false), None);
    }

    #[test]
    fn test_typing_in_panel_is_not_a_hotkey() {
        // "America/Managua" and "Europe/London" contain both hotkey letters
        for key in [Key::M, Key::L, Key::Escape] {
            assert_eq!(hotkey_for(key, true), None);
        }
    }
}
