//! UI module - egui timer panel
//!
//! Mode and theme toggles, the alarm sound picker and the wall clock zone entry.

use dial_engine::{ClockZone, Mode, Theme};
use nannou_egui::egui;

/// Alarm sounds offered in the picker
pub const ALARM_SOUNDS: [&str; 3] = ["digital", "bell", "chime"];

/// State kept by the panel between frames
#[derive(Default)]
pub struct PanelState {
    /// Text in the zone field
    pub zone_input: String,
    /// Last zone parse failure
    pub zone_error: Option<String>,
}

impl PanelState {
    pub fn new(zone: ClockZone) -> Self {
        Self {
            zone_input: zone.setting_name().unwrap_or_default().to_string(),
            zone_error: None,
        }
    }
}

/// Result of UI interactions
#[derive(Default)]
pub struct UiResult {
    pub toggle_mode: bool,
    pub toggle_theme: bool,
    /// If Some, the user picked another alarm sound
    pub alarm_sound: Option<String>,
    /// If Some, the user applied a new wall clock zone
    pub clock_zone: Option<ClockZone>,
}

/// Current values shown by the panel
pub struct PanelView<'a> {
    pub mode: Mode,
    pub theme: Theme,
    pub alarm_sound: &'a str,
}

/// Draw the timer panel
pub fn draw_timer_panel(ctx: &egui::Context, state: &mut PanelState, view: &PanelView) -> UiResult {
    let mut result = UiResult::default();

    egui::Window::new("Timer")
        .collapsible(true)
        .resizable(false)
        .default_width(220.0)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Direction:");
                if ui
                    .button(view.mode.to_string())
                    .on_hover_text("Switch direction (M)")
                    .clicked()
                {
                    result.toggle_mode = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label("Theme:");
                let label = match view.theme {
                    Theme::Dark => "Dark",
                    Theme::Light => "Light",
                };
                if ui.button(label).on_hover_text("Switch theme (L)").clicked() {
                    result.toggle_theme = true;
                }
            });

            egui::ComboBox::from_label("Alarm")
                .selected_text(view.alarm_sound)
                .show_ui(ui, |ui| {
                    for sound in ALARM_SOUNDS {
                        if ui
                            .selectable_label(sound == view.alarm_sound, sound)
                            .clicked()
                            && sound != view.alarm_sound
                        {
                            result.alarm_sound = Some(sound.to_string());
                        }
                    }
                });

            ui.separator();

            ui.label("Clock zone (blank for local):");
            let response = ui.text_edit_singleline(&mut state.zone_input);
            let submitted =
                response.lost_focus() && ctx.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Apply").clicked() || submitted {
                match ClockZone::parse(&state.zone_input) {
                    Ok(zone) => {
                        state.zone_error = None;
                        result.clock_zone = Some(zone);
                    }
                    Err(e) => state.zone_error = Some(e),
                }
            }
            if let Some(ref error) = state.zone_error {
                ui.colored_label(egui::Color32::from_rgb(255, 180, 0), error);
            }
        });

    result
}
