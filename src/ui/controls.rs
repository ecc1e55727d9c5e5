use imgui::{Condition, Ui};

use crate::playback::Speed;
use crate::projection::{frame_label, sample_label};
use crate::session::ReplaySession;
use crate::store::LoadStatus;

/// What the user asked for in the playback panel this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    None,
    Restart,
    TogglePlay,
    SetSpeed(Speed),
    Seek(i64),
}

/// Restart, play/pause, speed picker and the frame slider
pub struct PlaybackControls {
    /// Slider value, re-synced from the cursor every frame
    scrub: i32,
}

impl PlaybackControls {
    pub fn new() -> Self {
        Self { scrub: 0 }
    }

    pub fn render(&mut self, ui: &Ui, session: &ReplaySession, status: &str, is_open: &mut bool) -> ControlAction {
        let mut action = ControlAction::None;

        ui.window("Playback")
            .size([900.0, 130.0], Condition::FirstUseEver)
            .position([10.0, 600.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                action = self.render_content(ui, session);
                ui.separator();
                ui.text_colored([0.7, 0.7, 0.7, 1.0], status);
            });

        action
    }

    fn render_content(&mut self, ui: &Ui, session: &ReplaySession) -> ControlAction {
        let mut action = ControlAction::None;
        let driver = session.driver();
        let track = session.store().track();

        ui.disabled(!session.controls_enabled(), || {
            if ui.button("Restart") {
                action = ControlAction::Restart;
            }
            ui.same_line();
            let play_label = if driver.is_playing() { "Pause" } else { "Play" };
            if ui.button(play_label) {
                action = ControlAction::TogglePlay;
            }
        });

        // Speed can be picked before a track arrives
        ui.same_line();
        ui.set_next_item_width(70.0);
        let labels: Vec<&str> = Speed::ALL.iter().map(|s| s.label()).collect();
        let mut speed_index = driver.speed().index();
        if ui.combo_simple_string("Speed", &mut speed_index, &labels[..]) {
            if let Some(&speed) = Speed::ALL.get(speed_index) {
                action = ControlAction::SetSpeed(speed);
            }
        }

        ui.same_line();
        ui.text(frame_label(track, driver.cursor()));

        ui.disabled(!session.controls_enabled(), || {
            let last = track.last_index() as i32;
            self.scrub = driver.cursor() as i32;
            ui.set_next_item_width(-1.0);
            if ui.slider_config("##frame", 0, last).build(&mut self.scrub) {
                action = ControlAction::Seek(self.scrub as i64);
            }
            if ui.is_item_hovered() {
                let label = sample_label(track, self.scrub.max(0) as usize);
                if !label.is_empty() {
                    ui.tooltip_text(label);
                }
            }
        });

        action
    }
}

impl Default for PlaybackControls {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a panel or shortcut action to the session
pub fn apply(session: &mut ReplaySession, action: ControlAction) {
    let driver = session.driver_mut();
    match action {
        ControlAction::None => {}
        ControlAction::Restart => driver.restart(),
        ControlAction::TogglePlay => driver.toggle(),
        ControlAction::SetSpeed(speed) => driver.set_speed(speed),
        ControlAction::Seek(target) => driver.seek(target),
    }
}

/// One-line description of the track for the status bar
pub fn status_text(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Idle => "No track loaded".to_string(),
        LoadStatus::Loading => "Loading track...".to_string(),
        LoadStatus::Loaded { source, samples } => format!("{} samples from {}", samples, source),
        LoadStatus::Failed { source, error } => format!("Could not load {}: {}", source, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoPoint;
    use crate::input::bundled_sample;
    use crate::store::TrackStore;

    fn session() -> ReplaySession {
        let mut session = ReplaySession::new(GeoPoint::new(0.0, 0.0), Speed::X1);
        session.install(TrackStore::from_result("bundled sample", bundled_sample()));
        session
    }

    #[test]
    fn test_apply_actions() {
        let mut session = session();

        apply(&mut session, ControlAction::Seek(10));
        assert_eq!(session.driver().cursor(), 10);

        apply(&mut session, ControlAction::TogglePlay);
        assert!(session.driver().is_playing());

        apply(&mut session, ControlAction::SetSpeed(Speed::X3));
        assert_eq!(session.driver().speed(), Speed::X3);

        apply(&mut session, ControlAction::Restart);
        assert_eq!(session.driver().cursor(), 0);
        assert!(!session.driver().is_playing());

        apply(&mut session, ControlAction::None);
        assert_eq!(session.driver().cursor(), 0);
    }

    #[test]
    fn test_seek_past_end_clamps() {
        let mut session = session();
        apply(&mut session, ControlAction::Seek(500));
        assert_eq!(session.driver().cursor(), 27);
        apply(&mut session, ControlAction::Seek(-3));
        assert_eq!(session.driver().cursor(), 0);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(&LoadStatus::Idle), "No track loaded");
        let loaded = LoadStatus::Loaded {
            source: "track.tlog".to_string(),
            samples: 28,
        };
        assert_eq!(status_text(&loaded), "28 samples from track.tlog");
        let failed = LoadStatus::Failed {
            source: "http://localhost:8000/flight-data/".to_string(),
            error: "connection refused".to_string(),
        };
        assert!(status_text(&failed).starts_with("Could not load"));
    }
}
