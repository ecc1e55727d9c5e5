use imgui::{Condition, Ui};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::playback::Speed;

/// Keyboard shortcut manager
pub struct ShortcutManager {
    shortcuts: Vec<Shortcut>,
}

#[derive(Clone)]
pub struct Shortcut {
    pub key: PhysicalKey,
    pub ctrl: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    OpenFile,
    Reload,
    TogglePlay,
    Restart,
    StepForward,
    StepBack,
    SetSpeed(Speed),
    ToggleHelp,
    Quit,
}

impl ShortcutAction {
    fn category(self) -> &'static str {
        match self {
            ShortcutAction::OpenFile | ShortcutAction::Reload => "Track",
            ShortcutAction::TogglePlay
            | ShortcutAction::Restart
            | ShortcutAction::StepForward
            | ShortcutAction::StepBack
            | ShortcutAction::SetSpeed(_) => "Playback",
            ShortcutAction::ToggleHelp | ShortcutAction::Quit => "General",
        }
    }
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut manager = Self { shortcuts: Vec::new() };
        manager.register_defaults();
        manager
    }

    fn register_defaults(&mut self) {
        self.register(KeyCode::KeyO, true, ShortcutAction::OpenFile, "Open track file");
        self.register(KeyCode::KeyR, true, ShortcutAction::Reload, "Reload source");

        self.register(KeyCode::Space, false, ShortcutAction::TogglePlay, "Play/Pause");
        self.register(KeyCode::Home, false, ShortcutAction::Restart, "Restart");
        self.register(KeyCode::ArrowRight, false, ShortcutAction::StepForward, "Next sample");
        self.register(KeyCode::ArrowLeft, false, ShortcutAction::StepBack, "Previous sample");
        self.register(KeyCode::Digit1, false, ShortcutAction::SetSpeed(Speed::X1), "Speed 1x");
        self.register(KeyCode::Digit2, false, ShortcutAction::SetSpeed(Speed::X2), "Speed 2x");
        self.register(KeyCode::Digit3, false, ShortcutAction::SetSpeed(Speed::X3), "Speed 3x");

        self.register(KeyCode::F1, false, ShortcutAction::ToggleHelp, "Shortcut help");
        self.register(KeyCode::KeyQ, true, ShortcutAction::Quit, "Quit");
    }

    fn register(&mut self, code: KeyCode, ctrl: bool, action: ShortcutAction, description: &'static str) {
        self.shortcuts.push(Shortcut {
            key: PhysicalKey::Code(code),
            ctrl,
            action,
            description,
        });
    }

    /// Process a key event and return the matching action (if any)
    pub fn process_event(&self, event: &KeyEvent, ctrl: bool) -> Option<ShortcutAction> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        self.lookup(event.physical_key, ctrl)
    }

    pub fn lookup(&self, key: PhysicalKey, ctrl: bool) -> Option<ShortcutAction> {
        self.shortcuts
            .iter()
            .find(|s| s.key == key && s.ctrl == ctrl)
            .map(|s| s.action)
    }

    /// Render a shortcuts help window
    pub fn render_help(&self, ui: &Ui, is_open: &mut bool) {
        ui.window("Keyboard Shortcuts")
            .size([320.0, 320.0], Condition::FirstUseEver)
            .position([500.0, 200.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                let mut current_category = "";

                for shortcut in &self.shortcuts {
                    let category = shortcut.action.category();
                    if category != current_category {
                        if !current_category.is_empty() {
                            ui.separator();
                        }
                        ui.text(category);
                        current_category = category;
                    }

                    let mut keys = String::new();
                    if shortcut.ctrl {
                        keys.push_str("Ctrl+");
                    }
                    keys.push_str(&key_to_string(shortcut.key));

                    ui.text(format!("  {:12} - {}", keys, shortcut.description));
                }
            });
    }
}

fn key_to_string(key: PhysicalKey) -> String {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::Space => "Space".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::ArrowLeft => "←".to_string(),
            KeyCode::ArrowRight => "→".to_string(),
            KeyCode::Digit1 => "1".to_string(),
            KeyCode::Digit2 => "2".to_string(),
            KeyCode::Digit3 => "3".to_string(),
            KeyCode::KeyO => "O".to_string(),
            KeyCode::KeyQ => "Q".to_string(),
            KeyCode::KeyR => "R".to_string(),
            _ => format!("{:?}", code),
        },
        _ => "?".to_string(),
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}
