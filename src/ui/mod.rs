pub mod controls;
pub mod dialogs;
pub mod map_view;
pub mod shortcuts;

pub use controls::PlaybackControls;
pub use dialogs::FileDialogs;
pub use map_view::MapView;
pub use shortcuts::{ShortcutAction, ShortcutManager};
