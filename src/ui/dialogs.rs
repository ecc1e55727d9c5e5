use rfd::FileDialog;
use std::path::PathBuf;

/// Track formats offered by the open dialog
pub const TRACK_FILE_FILTERS: &[(&str, &[&str])] = &[
    ("Flight Tracks", &["json", "tlog", "csv"]),
    ("MAVLink Telemetry Logs", &["tlog"]),
    ("JSON Tracks", &["json"]),
    ("CSV Tracks", &["csv"]),
    ("All Files", &["*"]),
];

/// File dialog helper
pub struct FileDialogs;

impl FileDialogs {
    /// Open a file dialog for selecting a recorded track
    pub fn open_track_file() -> Option<PathBuf> {
        TRACK_FILE_FILTERS
            .iter()
            .fold(FileDialog::new(), |dialog, (name, extensions)| {
                dialog.add_filter(*name, *extensions)
            })
            .set_title("Open Flight Track")
            .pick_file()
    }
}
