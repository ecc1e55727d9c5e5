use crate::core::{GeoPoint, Track};

/// What the view shows for one cursor position.
///
/// A pure function of `(track, cursor, fallback)`: projecting the same inputs
/// twice gives the same frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    /// Marker position and, when following, the map centre
    pub position: GeoPoint,
    /// Marker rotation in degrees, 0 when there is no current sample
    pub heading: f64,
    pub altitude: Option<f64>,
    /// Whether `position` comes from a sample rather than the fallback
    pub has_sample: bool,
    /// The full recorded path, independent of the cursor
    pub path: Vec<GeoPoint>,
}

impl FrameView {
    pub fn project(track: &Track, cursor: usize, fallback: GeoPoint) -> Self {
        let current = track.at(cursor);
        Self {
            position: current.map(|s| s.position()).unwrap_or(fallback),
            heading: current.map(|s| s.heading).unwrap_or(0.0),
            altitude: current.map(|s| s.alt),
            has_sample: current.is_some(),
            path: track.path(),
        }
    }
}

/// Position readout, e.g. `Frame: 3 / 27`
pub fn frame_label(track: &Track, cursor: usize) -> String {
    format!("Frame: {} / {}", cursor, track.last_index())
}

/// Sample readout for the slider tooltip, empty when out of range
pub fn sample_label(track: &Track, index: usize) -> String {
    track.at(index).map(|s| s.label()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sample;

    const FALLBACK: GeoPoint = GeoPoint::new(50.3168118, -4.2199067);

    fn track() -> Track {
        Track::new(vec![
            Sample::new(50.3168118, -4.2199067, 100.62, 173.3),
            Sample::new(50.3168125, -4.2199008, 101.78, 174.32),
            Sample::new(50.3168123, -4.219901, 107.22, 177.27),
        ])
    }

    #[test]
    fn test_project_current_sample() {
        let view = FrameView::project(&track(), 1, FALLBACK);
        assert_eq!(view.position, GeoPoint::new(50.3168125, -4.2199008));
        assert_eq!(view.heading, 174.32);
        assert_eq!(view.altitude, Some(101.78));
        assert!(view.has_sample);
    }

    #[test]
    fn test_path_ignores_cursor() {
        let track = track();
        let a = FrameView::project(&track, 0, FALLBACK);
        let b = FrameView::project(&track, 2, FALLBACK);
        assert_eq!(a.path, b.path);
        assert_eq!(a.path.len(), 3);
    }

    #[test]
    fn test_out_of_range_uses_fallback() {
        let view = FrameView::project(&track(), 3, FALLBACK);
        assert_eq!(view.position, FALLBACK);
        assert_eq!(view.heading, 0.0);
        assert!(view.altitude.is_none());
        assert!(!view.has_sample);
    }

    #[test]
    fn test_empty_track() {
        let view = FrameView::project(&Track::default(), 0, FALLBACK);
        assert_eq!(view.position, FALLBACK);
        assert_eq!(view.heading, 0.0);
        assert!(view.path.is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let track = track();
        for cursor in 0..5 {
            assert_eq!(
                FrameView::project(&track, cursor, FALLBACK),
                FrameView::project(&track, cursor, FALLBACK)
            );
        }
    }

    #[test]
    fn test_labels() {
        let track = track();
        assert_eq!(frame_label(&track, 1), "Frame: 1 / 2");
        assert_eq!(sample_label(&track, 2), "Alt: 107.2m, Heading: 177.3°");
        assert_eq!(sample_label(&track, 9), "");
    }
}
