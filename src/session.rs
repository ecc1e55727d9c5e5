use crate::core::GeoPoint;
use crate::playback::{PlaybackDriver, Speed, TickOutcome};
use crate::projection::FrameView;
use crate::store::TrackStore;

/// One replay session: the loaded track and the driver walking through it
pub struct ReplaySession {
    store: TrackStore,
    driver: PlaybackDriver,
    /// Map centre used when there is no current sample
    fallback: GeoPoint,
    default_center: GeoPoint,
}

impl ReplaySession {
    pub fn new(default_center: GeoPoint, speed: Speed) -> Self {
        let mut driver = PlaybackDriver::new(0);
        driver.set_speed(speed);
        Self {
            store: TrackStore::new(),
            driver,
            fallback: default_center,
            default_center,
        }
    }

    /// Replace the track and re-arm the driver for its length
    pub fn install(&mut self, store: TrackStore) {
        self.driver.load(store.len());
        self.fallback = store
            .track()
            .first()
            .map(|s| s.position())
            .unwrap_or(self.default_center);
        self.store = store;
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TrackStore {
        &mut self.store
    }

    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut PlaybackDriver {
        &mut self.driver
    }

    /// Slider and play button only make sense with samples to show
    pub fn controls_enabled(&self) -> bool {
        !self.store.is_empty()
    }

    /// Deliver the pending frame callback, if any, at host time `now_ms`
    pub fn pump(&mut self, now_ms: f64) -> TickOutcome {
        match self.driver.pending_frame() {
            Some(token) => self.driver.on_frame(token, now_ms),
            None => TickOutcome::Ignored,
        }
    }

    /// The view for the current cursor
    pub fn frame(&self) -> FrameView {
        FrameView::project(self.store.track(), self.driver.cursor(), self.fallback)
    }

    /// Where the map starts before following the marker
    pub fn home(&self) -> GeoPoint {
        self.fallback
    }

    pub fn shutdown(&mut self) {
        self.driver.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{bundled_sample, TrackError};

    const DEFAULT_CENTER: GeoPoint = GeoPoint::new(50.3168118, -4.2199067);

    fn loaded() -> ReplaySession {
        let mut session = ReplaySession::new(DEFAULT_CENTER, Speed::X1);
        session.install(TrackStore::from_result("bundled sample", bundled_sample()));
        session
    }

    #[test]
    fn test_install_arms_driver() {
        let session = loaded();
        assert_eq!(session.driver().track_len(), 28);
        assert!(session.controls_enabled());
        assert_eq!(session.home(), session.store().at(0).unwrap().position());
    }

    #[test]
    fn test_bundled_sample_replay() {
        let mut session = loaded();
        session.driver_mut().play();

        // 60 Hz frames until playback stops on its own
        let mut t = 0.0;
        while session.driver().is_playing() {
            session.pump(t);
            t += 1000.0 / 60.0;
            assert!(t < 60_000.0, "playback never finished");
        }

        assert_eq!(session.driver().cursor(), 27);
        let frame = session.frame();
        assert_eq!(frame.position, session.store().at(27).unwrap().position());
        assert_eq!(frame.heading, 177.27);
    }

    #[test]
    fn test_one_step_after_half_a_second() {
        let mut session = loaded();
        session.driver_mut().play();
        session.pump(0.0);
        session.pump(250.0);
        assert_eq!(session.driver().cursor(), 0);
        session.pump(520.0);
        assert_eq!(session.driver().cursor(), 1);
    }

    #[test]
    fn test_failed_load_keeps_controls_safe() {
        let mut session = ReplaySession::new(DEFAULT_CENTER, Speed::X2);
        session.install(TrackStore::from_result("broken", Err(TrackError::UnknownFormat)));

        assert!(!session.controls_enabled());
        session.driver_mut().play();
        assert_eq!(session.pump(0.0), TickOutcome::Ignored);
        assert_eq!(session.driver().cursor(), 0);
        assert!(!session.driver().is_playing());

        let frame = session.frame();
        assert_eq!(frame.position, DEFAULT_CENTER);
        assert_eq!(frame.heading, 0.0);
    }

    #[test]
    fn test_reinstall_keeps_speed() {
        let mut session = ReplaySession::new(DEFAULT_CENTER, Speed::X3);
        session.install(TrackStore::from_result("bundled sample", bundled_sample()));
        assert_eq!(session.driver().speed(), Speed::X3);
    }

    #[test]
    fn test_shutdown_cancels_pending_frame() {
        let mut session = loaded();
        session.driver_mut().play();
        session.shutdown();
        assert_eq!(session.pump(10_000.0), TickOutcome::Ignored);
        assert!(session.driver().pending_frame().is_none());
    }
}
