use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::input::TrackSource;
use crate::playback::{FrameClock, TickOutcome};
use crate::projection::frame_label;
use crate::session::ReplaySession;
use crate::store::{LoadStatus, TrackStore};

/// Stand-in for a ~60 Hz display refresh
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Replay a track without a window, logging every step.
///
/// Returns once playback reaches the final sample, the track is empty, or
/// Ctrl+C is pressed.
pub async fn run(mut session: ReplaySession, source: Arc<dyn TrackSource>) -> Result<()> {
    session.install(TrackStore::load(source.as_ref()).await);

    if let LoadStatus::Failed { error, .. } = session.store().status() {
        warn!("Nothing to replay: {}", error);
        return Ok(());
    }
    if !session.controls_enabled() {
        warn!("Nothing to replay: {} has no samples", source.describe());
        return Ok(());
    }

    info!(
        "Replaying {} samples at {}",
        session.store().len(),
        session.driver().speed().label()
    );

    let clock = FrameClock::new();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    session.driver_mut().play();
    log_frame(&session);

    while session.driver().is_playing() {
        tokio::select! {
            _ = ticker.tick() => {
                if let TickOutcome::Advanced(_) = session.pump(clock.now_ms()) {
                    log_frame(&session);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                session.shutdown();
            }
        }
    }

    info!(
        "Replay stopped at {}",
        frame_label(session.store().track(), session.driver().cursor())
    );
    Ok(())
}

fn log_frame(session: &ReplaySession) {
    let cursor = session.driver().cursor();
    let Some(sample) = session.store().at(cursor) else {
        return;
    };
    info!(
        "{} lat={:.7} lon={:.7} {}",
        frame_label(session.store().track(), cursor),
        sample.lat,
        sample.lon,
        sample.label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeoPoint, Sample, Track};
    use crate::input::{FileSource, StaticSource};
    use crate::playback::Speed;

    fn session() -> ReplaySession {
        ReplaySession::new(GeoPoint::new(0.0, 0.0), Speed::X3)
    }

    #[tokio::test]
    async fn test_runs_to_the_end() {
        let track = Track::new(vec![
            Sample::new(1.0, 1.0, 10.0, 0.0),
            Sample::new(1.1, 1.1, 11.0, 10.0),
            Sample::new(1.2, 1.2, 12.0, 20.0),
        ]);
        let source = Arc::new(StaticSource::new("three samples", track));

        // Three 3x steps take about half a second of wall time
        tokio::time::timeout(Duration::from_secs(30), run(session(), source))
            .await
            .expect("replay should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_track_returns_immediately() {
        let source = Arc::new(StaticSource::new("empty", Track::default()));
        run(session(), source).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_load_is_not_an_error() {
        let source = Arc::new(FileSource::new("/nonexistent/flight-replay/track.tlog"));
        run(session(), source).await.unwrap();
    }
}
