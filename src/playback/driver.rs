use crate::playback::{FrameToken, PlaybackState, Speed, TickOutcome};
use tracing::{debug, trace};

/// Advances a cursor through a track over wall-clock time.
///
/// The host owns the display refresh. Each refresh it asks for
/// [`pending_frame`](Self::pending_frame) and, if there is one, delivers it
/// through [`on_frame`](Self::on_frame) with its current timestamp. At most one
/// frame request is outstanding at a time; pausing, restarting or shutting
/// down drops it, and a dropped token delivered later is ignored.
pub struct PlaybackDriver {
    state: PlaybackState,
    track_len: usize,
    pending: Option<FrameToken>,
    next_token: u64,
}

impl PlaybackDriver {
    pub fn new(track_len: usize) -> Self {
        Self {
            state: PlaybackState::default(),
            track_len,
            pending: None,
            next_token: 0,
        }
    }

    /// Arm the driver for a freshly loaded track
    pub fn load(&mut self, track_len: usize) {
        let speed = self.state.speed;
        self.cancel();
        self.state = PlaybackState {
            speed,
            ..PlaybackState::default()
        };
        self.track_len = track_len;
        debug!("Playback armed for {} samples", track_len);
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Get current playback position (index into the track)
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn speed(&self) -> Speed {
        self.state.speed
    }

    pub fn track_len(&self) -> usize {
        self.track_len
    }

    /// Start/resume playback.
    ///
    /// No-op on an empty track or when already playing, so the frame loop is
    /// never armed twice.
    pub fn play(&mut self) {
        if self.track_len == 0 {
            debug!("Ignoring play on an empty track");
            return;
        }
        if self.state.playing {
            return;
        }

        self.state.playing = true;
        self.state.last_tick = None;
        self.arm();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.state.playing = false;
        self.state.last_tick = None;
        self.cancel();
    }

    /// Play/pause button
    pub fn toggle(&mut self) {
        if self.state.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Back to the first sample, paused
    pub fn restart(&mut self) {
        self.state.cursor = 0;
        self.state.playing = false;
        self.state.last_tick = None;
        self.cancel();
    }

    /// Jump to a sample, clamped to the track. Leaves `playing` untouched.
    pub fn seek(&mut self, target: i64) {
        let last = self.track_len.saturating_sub(1) as i64;
        self.state.cursor = target.clamp(0, last) as usize;
    }

    pub fn step_forward(&mut self) {
        self.seek(self.state.cursor as i64 + 1);
    }

    pub fn step_back(&mut self) {
        self.seek(self.state.cursor as i64 - 1);
    }

    /// Takes effect on the next tick; the cursor and timing anchor are kept
    pub fn set_speed(&mut self, speed: Speed) {
        self.state.speed = speed;
    }

    /// The frame callback the host should deliver on its next refresh
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Deliver a frame callback at host time `now_ms`
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64) -> TickOutcome {
        if self.pending != Some(token) {
            trace!("Dropping stale frame callback {:?}", token);
            return TickOutcome::Ignored;
        }
        self.pending = None;

        if !self.state.playing {
            return TickOutcome::Ignored;
        }

        let outcome = self.advance(now_ms);

        if self.state.playing {
            self.arm();
        }

        outcome
    }

    /// Tear down: cancel any outstanding frame and stop
    pub fn shutdown(&mut self) {
        self.state.playing = false;
        self.state.last_tick = None;
        self.cancel();
    }

    fn advance(&mut self, now_ms: f64) -> TickOutcome {
        // The first tick after a transition only sets the anchor, so time spent
        // paused never turns into one huge delta
        let Some(anchor) = self.state.last_tick else {
            self.state.last_tick = Some(now_ms);
            return TickOutcome::Anchored;
        };

        let elapsed = now_ms - anchor;
        trace!(elapsed, "frame tick");

        if elapsed <= self.state.speed.step_interval_ms() {
            return TickOutcome::Waiting;
        }

        self.state.last_tick = Some(now_ms);

        let last = self.track_len.saturating_sub(1);
        if self.state.cursor >= last {
            self.state.cursor = last;
            self.state.playing = false;
            self.state.last_tick = None;
            debug!("Playback reached the final sample ({})", last);
            return TickOutcome::Finished;
        }

        self.state.cursor += 1;
        TickOutcome::Advanced(self.state.cursor)
    }

    fn arm(&mut self) {
        self.next_token += 1;
        self.pending = Some(FrameToken(self.next_token));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
