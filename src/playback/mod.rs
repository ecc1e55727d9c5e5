pub mod clock;
pub mod driver;

pub use clock::FrameClock;
pub use driver::PlaybackDriver;

/// User-selectable playback speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Speed {
    #[default]
    X1,
    X2,
    X3,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::X1, Speed::X2, Speed::X3];

    pub fn multiplier(self) -> u8 {
        match self {
            Speed::X1 => 1,
            Speed::X2 => 2,
            Speed::X3 => 3,
        }
    }

    /// Milliseconds that must elapse before the cursor steps once more.
    ///
    /// 500 ms at 1x, 250 ms at 2x, 166.7 ms at 3x.
    pub fn step_interval_ms(self) -> f64 {
        1000.0 / (self.multiplier() as f64 * 2.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Speed::X1 => "1x",
            Speed::X2 => "2x",
            Speed::X3 => "3x",
        }
    }

    /// Position in `Speed::ALL`
    pub fn index(self) -> usize {
        self.multiplier() as usize - 1
    }
}

impl TryFrom<u8> for Speed {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Speed::X1),
            2 => Ok(Speed::X2),
            3 => Ok(Speed::X3),
            other => Err(other),
        }
    }
}

/// Playback state owned by one driver
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Index of the currently displayed sample
    pub cursor: usize,
    pub playing: bool,
    pub speed: Speed,
    /// Timestamp (ms) of the last accepted tick, unset after every transition
    pub last_tick: Option<f64>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            cursor: 0,
            playing: false,
            speed: Speed::X1,
            last_tick: None,
        }
    }
}

/// Handle for one requested frame callback.
///
/// Only the most recently issued token is honoured; anything older was
/// cancelled and is ignored when delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

/// What a delivered frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or cancelled callback, nothing changed
    Ignored,
    /// First tick after a transition: timing anchor set, no advance
    Anchored,
    /// Threshold not yet crossed
    Waiting,
    /// Cursor moved to this index
    Advanced(usize),
    /// Already at the final sample, playback stopped
    Finished,
}
