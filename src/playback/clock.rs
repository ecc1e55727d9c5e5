use std::time::Instant;

/// Host timestamps for frame callbacks, in milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn now_ms(&self) -> f64 {
        self.at_ms(Instant::now())
    }

    pub fn at_ms(&self, instant: Instant) -> f64 {
        instant.saturating_duration_since(self.origin).as_secs_f64() * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_at_ms() {
        let clock = FrameClock::new();
        let later = clock.origin + Duration::from_millis(250);
        assert!((clock.at_ms(later) - 250.0).abs() < 1e-6);
        assert!(clock.now_ms() >= 0.0);
        assert_eq!(clock.at_ms(clock.origin), 0.0);
    }
}
