use super::{GeoBounds, GeoPoint, Sample};

/// Ordered sequence of samples for one replay session.
///
/// Immutable once built: there is no append, insert or remove.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    samples: Vec<Sample>,
}

impl Track {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at index `i`, None outside `[0, len)`
    pub fn at(&self, i: usize) -> Option<&Sample> {
        self.samples.get(i)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Index of the final sample, 0 for an empty track
    pub fn last_index(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    /// Every sample's coordinate pair, in recording order.
    ///
    /// The drawn line is the whole path regardless of the playback cursor.
    pub fn path(&self) -> Vec<GeoPoint> {
        self.samples.iter().map(Sample::position).collect()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.samples.iter().map(Sample::position))
    }
}

impl From<Vec<Sample>> for Track {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(vec![
            Sample::new(50.3168118, -4.2199067, 100.62, 173.3),
            Sample::new(50.3168118, -4.2199066, 100.65, 173.29),
            Sample::new(50.3168119, -4.2199059, 100.78, 173.3),
        ])
    }

    #[test]
    fn test_at_out_of_range() {
        let track = track();
        assert!(track.at(2).is_some());
        assert!(track.at(3).is_none());
        assert!(Track::default().at(0).is_none());
    }

    #[test]
    fn test_path_covers_every_sample() {
        let track = track();
        let path = track.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[1], GeoPoint::new(50.3168118, -4.2199066));
    }

    #[test]
    fn test_last_index() {
        assert_eq!(track().last_index(), 2);
        assert_eq!(Track::default().last_index(), 0);
    }
}
