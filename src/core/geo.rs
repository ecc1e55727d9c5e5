use std::f64::consts::PI;

/// Size of one map tile in pixels at every zoom level
pub const TILE_SIZE: f64 = 256.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Web Mercator world pixel coordinates at the given (fractional) zoom.
    ///
    /// https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames
    pub fn to_world_pixels(&self, zoom: f64) -> [f64; 2] {
        let n = TILE_SIZE * 2f64.powf(zoom);
        let lat_rad = self.lat.clamp(-85.051_128, 85.051_128).to_radians();
        let x = (self.lon + 180.0) / 360.0 * n;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
        [x, y]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// Axis-aligned lat/lon bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl GeoBounds {
    /// Smallest box containing every point, None if there are none
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self { min: first, max: first };
        for p in iter {
            bounds.min.lat = bounds.min.lat.min(p.lat);
            bounds.min.lon = bounds.min.lon.min(p.lon);
            bounds.max.lat = bounds.max.lat.max(p.lat);
            bounds.max.lon = bounds.max.lon.max(p.lon);
        }
        Some(bounds)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lon + self.max.lon) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_pixels_origin() {
        let p = GeoPoint::new(0.0, 0.0).to_world_pixels(0.0);
        assert!((p[0] - 128.0).abs() < 1e-9);
        assert!((p[1] - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_pixels_doubles_per_zoom() {
        let p = GeoPoint::new(50.3168118, -4.2199067);
        let a = p.to_world_pixels(14.0);
        let b = p.to_world_pixels(15.0);
        assert!((b[0] - 2.0 * a[0]).abs() < 1e-6);
        assert!((b[1] - 2.0 * a[1]).abs() < 1e-6);
    }

    #[test]
    fn test_north_is_up() {
        let south = GeoPoint::new(50.0, 0.0).to_world_pixels(10.0);
        let north = GeoPoint::new(51.0, 0.0).to_world_pixels(10.0);
        assert!(north[1] < south[1]);
    }

    #[test]
    fn test_bounds() {
        let bounds = GeoBounds::from_points(vec![
            GeoPoint::new(1.0, 5.0),
            GeoPoint::new(-2.0, 7.0),
            GeoPoint::new(0.5, 6.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, GeoPoint::new(-2.0, 5.0));
        assert_eq!(bounds.max, GeoPoint::new(1.0, 7.0));
        assert_eq!(bounds.center(), GeoPoint::new(-0.5, 6.0));
        assert!(GeoBounds::from_points(Vec::new()).is_none());
    }
}
