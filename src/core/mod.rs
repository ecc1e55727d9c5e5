pub mod geo;
pub mod sample;
pub mod track;

pub use geo::{GeoBounds, GeoPoint};
pub use sample::Sample;
pub use track::Track;
