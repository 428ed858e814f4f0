mod fixture;
mod http;

pub use fixture::FixtureDamageDetector;
pub use http::{BoxUnits, HttpDamageDetector, HttpDetectorConfig, DEFAULT_DETECTOR_ENDPOINT};
