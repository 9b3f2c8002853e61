//! Nuclear detonation effect zones: effect catalog, geodesic zone
//! classification and safety guidance.

pub mod catalog;
pub mod classify;
pub mod error;
pub mod export;
pub mod geo;
pub mod guidance;
pub mod service;

pub use catalog::{BombProfile, Catalog, EffectRing, Rgba};
pub use classify::{classify, classify_batch, zone_for_distance, ClassificationResult, Zone, OUTSIDE_SENTINEL};
pub use error::ZoneError;
pub use geo::Coordinate;
pub use guidance::{Guidance, GuidanceTable};
