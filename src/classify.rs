use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::BombProfile;
use crate::geo::{self, Coordinate};

/// Zone name reported when the observer is beyond every ring
pub const OUTSIDE_SENTINEL: &str = "Outside all immediate impact radii";

/// Which ring an observer falls into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Zone {
    Ring { name: String, radius_m: f64 },
    Outside,
}

impl Zone {
    pub fn name(&self) -> &str {
        match self {
            Zone::Ring { name, .. } => name,
            Zone::Outside => OUTSIDE_SENTINEL,
        }
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, Zone::Outside)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub zone: Zone,
    pub distance_m: f64,
}

impl ClassificationResult {
    pub fn zone_name(&self) -> &str {
        self.zone.name()
    }
}

/// Innermost ring whose radius reaches `distance_m`. The boundary is
/// inclusive: a distance equal to a ring's radius lands in that ring.
pub fn zone_for_distance(profile: &BombProfile, distance_m: f64) -> Zone {
    profile
        .rings_ascending()
        .into_iter()
        .find(|ring| distance_m <= ring.radius_m)
        .map(|ring| Zone::Ring {
            name: ring.name.clone(),
            radius_m: ring.radius_m,
        })
        .unwrap_or(Zone::Outside)
}

/// Classify an observer relative to a detonation point
pub fn classify(detonation: Coordinate, observer: Coordinate, profile: &BombProfile) -> ClassificationResult {
    let distance_m = geo::distance_m(detonation, observer);
    let zone = zone_for_distance(profile, distance_m);
    tracing::debug!(
        bomb = %profile.name,
        distance_m,
        zone = zone.name(),
        "classified observer"
    );
    ClassificationResult { zone, distance_m }
}

/// Classify many observers in parallel; output order matches input order
pub fn classify_batch(
    detonation: Coordinate,
    observers: &[Coordinate],
    profile: &BombProfile,
) -> Vec<ClassificationResult> {
    observers
        .par_iter()
        .map(|&observer| classify(detonation, observer, profile))
        .collect()
}
