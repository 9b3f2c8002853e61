//! Whole-globe properties of the classifier and thread-safety of the core types
use blast_zones::geo::{distance_m, MEAN_RADIUS_M};
use blast_zones::{classify, BombProfile, Catalog, ClassificationResult, Coordinate, GuidanceTable, OUTSIDE_SENTINEL};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_core_types_are_send_sync() {
    assert_send_sync::<Catalog>();
    assert_send_sync::<GuidanceTable>();
    assert_send_sync::<BombProfile>();
    assert_send_sync::<ClassificationResult>();
    assert_send_sync::<Coordinate>();
}

/// Grid including both poles, the antimeridian and their neighbours
fn grid() -> Vec<Coordinate> {
    let lats = [-90.0, -89.9999, -60.0, -0.5, 0.0, 0.5, 45.0, 89.9999, 90.0];
    let lons = [-180.0, -179.9999, -90.0, 0.0, 0.0001, 90.0, 179.9999, 180.0];
    lats.iter()
        .flat_map(|&lat| lons.iter().map(move |&lon| Coordinate::new(lat, lon).unwrap()))
        .collect()
}

/// The point opposite `c`, nudged so Vincenty has trouble converging
fn near_antipode(c: Coordinate, nudge: f64) -> Coordinate {
    let lon = c.lon() + 180.0;
    let lon = if lon > 180.0 { lon - 360.0 } else { lon };
    let lat = (-c.lat() + nudge).clamp(-90.0, 90.0);
    Coordinate::new(lat, lon).unwrap()
}

#[test]
fn test_classify_is_total_over_the_globe() {
    let catalog = Catalog::reference();
    let guidance = GuidanceTable::reference();
    let points = grid();

    let mut pairs: Vec<(Coordinate, Coordinate)> = Vec::new();
    for &a in &points {
        for &b in &points {
            pairs.push((a, b));
        }
        for nudge in [0.0, 1e-7, 0.3, -0.3] {
            pairs.push((a, near_antipode(a, nudge)));
        }
    }

    for profile in catalog.profiles() {
        for &(a, b) in &pairs {
            let result = classify(a, b, profile);
            assert!(
                result.distance_m.is_finite() && result.distance_m >= 0.0,
                "{a} -> {b}: {}",
                result.distance_m
            );
            let zone = result.zone_name();
            assert!(
                zone == OUTSIDE_SENTINEL || profile.ring(zone).is_some(),
                "{a} -> {b}: unexpected zone {zone}"
            );
            assert!(guidance.get(zone).is_ok());
        }
    }
}

#[test]
fn test_distance_never_exceeds_half_circumference() {
    // Ellipsoidal geodesics top out near 20 004 km, the spherical fallback at pi * R
    let limit = std::f64::consts::PI * MEAN_RADIUS_M + 1.0;
    let points = grid();
    for &a in &points {
        for &b in &points {
            let d = distance_m(a, b);
            assert!(d <= limit, "{a} -> {b}: {d}");
        }
    }
}
