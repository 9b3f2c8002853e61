//! End-to-end classification scenarios against the reference catalog
use approx::assert_relative_eq;
use blast_zones::catalog::{FIREBALL, HEAVY_BLAST, MODERATE_BLAST, THERMAL_RADIATION};
use blast_zones::geo::{destination, distance_m};
use blast_zones::{classify, zone_for_distance, Catalog, Coordinate, GuidanceTable, Zone, OUTSIDE_SENTINEL};

const LITTLE_BOY: &str = "Little Boy (Hiroshima)";
const W87: &str = "W-87 (Modern US Warhead)";

fn new_york() -> Coordinate {
    Coordinate::new(40.7128, -74.0060).unwrap()
}

fn midtown() -> Coordinate {
    Coordinate::new(40.7580, -73.9855).unwrap()
}

#[test]
fn test_observer_at_ground_zero() {
    let catalog = Catalog::reference();
    let result = classify(new_york(), new_york(), catalog.get_profile(LITTLE_BOY).unwrap());
    assert_eq!(result.zone_name(), FIREBALL);
    assert_eq!(result.distance_m, 0.0);
}

#[test]
fn test_exact_ring_boundaries() {
    let catalog = Catalog::reference();
    let profile = catalog.get_profile(LITTLE_BOY).unwrap();
    assert_eq!(zone_for_distance(profile, 1600.0).name(), HEAVY_BLAST);
    assert_eq!(zone_for_distance(profile, 3200.0).name(), MODERATE_BLAST);
}

#[test]
fn test_geodesic_offsets_classify() {
    let catalog = Catalog::reference();
    let profile = catalog.get_profile(LITTLE_BOY).unwrap();

    let inside = destination(new_york(), 37.0, 1599.5);
    assert_eq!(classify(new_york(), inside, profile).zone_name(), HEAVY_BLAST);

    let far = destination(new_york(), 200.0, 5000.0);
    let result = classify(new_york(), far, profile);
    assert_eq!(result.zone, Zone::Outside);
    assert_eq!(result.zone_name(), OUTSIDE_SENTINEL);
    assert_relative_eq!(result.distance_m, 5000.0, max_relative = 1e-6);
}

#[test]
fn test_new_york_midtown() {
    let catalog = Catalog::reference();
    let d = distance_m(new_york(), midtown());
    assert!(d > 5_250.0 && d < 5_400.0, "distance {d}");

    let little_boy = classify(new_york(), midtown(), catalog.get_profile(LITTLE_BOY).unwrap());
    assert_eq!(little_boy.zone_name(), OUTSIDE_SENTINEL);

    // About 5.3 km: past every Little Boy ring, inside the W-87 thermal ring (10.5 km)
    let w87 = classify(new_york(), midtown(), catalog.get_profile(W87).unwrap());
    assert_eq!(w87.zone_name(), THERMAL_RADIATION);
}

#[test]
fn test_distance_symmetry() {
    let pairs = [
        (new_york(), midtown()),
        (Coordinate::new(34.3853, 132.4553).unwrap(), Coordinate::new(-33.8688, 151.2093).unwrap()),
        (Coordinate::new(51.5, -0.12).unwrap(), Coordinate::new(-22.9, -43.2).unwrap()),
    ];
    for (a, b) in pairs {
        assert_relative_eq!(distance_m(a, b), distance_m(b, a), max_relative = 1e-9);
    }
}

#[test]
fn test_antipodal_is_outside() {
    let catalog = Catalog::reference();
    let a = Coordinate::new(0.0, 0.0).unwrap();
    let b = Coordinate::new(0.0, 180.0).unwrap();
    for profile in catalog.profiles() {
        let result = classify(a, b, profile);
        assert!(result.distance_m.is_finite());
        assert_eq!(result.zone_name(), OUTSIDE_SENTINEL);
    }
}

#[test]
fn test_every_zone_has_guidance() {
    let catalog = Catalog::reference();
    let guidance = GuidanceTable::reference();
    for profile in catalog.profiles() {
        for ring in &profile.effects {
            guidance.get(&ring.name).unwrap();
        }
    }
    guidance.get(OUTSIDE_SENTINEL).unwrap();
}

#[test]
fn test_zones_move_outward_along_a_bearing() {
    let catalog = Catalog::reference();
    for profile in catalog.profiles() {
        let rings = profile.rings_ascending();
        let outer = rings.last().unwrap().radius_m;
        let mut last_rank = 0;
        for step in 0..=60 {
            let observer = destination(new_york(), 115.0, outer * 1.2 * step as f64 / 60.0);
            let zone = classify(new_york(), observer, profile).zone;
            let rank = match &zone {
                Zone::Ring { name, .. } => rings.iter().position(|r| &r.name == name).unwrap(),
                Zone::Outside => rings.len(),
            };
            assert!(rank >= last_rank, "{}: zone moved inward at step {step}", profile.name);
            last_rank = rank;
        }
        assert_eq!(last_rank, rings.len());
    }
}
