//! GeoJSON export of effect rings and markers for external map widgets.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use rayon::prelude::*;

use crate::catalog::BombProfile;
use crate::geo::{ring_outline, Coordinate};

pub const GROUND_ZERO: &str = "Ground Zero";
pub const YOUR_LOCATION: &str = "Your Location";

/// Positions are `[lon, lat]` as GeoJSON requires
fn position(c: &Coordinate) -> Vec<f64> {
    vec![c.lon(), c.lat()]
}

/// Wrap a longitude difference into [-180, 180)
#[inline(always)]
fn wrap_delta(d: f64) -> f64 {
    (d + 180.0).rem_euclid(360.0) - 180.0
}

/// Keep the part of an open ring on one side of the meridian `x = edge`
/// (Sutherland-Hodgman against a single half-plane)
fn clip_half(points: &[(f64, f64)], edge: f64, keep_east: bool) -> Vec<(f64, f64)> {
    let inside = |p: (f64, f64)| if keep_east { p.0 >= edge } else { p.0 <= edge };
    let crossing = |a: (f64, f64), b: (f64, f64)| {
        let t = (edge - a.0) / (b.0 - a.0);
        (edge, a.1 + t * (b.1 - a.1))
    };
    let mut out = Vec::with_capacity(points.len() + 2);
    for (i, &cur) in points.iter().enumerate() {
        let prev = points[(i + points.len() - 1) % points.len()];
        match (inside(prev), inside(cur)) {
            (true, true) => out.push(cur),
            (false, true) => {
                out.push(crossing(prev, cur));
                out.push(cur);
            }
            (true, false) => out.push(crossing(prev, cur)),
            (false, false) => {}
        }
    }
    out
}

/// Exterior ring(s) for a geodesic outline: counter-clockwise, and split
/// into one ring per side where the outline crosses the antimeridian.
/// Outlines that enclose a pole cannot be split this way and are returned whole.
fn exterior_rings(outline: &[Coordinate]) -> Vec<Vec<Vec<f64>>> {
    // Outlines run clockwise (bearing increasing from north)
    let ccw: Vec<&Coordinate> = outline.iter().rev().collect();
    let Some(first) = ccw.first() else {
        return Vec::new();
    };

    // Unwrap longitudes so the ring is continuous
    let mut unwrapped: Vec<(f64, f64)> = Vec::with_capacity(ccw.len());
    let mut lon = first.lon();
    let mut prev = first.lon();
    for c in &ccw {
        lon += wrap_delta(c.lon() - prev);
        prev = c.lon();
        unwrapped.push((lon, c.lat()));
    }

    let encloses_pole = unwrapped
        .last()
        .is_some_and(|last| (last.0 - unwrapped[0].0).abs() > 180.0);
    let crosses = unwrapped.iter().any(|p| p.0.abs() > 180.0);
    if encloses_pole || !crosses {
        return vec![ccw.iter().map(|c| position(c)).collect()];
    }

    // Drop the closing point, clip each 360-wide band, shift it home and close it
    let open = &unwrapped[..unwrapped.len() - 1];
    [(-540.0, -180.0, 360.0), (-180.0, 180.0, 0.0), (180.0, 540.0, -360.0)]
        .into_iter()
        .filter_map(|(lo, hi, shift)| {
            let part = clip_half(&clip_half(open, lo, true), hi, false);
            (part.len() >= 3).then(|| {
                let mut ring: Vec<Vec<f64>> = part.iter().map(|&(x, y)| vec![x + shift, y]).collect();
                ring.push(ring[0].clone());
                ring
            })
        })
        .collect()
}

fn point_feature(c: &Coordinate, name: &str) -> Feature {
    let mut feature = Feature::from(Geometry::new(Value::Point(position(c))));
    feature.set_property("name", name);
    feature
}

/// Rings as polygons, outermost first, followed by the marker points
pub fn rings_geojson(
    profile: &BombProfile,
    detonation: Coordinate,
    observer: Option<Coordinate>,
    segments: usize,
) -> GeoJson {
    let rings = profile.legend_order();
    let mut features: Vec<Feature> = rings
        .par_iter()
        .map(|ring| {
            let outline = ring_outline(detonation, ring.radius_m, segments);
            let mut parts = exterior_rings(&outline);
            let geometry = if parts.len() == 1 {
                Value::Polygon(vec![parts.remove(0)])
            } else {
                Value::MultiPolygon(parts.into_iter().map(|ring| vec![ring]).collect())
            };
            let mut feature = Feature::from(Geometry::new(geometry));
            feature.set_property("name", ring.name.as_str());
            feature.set_property("radius_m", ring.radius_m);
            feature.set_property("color", ring.color.hex());
            feature.set_property("opacity", ring.color.alpha() as f64 / 255.0);
            feature.set_property("description", ring.description.as_str());
            feature
        })
        .collect();

    features.push(point_feature(&detonation, GROUND_ZERO));
    if let Some(observer) = observer {
        features.push(point_feature(&observer, YOUR_LOCATION));
    }

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_feature_order() {
        let catalog = Catalog::reference();
        let profile = catalog.get_profile("Little Boy (Hiroshima)").unwrap();
        let det = Coordinate::new(34.3853, 132.4553).unwrap();
        let obs = Coordinate::new(34.3963, 132.4594).unwrap();

        let GeoJson::FeatureCollection(fc) = rings_geojson(profile, det, Some(obs), 32) else {
            panic!("expected a feature collection");
        };
        assert_eq!(fc.features.len(), 6);

        let names: Vec<&str> = fc
            .features
            .iter()
            .filter_map(|f| f.property("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                "Moderate Blast Damage",
                "Thermal Radiation",
                "Heavy Blast Damage",
                "Fireball",
                GROUND_ZERO,
                YOUR_LOCATION
            ]
        );

        let Some(Geometry { value: Value::Polygon(rings), .. }) = &fc.features[0].geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(rings[0].len(), 33);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    /// Shoelace area in degrees squared, positive when counter-clockwise
    fn signed_area(ring: &[Vec<f64>]) -> f64 {
        ring.windows(2).map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1]).sum::<f64>() / 2.0
    }

    #[test]
    fn test_exterior_rings_counter_clockwise() {
        let det = Coordinate::new(40.7128, -74.006).unwrap();
        let rings = exterior_rings(&ring_outline(det, 10_000.0, 64));
        assert_eq!(rings.len(), 1);
        assert!(signed_area(&rings[0]) > 0.0);
    }

    #[test]
    fn test_antimeridian_ring_is_split() {
        let catalog = Catalog::reference();
        let profile = catalog.get_profile("Tsar Bomba (Largest Tested)").unwrap();
        let det = Coordinate::new(-16.5, 179.9).unwrap();

        let GeoJson::FeatureCollection(fc) = rings_geojson(profile, det, None, 64) else {
            panic!("expected a feature collection");
        };
        let Some(Geometry { value: Value::MultiPolygon(polygons), .. }) = &fc.features[0].geometry else {
            panic!("expected a multipolygon");
        };
        assert_eq!(polygons.len(), 2);
        for polygon in polygons {
            let ring = &polygon[0];
            assert_eq!(ring.first(), ring.last());
            assert!(ring.iter().all(|p| (-180.0..=180.0).contains(&p[0])));
            assert!(signed_area(ring) > 0.0);
        }
        // The two halves meet on the antimeridian
        let east = polygons.iter().any(|p| p[0].iter().any(|pt| pt[0] == 180.0));
        let west = polygons.iter().any(|p| p[0].iter().any(|pt| pt[0] == -180.0));
        assert!(east && west);
    }

    #[test]
    fn test_serializes() {
        let catalog = Catalog::reference();
        let profile = catalog.get_profile("W-87 (Modern US Warhead)").unwrap();
        let det = Coordinate::new(40.7128, -74.006).unwrap();
        let json = rings_geojson(profile, det, None, 16).to_string();
        assert!(json.contains("\"FeatureCollection\""));
        assert!(json.contains("#0000ff"));
    }
}
