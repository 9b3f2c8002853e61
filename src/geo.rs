//! Coordinates and geodesic math on the WGS-84 ellipsoid.
//!
//! Distances use Vincenty's inverse formula. For nearly antipodal points,
//! where the iteration does not converge, the distance falls back to the
//! great circle on a sphere of the WGS-84 mean radius.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::ZoneError;

/// WGS-84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS-84 semi-minor axis in meters
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// Mean earth radius (2a + b) / 3, used by the spherical fallback
pub const MEAN_RADIUS_M: f64 = (2.0 * WGS84_A + WGS84_B) / 3.0;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// A validated geographic position in degrees.
///
/// Construction always goes through range checks, so a `Coordinate` value is
/// finite with latitude in [-90, 90] and longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ZoneError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ZoneError> {
        let invalid = |reason| ZoneError::InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("non-finite value"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude outside [-180, 180]"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[inline(always)]
    pub fn lat(&self) -> f64 {
        self.latitude
    }

    #[inline(always)]
    pub fn lon(&self) -> f64 {
        self.longitude
    }

    /// Position on the unit sphere (x towards 0°E, z towards the north pole)
    fn unit_vector(&self) -> DVec3 {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is allowed)
impl FromStr for Coordinate {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ZoneError::InvalidCoordinate {
            latitude: f64::NAN,
            longitude: f64::NAN,
            reason: "expected \"lat,lon\"",
        };
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;
        Coordinate::new(lat, lon)
    }
}

/// Normalize longitude into [-180, 180]
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Geodesic distance in meters between two coordinates on WGS-84
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    vincenty_inverse(a, b).unwrap_or_else(|| spherical_distance_m(a, b))
}

/// Great-circle distance on a sphere of the mean earth radius.
/// atan2 form stays accurate for both tiny and antipodal separations.
pub fn spherical_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let (va, vb) = (a.unit_vector(), b.unit_vector());
    let angle = va.cross(vb).length().atan2(va.dot(vb));
    MEAN_RADIUS_M * angle
}

/// Vincenty inverse solution. `None` when the iteration fails to converge.
fn vincenty_inverse(p1: Coordinate, p2: Coordinate) -> Option<f64> {
    let l = (p2.longitude - p1.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * p1.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0); // coincident points
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos²α = 0
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if !lambda.is_finite() || lambda.abs() > std::f64::consts::PI * 2.0 {
            return None;
        }

        if (lambda - lambda_prev).abs() < CONVERGENCE {
            let (a_coef, b_coef) = series_coefficients(cos_sq_alpha);
            let delta_sigma = delta_sigma(b_coef, sin_sigma, cos_sigma, cos_2sigma_m);
            let s = WGS84_B * a_coef * (sigma - delta_sigma);
            return s.is_finite().then_some(s);
        }
    }
    None
}

/// Vincenty's A and B series coefficients for a given cos²α
#[inline(always)]
fn series_coefficients(cos_sq_alpha: f64) -> (f64, f64) {
    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    (a, b)
}

#[inline(always)]
fn delta_sigma(b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    b * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * c2)))
}

/// Point reached by travelling `distance_m` from `start` along initial
/// bearing `bearing_deg` (clockwise from north). Vincenty direct solution.
pub fn destination(start: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let alpha1 = bearing_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let tan_u1 = (1.0 - WGS84_F) * start.latitude.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let (a_coef, b_coef) = series_coefficients(cos_sq_alpha);

    let base = distance_m / (WGS84_B * a_coef);
    let mut sigma = base;
    for _ in 0..MAX_ITERATIONS {
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let next = base + delta_sigma(b_coef, sin_sigma, cos_sigma, cos_2sigma_m);
        let converged = (next - sigma).abs() < CONVERGENCE;
        sigma = next;
        if converged {
            break;
        }
    }
    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - WGS84_F) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * WGS84_F
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    Coordinate {
        latitude: lat2.to_degrees().clamp(-90.0, 90.0),
        longitude: normalize_lon(start.longitude + l.to_degrees()),
    }
}

/// Closed polygon approximating a geodesic circle. The first point is
/// repeated at the end, so the result has `segments + 1` points.
pub fn ring_outline(center: Coordinate, radius_m: f64, segments: usize) -> Vec<Coordinate> {
    let segments = segments.max(3);
    let step = 360.0 / segments as f64;
    let mut points: Vec<Coordinate> = (0..segments)
        .map(|i| destination(center, i as f64 * step, radius_m))
        .collect();
    points.push(points[0]);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dms(deg: f64, min: f64, sec: f64) -> f64 {
        deg.signum() * (deg.abs() + min / 60.0 + sec / 3600.0)
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_parse_lat_lon() {
        let c: Coordinate = "40.7128, -74.0060".parse().unwrap();
        assert_eq!(c.lat(), 40.7128);
        assert_eq!(c.lon(), -74.006);
        assert!("40.7".parse::<Coordinate>().is_err());
        assert!("north,south".parse::<Coordinate>().is_err());
        assert!("95,10".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_vincenty_reference_case() {
        // Flinders Peak to Buninyong
        let flinders = Coordinate::new(dms(-37.0, 57.0, 3.72030), dms(144.0, 25.0, 29.52440)).unwrap();
        let buninyong = Coordinate::new(dms(-37.0, 39.0, 10.15610), dms(143.0, 55.0, 35.38390)).unwrap();
        assert_abs_diff_eq!(distance_m(flinders, buninyong), 54_972.271, epsilon = 0.01);
    }

    #[test]
    fn test_equator_degree() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 1.0).unwrap();
        assert_abs_diff_eq!(distance_m(a, b), 111_319.491, epsilon = 0.01);
    }

    #[test]
    fn test_coincident_points() {
        let a = Coordinate::new(51.5, -0.12).unwrap();
        assert_eq!(distance_m(a, a), 0.0);
    }

    #[test]
    fn test_antipodal_is_finite() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 180.0).unwrap();
        let d = distance_m(a, b);
        assert!(d.is_finite());
        assert!(d > 19_900_000.0 && d < 20_100_000.0, "{d}");

        let c = Coordinate::new(40.7128, -74.006).unwrap();
        let anti = Coordinate::new(-40.7128, 105.994).unwrap();
        assert!(distance_m(c, anti).is_finite());
    }

    #[test]
    fn test_destination_round_trip() {
        let start = Coordinate::new(35.6762, 139.6503).unwrap();
        for bearing in [0.0, 45.0, 133.0, 270.0] {
            let end = destination(start, bearing, 12_345.0);
            assert_abs_diff_eq!(distance_m(start, end), 12_345.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let start = Coordinate::new(0.0, 179.99).unwrap();
        let end = destination(start, 90.0, 5_000.0);
        assert!(end.lon() < 0.0 && end.lon() > -180.0);
    }

    #[test]
    fn test_ring_outline_closed() {
        let center = Coordinate::new(40.7128, -74.006).unwrap();
        let outline = ring_outline(center, 3_200.0, 64);
        assert_eq!(outline.len(), 65);
        assert_eq!(outline.first(), outline.last());
        for p in &outline {
            assert_abs_diff_eq!(distance_m(center, *p), 3_200.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-190.0), 170.0);
        assert_eq!(normalize_lon(180.0), 180.0);
        assert_eq!(normalize_lon(-180.0), -180.0);
    }
}
