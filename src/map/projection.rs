use std::f64::consts::PI;

use blast_zones::geo::{Coordinate, WGS84_A};

/// Web Mercator latitude limit
const MAX_LAT: f64 = 85.051_128_78;
const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 1_000_000.0;
const ZOOM_STEP: f64 = 1.5;

/// Share of the shorter canvas side the outermost ring should span after a fit
const FIT_FILL: f64 = 0.85;

/// Normalized Web Mercator x/y in [0, 1], y growing southwards
#[inline(always)]
fn to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

#[inline(always)]
fn from_mercator(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Visible map area. Pixel units are braille dots.
#[derive(Clone, Debug)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    /// Pixels per normalized Mercator unit, divided by width
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-MAX_LAT, MAX_LAT),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Center on `center` with a circle of `radius_m` filling most of the view
    pub fn fit(center: Coordinate, radius_m: f64, width: usize, height: usize) -> Self {
        let mut vp = Self::new(center.lon(), center.lat(), 1.0, width, height);
        vp.fit_radius(radius_m);
        vp
    }

    pub fn fit_radius(&mut self, radius_m: f64) {
        let side = self.width.min(self.height).max(1) as f64;
        // Mercator stretches ground distance by 1/cos(lat)
        let circumference = 2.0 * PI * WGS84_A * self.center_lat.to_radians().cos();
        let diameter_units = (2.0 * radius_m / circumference).max(f64::EPSILON);
        let scale = side * FIT_FILL / diameter_units;
        self.zoom = (scale / self.width.max(1) as f64).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn center_on(&mut self, c: Coordinate) {
        self.center_lon = c.lon();
        self.center_lat = c.lat().clamp(-MAX_LAT, MAX_LAT);
    }

    #[inline(always)]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// False while the map area has collapsed to zero pixels wide
    #[inline(always)]
    fn has_area(&self) -> bool {
        self.scale() > 0.0
    }

    /// Pan by a pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if !self.has_area() {
            return;
        }
        let (cx, cy) = to_mercator(self.center_lon, self.center_lat);
        let x = cx + dx as f64 / self.scale();
        let y = (cy + dy as f64 / self.scale()).clamp(0.0, 1.0);
        let (lon, lat) = from_mercator(x, y);
        self.center_lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        self.center_lat = lat.clamp(-MAX_LAT, MAX_LAT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom keeping the geographic point under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        if !self.has_area() {
            return;
        }
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Pixel coordinates back to (lon, lat). A zero-width view maps every
    /// pixel to the center.
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        if !self.has_area() {
            return (self.center_lon, self.center_lat);
        }
        let (cx, cy) = to_mercator(self.center_lon, self.center_lat);
        let x = (px as f64 - self.width as f64 / 2.0) / self.scale() + cx;
        let y = ((py as f64 - self.height as f64 / 2.0) / self.scale() + cy).clamp(0.0, 1.0);
        let (lon, lat) = from_mercator(x, y);
        ((lon + 180.0).rem_euclid(360.0) - 180.0, lat)
    }

    /// Unproject to a validated coordinate
    pub fn coordinate_at(&self, px: i32, py: i32) -> Option<Coordinate> {
        let (lon, lat) = self.unproject(px, py);
        Coordinate::new(lat, lon).ok()
    }

    /// (lon, lat) to pixel coordinates. Longitudes are unwrapped relative to the
    /// center so shapes crossing the antimeridian stay contiguous.
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (cx, cy) = to_mercator(self.center_lon, self.center_lat);
        let mut dlon = lon - self.center_lon;
        if dlon > 180.0 {
            dlon -= 360.0;
        } else if dlon < -180.0 {
            dlon += 360.0;
        }
        let (x, y) = to_mercator(self.center_lon + dlon, lat);

        let px = (x - cx) * self.scale() + self.width as f64 / 2.0;
        let py = (y - cy) * self.scale() + self.height as f64 / 2.0;
        // Clamp keeps far-off points from overflowing i32
        (px.clamp(-1e6, 1e6) as i32, py.clamp(-1e6, 1e6) as i32)
    }

    pub fn project_coord(&self, c: &Coordinate) -> (i32, i32) {
        self.project(c.lon(), c.lat())
    }

    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= 0 && px < self.width as i32 && py >= 0 && py < self.height as i32
    }

    /// Meters covered by one pixel at the view center, `None` for a zero-width view
    pub fn meters_per_pixel(&self) -> Option<f64> {
        if !self.has_area() {
            return None;
        }
        Some(2.0 * PI * WGS84_A * self.center_lat.to_radians().cos() / self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(-74.0, 40.7, 2000.0, 200, 120);
        let (px, py) = vp.project(-73.98, 40.75);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon + 73.98).abs() < 0.01);
        assert!((lat - 40.75).abs() < 0.01);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, 10);
        assert!(vp.center_lat < 0.0);
    }

    #[test]
    fn test_fit_radius_fills_view() {
        let center = Coordinate::new(40.7128, -74.006).unwrap();
        let vp = Viewport::fit(center, 3200.0, 200, 100);
        let diameter_px = 2.0 * 3200.0 / vp.meters_per_pixel().unwrap();
        assert!((diameter_px - 85.0).abs() < 1.0, "{diameter_px}");
    }

    #[test]
    fn test_zoom_at_keeps_point() {
        let mut vp = Viewport::new(10.0, 50.0, 100.0, 200, 100);
        let before = vp.unproject(150, 30);
        vp.zoom_in_at(150, 30);
        let after = vp.unproject(150, 30);
        assert!((before.0 - after.0).abs() < 0.05);
        assert!((before.1 - after.1).abs() < 0.05);
    }

    #[test]
    fn test_antimeridian_unwrap() {
        let vp = Viewport::new(179.9, 0.0, 5000.0, 200, 100);
        let (east, _) = vp.project(179.95, 0.0);
        let (west, _) = vp.project(-179.95, 0.0);
        assert!(west > east);
    }

    #[test]
    fn test_zero_width_view_keeps_center() {
        let mut vp = Viewport::new(-74.0, 40.7, 1.0, 0, 0);
        vp.pan(10, -4);
        vp.zoom_in_at(3, 3);
        vp.zoom_out_at(0, 0);
        assert_eq!((vp.center_lon, vp.center_lat), (-74.0, 40.7));
        assert_eq!(vp.unproject(5, 5), (-74.0, 40.7));
        assert!(vp.meters_per_pixel().is_none());
    }
}
