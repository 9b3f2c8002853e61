use blast_zones::catalog::{BombProfile, Rgba};
use blast_zones::geo::{ring_outline, Coordinate};
use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_dot, draw_marker, draw_polyline};
use crate::map::projection::Viewport;

/// Outline points per ring
const RING_SEGMENTS: usize = 180;

/// Geodesic outline of one effect ring
#[derive(Clone)]
pub struct RingOutline {
    pub name: String,
    pub color: Rgba,
    pub points: Vec<Coordinate>,
}

/// Rasterized frame: one canvas per ring (outermost first) plus markers
pub struct RingLayers {
    pub rings: Vec<(Rgba, BrailleCanvas)>,
    pub ground_zero: BrailleCanvas,
    pub observer: BrailleCanvas,
    /// Character-cell labels (col, row, text)
    pub labels: Vec<(u16, u16, String)>,
}

/// Caches ring outlines for the current bomb and detonation point; outlines
/// only need recomputing when either changes, projection happens per frame.
#[derive(Default)]
pub struct RingRenderer {
    outlines: Vec<RingOutline>,
}

impl RingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute outlines in drawing order (largest ring first)
    pub fn rebuild(&mut self, profile: &BombProfile, detonation: Coordinate) {
        self.outlines = profile
            .legend_order()
            .par_iter()
            .map(|ring| RingOutline {
                name: ring.name.clone(),
                color: ring.color,
                points: ring_outline(detonation, ring.radius_m, RING_SEGMENTS),
            })
            .collect();
        tracing::debug!(rings = self.outlines.len(), bomb = %profile.name, "rebuilt ring outlines");
    }

    #[cfg(test)]
    pub fn outlines(&self) -> &[RingOutline] {
        &self.outlines
    }

    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        detonation: Coordinate,
        observer: Coordinate,
    ) -> RingLayers {
        let rings = self
            .outlines
            .iter()
            .map(|outline| {
                let mut canvas = BrailleCanvas::new(width, height);
                let pixels: Vec<(i32, i32)> = outline.points.iter().map(|p| viewport.project_coord(p)).collect();
                draw_polyline(&mut canvas, &pixels);
                (outline.color, canvas)
            })
            .collect();

        let mut ground_zero = BrailleCanvas::new(width, height);
        let gz = viewport.project_coord(&detonation);
        draw_marker(&mut ground_zero, gz, 3);

        let mut observer_canvas = BrailleCanvas::new(width, height);
        let obs = viewport.project_coord(&observer);
        draw_dot(&mut observer_canvas, obs, 1);

        let mut labels: Vec<(u16, u16, String)> = Vec::new();
        for ((px, py), text) in [(gz, "Ground Zero"), (obs, "You")] {
            if viewport.is_visible(px, py) {
                let col = (px / 2) as u16;
                let row = (py / 4) as u16;
                if let Some(label_col) = col.checked_add(2) {
                    labels.push((label_col, row, text.to_string()));
                }
            }
        }

        // Ring names sit just above the northernmost outline point
        for outline in &self.outlines {
            let Some(north) = outline.points.first() else { continue };
            let (px, py) = viewport.project_coord(north);
            if !viewport.is_visible(px, py) || py < 4 {
                continue;
            }
            let row = (py / 4 - 1) as u16;
            if labels.iter().any(|(_, r, _)| *r == row) {
                continue;
            }
            let half = (outline.name.chars().count() / 2) as u16;
            labels.push((((px / 2) as u16).saturating_sub(half), row, outline.name.clone()));
        }

        RingLayers {
            rings,
            ground_zero,
            observer: observer_canvas,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blast_zones::catalog::{FIREBALL, HEAVY_BLAST, MODERATE_BLAST, THERMAL_RADIATION};
    use blast_zones::Catalog;

    #[test]
    fn test_rebuild_outermost_first() {
        let catalog = Catalog::reference();
        let profile = catalog.get_profile("Little Boy (Hiroshima)").unwrap();
        let det = Coordinate::new(34.3853, 132.4553).unwrap();
        let mut renderer = RingRenderer::new();
        renderer.rebuild(profile, det);
        let names: Vec<&str> = renderer.outlines().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec![MODERATE_BLAST, THERMAL_RADIATION, HEAVY_BLAST, FIREBALL]);
        assert_eq!(renderer.outlines()[0].points.len(), RING_SEGMENTS + 1);
    }

    #[test]
    fn test_render_draws_rings_and_markers() {
        let catalog = Catalog::reference();
        let profile = catalog.get_profile("Little Boy (Hiroshima)").unwrap();
        let det = Coordinate::new(34.3853, 132.4553).unwrap();
        let obs = Coordinate::new(34.3963, 132.4594).unwrap();
        let mut renderer = RingRenderer::new();
        renderer.rebuild(profile, det);

        let viewport = Viewport::fit(det, 3200.0, 120, 120);
        let layers = renderer.render(60, 30, &viewport, det, obs);
        assert_eq!(layers.rings.len(), 4);
        assert!(layers.rings.iter().all(|(_, canvas)| !canvas.is_blank()));
        assert!(!layers.ground_zero.is_blank());
        assert!(!layers.observer.is_blank());
        let texts: Vec<&str> = layers.labels.iter().map(|(_, _, t)| t.as_str()).collect();
        assert_eq!(&texts[..2], &["Ground Zero", "You"]);
        assert!(texts.contains(&MODERATE_BLAST));
    }
}
