use blast_zones::catalog::{BombProfile, Catalog, EffectRing};
use blast_zones::classify::{classify, ClassificationResult};
use blast_zones::geo::Coordinate;
use blast_zones::guidance::GuidanceTable;
use blast_zones::ZoneError;

use crate::map::{RingRenderer, Viewport};

/// Width in terminal columns of the legend/situation panel
pub const SIDE_PANEL_WIDTH: u16 = 46;

/// Initial inputs for a session
#[derive(Clone, Debug)]
pub struct Scenario {
    pub bomb: Option<String>,
    pub detonation: Coordinate,
    pub observer: Coordinate,
}

/// Terminal cell size to braille pixel size of the map area
/// (border takes 2 columns and 2 rows, status bar 1 row)
fn map_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(SIDE_PANEL_WIDTH as usize + 2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Application state
pub struct App {
    pub catalog: Catalog,
    pub guidance: GuidanceTable,
    pub bomb_index: usize,
    pub detonation: Coordinate,
    pub observer: Coordinate,
    pub viewport: Viewport,
    pub rings: RingRenderer,
    /// Recomputed whenever the bomb or either point changes
    pub result: ClassificationResult,
    pub show_guidance: bool,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
}

impl App {
    pub fn new(
        catalog: Catalog,
        guidance: GuidanceTable,
        scenario: Scenario,
        width: usize,
        height: usize,
    ) -> Result<Self, ZoneError> {
        // Resolve the requested bomb, defaulting to the first catalog entry
        let bomb_index = match &scenario.bomb {
            Some(name) => catalog
                .list_bombs()
                .position(|b| b == name)
                .ok_or_else(|| ZoneError::NotFound(name.clone()))?,
            None => 0,
        };
        let profile = &catalog.profiles()[bomb_index];
        let result = classify(scenario.detonation, scenario.observer, profile);
        // Start zoomed so the outermost ring fills the map
        let (pw, ph) = map_pixels(width, height);
        let radius = profile.outermost().map_or(1000.0, |r| r.radius_m);
        let viewport = Viewport::fit(scenario.detonation, radius, pw, ph);
        let mut rings = RingRenderer::new();
        rings.rebuild(profile, scenario.detonation);

        Ok(Self {
            catalog,
            guidance,
            bomb_index,
            detonation: scenario.detonation,
            observer: scenario.observer,
            viewport,
            rings,
            result,
            show_guidance: true,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
        })
    }

    pub fn profile(&self) -> &BombProfile {
        &self.catalog.profiles()[self.bomb_index]
    }

    /// Ring the observer is in, if any
    pub fn current_ring(&self) -> Option<&EffectRing> {
        self.profile().ring(self.result.zone_name())
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = map_pixels(width, height);
        self.viewport.width = pw;
        self.viewport.height = ph;
    }

    /// Switch to the next bomb, wrapping around
    pub fn next_bomb(&mut self) {
        self.bomb_index = (self.bomb_index + 1) % self.catalog.len();
        self.rebuild();
        self.fit_view();
    }

    pub fn prev_bomb(&mut self) {
        self.bomb_index = (self.bomb_index + self.catalog.len() - 1) % self.catalog.len();
        self.rebuild();
        self.fit_view();
    }

    pub fn set_detonation(&mut self, c: Coordinate) {
        self.detonation = c;
        self.rebuild();
    }

    pub fn set_observer(&mut self, c: Coordinate) {
        self.observer = c;
        self.reclassify();
    }

    fn reclassify(&mut self) {
        self.result = classify(self.detonation, self.observer, self.profile());
    }

    /// New outlines, then a fresh classification against them
    fn rebuild(&mut self) {
        let (profile, detonation) = (&self.catalog.profiles()[self.bomb_index], self.detonation);
        self.rings.rebuild(profile, detonation);
        self.reclassify();
    }

    /// Center on ground zero with the outermost ring in view
    pub fn fit_view(&mut self) {
        let radius = self.profile().outermost().map_or(1000.0, |r| r.radius_m);
        self.viewport.center_on(self.detonation);
        self.viewport.fit_radius(radius);
    }

    /// Guidance for the current zone. A missing entry is logged and replaced
    /// with a fallback line so the UI keeps running.
    pub fn guidance_text(&self) -> String {
        match self.guidance.get(self.result.zone_name()) {
            Ok(guidance) => guidance.to_string(),
            Err(err) => {
                tracing::warn!(%err, "guidance lookup failed");
                format!("No guidance available for {}.", self.result.zone_name())
            }
        }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_guidance(&mut self) {
        self.show_guidance = !self.show_guidance;
    }

    /// Terminal cell to braille pixel inside the map panel.
    /// `None` when the cell is on the border or in the side panel.
    pub fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        // Column/row 0 is the map border
        if col == 0 || row == 0 {
            return None;
        }
        // Each cell is 2x4 braille dots
        let px = (col as i32 - 1) * 2;
        let py = (row as i32 - 1) * 4;
        self.viewport.is_visible(px, py).then_some((px, py))
    }

    /// Mouse position in braille pixels, if over the map
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.and_then(|(col, row)| self.map_pixel(col, row))
    }

    fn coordinate_at_cell(&self, col: u16, row: u16) -> Option<Coordinate> {
        let (px, py) = self.map_pixel(col, row)?;
        self.viewport.coordinate_at(px, py)
    }

    /// Move ground zero to a screen cell
    pub fn place_detonation_at(&mut self, col: u16, row: u16) {
        if let Some(c) = self.coordinate_at_cell(col, row) {
            tracing::info!(detonation = %c, "moved ground zero");
            self.set_detonation(c);
        }
    }

    /// Move the observer to a screen cell
    pub fn place_observer_at(&mut self, col: u16, row: u16) {
        if let Some(c) = self.coordinate_at_cell(col, row) {
            tracing::info!(observer = %c, "moved observer");
            self.set_observer(c);
        }
    }

    pub fn place_detonation_at_cursor(&mut self) {
        if let Some((col, row)) = self.mouse_pos {
            self.place_detonation_at(col, row);
        }
    }

    pub fn place_observer_at_cursor(&mut self) {
        if let Some((col, row)) = self.mouse_pos {
            self.place_observer_at(col, row);
        }
    }

    /// Pan by drag delta
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            // Drag right moves the map right, so the view pans left
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Map scale as ground distance per terminal column
    pub fn scale_label(&self) -> String {
        let Some(meters) = self.viewport.meters_per_pixel().map(|m| m * 2.0) else {
            return "-".to_string();
        };
        if meters >= 1000.0 {
            format!("{:.1} km/col", meters / 1000.0)
        } else {
            format!("{:.0} m/col", meters)
        }
    }
}
