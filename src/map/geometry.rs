use crate::braille::BrailleCanvas;

/// Bresenham line between two pixel positions
pub fn draw_line(canvas: &mut BrailleCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Connect consecutive points. Segments entirely off-canvas are skipped,
/// which also keeps Bresenham from walking huge off-screen spans.
pub fn draw_polyline(canvas: &mut BrailleCanvas, points: &[(i32, i32)]) {
    let (w, h) = canvas.pixel_size();
    let (w, h) = (w as i32, h as i32);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let off_canvas = a.0.max(b.0) < 0 || a.0.min(b.0) >= w || a.1.max(b.1) < 0 || a.1.min(b.1) >= h;
        if !off_canvas {
            draw_line(canvas, a, b);
        }
    }
}

/// Small cross marker
pub fn draw_marker(canvas: &mut BrailleCanvas, (x, y): (i32, i32), size: i32) {
    for i in -size..=size {
        canvas.set_pixel(x + i, y);
        canvas.set_pixel(x, y + i);
    }
}

/// Filled disc
pub fn draw_dot(canvas: &mut BrailleCanvas, (cx, cy): (i32, i32), radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel(cx + dx, cy + dy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, (0, 0), (9, 0));
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_polyline_skips_offscreen() {
        let mut canvas = BrailleCanvas::new(4, 4);
        draw_polyline(&mut canvas, &[(-100, -100), (-50, -100), (-50, -40)]);
        assert!(canvas.is_blank());
        draw_polyline(&mut canvas, &[(0, 0), (7, 15)]);
        assert!(!canvas.is_blank());
    }

    #[test]
    fn test_marker_center() {
        let mut canvas = BrailleCanvas::new(2, 2);
        draw_marker(&mut canvas, (1, 3), 1);
        assert_eq!(canvas.lit_cells().count(), 3);
    }
}
