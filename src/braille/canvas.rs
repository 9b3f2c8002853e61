/// Braille Unicode canvas for ring outlines.
/// Each character cell holds a 2x4 dot grid, so a canvas of `width` x `height`
/// characters has `width*2` x `height*4` addressable pixels.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>, // Dot bits, row-major
}

/// Empty braille cell (U+2800)
pub const BLANK: char = '\u{2800}';

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Pixel dimensions (width*2, height*4)
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width * 2, self.height * 4)
    }

    /// Set a pixel; out-of-bounds and negative coordinates are ignored.
    /// Dot bits per cell:
    /// ```text
    /// (0,0) 0x01  (1,0) 0x08
    /// (0,1) 0x02  (1,1) 0x10
    /// (0,2) 0x04  (1,2) 0x20
    /// (0,3) 0x40  (1,3) 0x80
    /// ```
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            _ => 0x80,
        };

        self.cells[cy * self.width + cx] |= bit;
    }

    /// Braille glyph at a character cell
    pub fn glyph(&self, col: usize, row: usize) -> char {
        if col >= self.width || row >= self.height {
            return BLANK;
        }
        char::from_u32(0x2800 + self.cells[row * self.width + col] as u32).unwrap_or(BLANK)
    }

    /// Non-blank cells as (col, row, glyph)
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &bits)| bits != 0)
            .map(|(idx, _)| {
                let (col, row) = (idx % self.width, idx / self.width);
                (col, row, self.glyph(col, row))
            })
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&bits| bits == 0)
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| (0..self.width).map(|col| self.glyph(col, row)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
