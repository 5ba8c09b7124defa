//! Float RGBA pixel buffer with a written mask

/// Neutral tangent-space "up" colour used for unwritten pixels
pub const NEUTRAL_NORMAL: [f32; 4] = [0.5, 0.5, 1.0, 1.0];

/// RGBA float pixels plus a parallel "written" mask.
///
/// Row `y` covers `v` in `[y / height, (y + 1) / height)`, so row 0 is the
/// bottom of the UV square.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA pixels, row-major
    pub pixels: Vec<[f32; 4]>,
    /// One flag per pixel, true once a triangle or dilation wrote it
    pub written: Vec<bool>,
}

impl PixelBuffer {
    /// Create a buffer filled with [`NEUTRAL_NORMAL`] and nothing written
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![NEUTRAL_NORMAL; len],
            written: vec![false; len],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get pixel at (x, y)
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[self.index(x, y)]
    }

    /// Set pixel at (x, y) and mark it written
    #[inline]
    pub fn write_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
        self.written[idx] = true;
    }

    /// Whether (x, y) has been written
    #[inline]
    pub fn is_written(&self, x: u32, y: u32) -> bool {
        self.written[self.index(x, y)]
    }

    /// Number of written pixels
    pub fn written_count(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }

    /// Flat `width * height * 4` array clamped to [0, 1], row 0 first
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        self.pixels
            .iter()
            .flat_map(|p| p.map(|c| c.clamp(0.0, 1.0)))
            .collect()
    }

    /// 8-bit RGBA, row 0 first
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }
}
