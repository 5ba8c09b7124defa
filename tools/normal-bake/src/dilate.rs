//! Edge padding: grow written regions into empty margins

use crate::modifiers::BufferModifier;
use crate::PixelBuffer;

const NEIGHBOURS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Grow written pixels outward by one pixel per iteration.
///
/// An unwritten pixel with at least one written 4-neighbour (as of the
/// previous iteration) takes the mean of those neighbours' RGB with alpha 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dilate {
    pub iterations: u32,
}

impl BufferModifier for Dilate {
    fn apply(&self, buffer: &mut PixelBuffer) {
        let width = buffer.width as i64;
        let height = buffer.height as i64;

        for iteration in 0..self.iterations {
            let previous_pixels = buffer.pixels.clone();
            let previous_mask = buffer.written.clone();
            let mut grown = 0usize;

            for y in 0..height {
                for x in 0..width {
                    let idx = (y * width + x) as usize;
                    if previous_mask[idx] {
                        continue;
                    }

                    let mut sum = [0.0f32; 3];
                    let mut count = 0u32;
                    for (dx, dy) in NEIGHBOURS {
                        let (nx, ny) = (x + dx, y + dy);
                        if nx < 0 || ny < 0 || nx >= width || ny >= height {
                            continue;
                        }
                        let n = (ny * width + nx) as usize;
                        if previous_mask[n] {
                            for c in 0..3 {
                                sum[c] += previous_pixels[n][c];
                            }
                            count += 1;
                        }
                    }

                    if count > 0 {
                        let inv = 1.0 / count as f32;
                        buffer.pixels[idx] = [sum[0] * inv, sum[1] * inv, sum[2] * inv, 1.0];
                        buffer.written[idx] = true;
                        grown += 1;
                    }
                }
            }

            if grown == 0 {
                tracing::debug!("padding saturated after {} iterations", iteration);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::BufferApply;
    use crate::NEUTRAL_NORMAL;

    #[test]
    fn test_one_iteration_grows_one_pixel() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.write_pixel(2, 2, [1.0, 0.0, 0.0, 1.0]);
        buf.apply(Dilate { iterations: 1 });

        assert_eq!(buf.written_count(), 5);
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(buf.get_pixel(x, y), [1.0, 0.0, 0.0, 1.0]);
        }
        // Diagonal is two steps away
        assert!(!buf.is_written(1, 1));
        assert_eq!(buf.get_pixel(1, 1), NEUTRAL_NORMAL);
    }

    #[test]
    fn test_growth_is_manhattan_distance() {
        let mut buf = PixelBuffer::new(7, 7);
        buf.write_pixel(3, 3, [0.2, 0.4, 0.6, 1.0]);
        buf.apply(Dilate { iterations: 2 });

        for y in 0..7i32 {
            for x in 0..7i32 {
                let d = (x - 3).abs() + (y - 3).abs();
                assert_eq!(buf.is_written(x as u32, y as u32), d <= 2, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_averages_written_neighbours() {
        let mut buf = PixelBuffer::new(3, 1);
        buf.write_pixel(0, 0, [1.0, 0.0, 0.0, 0.5]);
        buf.write_pixel(2, 0, [0.0, 1.0, 0.0, 0.5]);
        buf.apply(Dilate { iterations: 1 });
        assert_eq!(buf.get_pixel(1, 0), [0.5, 0.5, 0.0, 1.0]);
        // Already written pixels keep their alpha
        assert_eq!(buf.get_pixel(0, 0)[3], 0.5);
    }

    #[test]
    fn test_empty_buffer_unchanged() {
        let mut buf = PixelBuffer::new(4, 4);
        let before = buf.clone();
        buf.apply(Dilate { iterations: 3 });
        assert_eq!(buf, before);
    }
}
