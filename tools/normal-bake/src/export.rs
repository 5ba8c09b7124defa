//! PNG export for baked buffers

use crate::{BakeError, PixelBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode `buffer` as 8-bit RGBA PNG into `w`.
///
/// Rows are written top row first, i.e. the last buffer row (v near 1)
/// becomes the first image row so the image appears upright.
pub fn encode_png<W: Write>(buffer: &PixelBuffer, w: W) -> Result<(), BakeError> {
    let mut encoder = png::Encoder::new(w, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let row_bytes = buffer.width as usize * 4;
    let rgba = buffer.to_rgba8();
    let mut flipped = Vec::with_capacity(rgba.len());
    if row_bytes > 0 {
        for row in rgba.chunks_exact(row_bytes).rev() {
            flipped.extend_from_slice(row);
        }
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&flipped)?;
    Ok(())
}

/// Write a PixelBuffer to a PNG file
///
/// # Example
/// ```no_run
/// use normal_bake::{write_png, PixelBuffer};
/// use std::path::Path;
///
/// let buffer = PixelBuffer::new(64, 64);
/// write_png(&buffer, Path::new("flat.png")).unwrap();
/// ```
pub fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<(), BakeError> {
    let file = File::create(path)?;
    encode_png(buffer, BufWriter::new(file))?;
    tracing::info!("Normal map saved to {}", path.display());
    Ok(())
}
