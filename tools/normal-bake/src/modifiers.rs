//! Buffer modifiers for post-processing a rasterized bake
//!
//! Same shape as a texture modifier chain: each filter implements
//! [`BufferModifier`] and [`BufferApply`] lets calls be chained.

use crate::PixelBuffer;

/// Trait for pixel buffer filters
pub trait BufferModifier {
    /// Apply the filter to the buffer in place
    fn apply(&self, buffer: &mut PixelBuffer);
}

/// Extension trait for fluent modifier application
pub trait BufferApply {
    /// Apply a modifier and return self for chaining
    fn apply<M: BufferModifier>(&mut self, modifier: M) -> &mut Self;
}

impl BufferApply for PixelBuffer {
    fn apply<M: BufferModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}
