//! Shared BGR pixel buffer written tile by tile.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::Tile;

/// Tightly packed BGR bytes, row-major, top row first.
///
/// Workers publish whole tiles; readers may take snapshots at any time and
/// see a mix of old and new pixels while a render is running.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    bytes: Box<[AtomicU8]>,
}

impl FrameBuffer {
    /// Create a black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        Self {
            width,
            height,
            bytes: (0..len).map(|_| AtomicU8::new(0)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length in bytes, `3 * width * height`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy a rendered tile into its region.
    ///
    /// `pixels` holds the tile's BGR bytes in row-major order.
    pub(crate) fn write_tile(&self, tile: &Tile, pixels: &[u8]) {
        debug_assert!(
            tile.x + tile.width <= self.width && tile.y + tile.height <= self.height,
            "tile {tile:?} outside {}x{} framebuffer",
            self.width,
            self.height
        );
        debug_assert_eq!(pixels.len(), tile.pixel_count() * 3);

        let row_len = tile.width as usize * 3;
        if row_len == 0 {
            return;
        }

        for (row, src) in pixels.chunks_exact(row_len).enumerate() {
            let y = tile.y as usize + row;
            let start = (y * self.width as usize + tile.x as usize) * 3;
            for (dst, &byte) in self.bytes[start..start + row_len].iter().zip(src) {
                dst.store(byte, Ordering::Relaxed);
            }
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(bytes: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
        let start = ((y * width + x) * 3) as usize;
        [bytes[start], bytes[start + 1], bytes[start + 2]]
    }

    #[test]
    fn test_new_is_black() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.len(), 36);
        assert!(buffer.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_tile_region() {
        let buffer = FrameBuffer::new(4, 3);
        let tile = Tile::new(1, 1, 2, 2, 0);
        let pixels: Vec<u8> = (0..12).map(|i| i as u8 + 1).collect();

        buffer.write_tile(&tile, &pixels);
        let bytes = buffer.snapshot();

        assert_eq!(pixel(&bytes, 4, 1, 1), [1, 2, 3]);
        assert_eq!(pixel(&bytes, 4, 2, 1), [4, 5, 6]);
        assert_eq!(pixel(&bytes, 4, 1, 2), [7, 8, 9]);
        assert_eq!(pixel(&bytes, 4, 2, 2), [10, 11, 12]);

        // Everything outside the tile is untouched.
        assert_eq!(pixel(&bytes, 4, 0, 0), [0, 0, 0]);
        assert_eq!(pixel(&bytes, 4, 3, 1), [0, 0, 0]);
        assert_eq!(pixel(&bytes, 4, 0, 2), [0, 0, 0]);
        let written = bytes.iter().filter(|&&b| b != 0).count();
        assert_eq!(written, 12);
    }

    #[test]
    fn test_empty_tile_is_noop() {
        let buffer = FrameBuffer::new(2, 2);
        buffer.write_tile(&Tile::new(0, 0, 0, 0, 0), &[]);
        assert!(buffer.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside 4x3 framebuffer")]
    fn test_tile_outside_buffer_is_rejected() {
        let buffer = FrameBuffer::new(4, 3);
        buffer.write_tile(&Tile::new(3, 0, 2, 1, 0), &[0; 6]);
    }
}
