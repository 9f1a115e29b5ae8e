//! Tile partitioning of the frame.
//!
//! The image is always cut into a fixed grid of tiles, independent of the
//! worker count. Tiles in the last row and column absorb the remainder when
//! the resolution is not a multiple of the grid size.

use crate::Raytracer;
use ember_math::color_to_bgr;

/// Tiles per image side.
pub const GRID_RESOLUTION: u32 = 8;

/// A rectangular region of the image rendered as one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this tile in dispatch order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Cut a `width` x `height` image into `grid` x `grid` tiles, centre first.
///
/// Images smaller than the grid produce empty tiles; every pixel still
/// belongs to exactly one tile.
pub fn generate_tiles(width: u32, height: u32, grid: u32) -> Vec<Tile> {
    let grid = grid.max(1);
    let tile_width = width / grid;
    let tile_height = height / grid;

    let mut tiles = Vec::with_capacity((grid * grid) as usize);
    for row in 0..grid {
        for column in 0..grid {
            let x = column * tile_width;
            let y = row * tile_height;
            let w = if column + 1 == grid { width - x } else { tile_width };
            let h = if row + 1 == grid { height - y } else { tile_height };
            tiles.push(Tile::new(x, y, w, h, tiles.len()));
        }
    }

    sort_spiral(&mut tiles, width, height);

    for (i, tile) in tiles.iter_mut().enumerate() {
        tile.index = i;
    }

    tiles
}

/// Sort tiles by the distance of their centre from the image centre.
///
/// The sort is stable, so equidistant tiles keep row-major order.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |tile: &Tile| {
        let x = tile.x as f32 + tile.width as f32 / 2.0;
        let y = tile.y as f32 + tile.height as f32 / 2.0;
        (x - center_x).powi(2) + (y - center_y).powi(2)
    };

    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a tile to tightly packed BGR bytes in row-major order.
pub fn render_tile(tile: &Tile, raytracer: &Raytracer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(tile.pixel_count() * 3);

    for y in tile.y..tile.y + tile.height {
        for x in tile.x..tile.x + tile.width {
            bytes.extend_from_slice(&color_to_bgr(raytracer.pixel_color(x, y)));
        }
    }

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_pixels(tiles: &[Tile]) -> usize {
        tiles.iter().map(Tile::pixel_count).sum()
    }

    #[test]
    fn test_grid_exact_fit() {
        let tiles = generate_tiles(64, 64, GRID_RESOLUTION);
        assert_eq!(tiles.len(), 64);
        assert!(tiles.iter().all(|t| t.width == 8 && t.height == 8));
        assert_eq!(total_pixels(&tiles), 64 * 64);
    }

    #[test]
    fn test_last_row_and_column_absorb_remainder() {
        let tiles = generate_tiles(100, 37, GRID_RESOLUTION);
        assert_eq!(tiles.len(), 64);
        assert_eq!(total_pixels(&tiles), 100 * 37);

        let corner = tiles.iter().find(|t| t.x == 84 && t.y == 28).unwrap();
        assert_eq!((corner.width, corner.height), (16, 9));

        let inner = tiles.iter().find(|t| t.x == 0 && t.y == 0).unwrap();
        assert_eq!((inner.width, inner.height), (12, 4));
    }

    #[test]
    fn test_every_pixel_in_exactly_one_tile() {
        let (width, height) = (29, 19);
        let tiles = generate_tiles(width, height, GRID_RESOLUTION);

        for y in 0..height {
            for x in 0..width {
                let owners = tiles.iter().filter(|t| t.contains(x, y)).count();
                assert_eq!(owners, 1, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_tiny_image_still_has_full_grid() {
        let tiles = generate_tiles(3, 2, GRID_RESOLUTION);
        assert_eq!(tiles.len(), 64);
        assert_eq!(total_pixels(&tiles), 6);
        assert_eq!(tiles.iter().filter(|t| t.pixel_count() > 0).count(), 1);
    }

    #[test]
    fn test_spiral_order() {
        let tiles = generate_tiles(64, 64, GRID_RESOLUTION);

        // One of the four tiles touching the centre comes first.
        let first = tiles[0];
        assert!(first.x == 24 || first.x == 32);
        assert!(first.y == 24 || first.y == 32);

        // Corners come last.
        let last = tiles[63];
        assert!(last.x == 0 || last.x == 56);
        assert!(last.y == 0 || last.y == 56);

        assert!(tiles.iter().enumerate().all(|(i, t)| t.index == i));
    }
}
