//! Near-square tile grid partitioning.

use crate::error::ProcessError;
use serde::{Deserialize, Serialize};

/// Half-open pixel rectangle `[y1, y2) x [x1, x2)` of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBox {
    pub y1: u32,
    pub y2: u32,
    pub x1: u32,
    pub x2: u32,
}

impl TileBox {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// True when the box covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Grid of `rows x columns` cells laid over an image.
///
/// `rows = floor(sqrt(n))` and `columns = ceil(n / rows)`, so the cell count
/// can exceed the requested tile count. Interior cells share one size; the
/// last row and column stretch to the image edge and absorb the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    rows: u32,
    columns: u32,
    width: u32,
    height: u32,
}

impl GridLayout {
    /// Lay out a grid for `tile_count` tiles over a `width x height` image.
    pub fn new(tile_count: u32, width: u32, height: u32) -> Result<Self, ProcessError> {
        if tile_count == 0 {
            return Err(ProcessError::InvalidTileCount(tile_count));
        }

        let rows = floor_sqrt(tile_count);
        let columns = tile_count.div_ceil(rows);

        Ok(Self {
            rows,
            columns,
            width,
            height,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cells actually cut, `rows * columns`
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Cell boxes in row-major order.
    pub fn boxes(&self) -> Vec<TileBox> {
        let tile_h = self.height / self.rows;
        let tile_w = self.width / self.columns;

        let mut boxes = Vec::with_capacity(self.cell_count());
        for row in 0..self.rows {
            let y1 = row * tile_h;
            let y2 = if row + 1 < self.rows { y1 + tile_h } else { self.height };
            for column in 0..self.columns {
                let x1 = column * tile_w;
                let x2 = if column + 1 < self.columns { x1 + tile_w } else { self.width };
                boxes.push(TileBox { y1, y2, x1, x2 });
            }
        }
        boxes
    }
}

/// Largest `r` with `r * r <= n`
fn floor_sqrt(n: u32) -> u32 {
    let mut root = f64::from(n).sqrt() as u32;
    while u64::from(root) * u64::from(root) > u64::from(n) {
        root -= 1;
    }
    while u64::from(root + 1) * u64::from(root + 1) <= u64::from(n) {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_tile_counts_give_square_grids() {
        for (count, side) in [(9, 3), (36, 6), (144, 12)] {
            let grid = GridLayout::new(count, 600, 400).unwrap();
            assert_eq!(grid.rows(), side);
            assert_eq!(grid.columns(), side);
            assert_eq!(grid.cell_count(), count as usize);
        }
    }

    #[test]
    fn non_square_counts_round_columns_up() {
        let grid = GridLayout::new(10, 100, 100).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.cell_count(), 12);

        let grid = GridLayout::new(2, 100, 100).unwrap();
        assert_eq!((grid.rows(), grid.columns()), (1, 2));

        let grid = GridLayout::new(1, 100, 100).unwrap();
        assert_eq!((grid.rows(), grid.columns()), (1, 1));
    }

    #[test]
    fn zero_tiles_is_rejected() {
        assert!(matches!(
            GridLayout::new(0, 10, 10),
            Err(ProcessError::InvalidTileCount(0))
        ));
    }

    #[test]
    fn last_row_and_column_absorb_remainder() {
        let grid = GridLayout::new(9, 100, 50).unwrap();
        let boxes = grid.boxes();

        assert_eq!(boxes[0], TileBox { y1: 0, y2: 16, x1: 0, x2: 33 });
        assert_eq!(boxes[8], TileBox { y1: 32, y2: 50, x1: 66, x2: 100 });
    }

    #[test]
    fn boxes_cover_every_pixel_exactly_once() {
        for (count, width, height) in [(9, 37, 23), (36, 50, 50), (144, 31, 97), (10, 13, 8), (7, 5, 3)] {
            let grid = GridLayout::new(count, width, height).unwrap();
            let mut hits = vec![0u32; (width * height) as usize];

            for tile in grid.boxes() {
                for y in tile.y1..tile.y2 {
                    for x in tile.x1..tile.x2 {
                        hits[(y * width + x) as usize] += 1;
                    }
                }
            }

            assert!(
                hits.iter().all(|&h| h == 1),
                "gap or overlap for {} tiles over {}x{}",
                count,
                width,
                height
            );
        }
    }

    #[test]
    fn tiny_image_yields_empty_interior_boxes() {
        let grid = GridLayout::new(144, 5, 5).unwrap();
        let boxes = grid.boxes();
        let non_empty: Vec<_> = boxes.iter().filter(|b| !b.is_empty()).collect();

        assert_eq!(boxes.len(), 144);
        assert_eq!(non_empty, vec![&TileBox { y1: 0, y2: 5, x1: 0, x2: 5 }]);
    }

    #[test]
    fn floor_sqrt_matches_definition() {
        for n in 1..2000u32 {
            let r = floor_sqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n, "n = {}", n);
        }
    }
}
