use image::RgbaImage;
use image::imageops;

use crate::constants::TILE_COUNT;
use crate::image_prep::SquareImage;
use crate::rotation::Rotation;

/// Edge length of one tile. Remainder pixels past `TILE_COUNT * tile_size`
/// on the right and bottom belong to no tile.
pub fn tile_size_for(source: &SquareImage) -> u32 {
    source.size() / TILE_COUNT
}

/// Row-major cell index to `(col, row)`.
pub fn cell_of(index: usize) -> (u32, u32) {
    let n = TILE_COUNT as usize;
    ((index % n) as u32, (index / n) as u32)
}

/// Cut the tile at `(col, row)` out of `source` and turn it clockwise about
/// its own center. Square tiles keep their size for every quarter turn.
pub fn render_tile(
    source: &SquareImage,
    col: u32,
    row: u32,
    tile_size: u32,
    rotation: Rotation,
) -> RgbaImage {
    let tile = imageops::crop_imm(
        source.raster(),
        col * tile_size,
        row * tile_size,
        tile_size,
        tile_size,
    )
    .to_image();
    rotate(&tile, rotation)
}

fn rotate(tile: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Deg0 => tile.clone(),
        Rotation::Deg90 => imageops::rotate90(tile),
        Rotation::Deg180 => imageops::rotate180(tile),
        Rotation::Deg270 => imageops::rotate270(tile),
    }
}
