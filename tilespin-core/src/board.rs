use image::RgbaImage;
use tiny_skia::{Color, ColorU8, IntSize, Pixmap, PixmapPaint, Transform};

use crate::constants::{BOARD_GAP_PX, TILE_COUNT};
use crate::error::PuzzleError;
use crate::image_prep::encode_png;
use crate::session::TileState;
use crate::tile_render::cell_of;

/// Background visible through the gaps between tiles.
const BOARD_BG: Color = Color::WHITE;

fn to_pixmap(raster: &RgbaImage) -> Result<Pixmap, PuzzleError> {
    let size = IntSize::from_wh(raster.width(), raster.height()).ok_or(PuzzleError::Dimensions)?;
    // tiny-skia stores premultiplied alpha
    let mut data = Vec::with_capacity(raster.as_raw().len());
    for px in raster.pixels() {
        let [r, g, b, a] = px.0;
        let p = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or(PuzzleError::Dimensions)
}

fn from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    out
}

/// Lay the tiles out the way the page shows them: a `TILE_COUNT`-wide grid
/// with `BOARD_GAP_PX` between neighbours.
pub fn render_board(tiles: &[TileState]) -> Result<RgbaImage, PuzzleError> {
    let tile_size = tiles
        .first()
        .map(|t| t.raster.width())
        .filter(|w| *w > 0)
        .ok_or(PuzzleError::Dimensions)?;
    let edge = TILE_COUNT * tile_size + (TILE_COUNT - 1) * BOARD_GAP_PX;
    let mut board = Pixmap::new(edge, edge).ok_or(PuzzleError::Dimensions)?;
    board.fill(BOARD_BG);
    let paint = PixmapPaint::default();
    for (idx, tile) in tiles.iter().enumerate() {
        let (col, row) = cell_of(idx);
        let step = tile_size + BOARD_GAP_PX;
        let src = to_pixmap(&tile.raster)?;
        board.draw_pixmap(
            (col * step) as i32,
            (row * step) as i32,
            src.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
    Ok(from_pixmap(&board))
}

/// PNG bytes of [`render_board`], for the snapshot download.
pub fn board_png(tiles: &[TileState]) -> Result<Vec<u8>, PuzzleError> {
    encode_png(&render_board(tiles)?)
}
