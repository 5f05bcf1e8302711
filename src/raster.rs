use crate::algorithm::SpatialAlgorithm;
use crate::site::Site;
use rayon::prelude::*;

/// Colors every cell of a row-major `width` x `height` buffer with its nearest site.
///
/// Rows are resolved in parallel; `algorithm` is only read. Nothing is written
/// when there are no sites.
pub fn rasterize<A: SpatialAlgorithm>(pixels: &mut [u32], width: usize, algorithm: &A, sites: &[Site]) {
    if sites.is_empty() || width == 0 {
        return;
    }

    pixels.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, pixel) in row.iter_mut().enumerate() {
            if let Some(n) = algorithm.nearest(sites, [x as i32, y as i32]) {
                *pixel = n.color;
            }
        }
    });
}

/// Sets every pixel to `color`.
pub fn fill(pixels: &mut [u32], color: u32) {
    pixels.par_iter_mut().for_each(|p| *p = color);
}

/// Paints a filled disc centred on (`cx`, `cy`), clipped to the buffer.
///
/// Covers the half-open square `[c - r, c + r)` on each axis.
pub fn draw_circle(pixels: &mut [u32], width: usize, height: usize, center: [i32; 2], radius: i32, color: u32) {
    let [cx, cy] = center;
    let r_sq = radius as i64 * radius as i64;

    let x0 = (cx - radius).max(0);
    let x1 = (cx + radius).min(width as i32);
    let y0 = (cy - radius).max(0);
    let y1 = (cy + radius).min(height as i32);

    for y in y0..y1 {
        let dy = (y - cy) as i64;
        let row = y as usize * width;
        for x in x0..x1 {
            let dx = (x - cx) as i64;
            if dx * dx + dy * dy <= r_sq {
                pixels[row + x as usize] = color;
            }
        }
    }
}
