//! Reading film-base colour out of a pixel buffer.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::{Error, Result};

/// Default eyedropper radius: a single pixel. Larger radii average a patch.
pub const DEFAULT_SAMPLE_RADIUS: u32 = 0;

/// RGB at buffer-space (x, y) of a row-major RGBA slice. Alpha is ignored.
pub fn sample_rgb(data: &[u8], width: u32, x: u32, y: u32) -> Result<[u8; 3]> {
    let height = match (width as usize).checked_mul(CHANNELS) {
        Some(row_len) if row_len > 0 => u32::try_from(data.len() / row_len).unwrap_or(u32::MAX),
        _ => 0,
    };
    let out_of_range = Error::CoordinateOutOfRange {
        x,
        y,
        width,
        height,
    };
    if x >= width || y >= height {
        return Err(out_of_range);
    }
    let pixel = (y as usize)
        .checked_mul(width as usize)
        .and_then(|i| i.checked_add(x as usize))
        .and_then(|i| i.checked_mul(CHANNELS));
    let Some(offset) = pixel else {
        return Err(out_of_range);
    };
    match offset.checked_add(3).and_then(|end| data.get(offset..end)) {
        Some(p) => Ok([p[0], p[1], p[2]]),
        None => Err(out_of_range),
    }
}

/// [`sample_rgb`] on a [`PixelBuffer`].
pub fn sample_pixel(buffer: &PixelBuffer, x: u32, y: u32) -> Result<[u8; 3]> {
    sample_rgb(buffer.as_bytes(), buffer.width(), x, y)
}

/// Mean RGB over the square patch of side `2 * radius + 1` centred on
/// (cx, cy), clipped to the buffer edges. Rounded per channel.
pub fn sample_area(buffer: &PixelBuffer, cx: u32, cy: u32, radius: u32) -> Result<[u8; 3]> {
    let (w, h) = buffer.dimensions();
    if cx >= w || cy >= h {
        return Err(Error::CoordinateOutOfRange {
            x: cx,
            y: cy,
            width: w,
            height: h,
        });
    }

    let x0 = cx.saturating_sub(radius);
    let y0 = cy.saturating_sub(radius);
    let x1 = cx.saturating_add(radius).min(w - 1);
    let y1 = cy.saturating_add(radius).min(h - 1);

    let data = buffer.as_bytes();
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let idx = (y as usize * w as usize + x as usize) * CHANNELS;
            for c in 0..3 {
                sum[c] += data[idx + c] as u64;
            }
            count += 1;
        }
    }

    Ok(sum.map(|s| ((s as f64 / count as f64).round()) as u8))
}

/// Map a position inside a displayed image to buffer-space pixel coordinates.
///
/// `pos` is relative to the top-left corner of the displayed image and
/// `display_size` is its on-screen size. Returns `None` outside the image.
pub fn display_to_buffer(
    pos: (f32, f32),
    display_size: (f32, f32),
    buffer_size: (u32, u32),
) -> Option<(u32, u32)> {
    let (px, py) = pos;
    let (dw, dh) = display_size;
    let (bw, bh) = buffer_size;
    if dw <= 0.0 || dh <= 0.0 || bw == 0 || bh == 0 {
        return None;
    }
    if px < 0.0 || py < 0.0 || px >= dw || py >= dh {
        return None;
    }
    let x = ((px / dw) * bw as f32).floor() as u32;
    let y = ((py / dh) * bh as f32).floor() as u32;
    Some((x.min(bw - 1), y.min(bh - 1)))
}
