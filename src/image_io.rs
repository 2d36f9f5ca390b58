use image::{DynamicImage, RgbaImage};
use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)?;
    log::info!("opened {}", path.display());
    Ok(img)
}

/// Decode any supported image into an RGBA8 buffer.
pub fn to_pixel_buffer(img: &DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    PixelBuffer::from_raw(w, h, rgba.into_raw())
}

pub fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    let (w, h) = buffer.dimensions();
    RgbaImage::from_raw(w, h, buffer.as_bytes().to_vec()).ok_or(Error::BufferSizeMismatch {
        expected: w as usize * h as usize * 4,
        actual: buffer.as_bytes().len(),
    })
}

/// Encode to the format implied by the file extension. JPEG has no alpha
/// channel, so it is dropped there.
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let rgba = to_rgba_image(buffer)?;
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        DynamicImage::ImageRgba8(rgba).to_rgb8().save(path)?;
    } else {
        rgba.save(path)?;
    }
    log::info!("saved {}x{} to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_images_gain_opaque_alpha() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            3,
            2,
            image::Rgb([10, 20, 30]),
        ));
        let buf = to_pixel_buffer(&img).unwrap();
        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn buffer_converts_back_to_rgba_image() {
        let buf = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
        let img = to_rgba_image(&buf).unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [1, 2, 3, 4]);
    }

    #[test]
    fn save_and_reload_png() {
        let dir = std::env::temp_dir().join(format!("negative_develop_io_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.png");
        let buf = PixelBuffer::filled(4, 3, [200, 100, 50, 255]).unwrap();
        save_image(&buf, &path).unwrap();
        let reloaded = to_pixel_buffer(&load_image(&path).unwrap()).unwrap();
        assert_eq!(reloaded, buf);
        std::fs::remove_dir_all(&dir).ok();
    }
}
