//! Contiguous RGBA8 pixel storage shared by every stage of the converter.

use crate::error::{Error, Result};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A width x height grid of RGBA8 pixels stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer of the given size filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at (x, y), or `None` when outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.data[idx..idx + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSizeMismatch {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn from_raw_rejects_zero_dimension() {
        let err = PixelBuffer::from_raw(0, 3, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 3 }));
    }

    #[test]
    fn pixel_reads_row_major() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // pixel (2, 1) -> index (1 * 3 + 2) * 4 = 20
        data[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let buf = PixelBuffer::from_raw(3, 2, data).unwrap();
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(3, 1), None);
        assert_eq!(buf.pixel(0, 2), None);
    }

    #[test]
    fn filled_repeats_value() {
        let buf = PixelBuffer::filled(4, 3, [9, 8, 7, 255]).unwrap();
        assert_eq!(buf.as_bytes().len(), 48);
        assert!(buf.as_bytes().chunks_exact(4).all(|p| p == [9, 8, 7, 255]));
    }
}
