use rayon::prelude::*;

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::color::transform::ChannelTransform;
use crate::error::{Error, Result};
use crate::params::NegativeParams;

/// Run the negative conversion over `source` and return a fresh buffer of
/// the same dimensions. `source` is only read.
pub fn process(source: &PixelBuffer, params: &NegativeParams) -> PixelBuffer {
    let mut out = source.clone();
    let luts = ChannelTransform::new(params).lookup_tables();
    apply_luts(source.as_bytes(), out.as_bytes_mut(), source.width(), &luts);
    out
}

/// Like [`process`], but writes into a caller-provided buffer.
pub fn process_into(
    source: &PixelBuffer,
    params: &NegativeParams,
    out: &mut PixelBuffer,
) -> Result<()> {
    if source.dimensions() != out.dimensions() {
        return Err(Error::DimensionMismatch {
            src_w: source.width(),
            src_h: source.height(),
            out_w: out.width(),
            out_h: out.height(),
        });
    }
    let luts = ChannelTransform::new(params).lookup_tables();
    apply_luts(source.as_bytes(), out.as_bytes_mut(), source.width(), &luts);
    Ok(())
}

/// Row-parallel table lookup. Alpha is copied from the source.
fn apply_luts(src: &[u8], dst: &mut [u8], width: u32, luts: &[[u8; 256]; 3]) {
    let stride = width as usize * CHANNELS;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(row_out, row_in)| {
            for (px_out, px_in) in row_out
                .chunks_exact_mut(CHANNELS)
                .zip(row_in.chunks_exact(CHANNELS))
            {
                px_out[0] = luts[0][px_in[0] as usize];
                px_out[1] = luts[1][px_in[1] as usize];
                px_out[2] = luts[2][px_in[2] as usize];
                px_out[3] = px_in[3];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::transform::to_byte;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i * 7 % 256) as u8;
                [v, v.wrapping_mul(3), 255 - v, (i % 256) as u8]
            })
            .collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn neutral_run_is_pure_inversion() {
        let src = gradient(13, 7);
        let out = process(&src, &NegativeParams::neutral());
        for (o, s) in out.as_bytes().chunks_exact(4).zip(src.as_bytes().chunks_exact(4)) {
            assert_eq!(o[0], 255 - s[0]);
            assert_eq!(o[1], 255 - s[1]);
            assert_eq!(o[2], 255 - s[2]);
            assert_eq!(o[3], s[3], "alpha must be copied");
        }
    }

    #[test]
    fn source_is_not_mutated() {
        let src = gradient(9, 9);
        let before = src.clone();
        let _ = process(&src, &NegativeParams::default());
        assert_eq!(src, before);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let src = gradient(32, 17);
        let params = NegativeParams::default();
        assert_eq!(process(&src, &params), process(&src, &params));
    }

    #[test]
    fn matches_per_pixel_transform() {
        let src = gradient(5, 5);
        let mut params = NegativeParams::default();
        params.tone.midtones = [10.0, -10.0, 30.0];
        let t = ChannelTransform::new(&params);
        let out = process(&src, &params);
        for (o, s) in out.as_bytes().chunks_exact(4).zip(src.as_bytes().chunks_exact(4)) {
            for c in 0..3 {
                assert_eq!(o[c], to_byte(t.apply(c, s[c])));
            }
        }
    }

    #[test]
    fn process_into_rejects_mismatched_output() {
        let src = gradient(4, 4);
        let mut out = PixelBuffer::filled(4, 5, [0; 4]).unwrap();
        let err = process_into(&src, &NegativeParams::default(), &mut out).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn process_into_overwrites_previous_output() {
        let src = gradient(6, 3);
        let params = NegativeParams::default();
        let mut out = PixelBuffer::filled(6, 3, [1, 2, 3, 4]).unwrap();
        process_into(&src, &params, &mut out).unwrap();
        assert_eq!(out, process(&src, &params));
    }
}
