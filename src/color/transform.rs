//! Per-channel negative-to-positive transform.
//!
//! Each 8-bit channel value goes through a fixed stage list:
//! mask removal + exposure, inversion, shadow offset, highlight gain,
//! midtone power curve, brightness, contrast. Stages work on `f64` and are
//! allowed to leave [0, 255]; only [`to_byte`] clamps.

use crate::params::NegativeParams;

/// Base-colour channels at or below this value are never used as divisors.
pub const BASE_EPSILON: u8 = 10;

/// Contrast pivot.
pub const MID_GRAY: f64 = 128.0;

/// Stage 1: divide out the film-base colour and apply exposure.
pub fn remove_mask(v: f64, base: u8, exposure: f64) -> f64 {
    if base > BASE_EPSILON {
        v / base as f64 * 255.0 * exposure
    } else {
        v
    }
}

/// Stage 2.
pub fn invert(v: f64) -> f64 {
    255.0 - v
}

/// Stage 3: additive shadow offset.
pub fn apply_shadow(v: f64, shadow: f64) -> f64 {
    v + shadow
}

/// Stage 4: highlight gain in percent.
pub fn apply_highlight(v: f64, highlight: f64) -> f64 {
    v * (1.0 + highlight / 100.0)
}

/// Stage 5: midtone power curve. Positive strength brightens midtones.
///
/// Strengths at or below -50 give an infinite or negative exponent, so a
/// zero input can blow up to infinity. The result is saturated to a finite
/// value so later stages never see `inf`.
pub fn apply_midtone(v: f64, mid: f64) -> f64 {
    if mid == 0.0 {
        return v;
    }
    let exponent = 1.0 / (1.0 + mid / 50.0);
    saturate(255.0 * (v / 255.0).max(0.0).powf(exponent))
}

/// Stage 6.
pub fn apply_brightness(v: f64, brightness: f64) -> f64 {
    saturate(v * brightness)
}

/// Stage 7: scale around mid-gray.
pub fn apply_contrast(v: f64, contrast: f64) -> f64 {
    contrast * (v - MID_GRAY) + MID_GRAY
}

fn saturate(v: f64) -> f64 {
    v.clamp(f64::MIN, f64::MAX)
}

/// Final write policy shared by preview and export: round half away from
/// zero, then clamp to the byte range.
pub fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// The slice of a [`NegativeParams`] snapshot that one channel depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    pub base: u8,
    pub shadow: f64,
    pub midtone: f64,
    pub highlight: f64,
}

/// Transform for all three colour channels, built from one parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTransform {
    channels: [ChannelParams; 3],
    exposure: f64,
    brightness: f64,
    contrast: f64,
}

impl ChannelTransform {
    pub fn new(params: &NegativeParams) -> Self {
        let base = params.base_color.to_array();
        let tone = &params.tone;
        let channels = std::array::from_fn(|c| ChannelParams {
            base: base[c],
            shadow: tone.shadows[c],
            midtone: tone.midtones[c],
            highlight: tone.highlights[c],
        });
        Self {
            channels,
            exposure: params.exposure,
            brightness: params.global.brightness,
            contrast: params.global.contrast,
        }
    }

    pub fn channel(&self, channel: usize) -> &ChannelParams {
        &self.channels[channel]
    }

    /// Run one channel value (0 = R, 1 = G, 2 = B) through every stage.
    /// The result is not clamped.
    pub fn apply(&self, channel: usize, value: u8) -> f64 {
        let p = &self.channels[channel];
        let mut v = value as f64;
        v = remove_mask(v, p.base, self.exposure);
        v = invert(v);
        v = apply_shadow(v, p.shadow);
        v = apply_highlight(v, p.highlight);
        v = apply_midtone(v, p.midtone);
        v = apply_brightness(v, self.brightness);
        apply_contrast(v, self.contrast)
    }

    /// Precompute the clamped output for every possible input byte.
    pub fn lookup_tables(&self) -> [[u8; 256]; 3] {
        let mut luts = [[0u8; 256]; 3];
        for (c, lut) in luts.iter_mut().enumerate() {
            for (i, out) in lut.iter_mut().enumerate() {
                *out = to_byte(self.apply(c, i as u8));
            }
        }
        luts
    }
}
