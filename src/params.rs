//! Parameter snapshot driving the conversion pipeline.
//!
//! A [`NegativeParams`] value fully determines the pipeline output for a
//! given original buffer. It is `Copy` and replaced wholesale on every
//! change; the UI never edits a snapshot that a render is reading.

use crate::error::{Error, Result};

/// Film-base (orange mask) colour used as the white reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BaseColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for BaseColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl Default for BaseColor {
    fn default() -> Self {
        FilmStock::GenericOrange.base_color()
    }
}

/// Split-tone adjustments, one `[r, g, b]` triple per band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneParameters {
    /// Additive offset in channel-value units.
    pub shadows: [f64; 3],
    /// Power-curve strength; 0 leaves the channel untouched.
    pub midtones: [f64; 3],
    /// Percentage gain; 0 leaves the channel untouched.
    pub highlights: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTone {
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for GlobalTone {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.1,
        }
    }
}

/// All conversion parameters controlled by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeParams {
    pub base_color: BaseColor,
    pub exposure: f64,
    pub tone: ToneParameters,
    pub global: GlobalTone,
}

impl Default for NegativeParams {
    fn default() -> Self {
        Self {
            base_color: BaseColor::default(),
            exposure: 1.1,
            tone: ToneParameters::default(),
            global: GlobalTone::default(),
        }
    }
}

impl NegativeParams {
    /// Parameters under which the pipeline reduces to `255 - v`.
    pub fn neutral() -> Self {
        Self {
            base_color: BaseColor::new(0, 0, 0),
            exposure: 1.0,
            tone: ToneParameters::default(),
            global: GlobalTone {
                brightness: 1.0,
                contrast: 1.0,
            },
        }
    }

    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<()> {
        positive("exposure", self.exposure)?;
        positive("brightness", self.global.brightness)?;
        if !self.global.contrast.is_finite() || self.global.contrast < 0.0 {
            return Err(Error::InvalidParameter {
                name: "contrast",
                value: self.global.contrast,
            });
        }
        finite_triple("shadows", &self.tone.shadows)?;
        finite_triple("midtones", &self.tone.midtones)?;
        finite_triple("highlights", &self.tone.highlights)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

fn finite_triple(name: &'static str, values: &[f64; 3]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(Error::InvalidParameter { name, value }),
        None => Ok(()),
    }
}

/// Partial parameter update coming from the UI boundary.
///
/// Unset fields keep the value of the snapshot the update is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamsUpdate {
    pub base_color: Option<BaseColor>,
    pub exposure: Option<f64>,
    pub shadows: Option<[f64; 3]>,
    pub midtones: Option<[f64; 3]>,
    pub highlights: Option<[f64; 3]>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
}

impl ParamsUpdate {
    /// Produce a new validated snapshot; `current` is left untouched.
    pub fn apply(&self, current: &NegativeParams) -> Result<NegativeParams> {
        let mut next = *current;
        if let Some(base) = self.base_color {
            next.base_color = base;
        }
        if let Some(exposure) = self.exposure {
            next.exposure = exposure;
        }
        if let Some(shadows) = self.shadows {
            next.tone.shadows = shadows;
        }
        if let Some(midtones) = self.midtones {
            next.tone.midtones = midtones;
        }
        if let Some(highlights) = self.highlights {
            next.tone.highlights = highlights;
        }
        if let Some(brightness) = self.brightness {
            next.global.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            next.global.contrast = contrast;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Typical film-base colours for common negative stocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmStock {
    GenericOrange,
    Portra,
    Ektar,
    Gold,
    Fuji400H,
}

impl FilmStock {
    pub const ALL: &[FilmStock] = &[
        FilmStock::GenericOrange,
        FilmStock::Portra,
        FilmStock::Ektar,
        FilmStock::Gold,
        FilmStock::Fuji400H,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilmStock::GenericOrange => "Generic orange mask",
            FilmStock::Portra => "Kodak Portra",
            FilmStock::Ektar => "Kodak Ektar",
            FilmStock::Gold => "Kodak Gold",
            FilmStock::Fuji400H => "Fuji Pro 400H",
        }
    }

    pub fn base_color(self) -> BaseColor {
        match self {
            FilmStock::GenericOrange => BaseColor::new(240, 170, 140),
            FilmStock::Portra => BaseColor::new(232, 160, 122),
            FilmStock::Ektar => BaseColor::new(226, 150, 112),
            FilmStock::Gold => BaseColor::new(238, 172, 130),
            FilmStock::Fuji400H => BaseColor::new(218, 168, 150),
        }
    }

    /// The preset whose base colour is exactly `base`, if any.
    pub fn matching(base: BaseColor) -> Option<FilmStock> {
        FilmStock::ALL
            .iter()
            .copied()
            .find(|stock| stock.base_color() == base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let p = NegativeParams::default();
        assert_eq!(p.base_color, BaseColor::new(240, 170, 140));
        assert_eq!(p.exposure, 1.1);
        assert_eq!(p.global.brightness, 1.0);
        assert_eq!(p.global.contrast, 1.1);
        assert_eq!(p.tone, ToneParameters::default());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let current = NegativeParams::default();
        let update = ParamsUpdate {
            brightness: Some(1.4),
            shadows: Some([5.0, 0.0, -5.0]),
            ..Default::default()
        };
        let next = update.apply(&current).unwrap();
        assert_eq!(next.global.brightness, 1.4);
        assert_eq!(next.tone.shadows, [5.0, 0.0, -5.0]);
        assert_eq!(next.exposure, current.exposure);
        assert_eq!(next.base_color, current.base_color);
        assert_eq!(current.global.brightness, 1.0);
    }

    #[test]
    fn update_rejects_non_positive_exposure() {
        let update = ParamsUpdate {
            exposure: Some(0.0),
            ..Default::default()
        };
        let err = update.apply(&NegativeParams::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "exposure",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_non_finite_tone_and_negative_contrast() {
        let mut p = NegativeParams::default();
        p.tone.highlights[1] = f64::NAN;
        assert!(matches!(
            p.validate(),
            Err(Error::InvalidParameter {
                name: "highlights",
                ..
            })
        ));

        let mut p = NegativeParams::default();
        p.global.contrast = -0.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn presets_have_unique_names() {
        for (i, a) in FilmStock::ALL.iter().enumerate() {
            for b in &FilmStock::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
        assert_eq!(
            FilmStock::GenericOrange.base_color(),
            BaseColor::default()
        );
    }

    #[test]
    fn edited_base_no_longer_matches_a_preset() {
        for &stock in FilmStock::ALL {
            assert_eq!(FilmStock::matching(stock.base_color()), Some(stock));
        }
        let mut base = FilmStock::Portra.base_color();
        base.g += 1;
        assert_eq!(FilmStock::matching(base), None);
        assert_eq!(FilmStock::matching(BaseColor::new(0, 0, 0)), None);
    }
}
