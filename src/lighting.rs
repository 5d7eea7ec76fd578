//! Viewer-wide lighting attributes.
//!
//! These are global to the viewer, not per mesh: the render-mode applier flips
//! the environment lighting, the session owns the rest.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::ViewerError;

/// Image-based ambient lighting source of the whole scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// The neutral studio environment.
    #[default]
    Neutral,
    /// No environment image; only direct lights contribute.
    Disabled,
}

/// An sRGB colour as entered in a colour picker (`#rrggbb`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightColor(pub [u8; 3]);

impl LightColor {
    pub const WHITE: LightColor = LightColor([0xff, 0xff, 0xff]);

    pub fn to_u32(self) -> u32 {
        let [r, g, b] = self.0;
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Degrees of the hue rotation filter that tints the viewer for this colour.
    pub fn hue_rotation(self) -> u32 {
        self.to_u32() % 360
    }
}

impl Default for LightColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for LightColor {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ViewerError::InvalidLightColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(LightColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Values the lighting controls start from and return to on reset.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingDefaults {
    pub exposure: f32,
    pub shadow_intensity: f32,
    pub light_intensity: f32,
}

impl Default for LightingDefaults {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            shadow_intensity: 1.0,
            light_intensity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub environment: Environment,
    pub exposure: f32,
    pub shadow_intensity: f32,
    pub light_intensity: f32,
    pub light_color: LightColor,
    /// Hue rotation in degrees, `None` when no colour filter is applied.
    pub hue_filter: Option<u32>,
}

impl Lighting {
    pub fn new(defaults: LightingDefaults) -> Self {
        Self {
            environment: Environment::default(),
            exposure: defaults.exposure,
            shadow_intensity: defaults.shadow_intensity,
            light_intensity: defaults.light_intensity,
            light_color: LightColor::WHITE,
            hue_filter: None,
        }
    }

    pub fn set_light_color(&mut self, color: LightColor) {
        self.light_color = color;
        self.hue_filter = Some(color.hue_rotation());
    }

    /**
     * Returns every control to its default and drops the colour filter.
     * The environment is left alone, it belongs to the render mode.
     */
    pub fn reset(&mut self, defaults: LightingDefaults) {
        let environment = self.environment;
        *self = Self::new(defaults);
        self.environment = environment;
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new(LightingDefaults::default())
    }
}
