//! Compositing modes for the overlay.
//!
//! Names follow CSS `mix-blend-mode`. The numeric code is what the composite
//! shader switches on, so the order of variants here is load-bearing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    Normal,
    Multiply,
    #[default]
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    PlusLighter,
}

impl BlendMode {
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
            BlendMode::PlusLighter,
        ]
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::PlusLighter => "plus-lighter",
        }
    }

    /// Index passed to the composite shader.
    pub fn shader_code(&self) -> u32 {
        *self as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blend mode '{0}'")]
pub struct UnknownBlendMode(pub String);

impl FromStr for BlendMode {
    type Err = UnknownBlendMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        // An empty mode means "no blending", same as the CSS initial value.
        if wanted.is_empty() {
            return Ok(BlendMode::Normal);
        }
        BlendMode::all()
            .iter()
            .copied()
            .find(|m| m.css_name() == wanted)
            .ok_or_else(|| UnknownBlendMode(s.to_string()))
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl Serialize for BlendMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.css_name())
    }
}

impl<'de> Deserialize<'de> for BlendMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for mode in BlendMode::all() {
            assert_eq!(mode.css_name().parse::<BlendMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn test_shader_codes_are_dense() {
        for (i, mode) in BlendMode::all().iter().enumerate() {
            assert_eq!(mode.shader_code(), i as u32);
        }
    }

    #[test]
    fn test_parse_is_forgiving_about_case_and_underscores() {
        assert_eq!("SCREEN".parse::<BlendMode>().unwrap(), BlendMode::Screen);
        assert_eq!("soft_light".parse::<BlendMode>().unwrap(), BlendMode::SoftLight);
        assert_eq!("".parse::<BlendMode>().unwrap(), BlendMode::Normal);
        assert!("hue".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_unknown_mode_error_message() {
        let err = "Hue".parse::<BlendMode>().unwrap_err();
        assert_eq!(err, UnknownBlendMode("Hue".into()));
        assert_eq!(err.to_string(), "unknown blend mode 'Hue'");
        let _: &dyn std::error::Error = &err;
    }
}
