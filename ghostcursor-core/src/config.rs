//! Renderer configuration.
//!
//! `RenderOptions` is what the settings file (or a caller) supplies: every
//! field optional, camelCase keys. `RenderConfig` is the resolved, clamped
//! form the renderer actually runs with. Resolution never fails; bad values
//! are pulled back into range and logged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blend::BlendMode;
use crate::color::Rgb;

// ════════════════════════════════════════════════════════════════════
// Defaults
// ════════════════════════════════════════════════════════════════════

pub const DEFAULT_TRAIL_LENGTH: usize = 50;
/// Upper bound on the trail; keeps the smoke uniform well inside the
/// 64 KiB uniform binding limit and the fragment loop affordable.
pub const MAX_TRAIL_LENGTH: usize = 1024;
pub const DEFAULT_INERTIA: f32 = 0.5;
pub const DEFAULT_BLOOM_STRENGTH: f32 = 0.1;
pub const DEFAULT_BLOOM_RADIUS: f32 = 1.0;
pub const DEFAULT_BLOOM_THRESHOLD: f32 = 0.025;
pub const DEFAULT_GRAIN_INTENSITY: f32 = 0.05;
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
pub const DEFAULT_COLOR: &str = "#B19EEF";
pub const DEFAULT_EDGE_INTENSITY: f32 = 0.0;
pub const DEFAULT_MAX_DEVICE_PIXEL_RATIO: f64 = 0.5;
pub const DEFAULT_Z_INDEX: i32 = 10;

/// Pixel budget, fade delay and fade duration differ between touch and
/// pointer devices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceDefaults {
    pub target_pixels: f64,
    pub fade_delay_ms: f64,
    pub fade_duration_ms: f64,
}

impl DeviceDefaults {
    pub const TOUCH: DeviceDefaults = DeviceDefaults {
        target_pixels: 0.9e6,
        fade_delay_ms: 500.0,
        fade_duration_ms: 1000.0,
    };

    pub const POINTER: DeviceDefaults = DeviceDefaults {
        target_pixels: 1.3e6,
        fade_delay_ms: 1000.0,
        fade_duration_ms: 1500.0,
    };

    pub fn for_device(is_touch: bool) -> DeviceDefaults {
        if is_touch { Self::TOUCH } else { Self::POINTER }
    }
}

// ════════════════════════════════════════════════════════════════════
// Options (serde-facing)
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub trail_length: Option<f64>,
    pub inertia: Option<f32>,
    pub bloom_strength: Option<f32>,
    pub bloom_radius: Option<f32>,
    pub bloom_threshold: Option<f32>,
    pub grain_intensity: Option<f32>,
    pub brightness: Option<f32>,
    pub color: Option<String>,
    pub mix_blend_mode: Option<String>,
    pub edge_intensity: Option<f32>,
    pub max_device_pixel_ratio: Option<f64>,
    pub target_pixels: Option<f64>,
    pub fade_delay_ms: Option<f64>,
    pub fade_duration_ms: Option<f64>,
    pub z_index: Option<f64>,
}

impl RenderOptions {
    /// Resolve against the host's input device, clamping anything invalid.
    pub fn resolve(&self, is_touch: bool) -> RenderConfig {
        let device = DeviceDefaults::for_device(is_touch);

        let trail_length = match self.trail_length.map(f64::floor) {
            None => DEFAULT_TRAIL_LENGTH,
            Some(n) if n.is_nan() => {
                tracing::warn!("trail length is not a number, using {DEFAULT_TRAIL_LENGTH}");
                DEFAULT_TRAIL_LENGTH
            }
            Some(n) if n < 1.0 => {
                tracing::warn!(trail_length = n, "trail length below 1, using 1");
                1
            }
            Some(n) if n > MAX_TRAIL_LENGTH as f64 => {
                tracing::warn!(trail_length = n, max = MAX_TRAIL_LENGTH, "trail length capped");
                MAX_TRAIL_LENGTH
            }
            Some(n) => n as usize,
        };

        let color = match self.color.as_deref() {
            None => default_color(),
            Some(raw) => raw.parse::<Rgb>().unwrap_or_else(|e| {
                tracing::warn!("{e}, using {DEFAULT_COLOR}");
                default_color()
            }),
        };

        let blend_mode = match self.mix_blend_mode.as_deref() {
            None => BlendMode::default(),
            Some(raw) => raw.parse::<BlendMode>().unwrap_or_else(|e| {
                tracing::warn!("{e}, using {}", BlendMode::default());
                BlendMode::default()
            }),
        };

        RenderConfig {
            trail_length,
            inertia: unit(self.inertia.unwrap_or(DEFAULT_INERTIA)),
            bloom: BloomSettings {
                strength: non_negative(self.bloom_strength.unwrap_or(DEFAULT_BLOOM_STRENGTH)),
                radius: unit(self.bloom_radius.unwrap_or(DEFAULT_BLOOM_RADIUS)),
                threshold: non_negative(self.bloom_threshold.unwrap_or(DEFAULT_BLOOM_THRESHOLD)),
            },
            grain_intensity: non_negative(self.grain_intensity.unwrap_or(DEFAULT_GRAIN_INTENSITY)),
            brightness: non_negative(self.brightness.unwrap_or(DEFAULT_BRIGHTNESS)),
            color,
            blend_mode,
            edge_intensity: non_negative(self.edge_intensity.unwrap_or(DEFAULT_EDGE_INTENSITY)),
            max_device_pixel_ratio: positive_f64(
                self.max_device_pixel_ratio.unwrap_or(DEFAULT_MAX_DEVICE_PIXEL_RATIO),
                DEFAULT_MAX_DEVICE_PIXEL_RATIO,
            ),
            target_pixels: positive_f64(
                self.target_pixels.unwrap_or(device.target_pixels),
                device.target_pixels,
            ),
            fade_delay: millis(self.fade_delay_ms.unwrap_or(device.fade_delay_ms)),
            fade_duration: millis(self.fade_duration_ms.unwrap_or(device.fade_duration_ms)),
            z_index: self.z_index.map_or(DEFAULT_Z_INDEX, z_index),
        }
    }
}

fn default_color() -> Rgb {
    Rgb::from_u8(0xB1, 0x9E, 0xEF)
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn positive_f64(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

/// Non-finite and negative values mean "no delay"; anything too large for
/// a `Duration` saturates.
fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

fn z_index(z: f64) -> i32 {
    if z.is_nan() {
        DEFAULT_Z_INDEX
    } else {
        // `as` saturates at the i32 bounds.
        z.floor() as i32
    }
}

// ════════════════════════════════════════════════════════════════════
// Resolved config
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub trail_length: usize,
    pub inertia: f32,
    pub bloom: BloomSettings,
    pub grain_intensity: f32,
    pub brightness: f32,
    pub color: Rgb,
    pub blend_mode: BlendMode,
    pub edge_intensity: f32,
    pub max_device_pixel_ratio: f64,
    pub target_pixels: f64,
    pub fade_delay: Duration,
    pub fade_duration: Duration,
    pub z_index: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderOptions::default().resolve(false)
    }
}

impl RenderConfig {
    pub fn live_params(&self) -> LiveParams {
        LiveParams {
            color: self.color,
            brightness: self.brightness,
            edge_intensity: self.edge_intensity,
            grain_intensity: self.grain_intensity,
            blend_mode: self.blend_mode,
        }
    }

    pub fn apply_live(&mut self, live: &LiveParams) {
        self.color = live.color;
        self.brightness = live.brightness;
        self.edge_intensity = live.edge_intensity;
        self.grain_intensity = live.grain_intensity;
        self.blend_mode = live.blend_mode;
    }

    /// True when `other` differs in anything outside the live subset, i.e.
    /// switching to it needs a new pipeline.
    pub fn requires_rebuild(&self, other: &RenderConfig) -> bool {
        let mut normalized = other.clone();
        normalized.apply_live(&self.live_params());
        normalized != *self
    }
}

/// The subset of the config that can change without rebuilding the
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveParams {
    pub color: Rgb,
    pub brightness: f32,
    pub edge_intensity: f32,
    pub grain_intensity: f32,
    pub blend_mode: BlendMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.trail_length, 50);
        assert_eq!(cfg.inertia, 0.5);
        assert_eq!(cfg.bloom.strength, 0.1);
        assert_eq!(cfg.bloom.radius, 1.0);
        assert_eq!(cfg.bloom.threshold, 0.025);
        assert_eq!(cfg.grain_intensity, 0.05);
        assert_eq!(cfg.blend_mode, BlendMode::Screen);
        assert_eq!(cfg.z_index, 10);
        assert_eq!(cfg.color.to_hex(), "#b19eef");
        assert_eq!(cfg.fade_delay, Duration::from_millis(1000));
        assert_eq!(cfg.fade_duration, Duration::from_millis(1500));
        assert_eq!(cfg.target_pixels, 1.3e6);
    }

    #[test]
    fn test_touch_defaults() {
        let cfg = RenderOptions::default().resolve(true);
        assert_eq!(cfg.target_pixels, 0.9e6);
        assert_eq!(cfg.fade_delay, Duration::from_millis(500));
        assert_eq!(cfg.fade_duration, Duration::from_millis(1000));
    }

    #[test]
    fn test_explicit_values_beat_device_defaults() {
        let opts = RenderOptions {
            target_pixels: Some(2.0e6),
            fade_delay_ms: Some(0.0),
            ..Default::default()
        };
        let cfg = opts.resolve(true);
        assert_eq!(cfg.target_pixels, 2.0e6);
        assert_eq!(cfg.fade_delay, Duration::ZERO);
    }

    #[test]
    fn test_huge_durations_saturate() {
        assert_eq!(millis(1e30), Duration::MAX);
        assert_eq!(millis(f64::MAX), Duration::MAX);
        assert_eq!(millis(f64::INFINITY), Duration::ZERO);
        assert_eq!(millis(250.0), Duration::from_millis(250));
    }

    #[test]
    fn test_z_index_floors_and_saturates() {
        assert_eq!(z_index(2.9), 2);
        assert_eq!(z_index(-0.5), -1);
        assert_eq!(z_index(1e12), i32::MAX);
        assert_eq!(z_index(f64::NAN), DEFAULT_Z_INDEX);
    }
}
