//! Internal resolution under a device-pixel-ratio cap and a pixel budget.
//!
//! High-density displays would otherwise make the smoke shader (N+1 fBm
//! evaluations per pixel) the most expensive thing on the page. The budget
//! bounds `width * height * dpr²`; the scale factor never drops below 0.5
//! so the effect never turns to mush on very large surfaces.

/// Lower bound of the budget-driven scale factor.
pub const MIN_BUDGET_SCALE: f64 = 0.5;

/// Logical size the `scale` uniform is normalized against.
const SCALE_BASE: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Host size in logical (CSS) pixels, floored, at least 1.
    pub logical_width: u32,
    pub logical_height: u32,
    /// `min(device dpr, cap) * budget scale`.
    pub pixel_ratio: f64,
    /// Budget-driven downscale in `[0.5, 1.0]`.
    pub budget_scale: f64,
    /// Backing-store size in physical pixels, at least 1.
    pub width: u32,
    pub height: u32,
    /// `min(w, h) / 600`, clamped to `[0.5, 2.0]`.
    pub pattern_scale: f32,
}

impl Viewport {
    pub fn compute(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
        max_device_pixel_ratio: f64,
        target_pixels: f64,
    ) -> Viewport {
        let css_w = floor_at_least_one(logical_width);
        let css_h = floor_at_least_one(logical_height);

        let device_dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let dpr = device_dpr.min(max_device_pixel_ratio);

        let need = css_w * css_h * dpr * dpr;
        let budget_scale = if need <= target_pixels {
            1.0
        } else {
            (target_pixels / need.max(1.0))
                .sqrt()
                .clamp(MIN_BUDGET_SCALE, 1.0)
        };
        let pixel_ratio = dpr * budget_scale;

        let width = floor_at_least_one(css_w * pixel_ratio) as u32;
        let height = floor_at_least_one(css_h * pixel_ratio) as u32;

        let pattern_scale = (css_w.min(css_h) / SCALE_BASE).clamp(0.5, 2.0) as f32;

        Viewport {
            logical_width: css_w as u32,
            logical_height: css_h as u32,
            pixel_ratio,
            budget_scale,
            width,
            height,
            pattern_scale,
        }
    }

    /// `[width, height, 1.0]`, the shader's resolution uniform.
    pub fn resolution(&self) -> [f32; 3] {
        [self.width as f32, self.height as f32, 1.0]
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn floor_at_least_one(v: f64) -> f64 {
    if v.is_finite() { v.floor().max(1.0) } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_surface_is_unscaled() {
        let v = Viewport::compute(800.0, 600.0, 2.0, 0.5, 1.3e6);
        assert_eq!(v.budget_scale, 1.0);
        assert_eq!(v.pixel_ratio, 0.5);
        assert_eq!((v.width, v.height), (400, 300));
        assert_eq!(v.pattern_scale, 1.0);
    }

    #[test]
    fn test_zero_size_is_floored_to_one() {
        let v = Viewport::compute(0.0, -5.0, 1.0, 1.0, 1.0e6);
        assert_eq!((v.logical_width, v.logical_height), (1, 1));
        assert_eq!((v.width, v.height), (1, 1));
        assert_eq!(v.pattern_scale, 0.5);
    }
}
