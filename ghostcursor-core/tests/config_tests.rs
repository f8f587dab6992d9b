// ghostcursor-core/tests/config_tests.rs
//
// Integration tests for configuration and settings:
//   RenderOptions  — JSON shape, clamping, fallbacks
//   RenderConfig   — live subset, rebuild detection
//   Viewport       — pixel budget invariants across sizes and densities
//   settings       — file loading, missing/blank/malformed files

use std::io::Write;
use std::time::Duration;

use ghostcursor_core::config::MAX_TRAIL_LENGTH;
use ghostcursor_core::settings::{load_settings, load_settings_or_default, parse_settings};
use ghostcursor_core::{BlendMode, ConfigError, RenderConfig, RenderOptions, Rgb, Viewport};

// ============================================================================
// RenderOptions — JSON
// ============================================================================

#[test]
fn test_options_parse_camel_case_keys() {
    let json = r##"{
        "trailLength": 12,
        "inertia": 0.8,
        "bloomStrength": 0.3,
        "bloomRadius": 0.5,
        "bloomThreshold": 0.1,
        "grainIntensity": 0.0,
        "brightness": 2.0,
        "color": "#ff0000",
        "mixBlendMode": "lighten",
        "edgeIntensity": 0.25,
        "maxDevicePixelRatio": 1.0,
        "targetPixels": 500000,
        "fadeDelayMs": 200,
        "fadeDurationMs": 300,
        "zIndex": -1
    }"##;
    let opts: RenderOptions = serde_json::from_str(json).unwrap();
    let cfg = opts.resolve(false);
    assert_eq!(cfg.trail_length, 12);
    assert_eq!(cfg.inertia, 0.8);
    assert_eq!(cfg.bloom.strength, 0.3);
    assert_eq!(cfg.bloom.radius, 0.5);
    assert_eq!(cfg.bloom.threshold, 0.1);
    assert_eq!(cfg.grain_intensity, 0.0);
    assert_eq!(cfg.brightness, 2.0);
    assert_eq!(cfg.color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(cfg.blend_mode, BlendMode::Lighten);
    assert_eq!(cfg.edge_intensity, 0.25);
    assert_eq!(cfg.max_device_pixel_ratio, 1.0);
    assert_eq!(cfg.target_pixels, 500000.0);
    assert_eq!(cfg.fade_delay, Duration::from_millis(200));
    assert_eq!(cfg.fade_duration, Duration::from_millis(300));
    assert_eq!(cfg.z_index, -1);
}

#[test]
fn test_options_empty_object_is_all_defaults() {
    let opts: RenderOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, RenderOptions::default());
    assert_eq!(opts.resolve(false), RenderConfig::default());
}

#[test]
fn test_options_serialize_round_trip_keeps_keys() {
    let opts = RenderOptions {
        trail_length: Some(8.0),
        mix_blend_mode: Some("multiply".into()),
        ..Default::default()
    };
    let json = serde_json::to_string(&opts).unwrap();
    assert!(json.contains("\"trailLength\":8.0"));
    assert!(json.contains("\"mixBlendMode\":\"multiply\""));
}

// ============================================================================
// RenderOptions — clamping
// ============================================================================

#[test]
fn test_trail_length_zero_and_negative_clamp_to_one() {
    for n in [0.0, 0.9, -1.0, -1000.0] {
        let cfg = RenderOptions {
            trail_length: Some(n),
            ..Default::default()
        }
        .resolve(false);
        assert_eq!(cfg.trail_length, 1);
    }
}

#[test]
fn test_trail_length_is_capped() {
    let cfg = RenderOptions {
        trail_length: Some(1.0e6),
        ..Default::default()
    }
    .resolve(false);
    assert_eq!(cfg.trail_length, MAX_TRAIL_LENGTH);
}

#[test]
fn test_out_of_range_scalars_are_clamped() {
    let cfg = RenderOptions {
        inertia: Some(3.0),
        bloom_radius: Some(-2.0),
        brightness: Some(-1.0),
        grain_intensity: Some(f32::NAN),
        max_device_pixel_ratio: Some(0.0),
        target_pixels: Some(-5.0),
        fade_delay_ms: Some(-10.0),
        ..Default::default()
    }
    .resolve(false);
    assert_eq!(cfg.inertia, 1.0);
    assert_eq!(cfg.bloom.radius, 0.0);
    assert_eq!(cfg.brightness, 0.0);
    assert_eq!(cfg.grain_intensity, 0.0);
    assert_eq!(cfg.max_device_pixel_ratio, 0.5);
    assert_eq!(cfg.target_pixels, 1.3e6);
    assert_eq!(cfg.fade_delay, Duration::ZERO);
}

#[test]
fn test_fractional_trail_length_is_floored_and_file_kept() {
    let opts: RenderOptions =
        serde_json::from_str(r##"{ "trailLength": 3.7, "color": "#ff0000", "zIndex": 4.5 }"##).unwrap();
    let cfg = opts.resolve(false);
    assert_eq!(cfg.trail_length, 3);
    assert_eq!(cfg.color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(cfg.z_index, 4);

    let whole: RenderOptions = serde_json::from_str(r#"{ "trailLength": 50.0 }"#).unwrap();
    assert_eq!(whole.resolve(false).trail_length, 50);
}

#[test]
fn test_huge_fade_times_saturate_instead_of_failing() {
    for ms in [1e30, f64::MAX] {
        let cfg = RenderOptions {
            fade_delay_ms: Some(ms),
            fade_duration_ms: Some(ms),
            ..Default::default()
        }
        .resolve(false);
        assert_eq!(cfg.fade_delay, Duration::MAX);
        assert_eq!(cfg.fade_duration, Duration::MAX);
    }

    let opts: RenderOptions =
        serde_json::from_str(r#"{ "fadeDelayMs": 1e30, "fadeDurationMs": 1e300 }"#).unwrap();
    assert_eq!(opts.resolve(true).fade_delay, Duration::MAX);
}

#[test]
fn test_bad_color_and_blend_fall_back() {
    let cfg = RenderOptions {
        color: Some("not-a-color".into()),
        mix_blend_mode: Some("luminosity".into()),
        ..Default::default()
    }
    .resolve(false);
    assert_eq!(cfg.color.to_hex(), "#b19eef");
    assert_eq!(cfg.blend_mode, BlendMode::Screen);
}

// ============================================================================
// RenderConfig — live subset
// ============================================================================

#[test]
fn test_live_only_changes_do_not_require_rebuild() {
    let base = RenderConfig::default();
    let mut next = base.clone();
    next.color = Rgb::new(0.0, 1.0, 0.0);
    next.brightness = 3.0;
    next.edge_intensity = 1.0;
    next.grain_intensity = 0.0;
    next.blend_mode = BlendMode::Overlay;
    assert!(!base.requires_rebuild(&next));
}

#[test]
fn test_structural_changes_require_rebuild() {
    let base = RenderConfig::default();

    let mut trail = base.clone();
    trail.trail_length = 10;
    assert!(base.requires_rebuild(&trail));

    let mut bloom = base.clone();
    bloom.bloom.strength = 1.0;
    assert!(base.requires_rebuild(&bloom));

    let mut fade = base.clone();
    fade.fade_delay = Duration::from_millis(1);
    assert!(base.requires_rebuild(&fade));

    let mut z = base.clone();
    z.z_index = 0;
    assert!(base.requires_rebuild(&z));
}

#[test]
fn test_apply_live_round_trip() {
    let mut cfg = RenderConfig::default();
    let mut live = cfg.live_params();
    live.brightness = 4.0;
    live.blend_mode = BlendMode::Exclusion;
    cfg.apply_live(&live);
    assert_eq!(cfg.live_params(), live);
}

// ============================================================================
// Viewport — pixel budget
// ============================================================================

#[test]
fn test_budget_holds_when_scale_floor_not_binding() {
    let budget = 1.3e6;
    for &(w, h) in &[(320.0, 240.0), (1280.0, 720.0), (1920.0, 1080.0), (2560.0, 1440.0)] {
        for &dpr in &[1.0, 1.5, 2.0, 3.0] {
            for &cap in &[0.5, 1.0, 2.0, 4.0] {
                let v = Viewport::compute(w, h, dpr, cap, budget);
                assert!(v.budget_scale >= 0.5 && v.budget_scale <= 1.0);
                if v.budget_scale > 0.5 {
                    let used = v.width as f64 * v.height as f64;
                    assert!(used <= budget * 1.001, "{w}x{h}@{dpr} cap {cap}: {used}");
                }
            }
        }
    }
}

#[test]
fn test_scale_floor_applies_on_huge_surfaces() {
    let v = Viewport::compute(7680.0, 4320.0, 2.0, 2.0, 1.0e6);
    assert_eq!(v.budget_scale, 0.5);
    assert_eq!(v.pixel_ratio, 1.0);
    assert_eq!((v.width, v.height), (7680, 4320));
}

#[test]
fn test_device_ratio_is_capped() {
    let v = Viewport::compute(1000.0, 500.0, 3.0, 0.5, 1.0e9);
    assert_eq!(v.pixel_ratio, 0.5);
    assert_eq!((v.width, v.height), (500, 250));
}

#[test]
fn test_pattern_scale_is_clamped() {
    assert_eq!(Viewport::compute(100.0, 100.0, 1.0, 1.0, 1e9).pattern_scale, 0.5);
    assert_eq!(Viewport::compute(900.0, 1200.0, 1.0, 1.0, 1e9).pattern_scale, 1.5);
    assert_eq!(Viewport::compute(4000.0, 3000.0, 1.0, 1.0, 1e9).pattern_scale, 2.0);
}

#[test]
fn test_viewport_compute_is_deterministic() {
    let a = Viewport::compute(1337.5, 801.2, 1.25, 2.0, 0.9e6);
    let b = Viewport::compute(1337.5, 801.2, 1.25, 2.0, 0.9e6);
    assert_eq!(a, b);
    assert_eq!(a.resolution(), [a.width as f32, a.height as f32, 1.0]);
}

// ============================================================================
// Settings files
// ============================================================================

#[test]
fn test_missing_settings_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let opts: RenderOptions = load_settings(&dir.path().join("absent.json")).unwrap();
    assert_eq!(opts, RenderOptions::default());
}

#[test]
fn test_settings_file_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, r#"{{ "trailLength": 7, "brightness": 1.5 }}"#).unwrap();

    let opts: RenderOptions = load_settings(&path).unwrap();
    assert_eq!(opts.trail_length, Some(7.0));
    assert_eq!(opts.brightness, Some(1.5));
}

#[test]
fn test_malformed_settings_report_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ trailLength: ").unwrap();

    let err = load_settings::<RenderOptions>(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.json"));

    let fallback: RenderOptions = load_settings_or_default(&path);
    assert_eq!(fallback, RenderOptions::default());
}

#[test]
fn test_blank_settings_text_is_default() {
    let opts: RenderOptions = parse_settings("  \n").unwrap();
    assert_eq!(opts, RenderOptions::default());
}
