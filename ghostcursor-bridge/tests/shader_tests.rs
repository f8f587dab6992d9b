// ghostcursor-bridge/tests/shader_tests.rs
//
// WGSL sources for every overlay pass, checked without a GPU: placeholder
// substitution, then a full naga parse + validate of each composed module.

use ghostcursor_bridge::gfx::fullscreen::{FULLSCREEN_WGSL, compose_shader};
use ghostcursor_bridge::gfx::smoke::smoke_shader_source;
use ghostcursor_bridge::gfx::{bloom, composite, post};
use ghostcursor_core::BlendMode;

fn validate(label: &str, source: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => panic!("{label}: parse failed\n{}", e.emit_to_string(source)),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("{label}: validation failed: {e:?}");
    }
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

// ============================================================================
// Smoke shader template
// ============================================================================

#[test]
fn test_smoke_source_has_no_placeholder_left() {
    let src = smoke_shader_source(7);
    assert!(!src.contains("__MAX_TRAIL_LENGTH__"));
    assert!(src.contains("array<vec4<f32>, 7>"));
    assert!(src.contains("MAX_TRAIL_LENGTH: u32 = 7u;"));
}

#[test]
fn test_smoke_source_zero_length_is_one() {
    let src = smoke_shader_source(0);
    assert!(src.contains("array<vec4<f32>, 1>"));
}

#[test]
fn test_smoke_shader_validates_across_lengths() {
    for n in [1, 3, 50, 1024] {
        let module = validate(&format!("smoke[{n}]"), &compose_shader(&smoke_shader_source(n)));
        let eps = entry_points(&module);
        assert!(eps.contains(&"vs_main") && eps.contains(&"fs_main"));
    }
}

// ============================================================================
// Post-processing shaders
// ============================================================================

#[test]
fn test_fullscreen_vertex_stage_validates_alone() {
    let module = validate("fullscreen", FULLSCREEN_WGSL);
    assert_eq!(entry_points(&module), vec!["vs_main"]);
}

#[test]
fn test_every_pass_shader_validates() {
    let passes = [
        ("bloom-bright", bloom::BRIGHT_WGSL),
        ("bloom-blur", bloom::BLUR_WGSL),
        ("bloom-composite", bloom::COMPOSITE_WGSL),
        ("grain", post::GRAIN_WGSL),
        ("unpremultiply", post::UNPREMULTIPLY_WGSL),
        ("composite", composite::COMPOSITE_WGSL),
    ];
    for (label, fragment) in passes {
        let module = validate(label, &compose_shader(fragment));
        assert!(entry_points(&module).contains(&"fs_main"), "{label}");
    }
}

#[test]
fn test_bloom_composite_reads_every_mip() {
    for i in 0..bloom::MIP_LEVELS {
        assert!(bloom::COMPOSITE_WGSL.contains(&format!("var mip{i}:")));
    }
}

// ============================================================================
// Blend mode codes
// ============================================================================

#[test]
fn test_composite_shader_switches_on_every_separable_mode() {
    for mode in BlendMode::all() {
        match mode {
            // Normal is the default arm; plus-lighter is handled before the switch.
            BlendMode::Normal => {}
            BlendMode::PlusLighter => {
                let code = format!("mode == {}u", mode.shader_code());
                assert!(composite::COMPOSITE_WGSL.contains(&code), "{mode}");
            }
            _ => {
                let case = format!("case {}u:", mode.shader_code());
                assert!(composite::COMPOSITE_WGSL.contains(&case), "{mode}");
            }
        }
    }
}
