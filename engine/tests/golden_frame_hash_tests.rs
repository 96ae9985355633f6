use engine::graphics::{CpuRenderer, Renderer2d, RgbaImage};
use engine::regression::{
    FrameHashGolden, assert_or_update_golden_json, load_golden_json, rgba_sha256_hex,
    save_golden_json,
};
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};
use engine::ui::Rect;

fn draw_reference_frame(buf: &mut [u8], size: SurfaceSize) {
    let mut gfx = CpuRenderer::new(buf, size);
    gfx.clear([12, 24, 36, 255]);
    gfx.fill_rect(Rect::new(4, 4, 20, 12), [200, 60, 60, 255]);
    gfx.blend_rect(Rect::new(10, 8, 20, 12), [60, 200, 60, 255], 128);
    gfx.blit_scaled(&RgbaImage::solid(2, 2, [0, 0, 255, 255]), Rect::new(30, 2, 8, 8));
    gfx.draw_text(2, 22, "FRAME", [255, 255, 255, 255]);
}

fn reference_hash() -> String {
    let size = SurfaceSize::new(48, 36);
    let mut surface = RgbaBufferSurface::new(size);
    draw_reference_frame(surface.frame_mut(), size);
    surface.present().expect("headless present is infallible");
    rgba_sha256_hex(surface.frame())
}

#[test]
fn reference_frame_hash_is_stable_across_renders() {
    assert_eq!(reference_hash(), reference_hash());
}

#[test]
fn headless_surface_resizes_its_buffer() {
    let mut surface = RgbaBufferSurface::new(SurfaceSize::new(8, 8));
    assert_eq!(surface.frame().len(), 8 * 8 * 4);
    surface
        .resize(SurfaceSize::new(16, 4))
        .expect("headless resize is infallible");
    assert_eq!(surface.size(), SurfaceSize::new(16, 4));
    assert_eq!(surface.frame().len(), 16 * 4 * 4);
}

#[test]
fn golden_json_save_load_assert_round_trip() {
    let dir = std::env::temp_dir().join("engine_golden_tests");
    std::fs::create_dir_all(&dir).expect("create temp golden dir");
    let path = dir.join("reference_frame.json");
    let _ = std::fs::remove_file(&path);

    let golden = FrameHashGolden::new("reference_frame", 48, 36, vec![reference_hash()]);

    // First call writes the missing golden, second call must match it.
    assert_or_update_golden_json(&path, &golden, false).expect("first run writes golden");
    assert_or_update_golden_json(&path, &golden, false).expect("identical frame matches");

    let loaded = load_golden_json(&path).expect("golden parses");
    assert_eq!(loaded, golden);

    // A different frame must be rejected with a frame-indexed message.
    let wrong = FrameHashGolden::new(
        "reference_frame",
        48,
        36,
        vec![rgba_sha256_hex(&[0u8; 16])],
    );
    let err = assert_or_update_golden_json(&path, &wrong, false)
        .expect_err("mismatching hash must fail");
    assert!(err.to_string().contains("frame 0"), "got: {err}");

    // Metadata changes are a different error class.
    let resized = FrameHashGolden::new("reference_frame", 64, 36, golden.hashes.clone());
    let err = assert_or_update_golden_json(&path, &resized, false)
        .expect_err("metadata mismatch must fail");
    assert!(err.to_string().contains("metadata"), "got: {err}");

    // Update mode rewrites in place.
    save_golden_json(&path, &golden).expect("restore golden");
    assert_or_update_golden_json(&path, &wrong, true).expect("update mode rewrites");
    let rewritten = load_golden_json(&path).expect("rewritten golden parses");
    assert_eq!(rewritten.hashes, wrong.hashes);
}
