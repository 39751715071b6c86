mod common;

use std::path::PathBuf;

use ndarray::Array2;

use skyswap_core::error::SkyError;
use skyswap_core::filters::guided::GuidedFilterParams;
use skyswap_core::frame::{CanvasSize, Matte, RgbFrame};
use skyswap_core::io::image_io::{save_rgb_png, save_rgb_tiff};
use skyswap_core::io::prepare::{prepare_mask, prepare_sky};
use skyswap_core::io::{load_mask, load_rgb, normalize_mask, prepare_inputs, save_matte, save_rgb};
use skyswap_core::pipeline::config::{CompositeConfig, PipelineConfig};
use skyswap_core::pipeline::run_composite;

use common::{assert_all_near, assert_unit_range, noise_frame};

#[test]
fn test_save_load_roundtrip_png() {
    let frame = noise_frame(6, 9, 1);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");

    save_rgb_png(&frame, &path).unwrap();
    let loaded = load_rgb(&path).unwrap();

    assert_eq!(loaded.dim(), (6, 9));
    for (a, b) in loaded.data.iter().zip(frame.data.iter()) {
        assert!((a - b).abs() <= 1.0 / 255.0 + 1e-6, "{a} vs {b}");
    }
}

#[test]
fn test_save_load_roundtrip_tiff() {
    let mut frame = RgbFrame::filled(4, 4, [0.0, 0.5, 1.0]);
    frame.data[[2, 3, 1]] = 0.25;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.tiff");

    save_rgb_tiff(&frame, &path).unwrap();
    let loaded = load_rgb(&path).unwrap();

    assert_eq!(loaded.dim(), (4, 4));
    for (a, b) in loaded.data.iter().zip(frame.data.iter()) {
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }
}

#[test]
fn test_save_rgb_picks_format_from_extension() {
    let frame = RgbFrame::filled(3, 3, [0.2, 0.4, 0.6]);
    let dir = tempfile::tempdir().unwrap();

    for name in ["a.png", "b.tif", "c.tiff"] {
        let path = dir.path().join(name);
        save_rgb(&frame, &path).unwrap();
        assert!(path.exists());
        assert_eq!(image::image_dimensions(&path).unwrap(), (3, 3));
    }
    assert_eq!(
        image::ImageFormat::from_path(dir.path().join("b.tif")).unwrap(),
        image::ImageFormat::Tiff
    );
}

#[test]
fn test_matte_roundtrip() {
    let matte = Matte::new(Array2::from_shape_fn((5, 7), |(r, c)| (r * 7 + c) as f32 / 34.0));
    let dir = tempfile::tempdir().unwrap();

    let tiff = dir.path().join("matte.tiff");
    save_matte(&matte, &tiff).unwrap();
    let loaded = load_mask(&tiff).unwrap();
    assert_eq!(loaded.dim(), (5, 7));
    for (a, b) in loaded.iter().zip(matte.data.iter()) {
        assert!((a - b).abs() < 1e-4);
    }

    let png = dir.path().join("matte.png");
    save_matte(&matte, &png).unwrap();
    let loaded = load_mask(&png).unwrap();
    for (a, b) in loaded.iter().zip(matte.data.iter()) {
        assert!((a - b).abs() <= 1.0 / 255.0 + 1e-6);
    }
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_rgb(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, SkyError::ImageError(_) | SkyError::Io(_)), "got {err}");
}

// ---------------------------------------------------------------------------
// Canvas normalization
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_constant_mask_stays_constant() {
    let mask = Array2::from_elem((12, 20), 0.3f32);
    let out = normalize_mask(&mask, CanvasSize::new(85, 48)).unwrap();
    assert_eq!(out.dim(), (48, 85));
    assert_all_near(out.iter(), 0.3, 1e-5);
}

#[test]
fn test_normalize_hard_mask_is_clipped() {
    // Bicubic overshoots at hard edges; the result must still be a probability.
    let mask = Array2::from_shape_fn((8, 8), |(r, c)| ((r + c) % 2) as f32);
    let out = normalize_mask(&mask, CanvasSize::new(40, 30)).unwrap();
    assert_eq!(out.dim(), (30, 40));
    assert_unit_range(out.iter());
}

#[test]
fn test_normalize_mask_at_canvas_size_only_clips() {
    let mut mask = Array2::from_elem((4, 6), 0.5f32);
    mask[[1, 1]] = 1.5;
    let out = normalize_mask(&mask, CanvasSize::new(6, 4)).unwrap();
    assert_eq!(out[[1, 1]], 1.0);
    assert_eq!(out[[0, 0]], 0.5);
}

#[test]
fn test_prepare_resizes_to_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let sky_path = dir.path().join("sky.png");
    let mask_path = dir.path().join("mask.png");
    save_rgb(&noise_frame(20, 30, 2), &sky_path).unwrap();
    save_matte(&Matte::filled(10, 15, 1.0), &mask_path).unwrap();

    let canvas = CanvasSize::new(64, 36);
    let sky = prepare_sky(&sky_path, canvas).unwrap();
    let mask = prepare_mask(&mask_path, canvas).unwrap();
    assert_eq!(sky.dim(), (36, 64));
    assert_eq!(mask.dim(), (36, 64));
    assert_all_near(mask.iter(), 1.0, 1e-5);
}

#[test]
fn test_config_driven_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = |name: &str| -> PathBuf { dir.path().join(name) };

    save_rgb(&RgbFrame::filled(24, 40, [0.0, 0.0, 0.0]), &path("photo.png")).unwrap();
    save_rgb(&RgbFrame::filled(50, 50, [1.0, 1.0, 1.0]), &path("sky.png")).unwrap();
    save_matte(&Matte::filled(12, 20, 1.0), &path("mask.png")).unwrap();

    let config = PipelineConfig {
        source: path("photo.png"),
        sky: path("sky.png"),
        mask: path("mask.png"),
        output: path("out.png"),
        canvas: CanvasSize::new(40, 24),
        guided_filter: GuidedFilterParams { radius: 3, eps: 0.01 },
        composite: CompositeConfig::default(),
    };

    let prepared = prepare_inputs(&config).unwrap();
    assert_eq!(prepared.source.dim(), (24, 40));
    assert_eq!(prepared.coarse_mask.dim(), (24, 40));

    let out = run_composite(prepared.frame_inputs(), &config.guided_filter, &config.composite).unwrap();
    // All-sky mask: the composite is the white sky.
    assert_all_near(out.image.data.iter(), 1.0, 1e-4);

    save_rgb(&out.image, &config.output).unwrap();
    assert!(config.output.exists());
}

#[test]
fn test_prepare_inputs_rejects_invalid_config() {
    let config = PipelineConfig {
        source: PathBuf::from("a.png"),
        sky: PathBuf::from("b.png"),
        mask: PathBuf::from("c.png"),
        output: PathBuf::from("d.png"),
        canvas: CanvasSize::default(),
        guided_filter: GuidedFilterParams::default(),
        composite: CompositeConfig {
            recoloring_factor: 3.0,
            ..Default::default()
        },
    };
    assert!(matches!(
        prepare_inputs(&config).unwrap_err(),
        SkyError::InvalidConfig(_)
    ));
}
