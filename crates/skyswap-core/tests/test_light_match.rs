mod common;

use skyswap_core::error::SkyError;
use skyswap_core::frame::{Matte, RgbFrame};
use skyswap_core::pipeline::config::CompositeConfig;
use skyswap_core::relight::{estimate_color_stats, relight};

use common::{assert_all_near, assert_unit_range, noise_frame};

fn auto_config(recoloring_factor: f32) -> CompositeConfig {
    CompositeConfig {
        recoloring_factor,
        auto_light_matching: true,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn test_all_sky_matte_gives_zero_foreground_mean() {
    let fg = noise_frame(30, 30, 1);
    let sky = noise_frame(30, 30, 2);
    let matte = Matte::filled(30, 30, 1.0);

    let stats = estimate_color_stats(&fg, &sky, &matte).unwrap();
    assert_eq!(stats.foreground_mean, [0.0; 3]);

    let out = relight(&fg, &sky, &matte, &CompositeConfig::default()).unwrap();
    assert_unit_range(out.data.iter());
}

#[test]
fn test_thumbnail_skips_rows_and_columns_between_strides() {
    // H = 40 gives stride 2: only even rows and columns are sampled.
    let sky = RgbFrame::from_shape_fn(40, 40, |(r, c, _)| if r % 2 == 0 && c % 2 == 0 { 0.2 } else { 0.9 });
    let fg = RgbFrame::filled(40, 40, [0.4, 0.5, 0.6]);
    let matte = Matte::filled(40, 40, 0.0);

    let stats = estimate_color_stats(&fg, &sky, &matte).unwrap();
    assert_eq!(stats.stride, 2);
    for c in 0..3 {
        assert!((stats.sky_mean[c] - 0.2).abs() < 1e-6);
    }
    assert!((stats.foreground_mean[1] - 0.5).abs() < 1e-6);
}

#[test]
fn test_foreground_mean_is_weighted_by_inverse_matte() {
    // Top half is sky (matte 1) with bright pixels that must not count.
    let fg = RgbFrame::from_shape_fn(20, 20, |(r, _, _)| if r < 10 { 1.0 } else { 0.25 });
    let sky = RgbFrame::filled(20, 20, [0.5, 0.5, 0.5]);
    let matte = Matte::new(ndarray::Array2::from_shape_fn((20, 20), |(r, _)| if r < 10 { 1.0 } else { 0.0 }));

    let stats = estimate_color_stats(&fg, &sky, &matte).unwrap();
    for c in 0..3 {
        assert!((stats.foreground_mean[c] - 0.25).abs() < 1e-6);
        assert!((stats.diff()[c] - 0.25).abs() < 1e-6);
    }
}

// ---------------------------------------------------------------------------
// relight
// ---------------------------------------------------------------------------

#[test]
fn test_auto_mode_shifts_by_full_difference() {
    let fg = RgbFrame::filled(20, 20, [0.3, 0.3, 0.3]);
    let sky = RgbFrame::filled(20, 20, [0.6, 0.6, 0.6]);
    let matte = Matte::filled(20, 20, 0.5);

    let out = relight(&fg, &sky, &matte, &auto_config(1.0)).unwrap();
    assert_all_near(out.data.iter(), 0.6, 1e-5);
}

#[test]
fn test_auto_mode_partial_recolor() {
    let fg = RgbFrame::filled(20, 20, [0.2, 0.4, 0.6]);
    let sky = RgbFrame::filled(20, 20, [0.6, 0.4, 0.2]);
    let matte = Matte::filled(20, 20, 0.0);

    let out = relight(&fg, &sky, &matte, &auto_config(0.5)).unwrap();
    assert!((out.data[[3, 4, 0]] - 0.4).abs() < 1e-5);
    assert!((out.data[[3, 4, 1]] - 0.4).abs() < 1e-5);
    assert!((out.data[[3, 4, 2]] - 0.4).abs() < 1e-5);
}

#[test]
fn test_zero_recolor_in_auto_mode_keeps_foreground() {
    let fg = noise_frame(25, 25, 3);
    let sky = noise_frame(25, 25, 4);
    let matte = Matte::filled(25, 25, 0.3);

    let out = relight(&fg, &sky, &matte, &auto_config(0.0)).unwrap();
    for (a, b) in out.data.iter().zip(fg.data.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_manual_mode_with_grey_shift_scales_foreground() {
    // Grey sky and grey foreground: the shift is the same on every channel,
    // so re-centering cancels it and only the scale remains.
    let fg = RgbFrame::from_shape_fn(20, 20, |(r, c, _)| common::noise(r, c, 0) * 0.5);
    let sky = RgbFrame::filled(20, 20, [0.7, 0.7, 0.7]);
    let matte = Matte::filled(20, 20, 0.2);
    let config = CompositeConfig {
        recoloring_factor: 0.7,
        relighting_factor: 0.8,
        auto_light_matching: false,
        ..Default::default()
    };

    let out = relight(&fg, &sky, &matte, &config).unwrap();
    for (a, b) in out.data.iter().zip(fg.data.iter()) {
        assert!((a - 0.8 * b).abs() < 1e-5, "{a} vs {}", 0.8 * b);
    }
}

#[test]
fn test_manual_mode_keeps_per_channel_shift_around_global_mean() {
    // Re-centering uses the mean over all channels, so only the average
    // shift cancels: out = s * (fg + k * (d_c - mean(d))).
    let fg = RgbFrame::from_shape_fn(20, 20, |(r, c, ch)| common::noise(r, c, ch) * 0.5 + 0.2);
    let sky = noise_frame(20, 20, 5);
    let matte = Matte::filled(20, 20, 0.2);
    let config = CompositeConfig {
        recoloring_factor: 0.7,
        relighting_factor: 0.8,
        auto_light_matching: false,
        ..Default::default()
    };

    let diff = estimate_color_stats(&fg, &sky, &matte).unwrap().diff();
    let mean_diff = diff.iter().sum::<f64>() / 3.0;
    let out = relight(&fg, &sky, &matte, &config).unwrap();

    for ((r, c, ch), &got) in out.data.indexed_iter() {
        let shift = 0.7 * (diff[ch] - mean_diff);
        let want = (0.8 * (fg.data[[r, c, ch]] as f64 + shift)).clamp(0.0, 1.0) as f32;
        assert!((got - want).abs() < 1e-5, "at ({r}, {c}, {ch}): {got} vs {want}");
    }
}

#[test]
fn test_relight_output_is_in_unit_range() {
    let fg = noise_frame(32, 48, 6);
    let sky = RgbFrame::filled(32, 48, [1.0, 1.0, 1.0]);
    let matte = Matte::filled(32, 48, 0.0);

    for auto in [false, true] {
        let config = CompositeConfig {
            recoloring_factor: 1.0,
            relighting_factor: 1.0,
            auto_light_matching: auto,
            ..Default::default()
        };
        let out = relight(&fg, &sky, &matte, &config).unwrap();
        assert_unit_range(out.data.iter());
    }
}

#[test]
fn test_mismatched_inputs_are_rejected() {
    let fg = noise_frame(10, 10, 7);
    let sky = noise_frame(10, 12, 8);
    let matte = Matte::filled(10, 10, 0.5);
    let err = relight(&fg, &sky, &matte, &CompositeConfig::default()).unwrap_err();
    assert!(matches!(err, SkyError::ShapeMismatch { .. }), "got {err}");

    let sky = noise_frame(10, 10, 8);
    let matte = Matte::filled(9, 10, 0.5);
    assert!(estimate_color_stats(&fg, &sky, &matte).is_err());
}
