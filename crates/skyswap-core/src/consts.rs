/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in an RGB frame.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Channel index of the guidance channel fed to the guided filter (blue).
pub const GUIDANCE_CHANNEL: usize = 2;

/// Default guided filter window radius in pixels.
pub const DEFAULT_GUIDED_RADIUS: usize = 20;

/// Default guided filter variance regularizer.
pub const DEFAULT_GUIDED_EPS: f32 = 0.01;

/// Thumbnails for light matching are sampled with stride `height / THUMBNAIL_DIVISOR`.
pub const THUMBNAIL_DIVISOR: usize = 20;

/// Added to the foreground weight sum so all-sky frames stay finite.
pub const MASKED_MEAN_EPSILON: f64 = 1e-9;

/// Scale applied to the blurred sky light before the screen blend.
pub const HALO_STRENGTH: f32 = 0.5;

/// Halo blur kernel side is `canvas_width / HALO_KERNEL_DIVISOR`.
pub const HALO_KERNEL_DIVISOR: usize = 5;

/// Bicubic convolution coefficient (matches the common `a = -0.75` kernel).
pub const BICUBIC_A: f32 = -0.75;

/// Default output canvas width.
pub const DEFAULT_CANVAS_WIDTH: usize = 845;

/// Default output canvas height.
pub const DEFAULT_CANVAS_HEIGHT: usize = 480;

/// Allowed range of the skybox center-crop zoom factor.
pub const CENTER_CROP_RANGE: (f32, f32) = (1.0, 1.2);

/// Results kept per pipeline stage by the stage cache.
pub const DEFAULT_STAGE_CACHE_CAPACITY: usize = 4;
