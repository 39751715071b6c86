pub mod light_match;

pub use light_match::{estimate_color_stats, relight, thumbnail_stride, ColorStats};
