pub mod image_io;
pub mod prepare;

pub use image_io::{load_mask, load_rgb, save_matte, save_rgb};
pub use prepare::{normalize_mask, prepare_inputs, PreparedInputs};
