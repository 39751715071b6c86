pub mod blend;
pub mod halo;

pub use blend::{alpha_blend, composite};
pub use halo::{apply_halo, halo_kernel_size, screen};
