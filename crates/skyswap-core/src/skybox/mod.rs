pub mod tiler;

pub use tiler::{tile_skybox, TileGeometry};
