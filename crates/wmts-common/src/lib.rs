//! Common types shared by the WMTS KVP translation crates.

pub mod error;
pub mod tile;

pub use error::{WmtsError, WmtsResult};
pub use tile::{encode_segment, is_dot_segment, strip_tile_matrix_prefix, TileCoordinate};
