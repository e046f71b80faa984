//! Tile coordinates as addressed by the WMTS RESTful binding.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a parameter value becomes a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a decoded value so it stays exactly one path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// `.` and `..` would be resolved away by any URL normalizer.
pub fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

/// A tile address taken from a GetTile or GetFeatureInfo request.
///
/// Column and row are kept as the client sent them; no range checks are
/// made against any tile matrix set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    /// Layer identifier
    pub layer: String,
    /// TileMatrixSet identifier
    pub tile_matrix_set: String,
    /// TileMatrix (zoom level) identifier, namespace prefix already stripped
    pub tile_matrix: String,
    /// Tile column
    pub tile_col: String,
    /// Tile row
    pub tile_row: String,
    /// File extension including the leading dot (e.g. ".png")
    pub format_extension: String,
}

impl TileCoordinate {
    /// Build a coordinate, stripping any namespace prefix from the tile matrix.
    pub fn new(
        layer: impl Into<String>,
        tile_matrix_set: impl Into<String>,
        tile_matrix: &str,
        tile_col: impl Into<String>,
        tile_row: impl Into<String>,
        format_extension: impl Into<String>,
    ) -> Self {
        Self {
            layer: layer.into(),
            tile_matrix_set: tile_matrix_set.into(),
            tile_matrix: strip_tile_matrix_prefix(tile_matrix).to_string(),
            tile_col: tile_col.into(),
            tile_row: tile_row.into(),
            format_extension: format_extension.into(),
        }
    }

    /// `/{layer}/{tileMatrixSet}/{tileMatrix}/{tileCol}/{tileRow}` without
    /// extension, each value percent-encoded as one segment.
    pub fn path_segments(&self) -> String {
        [
            &self.layer,
            &self.tile_matrix_set,
            &self.tile_matrix,
            &self.tile_col,
            &self.tile_row,
        ]
        .iter()
        .map(|value| format!("/{}", encode_segment(value)))
        .collect()
    }

    /// RESTful tile path, e.g. `/layer/EPSG:28992/4/5/5.png`.
    pub fn tile_path(&self) -> String {
        format!("{}{}", self.path_segments(), self.format_extension)
    }
}

/// Strip a colon-delimited namespace from a TileMatrix identifier.
///
/// Only the text after the last colon is kept, so `EPSG:28992:4` and
/// `EPSG:25831:RWS:4` both become `4`. Identifiers without a colon are
/// returned unchanged.
pub fn strip_tile_matrix_prefix(tile_matrix: &str) -> &str {
    match tile_matrix.rsplit_once(':') {
        Some((_, level)) => level,
        None => tile_matrix,
    }
}
