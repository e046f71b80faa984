//! Translation of recognized WMTS keys into RESTful path fragments.

use wmts_common::{
    encode_segment, is_dot_segment, strip_tile_matrix_prefix, TileCoordinate, WmtsError,
    WmtsResult,
};

use crate::query::WmtsQuery;

/// Route the capabilities document is served from on a RESTful backend.
pub const CAPABILITIES_ROUTE: &str = "/v1_0/WMTSCapabilities.xml";

/// Map a tile `FORMAT` to a file extension. Unknown formats fall back to `.png`.
pub fn tile_format_extension(format: &str) -> &'static str {
    match format {
        "image/png8" => ".png",
        "image/jpeg" => ".jpeg",
        _ => ".png",
    }
}

/// Map a GetFeatureInfo `INFOFORMAT` to a file extension.
pub fn info_format_extension(info_format: &str) -> WmtsResult<&'static str> {
    match info_format {
        "plain/text" => Ok(".txt"),
        "text/html" => Ok(".html"),
        "application/json" => Ok(".json"),
        "text/xml" => Ok(".xml"),
        other => Err(WmtsError::invalid("infoformat", other)),
    }
}

/// Append a fragment to a request path with exactly one separator between them.
pub fn append_path(base: &str, fragment: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), fragment)
}

/// A value that becomes one path segment. Dot segments are refused since a
/// backend would resolve them against the preceding path.
fn segment_value<'a>(query: &'a WmtsQuery, key: &str) -> WmtsResult<&'a str> {
    let value = query.require(key)?;
    if is_dot_segment(value) {
        return Err(WmtsError::invalid(key, value));
    }
    Ok(value)
}

fn tile_coordinate(query: &WmtsQuery, format_extension: &str) -> WmtsResult<TileCoordinate> {
    let tile_matrix = query.require("tilematrix")?;
    if is_dot_segment(strip_tile_matrix_prefix(tile_matrix)) {
        return Err(WmtsError::invalid("tilematrix", tile_matrix));
    }
    Ok(TileCoordinate::new(
        segment_value(query, "layer")?,
        segment_value(query, "tilematrixset")?,
        tile_matrix,
        segment_value(query, "tilecol")?,
        segment_value(query, "tilerow")?,
        format_extension,
    ))
}

/// `/{layer}/{tileMatrixSet}/{tileMatrix}/{tileCol}/{tileRow}{.ext}`, percent-encoded.
pub fn tile_path(query: &WmtsQuery) -> WmtsResult<String> {
    let extension = tile_format_extension(query.require("format")?);
    Ok(tile_coordinate(query, extension)?.tile_path())
}

/// `/{layer}/{tileMatrixSet}/{tileMatrix}/{tileCol}/{tileRow}/{i}/{j}{.ext}`
pub fn feature_info_path(query: &WmtsQuery) -> WmtsResult<String> {
    let extension = info_format_extension(query.require("infoformat")?)?;
    let tile = tile_coordinate(query, extension)?;
    Ok(format!(
        "{}/{}/{}{}",
        tile.path_segments(),
        encode_segment(segment_value(query, "i")?),
        encode_segment(segment_value(query, "j")?),
        tile.format_extension
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::KvpQuery;

    fn wmts_query(raw: &str) -> WmtsQuery {
        let (wmts, _) = KvpQuery::parse(raw)
            .normalize()
            .unwrap()
            .classify(crate::Operation::GetFeatureInfo.recognized_keys());
        wmts
    }

    #[test]
    fn test_tile_format_extension() {
        assert_eq!(tile_format_extension("image/png8"), ".png");
        assert_eq!(tile_format_extension("image/jpeg"), ".jpeg");
        assert_eq!(tile_format_extension("image/png"), ".png");
        assert_eq!(tile_format_extension("image/webp"), ".png");
        assert_eq!(tile_format_extension(""), ".png");
    }

    #[test]
    fn test_info_format_extension() {
        assert_eq!(info_format_extension("plain/text").unwrap(), ".txt");
        assert_eq!(info_format_extension("text/html").unwrap(), ".html");
        assert_eq!(info_format_extension("application/json").unwrap(), ".json");
        assert_eq!(info_format_extension("text/xml").unwrap(), ".xml");

        let err = info_format_extension("image/png").unwrap_err();
        assert_eq!(err, WmtsError::invalid("infoformat", "image/png"));
    }

    #[test]
    fn test_append_path() {
        assert_eq!(append_path("local", "/a.png"), "local/a.png");
        assert_eq!(append_path("/wmts/", "/a.png"), "/wmts/a.png");
        assert_eq!(append_path("/wmts///", "/a.png"), "/wmts/a.png");
        assert_eq!(append_path("/", "/a.png"), "/a.png");
        assert_eq!(append_path("", "/a.png"), "/a.png");
    }

    #[test]
    fn test_tile_path() {
        let query = wmts_query(
            "layer=testlayer&tilematrixset=EPSG:28992&tilematrix=EPSG:28992:4&tilecol=5&tilerow=6&format=image/jpeg",
        );
        assert_eq!(tile_path(&query).unwrap(), "/testlayer/EPSG:28992/4/5/6.jpeg");
    }

    #[test]
    fn test_tile_path_vendor_prefix() {
        let query = wmts_query(
            "layer=brt&tilematrixset=EPSG:25831:RWS&tilematrix=EPSG:25831:RWS:4&tilecol=1&tilerow=2&format=image/png8",
        );
        assert_eq!(tile_path(&query).unwrap(), "/brt/EPSG:25831:RWS/4/1/2.png");
    }

    #[test]
    fn test_feature_info_path() {
        let query = wmts_query(
            "layer=l&tilematrixset=EPSG:28992&tilematrix=EPSG:28992:4&tilecol=5&tilerow=6&i=10&j=20&infoformat=application/json",
        );
        assert_eq!(feature_info_path(&query).unwrap(), "/l/EPSG:28992/4/5/6/10/20.json");
    }

    #[test]
    fn test_tile_path_encodes_each_value_as_one_segment() {
        let query = wmts_query(
            "layer=a%2Fb&tilematrixset=..%2F..%2Fadmin&tilematrix=4&tilecol=5&tilerow=6&format=image/png",
        );
        assert_eq!(tile_path(&query).unwrap(), "/a%2Fb/..%2F..%2Fadmin/4/5/6.png");
    }

    #[test]
    fn test_dot_segments_rejected() {
        let query = wmts_query(
            "layer=..&tilematrixset=s&tilematrix=4&tilecol=5&tilerow=6&format=image/png",
        );
        assert_eq!(tile_path(&query).unwrap_err(), WmtsError::invalid("layer", ".."));

        let query = wmts_query(
            "layer=l&tilematrixset=s&tilematrix=EPSG:28992:..&tilecol=5&tilerow=6&format=image/png",
        );
        assert_eq!(
            tile_path(&query).unwrap_err(),
            WmtsError::invalid("tilematrix", "EPSG:28992:..")
        );

        let query = wmts_query(
            "layer=l&tilematrixset=s&tilematrix=4&tilecol=5&tilerow=6&i=.&j=1&infoformat=text/xml",
        );
        assert_eq!(feature_info_path(&query).unwrap_err(), WmtsError::invalid("i", "."));
    }

    #[test]
    fn test_feature_info_path_rejects_unknown_info_format() {
        let query = wmts_query(
            "layer=l&tilematrixset=s&tilematrix=4&tilecol=5&tilerow=6&i=1&j=2&infoformat=image/png",
        );
        let err = feature_info_path(&query).unwrap_err();
        assert_eq!(err.exception_code(), "InvalidParameterValue");
        assert!(err.to_string().contains("infoformat"));
        assert!(err.to_string().contains("image/png"));
    }
}
