//! WMTS operations and the key sets that belong to them.

use std::fmt;

use crate::query::NormalizedQuery;

const CAPABILITIES_KEYS: &[&str] = &["service", "request", "version"];

const TILE_KEYS: &[&str] = &[
    "service",
    "request",
    "version",
    "layer",
    "style",
    "tilematrixset",
    "tilematrix",
    "tilecol",
    "tilerow",
    "format",
];

const FEATURE_INFO_KEYS: &[&str] = &[
    "service",
    "request",
    "version",
    "layer",
    "style",
    "tilematrixset",
    "tilematrix",
    "tilecol",
    "tilerow",
    "format",
    "i",
    "j",
    "infoformat",
];

const MANDATORY_CAPABILITIES_KEYS: &[&str] = &["service", "request"];

const MANDATORY_TILE_KEYS: &[&str] = &[
    "service",
    "request",
    "version",
    "layer",
    "tilematrixset",
    "tilematrix",
    "tilecol",
    "tilerow",
    "format",
];

const MANDATORY_FEATURE_INFO_KEYS: &[&str] = &[
    "service",
    "request",
    "version",
    "layer",
    "tilematrixset",
    "tilematrix",
    "tilecol",
    "tilerow",
    "format",
    "i",
    "j",
    "infoformat",
];

/// WMTS operation named by the `request` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetCapabilities,
    GetTile,
    GetFeatureInfo,
    Unknown,
}

impl Operation {
    /// Case-insensitive match of a `request` value.
    pub fn resolve(request: &str) -> Self {
        match request.to_ascii_lowercase().as_str() {
            "getcapabilities" => Operation::GetCapabilities,
            "gettile" => Operation::GetTile,
            "getfeatureinfo" => Operation::GetFeatureInfo,
            _ => Operation::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetCapabilities => "GetCapabilities",
            Operation::GetTile => "GetTile",
            Operation::GetFeatureInfo => "GetFeatureInfo",
            Operation::Unknown => "Unknown",
        }
    }

    /// Keys consumed by this operation; all others are passed through.
    pub fn recognized_keys(self) -> &'static [&'static str] {
        match self {
            Operation::GetCapabilities => CAPABILITIES_KEYS,
            Operation::GetTile => TILE_KEYS,
            Operation::GetFeatureInfo => FEATURE_INFO_KEYS,
            Operation::Unknown => &[],
        }
    }

    /// Keys that must be present, in the order they are reported when missing.
    pub fn mandatory_keys(self) -> &'static [&'static str] {
        match self {
            Operation::GetCapabilities => MANDATORY_CAPABILITIES_KEYS,
            Operation::GetTile => MANDATORY_TILE_KEYS,
            Operation::GetFeatureInfo => MANDATORY_FEATURE_INFO_KEYS,
            Operation::Unknown => &[],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the operation of a normalized query.
///
/// Returns `None` when there is no `request` parameter at all, i.e. the
/// request is not a WMTS KVP request. Multi-valued `request` parameters
/// never get here: normalization already rejected them.
pub fn resolve_operation(query: &NormalizedQuery) -> Option<Operation> {
    query.get("request").map(Operation::resolve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::KvpQuery;

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(Operation::resolve("GetCapabilities"), Operation::GetCapabilities);
        assert_eq!(Operation::resolve("GETTILE"), Operation::GetTile);
        assert_eq!(Operation::resolve("getfeatureinfo"), Operation::GetFeatureInfo);
        assert_eq!(Operation::resolve("GetMap"), Operation::Unknown);
        assert_eq!(Operation::resolve(""), Operation::Unknown);
    }

    #[test]
    fn test_resolve_operation_from_query() {
        let query = KvpQuery::parse("REQUEST=GetTile").normalize().unwrap();
        assert_eq!(resolve_operation(&query), Some(Operation::GetTile));

        let query = KvpQuery::parse("testkey=testvalue").normalize().unwrap();
        assert_eq!(resolve_operation(&query), None);
    }

    #[test]
    fn test_capabilities_keys() {
        let keys = Operation::GetCapabilities.recognized_keys();
        for expected in ["request", "service", "version"] {
            assert!(keys.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_feature_info_extends_tile_keys() {
        let tile = Operation::GetTile.mandatory_keys();
        let info = Operation::GetFeatureInfo.mandatory_keys();
        assert_eq!(&info[..tile.len()], tile);
        assert_eq!(&info[tile.len()..], &["i", "j", "infoformat"]);

        for key in Operation::GetTile.recognized_keys() {
            assert!(Operation::GetFeatureInfo.recognized_keys().contains(key));
        }
    }

    #[test]
    fn test_mandatory_keys_are_recognized() {
        for op in [Operation::GetCapabilities, Operation::GetTile, Operation::GetFeatureInfo] {
            for key in op.mandatory_keys() {
                assert!(op.recognized_keys().contains(key), "{op}: {key}");
            }
        }
    }
}
