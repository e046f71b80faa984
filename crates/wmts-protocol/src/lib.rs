//! OGC WMTS KVP to RESTful request translation.
//!
//! Supports the WMTS 1.0.0 KVP binding for GetCapabilities, GetTile and
//! GetFeatureInfo, and OWS 1.1 exception reports for rejected requests.

pub mod exceptions;
pub mod operation;
pub mod query;
pub mod rest;
pub mod translate;
pub mod validation;

pub use exceptions::{exception_report, exception_xml, EXCEPTION_CONTENT_TYPE};
pub use operation::{resolve_operation, Operation};
pub use query::{KvpQuery, NormalizedQuery, WmtsQuery};
pub use rest::{
    append_path, feature_info_path, info_format_extension, tile_format_extension, tile_path,
    CAPABILITIES_ROUTE,
};
pub use translate::{translate, RestRequest};
pub use validation::{missing_keys, validate_mandatory, validate_service};
