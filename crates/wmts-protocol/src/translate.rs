//! KVP to RESTful request translation.
//!
//! Chains normalization, operation resolution, validation and path building.
//! The first failing stage short-circuits with a [`WmtsError`].

use tracing::debug;
use wmts_common::{WmtsError, WmtsResult};

use crate::operation::{resolve_operation, Operation};
use crate::query::{KvpQuery, NormalizedQuery};
use crate::rest::{append_path, feature_info_path, tile_path, CAPABILITIES_ROUTE};
use crate::validation::{validate_mandatory, validate_service};

/// A KVP request rewritten into its RESTful form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub operation: Operation,
    /// New request path, percent-encoded. The incoming path is kept as received.
    pub path: String,
    /// Pass-through query string, `None` when nothing remains.
    pub query: Option<String>,
}

/// Translate a request's raw (percent-encoded) path and query string.
///
/// Returns `Ok(None)` when the query carries no `request` parameter; such
/// requests, including ones this function already rewrote, are left as is.
pub fn translate(path: &str, raw_query: Option<&str>) -> WmtsResult<Option<RestRequest>> {
    let query = KvpQuery::parse(raw_query.unwrap_or_default());
    let normalized = query.normalize()?;

    let Some(operation) = resolve_operation(&normalized) else {
        return Ok(None);
    };
    if operation == Operation::Unknown {
        return Err(unknown_operation(&normalized));
    }

    validate_mandatory(&normalized, operation)?;
    validate_service(&normalized)?;

    let (wmts, passthrough) = normalized.classify(operation.recognized_keys());
    let fragment = match operation {
        Operation::GetTile => tile_path(&wmts)?,
        Operation::GetFeatureInfo => feature_info_path(&wmts)?,
        Operation::GetCapabilities => CAPABILITIES_ROUTE.to_string(),
        Operation::Unknown => return Err(unknown_operation(&normalized)),
    };

    let rest = RestRequest {
        operation,
        path: append_path(path, &fragment),
        query: passthrough.to_query_string(),
    };
    debug!(operation = %operation, path = %rest.path, "Translated KVP request");
    Ok(Some(rest))
}

fn unknown_operation(query: &NormalizedQuery) -> WmtsError {
    WmtsError::UnknownOperation(query.get("request").unwrap_or_default().to_string())
}
