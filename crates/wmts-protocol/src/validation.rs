//! Mandatory-parameter checks per operation.

use wmts_common::{WmtsError, WmtsResult};

use crate::operation::Operation;
use crate::query::NormalizedQuery;

/// Keys from `mandatory` absent in `query`, in `mandatory` order.
pub fn missing_keys(query: &NormalizedQuery, mandatory: &[&str]) -> Vec<String> {
    mandatory
        .iter()
        .filter(|key| !query.contains_key(key))
        .map(|key| key.to_string())
        .collect()
}

/// Check that every mandatory key of `operation` is present.
///
/// All missing keys are reported together in a single
/// MissingParameterValue exception.
pub fn validate_mandatory(query: &NormalizedQuery, operation: Operation) -> WmtsResult<()> {
    let missing = missing_keys(query, operation.mandatory_keys());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WmtsError::MissingParameter(missing))
    }
}

/// `SERVICE` must be `WMTS`, compared case-insensitively.
pub fn validate_service(query: &NormalizedQuery) -> WmtsResult<()> {
    match query.get("service") {
        Some(service) if service.eq_ignore_ascii_case("wmts") => Ok(()),
        Some(service) => Err(WmtsError::invalid("service", service)),
        None => Err(WmtsError::missing("service")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::KvpQuery;

    fn normalized(raw: &str) -> NormalizedQuery {
        KvpQuery::parse(raw).normalize().unwrap()
    }

    #[test]
    fn test_no_missing_keys() {
        let query = normalized("a=B&c=D&E=3");
        assert!(missing_keys(&query, &["a", "c", "e"]).is_empty());
    }

    #[test]
    fn test_missing_keys_in_mandatory_order() {
        let query = normalized("tilecol=1&service=WMTS");
        let missing = missing_keys(&query, &["service", "layer", "tilecol", "format"]);
        assert_eq!(missing, vec!["layer", "format"]);
    }

    #[test]
    fn test_validate_tile_missing_tilematrixset() {
        let query = normalized(
            "service=WMTS&request=GetTile&version=1.0.0&layer=l&tilematrix=4&tilecol=5&tilerow=5&format=image/png",
        );
        let err = validate_mandatory(&query, Operation::GetTile).unwrap_err();
        assert_eq!(err, WmtsError::MissingParameter(vec!["tilematrixset".into()]));
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_validate_capabilities_needs_only_service_and_request() {
        let query = normalized("SERVICE=WMTS&REQUEST=GetCapabilities");
        assert!(validate_mandatory(&query, Operation::GetCapabilities).is_ok());
    }

    #[test]
    fn test_validate_service() {
        assert!(validate_service(&normalized("service=wmts")).is_ok());
        assert!(validate_service(&normalized("SERVICE=WMTS")).is_ok());

        let err = validate_service(&normalized("service=WMS")).unwrap_err();
        assert_eq!(err, WmtsError::invalid("service", "WMS"));
    }
}
