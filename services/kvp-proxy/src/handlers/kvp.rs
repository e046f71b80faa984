//! WMTS KVP request handler.
//!
//! Every request that is not served by another route ends up here:
//! - no `REQUEST` parameter: forwarded to the backend untouched
//! - GetTile / GetFeatureInfo: path rewritten to the RESTful form, then forwarded
//! - GetCapabilities: rendered from the local template when one is
//!   configured, otherwise rewritten and forwarded
//! - anything invalid: answered with an OWS exception report, never forwarded

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    http::{uri::PathAndQuery, Uri},
    response::Response,
};
use tracing::{debug, error, instrument};
use wmts_common::{WmtsError, WmtsResult};
use wmts_protocol::{translate, Operation, RestRequest};

use super::common::{capabilities_response, wmts_exception};
use crate::capabilities::HostAndPath;
use crate::metrics::{record_exception, record_operation};
use crate::state::AppState;

#[instrument(skip(state, request), fields(method = %request.method(), uri = %request.uri()))]
pub async fn kvp_handler(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
) -> Response {
    match handle(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            match &err {
                WmtsError::Internal(message) => error!(error = %message, "Request failed"),
                _ => debug!(code = err.exception_code(), error = %err, "Rejected WMTS request"),
            }
            record_exception(&err);
            wmts_exception(&err)
        }
    }
}

async fn handle(state: &AppState, request: Request) -> WmtsResult<Response> {
    let Some(rest) = translate(request.uri().path(), request.uri().query())? else {
        return forward(state, request).await;
    };
    record_operation(rest.operation);

    if rest.operation == Operation::GetCapabilities {
        if let Some(renderer) = &state.renderer {
            let context = HostAndPath::from_request(request.uri(), request.headers());
            debug!(?context, "Rendering capabilities template");
            let document = renderer
                .render(&context)
                .map_err(|e| WmtsError::Internal(e.to_string()))?;
            return Ok(capabilities_response(document));
        }
    }

    let request = rewrite(request, &rest)?;
    forward(state, request).await
}

async fn forward(state: &AppState, request: Request) -> WmtsResult<Response> {
    Ok(state.forwarder.forward(request).await?)
}

/// Replace the request's path and query with their RESTful counterparts.
fn rewrite(request: Request, rest: &RestRequest) -> WmtsResult<Request> {
    let (mut parts, body) = request.into_parts();

    let path_and_query = match &rest.query {
        Some(query) => format!("{}?{}", rest.path, query),
        None => rest.path.clone(),
    };
    let path_and_query = PathAndQuery::try_from(path_and_query)
        .map_err(|e| WmtsError::Internal(format!("Invalid rewritten URI: {}", e)))?;

    let mut uri_parts = parts.uri.into_parts();
    uri_parts.path_and_query = Some(path_and_query);
    parts.uri = Uri::from_parts(uri_parts)
        .map_err(|e| WmtsError::Internal(format!("Invalid rewritten URI: {}", e)))?;

    debug!(uri = %parts.uri, "Rewrote request");
    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    fn rest(path: &str, query: Option<&str>) -> RestRequest {
        RestRequest {
            operation: Operation::GetTile,
            path: path.to_string(),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn test_rewrite_sets_path_and_query() {
        let request = http::Request::builder()
            .uri("/wmts?SERVICE=WMTS&testkey=testvalue")
            .body(Body::empty())
            .unwrap();
        let rewritten = rewrite(
            request,
            &rest("/wmts/layer/EPSG:28992/4/5/5.png", Some("testkey=testvalue")),
        )
        .unwrap();
        assert_eq!(
            rewritten.uri().to_string(),
            "/wmts/layer/EPSG:28992/4/5/5.png?testkey=testvalue"
        );
    }

    #[test]
    fn test_rewrite_clears_query() {
        let request = http::Request::builder()
            .uri("/wmts?SERVICE=WMTS")
            .body(Body::empty())
            .unwrap();
        let rewritten = rewrite(request, &rest("/wmts/l/s/4/5/5.png", None)).unwrap();
        assert_eq!(rewritten.uri().query(), None);
        assert_eq!(rewritten.uri().path(), "/wmts/l/s/4/5/5.png");
    }

    #[test]
    fn test_rewrite_keeps_encoded_segments() {
        let request = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        let rewritten = rewrite(request, &rest("/a%2Fb/..%2Fadmin/4/5/5.png", None)).unwrap();
        assert_eq!(rewritten.uri().path(), "/a%2Fb/..%2Fadmin/4/5/5.png");
    }

    #[test]
    fn test_rewrite_keeps_encoded_base_path() {
        let request = http::Request::builder().uri("/my%20base").body(Body::empty()).unwrap();
        let rewritten = rewrite(request, &rest("/my%20base/l/s/4/5/5.png", None)).unwrap();
        assert_eq!(rewritten.uri().path(), "/my%20base/l/s/4/5/5.png");
    }

    #[test]
    fn test_rewrite_keeps_absolute_uri_authority() {
        let request = http::Request::builder()
            .uri("http://example.com/wmts?request=GetTile")
            .body(Body::empty())
            .unwrap();
        let rewritten = rewrite(request, &rest("/wmts/l/s/4/5/5.png", None)).unwrap();
        assert_eq!(rewritten.uri().host(), Some("example.com"));
    }
}
