//! Response helpers shared by the handlers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use wmts_common::WmtsError;
use wmts_protocol::{exception_report, EXCEPTION_CONTENT_TYPE};

/// Generate an OWS exception report response for a pipeline error.
pub fn wmts_exception(err: &WmtsError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, EXCEPTION_CONTENT_TYPE)],
        exception_report(err),
    )
        .into_response()
}

/// `Server` header sent with locally rendered capabilities documents.
pub const SERVER_NAME: &str = "wmts-kvp-to-restful";

/// Serve a rendered capabilities document.
pub fn capabilities_response(document: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::SERVER, SERVER_NAME),
        ],
        document,
    )
        .into_response()
}
