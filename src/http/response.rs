//! Conversion of routed responses into HTTP responses.
//!
//! # Design Decisions
//! - Status and headers copied verbatim from the routing layer
//! - Headers that are not valid HTTP are dropped with a warning

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::RouteResponse;

impl IntoResponse for RouteResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);

        let mut response = Response::new(body);
        *response.status_mut() = status;

        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}
