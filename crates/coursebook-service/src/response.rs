//! Success envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A `{"status":"success","data":...}` response with an explicit status code.
#[derive(Debug)]
pub struct Success<T> {
    status: StatusCode,
    data: T,
}

#[derive(Serialize)]
struct Envelope<T> {
    status: &'static str,
    data: T,
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status: "success",
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// 200 with a payload.
pub fn ok<T: Serialize>(data: T) -> Success<T> {
    Success {
        status: StatusCode::OK,
        data,
    }
}

/// 201 with a payload.
pub fn created<T: Serialize>(data: T) -> Success<T> {
    Success {
        status: StatusCode::CREATED,
        data,
    }
}

/// Handler result carrying a success envelope.
pub type ApiResult<T> = Result<Success<T>, crate::error::ApiError>;
