use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `Json` body whose rejection answers with the `{"error": ...}` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` string whose rejection answers with the `{"error": ...}` shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
