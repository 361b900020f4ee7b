//! HTTP error responses
//!
//! Validation failures use a `detail` list with one entry per field, the
//! other failures a plain `detail` string.

use crate::domain::{FieldError, RegistryError, ValidationErrors};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DetailMessage {
    detail: String,
}

#[derive(Debug, Serialize)]
struct DetailList {
    detail: Vec<FieldDetail>,
}

#[derive(Debug, Serialize)]
struct FieldDetail {
    loc: Vec<String>,
    msg: String,
    #[serde(rename = "type")]
    kind: String,
}

impl FieldDetail {
    fn from_field(location: &str, error: &FieldError) -> Self {
        let mut loc = vec![location.to_string()];
        if !error.field.is_empty() {
            loc.push(error.field.clone());
        }
        Self {
            loc,
            msg: error.message.clone(),
            kind: error.kind.clone(),
        }
    }
}

fn unprocessable(location: &str, errors: &ValidationErrors) -> Response {
    let body = DetailList {
        detail: errors
            .iter()
            .map(|e| FieldDetail::from_field(location, e))
            .collect(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistryError::Validation(errors) => return unprocessable("body", errors),
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Conflict(_) | RegistryError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = DetailMessage {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// 422 response for a body that is not a valid payload
pub(crate) fn invalid_body(rejection: &JsonRejection) -> Response {
    let kind = match rejection {
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "missing_content_type",
        _ => "model_type",
    };
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    unprocessable("body", &FieldError::new("", kind, rejection.body_text()).into())
}

/// 422 response for unparseable query parameters
pub(crate) fn invalid_query(rejection: &QueryRejection) -> Response {
    unprocessable(
        "query",
        &FieldError::new("", "query_invalid", rejection.body_text()).into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use axum::body::to_bytes;
    use axum::extract::Query;
    use axum::http::Uri;
    use std::collections::HashMap;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = RegistryError::patient_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "Patient not found"})
        );
    }

    #[tokio::test]
    async fn test_conflict_and_invalid_argument_are_bad_request() {
        let response = RegistryError::patient_exists().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            "Patient with this ID already exists"
        );

        let response = RegistryError::InvalidArgument("bad order".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::new("age", "greater_than", "Input should be greater than 0"));
        errors.push(FieldError::new("height", "greater_than", "Input should be greater than 0"));

        let response = RegistryError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        let detail = body["detail"].as_array().unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0]["loc"], serde_json::json!(["body", "age"]));
        assert_eq!(detail[0]["type"], "greater_than");
        assert_eq!(detail[1]["loc"], serde_json::json!(["body", "height"]));
    }

    #[tokio::test]
    async fn test_storage_error_is_internal() {
        let error: RegistryError = StoreError::Corrupt {
            location: "patients.json".to_string(),
            message: "expected value".to_string(),
        }
        .into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["detail"]
            .as_str()
            .unwrap()
            .contains("patients.json"));
    }

    #[tokio::test]
    async fn test_bad_query_string() {
        type NumericQuery = Query<HashMap<String, u32>>;
        let uri: Uri = "/sort?sort_by=x".parse().unwrap();
        let rejection = NumericQuery::try_from_uri(&uri).unwrap_err();
        let response = invalid_query(&rejection);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["detail"][0]["loc"],
            serde_json::json!(["query"])
        );
    }
}
