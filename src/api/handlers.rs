//! Route handlers

use crate::api::error::{invalid_body, invalid_query};
use crate::core::registry::{PatientRegistry, SortField, SortOrder};
use crate::domain::{NewPatient, PatientId, PatientView, RegistryError, UpdatePatient};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

pub(crate) type SharedRegistry = Arc<PatientRegistry>;

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct UpdatedResponse {
    message: &'static str,
    patient: PatientView,
}

/// Sort query parameters; a repeated key keeps its last value
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SortParams {
    sort_by: Option<String>,
    order: Option<String>,
}

impl SortParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "sort_by" => params.sort_by = Some(value),
                "order" => params.order = Some(value),
                _ => {}
            }
        }
        params
    }
}

fn message(status: StatusCode, message: &'static str) -> Response {
    (status, Json(MessageResponse { message })).into_response()
}

/// Path ids that are not valid patient ids cannot exist in the store
fn path_id(raw: String) -> Result<PatientId, RegistryError> {
    PatientId::new(raw).map_err(|_| RegistryError::patient_not_found())
}

pub(crate) async fn index() -> Response {
    message(StatusCode::OK, "Patient Management System")
}

pub(crate) async fn about() -> Response {
    message(
        StatusCode::OK,
        "A patient record service: add, view, update, sort and delete patients \
         with BMI and health verdicts computed on every read.",
    )
}

pub(crate) async fn view_all(State(registry): State<SharedRegistry>) -> Response {
    match registry.list().await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn view_patient(
    State(registry): State<SharedRegistry>,
    Path(patient_id): Path<String>,
) -> Response {
    let result = match path_id(patient_id) {
        Ok(id) => registry.get(&id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(view) => Json(view).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn sort_patients(
    State(registry): State<SharedRegistry>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let params = match pairs {
        Ok(Query(pairs)) => SortParams::from_pairs(pairs),
        Err(rejection) => return invalid_query(&rejection),
    };

    // A missing field is rejected like an unknown one
    let field = match params.sort_by.unwrap_or_default().parse::<SortField>() {
        Ok(field) => field,
        Err(err) => return err.into_response(),
    };
    let order = match params.order.as_deref().map(str::parse::<SortOrder>) {
        None => SortOrder::default(),
        Some(Ok(order)) => order,
        Some(Err(err)) => return err.into_response(),
    };

    match registry.sort(field, order).await {
        Ok(views) => Json(views).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_patient(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Response {
    let Json(patient) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body(&rejection),
    };

    match registry.create(patient).await {
        Ok(_) => message(StatusCode::CREATED, "Patient created successfully"),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_patient(
    State(registry): State<SharedRegistry>,
    Path(patient_id): Path<String>,
    payload: Result<Json<UpdatePatient>, JsonRejection>,
) -> Response {
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_body(&rejection),
    };

    let result = match path_id(patient_id) {
        Ok(id) => registry.update(&id, &patch).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(patient) => (
            StatusCode::OK,
            Json(UpdatedResponse {
                message: "Patient updated successfully",
                patient,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_patient(
    State(registry): State<SharedRegistry>,
    Path(patient_id): Path<String>,
) -> Response {
    let result = match path_id(patient_id) {
        Ok(id) => registry.delete(&id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => message(StatusCode::OK, "Patient deleted successfully"),
        Err(err) => err.into_response(),
    }
}
